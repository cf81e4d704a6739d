//! Tree transformer: the post-order traversal driver
//!
//! Walks the whole tree bottom-up so a nested dictionary is reordered
//! before its parent's own entries are compared, and threads the "did
//! anything change" signal functionally in return values rather than on a
//! stateful visitor. Each dictionary is visited exactly once per pass, and
//! already-sorted dictionaries are left untouched, which is what makes a
//! second run a true no-op.

use std::path::Path;

use tracing::debug;

use crate::cst::ast::{AstNode, Dict};
use crate::cst::{PySyntaxKind, PySyntaxNode, offset_to_line_col, parse_python};
use crate::error::KeysortError;
use crate::result::Result;
use crate::sorting::{SortMode, entries_sorted, is_eligible, reorder};

/// Result of transforming one source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutcome {
    /// The re-serialized source (identical to the input when nothing moved)
    pub output: String,
    /// How many dictionary literals were reordered
    pub dicts_reordered: usize,
}

/// Parse source, surfacing the first lexer/parser error as a
/// [`KeysortError::Parse`] attributed to `path`
pub fn parse_checked(path: &Path, source: &str) -> Result<PySyntaxNode> {
    let (root, errors) = parse_python(source);
    if let Some(err) = errors.first() {
        let (line, col) = offset_to_line_col(source, err.span.start);
        return Err(KeysortError::parse(path, err.message.clone(), line, col));
    }
    Ok(root)
}

/// Reorder every eligible, unsorted dictionary in the tree
///
/// Returns the (possibly rebuilt) tree and the number of dictionaries that
/// were reordered; the file changed iff the count is non-zero.
pub fn transform_tree(root: &PySyntaxNode, mode: SortMode) -> (PySyntaxNode, usize) {
    match mode {
        SortMode::Alpha => {
            let (green, reordered) = rewrite_node(root);
            (PySyntaxNode::new_root(green), reordered)
        }
    }
}

/// Convenience wrapper: parse, transform, and re-serialize one source text
pub fn transform_source(source: &str, mode: SortMode) -> Result<TransformOutcome> {
    let root = parse_checked(Path::new("<string>"), source)?;
    let (tree, dicts_reordered) = transform_tree(&root, mode);
    let output = if dicts_reordered > 0 {
        tree.text().to_string()
    } else {
        source.to_string()
    };
    Ok(TransformOutcome {
        output,
        dicts_reordered,
    })
}

type GreenChild = rowan::NodeOrToken<rowan::GreenNode, rowan::GreenToken>;

/// Post-order rebuild: children first, then this node's own entries
fn rewrite_node(node: &PySyntaxNode) -> (rowan::GreenNode, usize) {
    let mut reordered = 0usize;
    let mut children: Vec<GreenChild> = Vec::new();
    for element in node.children_with_tokens() {
        match element {
            rowan::NodeOrToken::Node(child) => {
                let (green, count) = rewrite_node(&child);
                reordered += count;
                children.push(green.into());
            }
            rowan::NodeOrToken::Token(token) => {
                children.push(token.green().to_owned().into());
            }
        }
    }
    let mut green = rowan::GreenNode::new(node.kind().into(), children);

    if node.kind() == PySyntaxKind::Dict {
        let rebuilt = PySyntaxNode::new_root(green.clone());
        if let Some(dict) = Dict::cast(rebuilt)
            && is_eligible(&dict)
            && !entries_sorted(&dict)
        {
            debug!(dict = %dict.syntax().text(), "reordering dictionary");
            green = reorder(&dict);
            reordered += 1;
        }
    }

    (green, reordered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> TransformOutcome {
        transform_source(source, SortMode::Alpha).unwrap()
    }

    #[test]
    fn sorts_unsorted_dict() {
        let outcome = run("x = {\"b\": 1, \"a\": 2}\n");
        assert_eq!(outcome.output, "x = {\"a\": 2, \"b\": 1}\n");
        assert_eq!(outcome.dicts_reordered, 1);
    }

    #[test]
    fn sorted_dict_is_a_no_op() {
        let src = "x = {\"a\": 1, \"b\": 2}\n";
        let outcome = run(src);
        assert_eq!(outcome.output, src);
        assert_eq!(outcome.dicts_reordered, 0);
    }

    #[test]
    fn unpacking_entry_blocks_the_dict() {
        let src = "x = {\"b\": 1, **extra, \"a\": 2}\n";
        let outcome = run(src);
        assert_eq!(outcome.output, src);
        assert_eq!(outcome.dicts_reordered, 0);
    }

    #[test]
    fn interpolated_key_blocks_the_dict() {
        let src = "x = {f\"x{n}\": 1, \"a\": 2}\n";
        let outcome = run(src);
        assert_eq!(outcome.output, src);
        assert_eq!(outcome.dicts_reordered, 0);
    }

    #[test]
    fn tight_spacing_and_trailing_comma_stay_positional() {
        let outcome = run("x = {\"b\":1,\"a\":2,}\n");
        assert_eq!(outcome.output, "x = {\"a\":2,\"b\":1,}\n");
        assert_eq!(outcome.dicts_reordered, 1);
    }

    #[test]
    fn nested_dict_sorts_before_outer() {
        let outcome = run("x = {\"b\": {\"d\": 1, \"c\": 2}, \"a\": 3}\n");
        assert_eq!(outcome.output, "x = {\"a\": 3, \"b\": {\"c\": 2, \"d\": 1}}\n");
        assert_eq!(outcome.dicts_reordered, 2);
    }

    #[test]
    fn nested_dict_inside_ineligible_outer_still_sorts() {
        let outcome = run("x = {**base, \"inner\": {\"b\": 1, \"a\": 2}}\n");
        assert_eq!(
            outcome.output,
            "x = {**base, \"inner\": {\"a\": 2, \"b\": 1}}\n"
        );
        assert_eq!(outcome.dicts_reordered, 1);
    }

    #[test]
    fn idempotent() {
        let first = run("x = {\"b\": 1, \"a\": 2}\n");
        let second = run(&first.output);
        assert_eq!(second.output, first.output);
        assert_eq!(second.dicts_reordered, 0);
    }

    #[test]
    fn stable_for_equal_keys() {
        // 'a' extracted from both '"a"' and "'a'"; order must be retained
        let src = "x = {\"a\": 1, 'a': 2}\n";
        let outcome = run(src);
        assert_eq!(outcome.output, src);
        assert_eq!(outcome.dicts_reordered, 0);
    }

    #[test]
    fn uppercase_sorts_before_lowercase() {
        let outcome = run("x = {\"a\": 1, \"B\": 2}\n");
        assert_eq!(outcome.output, "x = {\"B\": 2, \"a\": 1}\n");
    }

    #[test]
    fn comment_inside_value_travels_with_the_pair() {
        let src = "x = {\n    'b': [1,  # one\n          2],\n    'a': 3,\n}\n";
        let outcome = run(src);
        assert_eq!(
            outcome.output,
            "x = {\n    'a': 3,\n    'b': [1,  # one\n          2],\n}\n"
        );
    }

    #[test]
    fn comment_after_comma_stays_in_its_slot() {
        let outcome = run("x = {'b': 1,  # bee\n     'a': 2}\n");
        assert_eq!(outcome.output, "x = {'a': 2,  # bee\n     'b': 1}\n");
    }

    #[test]
    fn parse_error_is_surfaced() {
        let err = transform_source("x = {'a': 1\n", SortMode::Alpha).unwrap_err();
        assert!(matches!(err, KeysortError::Parse { .. }));
    }

    #[test]
    fn sets_and_comprehensions_untouched() {
        for src in [
            "x = {3, 2, 1}\n",
            "x = {k: v for k, v in pairs}\n",
            "x = {n for n in it}\n",
        ] {
            let outcome = run(src);
            assert_eq!(outcome.output, src);
            assert_eq!(outcome.dicts_reordered, 0);
        }
    }
}
