//! Typed AST layer over the CST
//!
//! This module provides type-safe wrappers over the raw CST nodes. Each
//! wrapper implements `cast()` to safely convert from a CST node.

use super::{PySyntaxKind, PySyntaxNode, PySyntaxToken};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: PySyntaxKind) -> bool;
    fn cast(node: PySyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &PySyntaxNode;
}

macro_rules! ast_node {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            syntax: PySyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: PySyntaxKind) -> bool {
                kind == $kind
            }

            fn cast(node: PySyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &PySyntaxNode {
                &self.syntax
            }
        }
    };
}

ast_node!(
    /// A `{...}` group classified as a dictionary literal
    Dict,
    PySyntaxKind::Dict
);
ast_node!(
    /// One key/value pair inside a dictionary literal
    Entry,
    PySyntaxKind::Entry
);
ast_node!(
    /// A `**expr` entry; its presence makes relative order load-bearing
    UnpackingEntry,
    PySyntaxKind::UnpackingEntry
);
ast_node!(
    /// The key expression of an entry
    Key,
    PySyntaxKind::Key
);
ast_node!(
    /// The value expression of an entry (opaque to the transform)
    Value,
    PySyntaxKind::Value
);

/// What kind of key an entry has
///
/// The set of key kinds is closed: a plain string literal, a formatted
/// string, or anything else. Only string-literal keys are sortable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyKind {
    /// A single plain string-literal token (prefixed and triple-quoted
    /// literals included)
    StringLiteral(PySyntaxToken),
    /// A formatted string: not a reliable, static sort key
    Interpolated,
    /// Any other expression (name, number, tuple, concatenation, ...)
    Other,
}

/// One element of a dictionary literal, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictEntryKind {
    Pair(Entry),
    Unpacking(UnpackingEntry),
}

impl Dict {
    /// All entries in source order
    pub fn entries(&self) -> impl Iterator<Item = DictEntryKind> + '_ {
        self.syntax.children().filter_map(|node| match node.kind() {
            PySyntaxKind::Entry => Entry::cast(node).map(DictEntryKind::Pair),
            PySyntaxKind::UnpackingEntry => {
                UnpackingEntry::cast(node).map(DictEntryKind::Unpacking)
            }
            _ => None,
        })
    }

    /// Key/value pairs in source order, ignoring unpacking entries
    pub fn pairs(&self) -> impl Iterator<Item = Entry> + '_ {
        self.syntax.children().filter_map(Entry::cast)
    }
}

impl Entry {
    pub fn key(&self) -> Option<Key> {
        self.syntax.children().find_map(Key::cast)
    }

    pub fn value(&self) -> Option<Value> {
        self.syntax.children().find_map(Value::cast)
    }

    pub fn colon_token(&self) -> Option<PySyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .find(|t| t.kind() == PySyntaxKind::Colon)
    }

    /// Trivia between the key and the colon (positional formatting)
    pub fn whitespace_before_colon(&self) -> Vec<PySyntaxToken> {
        let mut seen_key = false;
        let mut run = Vec::new();
        for el in self.syntax.children_with_tokens() {
            match el {
                rowan::NodeOrToken::Node(n) if n.kind() == PySyntaxKind::Key => {
                    seen_key = true;
                }
                rowan::NodeOrToken::Token(t) if t.kind() == PySyntaxKind::Colon => break,
                rowan::NodeOrToken::Token(t) if seen_key && t.kind().is_trivia() => {
                    run.push(t);
                }
                _ => {}
            }
        }
        run
    }

    /// Trivia between the colon and the value (positional formatting)
    pub fn whitespace_after_colon(&self) -> Vec<PySyntaxToken> {
        let mut seen_colon = false;
        let mut run = Vec::new();
        for el in self.syntax.children_with_tokens() {
            match el {
                rowan::NodeOrToken::Token(t) if t.kind() == PySyntaxKind::Colon => {
                    seen_colon = true;
                }
                rowan::NodeOrToken::Node(n) if n.kind() == PySyntaxKind::Value => break,
                rowan::NodeOrToken::Token(t) if seen_colon && t.kind().is_trivia() => {
                    run.push(t);
                }
                _ => {}
            }
        }
        run
    }

    /// Classify this entry's key
    pub fn key_kind(&self) -> KeyKind {
        match self.key() {
            Some(key) => key.kind(),
            None => KeyKind::Other,
        }
    }
}

impl Key {
    /// Classify the key expression
    ///
    /// A key is a string literal only when the Key node holds exactly one
    /// significant element and it is a plain string token. Parenthesized
    /// keys and implicit concatenations (`"a" "b"`) are `Other`.
    pub fn kind(&self) -> KeyKind {
        let mut significant = self
            .syntax
            .children_with_tokens()
            .filter(|el| !el.kind().is_trivia());
        let first = significant.next();
        if significant.next().is_some() {
            return KeyKind::Other;
        }
        match first {
            Some(rowan::NodeOrToken::Token(t)) if t.kind() == PySyntaxKind::String => {
                KeyKind::StringLiteral(t)
            }
            Some(rowan::NodeOrToken::Token(t)) if t.kind() == PySyntaxKind::FString => {
                KeyKind::Interpolated
            }
            _ => KeyKind::Other,
        }
    }
}

impl Value {
    /// Whether the value holds any significant (non-trivia) content
    pub fn has_content(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .any(|el| !el.kind().is_trivia())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_python;

    fn first_dict(source: &str) -> Dict {
        let (root, errors) = parse_python(source);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        root.descendants().find_map(Dict::cast).unwrap()
    }

    #[test]
    fn entries_in_source_order() {
        let dict = first_dict("{'b': 1, **extra, 'a': 2}");
        let entries: Vec<_> = dict.entries().collect();
        assert_eq!(entries.len(), 3);
        assert!(matches!(entries[0], DictEntryKind::Pair(_)));
        assert!(matches!(entries[1], DictEntryKind::Unpacking(_)));
        assert!(matches!(entries[2], DictEntryKind::Pair(_)));
    }

    #[test]
    fn string_literal_key() {
        let dict = first_dict("{'a': 1}");
        let entry = dict.pairs().next().unwrap();
        match entry.key_kind() {
            KeyKind::StringLiteral(token) => assert_eq!(token.text(), "'a'"),
            other => panic!("expected string literal, got {other:?}"),
        }
    }

    #[test]
    fn fstring_key_is_interpolated() {
        let dict = first_dict("{f'x{n}': 1}");
        let entry = dict.pairs().next().unwrap();
        assert_eq!(entry.key_kind(), KeyKind::Interpolated);
    }

    #[test]
    fn non_string_keys_are_other() {
        for src in ["{1: 'a'}", "{name: 1}", "{(1, 2): 1}", "{'a' 'b': 1}"] {
            let dict = first_dict(src);
            let entry = dict.pairs().next().unwrap();
            assert_eq!(entry.key_kind(), KeyKind::Other, "for {src}");
        }
    }

    #[test]
    fn prefixed_string_key_is_still_a_string() {
        let dict = first_dict("{r'a': 1}");
        let entry = dict.pairs().next().unwrap();
        assert!(matches!(entry.key_kind(), KeyKind::StringLiteral(_)));
    }

    #[test]
    fn colon_whitespace_accessors() {
        let dict = first_dict("{'a'  :\t1}");
        let entry = dict.pairs().next().unwrap();
        let before: String = entry
            .whitespace_before_colon()
            .iter()
            .map(|t| t.text().to_string())
            .collect();
        let after: String = entry
            .whitespace_after_colon()
            .iter()
            .map(|t| t.text().to_string())
            .collect();
        assert_eq!(before, "  ");
        assert_eq!(after, "\t");
    }

    #[test]
    fn value_content() {
        let dict = first_dict("{'a': [1, 2]}");
        let entry = dict.pairs().next().unwrap();
        assert!(entry.value().unwrap().has_content());
        assert_eq!(entry.value().unwrap().syntax().text().to_string(), "[1, 2]");
    }
}
