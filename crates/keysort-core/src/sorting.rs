//! Eligibility filter, key extraction, and the formatting-preserving
//! reorderer
//!
//! A dictionary is only reordered when every entry is a plain
//! string-literal key/value pair; the check is all-or-nothing per
//! dictionary. The reorderer then binds separator formatting to slot
//! *position* rather than to the pair occupying it: the entry that ends up
//! last always gets whatever comma/colon spacing the original last slot had.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cst::ast::{AstNode, Dict, DictEntryKind, Entry, KeyKind};
use crate::cst::PySyntaxKind;
use crate::error::KeysortError;

/// Sort order applied to dictionary keys
///
/// Exactly one mode exists; anything else is a configuration error at the
/// boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Lexicographic (codepoint) order over the extracted key text:
    /// case-sensitive, uppercase before lowercase, symbols by ordinal
    #[default]
    Alpha,
}

impl FromStr for SortMode {
    type Err = KeysortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alpha" => Ok(SortMode::Alpha),
            other => Err(KeysortError::config(format!(
                "unknown sorting '{other}' (expected 'alpha')"
            ))),
        }
    }
}

/// Matches a string literal wrapped in exactly one pair of quotes.
/// Prefixed (`r"x"`) and multiline literals do not match; for those the
/// sort key is the literal text verbatim.
static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^("|')(?P<key>.*)("|')$"#).expect("valid regex"));

/// Extract the sortable key from a string literal's exact source text
///
/// Strips exactly one leading and one trailing quote character; escape
/// sequences inside are left unresolved. Total: literals the pattern cannot
/// match are compared by their full source text.
pub fn extract_sort_key(literal: &str) -> &str {
    KEY_PATTERN
        .captures(literal)
        .and_then(|caps| caps.name("key"))
        .map(|m| m.as_str())
        .unwrap_or(literal)
}

/// The sort key for one entry; defined only for string-literal keys and
/// empty otherwise (eligibility is checked before sorting)
fn entry_sort_key(entry: &Entry) -> String {
    match entry.key_kind() {
        KeyKind::StringLiteral(token) => extract_sort_key(token.text()).to_string(),
        KeyKind::Interpolated | KeyKind::Other => String::new(),
    }
}

/// Decide whether a dictionary literal is safe to reorder
///
/// Every entry must be a structurally complete key/value pair whose key is
/// a plain string literal. Unpacking entries make relative order
/// load-bearing, and formatted-string keys have no static sort key, so
/// either one disqualifies the whole dictionary. Pure predicate; skipping
/// is silent.
pub fn is_eligible(dict: &Dict) -> bool {
    for entry in dict.entries() {
        match entry {
            DictEntryKind::Unpacking(_) => return false,
            DictEntryKind::Pair(pair) => {
                if pair.colon_token().is_none() {
                    return false;
                }
                if !pair.value().is_some_and(|v| v.has_content()) {
                    return false;
                }
                match pair.key_kind() {
                    KeyKind::StringLiteral(_) => {}
                    KeyKind::Interpolated | KeyKind::Other => return false,
                }
            }
        }
    }
    true
}

/// Whether the entries are already in sorted order
///
/// Equivalent to comparing the stable sort against the current sequence
/// element-for-element: under a stable sort they agree exactly when the
/// extracted keys are non-decreasing.
pub fn entries_sorted(dict: &Dict) -> bool {
    let keys: Vec<String> = dict.pairs().map(|e| entry_sort_key(&e)).collect();
    keys.windows(2).all(|w| w[0] <= w[1])
}

type GreenChild = rowan::NodeOrToken<rowan::GreenNode, rowan::GreenToken>;

/// Rebuild a dictionary node with its pairs in sorted order
///
/// Called only for eligible, unsorted dictionaries. Inter-entry trivia and
/// commas are Dict-level children and stay in place untouched; each entry
/// slot is rebuilt from the sorted pair's key and value plus the colon
/// spacing captured from the pair originally occupying that slot.
pub fn reorder(dict: &Dict) -> rowan::GreenNode {
    let mut sorted: Vec<(String, Entry)> = dict
        .pairs()
        .map(|entry| (entry_sort_key(&entry), entry))
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut slot = 0usize;
    let mut children: Vec<GreenChild> = Vec::new();
    for element in dict.syntax().children_with_tokens() {
        match element {
            rowan::NodeOrToken::Node(node) if node.kind() == PySyntaxKind::Entry => {
                let rebuilt = match (Entry::cast(node.clone()), sorted.get(slot)) {
                    (Some(original), Some((_, moved))) => rebuild_entry(&original, moved),
                    _ => node.green().into_owned(),
                };
                children.push(rebuilt.into());
                slot += 1;
            }
            rowan::NodeOrToken::Node(node) => {
                children.push(node.green().into_owned().into());
            }
            rowan::NodeOrToken::Token(token) => {
                children.push(token.green().to_owned().into());
            }
        }
    }
    rowan::GreenNode::new(PySyntaxKind::Dict.into(), children)
}

/// Assemble one entry slot: the moved pair's key and value wrapped in the
/// slot's own colon formatting
fn rebuild_entry(slot: &Entry, moved: &Entry) -> rowan::GreenNode {
    let mut children: Vec<GreenChild> = Vec::new();
    if let Some(key) = moved.key() {
        children.push(key.syntax().green().into_owned().into());
    }
    for trivia in slot.whitespace_before_colon() {
        children.push(trivia.green().to_owned().into());
    }
    if let Some(colon) = slot.colon_token() {
        children.push(colon.green().to_owned().into());
    }
    for trivia in slot.whitespace_after_colon() {
        children.push(trivia.green().to_owned().into());
    }
    if let Some(value) = moved.value() {
        children.push(value.syntax().green().into_owned().into());
    }
    rowan::GreenNode::new(PySyntaxKind::Entry.into(), children)
}
