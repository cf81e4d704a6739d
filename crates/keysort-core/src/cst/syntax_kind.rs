//! Syntax kind enumeration for the Python CST
//!
//! This module defines all token and node types the dictionary-sorting
//! transform needs to see. The lexer never classifies Python any further
//! than this: everything that is not a bracket, a separator, a string, or
//! trivia is an opaque `Name`, `Number`, or `Op` token.

/// Syntax kind for Python source elements
///
/// Discriminants are grouped in ranges:
/// - Trivia (0-9)
/// - Tokens (10-99)
/// - Structure nodes (200+)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum PySyntaxKind {
    // ==================
    // Trivia (0-9)
    // ==================
    /// Spaces, tabs, form feeds, and backslash line joins
    Whitespace = 0,
    /// Line comment starting with #
    Comment = 1,
    /// Newline (\n, \r\n, or \r)
    Newline = 2,

    // ==================
    // Brackets (10-19)
    // ==================
    LBrace = 10,
    RBrace = 11,
    LBracket = 12,
    RBracket = 13,
    LParen = 14,
    RParen = 15,

    // ==================
    // Separators and operators (20-29)
    // ==================
    Comma = 20,
    /// A bare `:` (a walrus `:=` lexes as a single `Op` instead)
    Colon = 21,
    /// `**` (dict unpacking or the power operator)
    DoubleStar = 22,
    Star = 23,
    /// Any other operator or punctuation character
    Op = 24,

    // ==================
    // Atoms (30-39)
    // ==================
    /// Identifier or keyword
    Name = 30,
    Number = 31,
    /// String literal, including raw/bytes/unicode prefixes and triple quotes
    String = 32,
    /// Formatted string literal (any prefix containing `f` or `F`)
    FString = 33,

    // ==================
    // Special tokens (40+)
    // ==================
    /// A character the lexer could not place
    Error = 40,
    /// End-of-file sentinel (never produced by the lexer)
    Eof = 41,

    // ==================
    // Structure nodes (200+)
    // ==================
    /// Whole source file
    Root = 200,
    /// Any `(...)` group
    Paren = 201,
    /// Any `[...]` group
    Bracket = 202,
    /// A `{...}` group that is not a dictionary literal (set, comprehension)
    Braced = 203,
    /// A `{...}` group classified as a dictionary literal
    Dict = 210,
    /// One key/value pair inside a Dict
    Entry = 211,
    /// A `**expr` entry inside a Dict
    UnpackingEntry = 212,
    /// The key expression of an Entry
    Key = 213,
    /// The value expression of an Entry
    Value = 214,
}

impl PySyntaxKind {
    /// Whitespace, comments, and newlines
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            PySyntaxKind::Whitespace | PySyntaxKind::Comment | PySyntaxKind::Newline
        )
    }

    /// Structure node kinds (as opposed to tokens)
    pub fn is_node(self) -> bool {
        self as u16 >= 200
    }
}

impl std::fmt::Display for PySyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl From<PySyntaxKind> for rowan::SyntaxKind {
    fn from(kind: PySyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivia_classification() {
        assert!(PySyntaxKind::Whitespace.is_trivia());
        assert!(PySyntaxKind::Comment.is_trivia());
        assert!(PySyntaxKind::Newline.is_trivia());
        assert!(!PySyntaxKind::Comma.is_trivia());
        assert!(!PySyntaxKind::String.is_trivia());
    }

    #[test]
    fn node_classification() {
        assert!(PySyntaxKind::Dict.is_node());
        assert!(PySyntaxKind::Entry.is_node());
        assert!(!PySyntaxKind::LBrace.is_node());
    }
}
