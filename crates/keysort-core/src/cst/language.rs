//! Rowan language implementation for Python
//!
//! This module implements the `rowan::Language` trait, which connects our
//! PySyntaxKind enum to Rowan's generic CST infrastructure.

use rowan::Language;

use super::PySyntaxKind;

/// Language implementation for Python source files
///
/// This is a zero-sized type that implements `rowan::Language` to provide
/// the connection between our syntax kinds and Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PyLanguage;

impl Language for PyLanguage {
    type Kind = PySyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            // Trivia
            0 => PySyntaxKind::Whitespace,
            1 => PySyntaxKind::Comment,
            2 => PySyntaxKind::Newline,

            // Brackets
            10 => PySyntaxKind::LBrace,
            11 => PySyntaxKind::RBrace,
            12 => PySyntaxKind::LBracket,
            13 => PySyntaxKind::RBracket,
            14 => PySyntaxKind::LParen,
            15 => PySyntaxKind::RParen,

            // Separators and operators
            20 => PySyntaxKind::Comma,
            21 => PySyntaxKind::Colon,
            22 => PySyntaxKind::DoubleStar,
            23 => PySyntaxKind::Star,
            24 => PySyntaxKind::Op,

            // Atoms
            30 => PySyntaxKind::Name,
            31 => PySyntaxKind::Number,
            32 => PySyntaxKind::String,
            33 => PySyntaxKind::FString,

            // Special tokens
            40 => PySyntaxKind::Error,
            41 => PySyntaxKind::Eof,

            // Structure nodes
            200 => PySyntaxKind::Root,
            201 => PySyntaxKind::Paren,
            202 => PySyntaxKind::Bracket,
            203 => PySyntaxKind::Braced,
            210 => PySyntaxKind::Dict,
            211 => PySyntaxKind::Entry,
            212 => PySyntaxKind::UnpackingEntry,
            213 => PySyntaxKind::Key,
            214 => PySyntaxKind::Value,

            _ => PySyntaxKind::Error,
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

/// Syntax node over Python source
pub type PySyntaxNode = rowan::SyntaxNode<PyLanguage>;
/// Syntax token over Python source
pub type PySyntaxToken = rowan::SyntaxToken<PyLanguage>;
/// Either a node or a token
pub type PySyntaxElement = rowan::NodeOrToken<PySyntaxNode, PySyntaxToken>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_roundtrip() {
        let kinds = [
            PySyntaxKind::Whitespace,
            PySyntaxKind::LBrace,
            PySyntaxKind::Colon,
            PySyntaxKind::FString,
            PySyntaxKind::Dict,
            PySyntaxKind::UnpackingEntry,
        ];

        for &kind in &kinds {
            let raw = PyLanguage::kind_to_raw(kind);
            let back = PyLanguage::kind_from_raw(raw);
            assert_eq!(kind, back, "Roundtrip failed for {kind:?}");
        }
    }

    #[test]
    fn kind_values() {
        assert_eq!(PyLanguage::kind_to_raw(PySyntaxKind::Whitespace).0, 0);
        assert_eq!(PyLanguage::kind_to_raw(PySyntaxKind::LBrace).0, 10);
        assert_eq!(PyLanguage::kind_to_raw(PySyntaxKind::Root).0, 200);
        assert_eq!(PyLanguage::kind_to_raw(PySyntaxKind::Dict).0, 210);
    }
}
