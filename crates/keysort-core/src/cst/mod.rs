//! Concrete Syntax Tree (CST) for Python source
//!
//! This module implements a lossless syntax tree using the Rowan library.
//! The CST preserves all source information including whitespace, comments,
//! and formatting, which is what lets the dictionary transform rewrite one
//! literal while leaving every other byte of the file untouched.
//!
//! ## Architecture
//!
//! The CST uses Rowan's green/red tree pattern:
//!
//! - **Green Tree**: Immutable, position-independent storage. Stores the
//!   actual source text with trivia and is cheap to clone.
//! - **Red Tree**: Dynamically constructed view with parent pointers,
//!   created on demand for traversal.
//!
//! Only bracket structure is parsed: dictionary literals get full
//! Entry/Key/Value shape, every other token is carried through verbatim.
//! This keeps the lossless invariant trivial to maintain:
//! `parse_python(source).0.text() == source` for every input.

mod builder;
mod language;
mod lexer;
mod parser;
mod syntax_kind;

pub mod ast;

pub use builder::CstBuilder;
pub use language::{PyLanguage, PySyntaxElement, PySyntaxNode, PySyntaxToken};
pub use lexer::{CstLexResult, CstSpan, CstToken, LexerError, lex_with_trivia, offset_to_line_col};
pub use parser::{ParseError, parse_python};
pub use syntax_kind::PySyntaxKind;
