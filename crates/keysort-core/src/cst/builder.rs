//! Green tree builder wrapper
//!
//! Thin layer over `rowan::GreenNodeBuilder` that accepts our syntax kinds
//! and lexer tokens directly.

use rowan::GreenNodeBuilder;

use super::lexer::CstToken;
use super::{PySyntaxKind, PySyntaxNode};

/// Builds a lossless green tree from kinds and token text
pub struct CstBuilder {
    builder: GreenNodeBuilder<'static>,
}

impl CstBuilder {
    pub fn new() -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
        }
    }

    pub fn start_node(&mut self, kind: PySyntaxKind) {
        self.builder.start_node(kind.into());
    }

    pub fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub fn token(&mut self, kind: PySyntaxKind, text: &str) {
        self.builder.token(kind.into(), text);
    }

    pub fn add_token(&mut self, token: &CstToken) {
        self.token(token.kind, &token.text);
    }

    pub fn finish(self) -> PySyntaxNode {
        PySyntaxNode::new_root(self.builder.finish())
    }
}

impl Default for CstBuilder {
    fn default() -> Self {
        Self::new()
    }
}
