//! Structural parser for dictionary literals
//!
//! This module builds a lossless CST from the token stream. Only bracket
//! structure is given shape: every `{...}`, `[...]`, `(...)` group becomes a
//! node, and brace groups classified as dictionary literals get Entry /
//! UnpackingEntry / Key / Value structure. All other tokens are carried
//! through verbatim, so the tree re-serializes to the input byte-for-byte
//! even for malformed files.

use super::lexer::{CstSpan, CstToken, lex_with_trivia};
use super::{CstBuilder, PySyntaxKind, PySyntaxNode};

/// A structural parse error (mismatched or unclosed brackets)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: CstSpan,
}

impl ParseError {
    fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// Parse Python source into a lossless CST
///
/// Lexer errors are folded into the returned error list. The tree is always
/// produced and always satisfies `root.text() == source`; callers decide
/// whether errors make the file unusable.
///
/// # Example
///
/// ```rust,ignore
/// use keysort_core::cst::parse_python;
///
/// let (root, errors) = parse_python("x = {\"b\": 1, \"a\": 2}\n");
/// assert!(errors.is_empty());
/// assert_eq!(root.text().to_string(), "x = {\"b\": 1, \"a\": 2}\n");
/// ```
pub fn parse_python(source: &str) -> (PySyntaxNode, Vec<ParseError>) {
    let (tokens, lex_errors) = lex_with_trivia(source);
    let mut parser = Parser::new(&tokens);
    parser.parse_root();
    let (root, parse_errors) = parser.finish();

    let mut errors: Vec<ParseError> = lex_errors
        .into_iter()
        .map(|e| ParseError::new(e.message, e.span))
        .collect();
    errors.extend(parse_errors);
    errors.sort_by_key(|e| e.span.start);
    (root, errors)
}

/// Whether a balanced brace region is a dictionary literal or some other
/// braced construct (set literal, set/dict comprehension)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BraceKind {
    Dict,
    Other,
}

/// Token stream parser
struct Parser<'a> {
    tokens: &'a [CstToken],
    pos: usize,
    builder: CstBuilder,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [CstToken]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: CstBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> (PySyntaxNode, Vec<ParseError>) {
        (self.builder.finish(), self.errors)
    }

    fn parse_root(&mut self) {
        self.builder.start_node(PySyntaxKind::Root);
        while !self.at_end() {
            match self.current_kind() {
                PySyntaxKind::LBrace => self.parse_braced(),
                PySyntaxKind::LBracket => {
                    self.parse_group(PySyntaxKind::Bracket, PySyntaxKind::RBracket, "]")
                }
                PySyntaxKind::LParen => {
                    self.parse_group(PySyntaxKind::Paren, PySyntaxKind::RParen, ")")
                }
                PySyntaxKind::RBrace | PySyntaxKind::RBracket | PySyntaxKind::RParen => {
                    self.error_here("unexpected closing bracket");
                    self.bump();
                }
                _ => self.bump(),
            }
        }
        self.builder.finish_node(); // ROOT
    }

    /// Parse any nested group element; plain tokens are carried through
    fn parse_element(&mut self) {
        match self.current_kind() {
            PySyntaxKind::LBrace => self.parse_braced(),
            PySyntaxKind::LBracket => {
                self.parse_group(PySyntaxKind::Bracket, PySyntaxKind::RBracket, "]")
            }
            PySyntaxKind::LParen => {
                self.parse_group(PySyntaxKind::Paren, PySyntaxKind::RParen, ")")
            }
            _ => self.bump(),
        }
    }

    /// Parse a `[...]` or `(...)` group, or a non-dict `{...}` group
    fn parse_group(&mut self, kind: PySyntaxKind, close: PySyntaxKind, close_text: &str) {
        self.builder.start_node(kind);
        self.bump(); // opening bracket
        while !self.at_end() && !self.at(close) {
            if self.at_closer() {
                // mismatched closer: leave it for the enclosing group
                break;
            }
            self.parse_element();
        }
        if self.at(close) {
            self.bump();
        } else {
            self.error_here(&format!("expected '{close_text}'"));
        }
        self.builder.finish_node();
    }

    /// Dispatch a `{...}` group to the dict parser or the generic one
    fn parse_braced(&mut self) {
        match self.classify_braced() {
            BraceKind::Dict => self.parse_dict(),
            BraceKind::Other => {
                self.parse_group(PySyntaxKind::Braced, PySyntaxKind::RBrace, "}")
            }
        }
    }

    /// Pre-scan the balanced region after the current `{` to decide whether
    /// it is a dictionary literal.
    ///
    /// Any top-level `for` makes it a comprehension. Otherwise an empty
    /// region, a top-level colon, or an item-leading `**` means dict;
    /// anything else is a set literal.
    fn classify_braced(&self) -> BraceKind {
        let mut depth = 1usize;
        let mut significant = false;
        let mut has_colon = false;
        let mut leading_double_star = false;
        let mut item_start = true;

        let mut i = self.pos + 1;
        while i < self.tokens.len() {
            let tok = &self.tokens[i];
            if tok.kind.is_trivia() {
                i += 1;
                continue;
            }
            match tok.kind {
                PySyntaxKind::LBrace | PySyntaxKind::LBracket | PySyntaxKind::LParen => {
                    if depth == 1 {
                        significant = true;
                        item_start = false;
                    }
                    depth += 1;
                }
                PySyntaxKind::RBrace | PySyntaxKind::RBracket | PySyntaxKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                PySyntaxKind::Comma if depth == 1 => {
                    significant = true;
                    item_start = true;
                }
                PySyntaxKind::Colon if depth == 1 => {
                    significant = true;
                    has_colon = true;
                    item_start = false;
                }
                PySyntaxKind::DoubleStar if depth == 1 => {
                    significant = true;
                    if item_start {
                        leading_double_star = true;
                    }
                    item_start = false;
                }
                PySyntaxKind::Name if depth == 1 && tok.text == "for" => {
                    return BraceKind::Other;
                }
                _ => {
                    if depth == 1 {
                        significant = true;
                        item_start = false;
                    }
                }
            }
            i += 1;
        }

        if !significant || has_colon || leading_double_star {
            BraceKind::Dict
        } else {
            BraceKind::Other
        }
    }

    /// Parse a dictionary literal
    ///
    /// Trivia between entries and all commas stay direct Dict children, so
    /// inter-entry formatting is positional rather than attached to a pair.
    fn parse_dict(&mut self) {
        self.builder.start_node(PySyntaxKind::Dict);
        self.bump(); // '{'
        loop {
            match self.current_kind() {
                k if k.is_trivia() => self.bump(),
                PySyntaxKind::RBrace => {
                    self.bump();
                    break;
                }
                PySyntaxKind::Comma => self.bump(),
                PySyntaxKind::DoubleStar => self.parse_unpacking_entry(),
                PySyntaxKind::RBracket | PySyntaxKind::RParen | PySyntaxKind::Eof => {
                    self.error_here("expected '}'");
                    break;
                }
                _ => self.parse_entry(),
            }
        }
        self.builder.finish_node(); // DICT
    }

    /// Parse one key/value pair
    ///
    /// Children, in order: Key node, trivia before the colon, Colon token,
    /// trivia after the colon, Value node. The trivia around the colon is
    /// positional formatting; trivia inside Key and Value moves with the
    /// pair when it is reordered.
    fn parse_entry(&mut self) {
        self.builder.start_node(PySyntaxKind::Entry);

        self.builder.start_node(PySyntaxKind::Key);
        self.parse_expr_until(&[
            PySyntaxKind::Colon,
            PySyntaxKind::Comma,
            PySyntaxKind::RBrace,
            PySyntaxKind::RBracket,
            PySyntaxKind::RParen,
        ]);
        self.builder.finish_node(); // KEY

        self.consume_trivia_run(); // whitespace before ':'
        if self.at(PySyntaxKind::Colon) {
            self.bump();
            self.consume_trivia_run(); // whitespace after ':'

            self.builder.start_node(PySyntaxKind::Value);
            self.parse_expr_until(&[
                PySyntaxKind::Comma,
                PySyntaxKind::RBrace,
                PySyntaxKind::RBracket,
                PySyntaxKind::RParen,
            ]);
            self.builder.finish_node(); // VALUE
        }

        self.builder.finish_node(); // ENTRY
    }

    /// Parse a `**expr` entry
    fn parse_unpacking_entry(&mut self) {
        self.builder.start_node(PySyntaxKind::UnpackingEntry);
        self.bump(); // '**'
        self.parse_expr_until(&[
            PySyntaxKind::Comma,
            PySyntaxKind::RBrace,
            PySyntaxKind::RBracket,
            PySyntaxKind::RParen,
        ]);
        self.builder.finish_node();
    }

    /// Consume expression elements until one of `stop` appears at this
    /// nesting level. Interior trivia is kept with the expression; a trailing
    /// trivia run (one directly followed by a stop token) is left in place
    /// for the caller, so separator formatting stays positional.
    fn parse_expr_until(&mut self, stop: &[PySyntaxKind]) {
        loop {
            let kind = self.current_kind();
            if kind == PySyntaxKind::Eof || stop.contains(&kind) {
                break;
            }
            if kind.is_trivia() {
                if self.trivia_run_ends_at(stop) {
                    break;
                }
                self.bump();
                continue;
            }
            self.parse_element();
        }
    }

    /// Whether the trivia run starting at the current position is directly
    /// followed by one of `stop` (or the end of input)
    fn trivia_run_ends_at(&self, stop: &[PySyntaxKind]) -> bool {
        let mut j = self.pos;
        while j < self.tokens.len() && self.tokens[j].kind.is_trivia() {
            j += 1;
        }
        match self.tokens.get(j) {
            Some(tok) => stop.contains(&tok.kind),
            None => true,
        }
    }

    fn consume_trivia_run(&mut self) {
        while self.current_kind().is_trivia() {
            self.bump();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn current_kind(&self) -> PySyntaxKind {
        self.tokens
            .get(self.pos)
            .map(|t| t.kind)
            .unwrap_or(PySyntaxKind::Eof)
    }

    fn at(&self, kind: PySyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_closer(&self) -> bool {
        matches!(
            self.current_kind(),
            PySyntaxKind::RBrace | PySyntaxKind::RBracket | PySyntaxKind::RParen
        )
    }

    /// Add the current token to the tree and advance
    fn bump(&mut self) {
        if self.pos < self.tokens.len() {
            let token = &self.tokens[self.pos];
            self.builder.add_token(token);
            self.pos += 1;
        }
    }

    fn error_here(&mut self, message: &str) {
        let span = self
            .tokens
            .get(self.pos)
            .map(|t| t.span.clone())
            .unwrap_or_else(|| {
                let end = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
                end..end
            });
        self.errors.push(ParseError::new(message, span));
    }
}
