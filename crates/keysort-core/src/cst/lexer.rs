//! Trivia-preserving lexer for Python source
//!
//! The lexer keeps ALL source information (whitespace, comments, newlines)
//! so the CST can round-trip byte-for-byte. It deliberately understands only
//! as much Python as the dictionary transform needs: brackets, commas,
//! colons, `**`, names, numbers, and string literals (including prefixed,
//! triple-quoted, and formatted strings). Everything else becomes an opaque
//! single-character `Op` token.
//!
//! Lexing never fails: unterminated strings and unplaceable characters are
//! recorded as errors alongside the token stream, and the caller decides
//! whether the file is usable.

use std::ops::Range;

use crate::cst::PySyntaxKind;

/// Simple span representing a range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: PySyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: PySyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Convert a byte offset to a 1-based (line, column) pair
pub fn offset_to_line_col(source: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;
    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input[pos..].chars().next().map(|c| (c, c.len_utf8()))
}

fn span(start: usize, end: usize) -> CstSpan {
    start..end
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// String prefix letters Python accepts (r, b, u, f in any case)
fn is_string_prefix(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 2
        && name.chars().all(|c| matches!(c, 'r' | 'R' | 'b' | 'B' | 'u' | 'U' | 'f' | 'F'))
}

/// Lex input preserving ALL trivia for CST construction
///
/// This enables lossless round-tripping: the concatenation of every token's
/// text equals the input.
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    let len = input.len();
    let mut i = 0usize;

    while i < len {
        let Some((current, size)) = next_char(input, i) else {
            break;
        };
        let start = i;

        match current {
            '\n' => {
                tokens.push(CstToken::new(
                    PySyntaxKind::Newline,
                    "\n",
                    span(start, i + size),
                ));
                i += size;
            }
            '\r' => {
                // Handle \r\n as a single newline
                let mut end = i + size;
                if let Some(('\n', nl_size)) = next_char(input, end) {
                    end += nl_size;
                }
                tokens.push(CstToken::new(
                    PySyntaxKind::Newline,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            // Explicit line join: backslash immediately before a newline
            '\\' => {
                let after = i + size;
                match next_char(input, after) {
                    Some(('\n', nl_size)) => {
                        let end = after + nl_size;
                        tokens.push(CstToken::new(
                            PySyntaxKind::Whitespace,
                            &input[start..end],
                            span(start, end),
                        ));
                        i = end;
                    }
                    Some(('\r', cr_size)) => {
                        let mut end = after + cr_size;
                        if let Some(('\n', nl_size)) = next_char(input, end) {
                            end += nl_size;
                        }
                        tokens.push(CstToken::new(
                            PySyntaxKind::Whitespace,
                            &input[start..end],
                            span(start, end),
                        ));
                        i = end;
                    }
                    _ => {
                        errors.push(LexerError::new(
                            "unexpected character after line continuation",
                            span(start, after),
                        ));
                        tokens.push(CstToken::new(
                            PySyntaxKind::Error,
                            "\\",
                            span(start, after),
                        ));
                        i = after;
                    }
                }
            }

            // Whitespace (spaces, tabs, form feeds)
            ' ' | '\t' | '\x0c' => {
                let mut end = i + size;
                while let Some((c, s)) = next_char(input, end) {
                    if c == ' ' || c == '\t' || c == '\x0c' {
                        end += s;
                    } else {
                        break;
                    }
                }
                tokens.push(CstToken::new(
                    PySyntaxKind::Whitespace,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            // Comment to end of line
            '#' => {
                let mut end = i + size;
                while let Some((c, s)) = next_char(input, end) {
                    if c == '\n' || c == '\r' {
                        break;
                    }
                    end += s;
                }
                tokens.push(CstToken::new(
                    PySyntaxKind::Comment,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            '{' => {
                tokens.push(CstToken::new(PySyntaxKind::LBrace, "{", span(start, i + size)));
                i += size;
            }
            '}' => {
                tokens.push(CstToken::new(PySyntaxKind::RBrace, "}", span(start, i + size)));
                i += size;
            }
            '[' => {
                tokens.push(CstToken::new(
                    PySyntaxKind::LBracket,
                    "[",
                    span(start, i + size),
                ));
                i += size;
            }
            ']' => {
                tokens.push(CstToken::new(
                    PySyntaxKind::RBracket,
                    "]",
                    span(start, i + size),
                ));
                i += size;
            }
            '(' => {
                tokens.push(CstToken::new(PySyntaxKind::LParen, "(", span(start, i + size)));
                i += size;
            }
            ')' => {
                tokens.push(CstToken::new(PySyntaxKind::RParen, ")", span(start, i + size)));
                i += size;
            }
            ',' => {
                tokens.push(CstToken::new(PySyntaxKind::Comma, ",", span(start, i + size)));
                i += size;
            }

            // ':' is a dict colon; ':=' is an operator and must never be
            // mistaken for one
            ':' => {
                if let Some(('=', eq_size)) = next_char(input, i + size) {
                    let end = i + size + eq_size;
                    tokens.push(CstToken::new(PySyntaxKind::Op, ":=", span(start, end)));
                    i = end;
                } else {
                    tokens.push(CstToken::new(PySyntaxKind::Colon, ":", span(start, i + size)));
                    i += size;
                }
            }

            // '*' family: **=, *=, **, *
            '*' => {
                let mut end = i + size;
                let mut kind = PySyntaxKind::Star;
                let mut text = "*";
                if let Some(('*', s2)) = next_char(input, end) {
                    end += s2;
                    kind = PySyntaxKind::DoubleStar;
                    text = "**";
                    if let Some(('=', s3)) = next_char(input, end) {
                        end += s3;
                        kind = PySyntaxKind::Op;
                        text = "**=";
                    }
                } else if let Some(('=', s2)) = next_char(input, end) {
                    end += s2;
                    kind = PySyntaxKind::Op;
                    text = "*=";
                }
                tokens.push(CstToken::new(kind, text, span(start, end)));
                i = end;
            }

            '"' | '\'' => {
                let (end, error) = lex_string(input, start, start, false);
                if let Some(err) = error {
                    errors.push(err);
                }
                tokens.push(CstToken::new(
                    PySyntaxKind::String,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            c if c.is_ascii_digit() => {
                let end = lex_number(input, start);
                tokens.push(CstToken::new(
                    PySyntaxKind::Number,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            // '.5' style float; plain '.' is an operator
            '.' => {
                if matches!(next_char(input, i + size), Some((c, _)) if c.is_ascii_digit()) {
                    let end = lex_number(input, start);
                    tokens.push(CstToken::new(
                        PySyntaxKind::Number,
                        &input[start..end],
                        span(start, end),
                    ));
                    i = end;
                } else {
                    tokens.push(CstToken::new(PySyntaxKind::Op, ".", span(start, i + size)));
                    i += size;
                }
            }

            c if is_ident_start(c) => {
                let mut end = i + size;
                while let Some((c, s)) = next_char(input, end) {
                    if is_ident_continue(c) {
                        end += s;
                    } else {
                        break;
                    }
                }
                let name = &input[start..end];

                // A short run of prefix letters directly followed by a quote
                // is a string literal, not a name
                let quote_follows =
                    matches!(next_char(input, end), Some(('"' | '\'', _)));
                if is_string_prefix(name) && quote_follows {
                    let is_fstring = name.contains(['f', 'F']);
                    let (str_end, error) = lex_string(input, start, end, is_fstring);
                    if let Some(err) = error {
                        errors.push(err);
                    }
                    let kind = if is_fstring {
                        PySyntaxKind::FString
                    } else {
                        PySyntaxKind::String
                    };
                    tokens.push(CstToken::new(
                        kind,
                        &input[start..str_end],
                        span(start, str_end),
                    ));
                    i = str_end;
                } else {
                    tokens.push(CstToken::new(PySyntaxKind::Name, name, span(start, end)));
                    i = end;
                }
            }

            c if c.is_ascii_punctuation() => {
                tokens.push(CstToken::new(
                    PySyntaxKind::Op,
                    &input[start..i + size],
                    span(start, i + size),
                ));
                i += size;
            }

            _ => {
                errors.push(LexerError::new(
                    format!("unexpected character '{current}'"),
                    span(start, i + size),
                ));
                tokens.push(CstToken::new(
                    PySyntaxKind::Error,
                    &input[start..i + size],
                    span(start, i + size),
                ));
                i += size;
            }
        }
    }

    (tokens, errors)
}

/// Consume a number: digits, underscores, dots, exponents, hex/oct/bin
/// letters, and the imaginary suffix. Numbers are opaque to the transform,
/// so the rule is intentionally loose.
fn lex_number(input: &str, start: usize) -> usize {
    let mut end = start;
    let mut prev = '\0';
    while let Some((c, s)) = next_char(input, end) {
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            prev = c;
            end += s;
        } else if (c == '+' || c == '-') && matches!(prev, 'e' | 'E') {
            // exponent sign, e.g. 1e-5
            prev = c;
            end += s;
        } else {
            break;
        }
    }
    end
}

/// Lex a string literal starting at `token_start` whose opening quote sits
/// at `quote_pos` (prefix letters, if any, lie in between). Returns the end
/// offset (exclusive) and an error for unterminated literals.
///
/// Backslash always consumes the following character, which matches how
/// Python finds the closing quote even for raw strings.
fn lex_string(
    input: &str,
    token_start: usize,
    quote_pos: usize,
    is_fstring: bool,
) -> (usize, Option<LexerError>) {
    let Some((quote, q_size)) = next_char(input, quote_pos) else {
        return (
            quote_pos,
            Some(LexerError::new(
                "unterminated string literal",
                span(token_start, quote_pos),
            )),
        );
    };

    let rest = &input[quote_pos + q_size..];
    let triple = rest.len() >= 2
        && rest.as_bytes()[0] == quote as u8
        && rest.as_bytes()[1] == quote as u8;
    if triple {
        lex_triple_quoted(input, token_start, quote_pos + 3 * q_size, quote, is_fstring)
    } else {
        lex_single_quoted(input, token_start, quote_pos + q_size, quote, is_fstring)
    }
}

fn lex_single_quoted(
    input: &str,
    token_start: usize,
    mut j: usize,
    quote: char,
    is_fstring: bool,
) -> (usize, Option<LexerError>) {
    while let Some((c, s)) = next_char(input, j) {
        if c == '\\' {
            j += s;
            if let Some((_, s2)) = next_char(input, j) {
                j += s2;
            }
            continue;
        }
        if c == quote {
            return (j + s, None);
        }
        if c == '\n' || c == '\r' {
            return (
                j,
                Some(LexerError::new(
                    "unterminated string literal",
                    span(token_start, j),
                )),
            );
        }
        if is_fstring && c == '{' {
            if let Some(('{', s2)) = next_char(input, j + s) {
                // literal {{
                j += s + s2;
                continue;
            }
            j = scan_interpolation(input, j + s);
            continue;
        }
        if is_fstring && c == '}' {
            if let Some(('}', s2)) = next_char(input, j + s) {
                // literal }}
                j += s + s2;
                continue;
            }
        }
        j += s;
    }
    (
        input.len(),
        Some(LexerError::new(
            "unterminated string literal",
            span(token_start, input.len()),
        )),
    )
}

fn lex_triple_quoted(
    input: &str,
    token_start: usize,
    mut j: usize,
    quote: char,
    is_fstring: bool,
) -> (usize, Option<LexerError>) {
    let closer: String = (0..3).map(|_| quote).collect();
    while let Some((c, s)) = next_char(input, j) {
        if c == '\\' {
            j += s;
            if let Some((_, s2)) = next_char(input, j) {
                j += s2;
            }
            continue;
        }
        if c == quote && input[j..].starts_with(closer.as_str()) {
            return (j + closer.len(), None);
        }
        if is_fstring && c == '{' {
            if let Some(('{', s2)) = next_char(input, j + s) {
                j += s + s2;
                continue;
            }
            j = scan_interpolation(input, j + s);
            continue;
        }
        if is_fstring && c == '}' {
            if let Some(('}', s2)) = next_char(input, j + s) {
                j += s + s2;
                continue;
            }
        }
        j += s;
    }
    (
        input.len(),
        Some(LexerError::new(
            "unterminated string literal",
            span(token_start, input.len()),
        )),
    )
}

/// Scan an f-string interpolation starting just after its `{`. Nested braces
/// (format specs) and nested string literals are skipped so the token ends at
/// the real closing quote. Returns the offset just past the matching `}`.
fn scan_interpolation(input: &str, mut j: usize) -> usize {
    let mut depth = 1usize;
    while let Some((c, s)) = next_char(input, j) {
        match c {
            '{' => {
                depth += 1;
                j += s;
            }
            '}' => {
                depth -= 1;
                j += s;
                if depth == 0 {
                    return j;
                }
            }
            '\'' | '"' => {
                j = skip_nested_string(input, j + s, c);
            }
            '\\' => {
                j += s;
                if let Some((_, s2)) = next_char(input, j) {
                    j += s2;
                }
            }
            _ => {
                j += s;
            }
        }
    }
    input.len()
}

/// Skip a string literal nested inside an f-string interpolation. `j` points
/// just past the opening quote.
fn skip_nested_string(input: &str, mut j: usize, quote: char) -> usize {
    while let Some((c, s)) = next_char(input, j) {
        if c == '\\' {
            j += s;
            if let Some((_, s2)) = next_char(input, j) {
                j += s2;
            }
            continue;
        }
        j += s;
        if c == quote {
            return j;
        }
    }
    input.len()
}
