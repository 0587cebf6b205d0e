//! Lexical tokens kept alongside the tree.

use serde::Serialize;

use crate::Span;

/// Token categories, following the ESTree token types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Punctuator,
    Numeric,
    String,
    Boolean,
    Null,
}

/// A lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw source text of the token.
    pub value: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub const fn new(kind: TokenKind, value: &'a str, span: Span) -> Self {
        Self { kind, value, span }
    }

    /// Returns true if this is the given punctuator.
    #[inline]
    pub fn is_punctuator(&self, value: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.value == value
    }
}

/// Returns the tokens lying entirely inside `span`.
///
/// `tokens` must be sorted by start offset, as produced by a lexer.
pub fn tokens_in<'t, 'a>(tokens: &'t [Token<'a>], span: Span) -> &'t [Token<'a>] {
    let first = tokens.partition_point(|t| t.span.start < span.start);
    let last = tokens.partition_point(|t| t.span.end <= span.end);
    if first >= last { &[] } else { &tokens[first..last] }
}
