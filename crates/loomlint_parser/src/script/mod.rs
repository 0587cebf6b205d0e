//! Recursive-descent parser for an ECMAScript statement/expression subset.
//!
//! Covers declarations (`var`/`let`/`const`, functions, classes with static
//! blocks), the usual control-flow statements, and expressions down to
//! calls, members, literals, array/object literals and arrow functions.
//! Regular expression and template literals, destructuring, modules and
//! `for-in`/`for-of` loops are not supported.

mod expression;
mod literal;
mod statement;

use loomlint_ast::{AstArena, Field, Node, NodeData, NodeId, NodeType, Span, Token, TokenKind};
use tracing::debug;

use crate::lexer::{Lexed, tokenize};
use crate::{LanguageOptions, ParseError, ParsedProgram, Parser, syntax_error};

/// Parser for plain script sources (`.js`, `.cjs`, `.mjs`).
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptParser;

impl ScriptParser {
    /// Creates a new script parser.
    pub fn new() -> Self {
        Self
    }
}

impl Parser for ScriptParser {
    fn name(&self) -> &str {
        "script"
    }

    fn extensions(&self) -> &[&str] {
        &["js", "cjs", "mjs"]
    }

    fn parse<'a>(
        &self,
        arena: &'a AstArena,
        source: &'a str,
        options: &LanguageOptions,
    ) -> Result<ParsedProgram<'a>, ParseError> {
        let Lexed {
            tokens,
            newline_before,
        } = tokenize(source, options)?;

        let mut builder = Builder {
            arena,
            source,
            tokens: &tokens,
            newline_before: &newline_before,
            pos: 0,
            next_id: 0,
            depth: 0,
            options: *options,
        };
        let root = builder.parse_program()?;
        debug!(
            "Parsed {} tokens into {} nodes",
            tokens.len(),
            builder.next_id
        );

        Ok(ParsedProgram {
            root,
            tokens: arena.alloc_slice_copy(&tokens),
        })
    }
}

pub(crate) type ParseResult<T> = Result<T, ParseError>;

/// Deepest statement or expression nesting accepted before parsing fails.
/// Keeps recursion here and in later tree walks within a worker thread's
/// default stack.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Cursor over the token stream plus node allocation helpers.
pub(crate) struct Builder<'a, 't> {
    arena: &'a AstArena,
    source: &'a str,
    tokens: &'t [Token<'a>],
    newline_before: &'t [bool],
    pos: usize,
    next_id: u32,
    depth: usize,
    options: LanguageOptions,
}

impl<'a> Builder<'a, '_> {
    fn parse_program(&mut self) -> ParseResult<&'a Node<'a>> {
        let body = self.parse_statement_list(true)?;
        if let Some(token) = self.peek() {
            return Err(self.unexpected(token));
        }
        let node = self.finish(
            NodeType::Program,
            Span::new(0, self.source.len() as u32),
            body,
        );
        Ok(self.arena.alloc(node))
    }

    // === Token cursor ===

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<Token<'a>> {
        self.tokens.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> ParseResult<Token<'a>> {
        let token = self.peek().ok_or_else(|| self.unexpected_end())?;
        self.pos += 1;
        Ok(token)
    }

    /// True if the current token is the punctuator or keyword `value`.
    fn at(&self, value: &str) -> bool {
        self.peek().is_some_and(|t| is_symbol(&t, value))
    }

    /// True if the current token is the contextual identifier `word`.
    fn at_word(&self, word: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Identifier && t.value == word)
    }

    fn at_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn eat(&mut self, value: &str) -> bool {
        if self.at(value) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, value: &str) -> ParseResult<Token<'a>> {
        match self.peek() {
            Some(token) if is_symbol(&token, value) => {
                self.pos += 1;
                Ok(token)
            }
            Some(token) => Err(self.unexpected(token)),
            None => Err(self.unexpected_end()),
        }
    }

    /// True if a line break separates the current token from the previous one.
    fn newline_before_current(&self) -> bool {
        self.newline_before.get(self.pos).copied().unwrap_or(true)
    }

    /// Start offset of the current token, or the end of input.
    fn start(&self) -> u32 {
        self.peek()
            .map_or(self.source.len() as u32, |t| t.span.start)
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> u32 {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |t| t.span.end)
    }

    /// Consumes a statement terminator, applying automatic semicolon
    /// insertion before `}`, at end of input, or after a line break.
    fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.eat(";") || self.at("}") || self.peek().is_none() || self.newline_before_current()
        {
            return Ok(());
        }
        match self.peek() {
            Some(token) => Err(self.unexpected(token)),
            None => Ok(()),
        }
    }

    /// Runs `parse` one nesting level deeper, failing past
    /// [`MAX_NESTING_DEPTH`].
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error_at(
                format!("Maximum nesting depth of {MAX_NESTING_DEPTH} exceeded"),
                self.start(),
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // === Node construction ===

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn finish(&mut self, node_type: NodeType, span: Span, children: Vec<Node<'a>>) -> Node<'a> {
        let id = self.next_id();
        let children: &'a [Node<'a>] = if children.is_empty() {
            &[]
        } else {
            self.arena.alloc_slice_copy(&children)
        };
        Node::new(id, node_type, span, children)
    }

    /// Finishes a node spanning from `start` to the last consumed token.
    fn finish_at(&mut self, node_type: NodeType, start: u32, children: Vec<Node<'a>>) -> Node<'a> {
        let span = Span::new(start, self.prev_end());
        self.finish(node_type, span, children)
    }

    fn leaf(&mut self, node_type: NodeType, token: &Token<'a>, data: NodeData<'a>) -> Node<'a> {
        self.finish(node_type, token.span, Vec::new()).with_data(data)
    }

    fn identifier(&mut self) -> ParseResult<Node<'a>> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Identifier => {
                self.pos += 1;
                Ok(self.leaf(NodeType::Identifier, &token, NodeData::Identifier(token.value)))
            }
            Some(token) => Err(self.unexpected(token)),
            None => Err(self.unexpected_end()),
        }
    }

    // === Errors ===

    fn unexpected(&self, token: Token<'a>) -> ParseError {
        syntax_error(
            self.source,
            format!("Unexpected token {}", token.value),
            token.span.start as usize,
        )
    }

    fn unexpected_end(&self) -> ParseError {
        syntax_error(self.source, "Unexpected end of input", self.source.len())
    }

    fn error_at(&self, message: impl Into<String>, offset: u32) -> ParseError {
        syntax_error(self.source, message, offset as usize)
    }
}

fn is_symbol(token: &Token<'_>, value: &str) -> bool {
    matches!(
        token.kind,
        TokenKind::Punctuator | TokenKind::Keyword | TokenKind::Boolean | TokenKind::Null
    ) && token.value == value
}

/// Tags a child with the field of its parent that holds it.
#[inline]
fn in_field<'a>(node: Node<'a>, field: Field) -> Node<'a> {
    node.with_field(field)
}
