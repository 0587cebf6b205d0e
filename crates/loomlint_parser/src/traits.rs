//! Parser trait definition.

use loomlint_ast::{AstArena, Node, Token};

use crate::{LanguageOptions, ParseError};

/// Output of a successful parse: the tree root plus the token stream.
#[derive(Debug, Clone, Copy)]
pub struct ParsedProgram<'a> {
    pub root: &'a Node<'a>,
    /// Tokens in source order, comments excluded.
    pub tokens: &'a [Token<'a>],
}

/// Trait for parsing source text into a syntax tree.
///
/// The tree may borrow from `source` as well as from `arena`; both must
/// outlive the returned [`ParsedProgram`].
///
/// # Example
///
/// ```rust
/// use loomlint_ast::{AstArena, NodeType};
/// use loomlint_parser::{LanguageOptions, Parser, ScriptParser};
///
/// let arena = AstArena::new();
/// let parsed = ScriptParser::new()
///     .parse(&arena, "{ let x = 1; }", &LanguageOptions::new(6))
///     .unwrap();
///
/// assert_eq!(parsed.root.node_type, NodeType::Program);
/// assert_eq!(parsed.root.children[0].node_type, NodeType::BlockStatement);
/// ```
pub trait Parser: Send + Sync {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the file extensions this parser handles.
    ///
    /// Extensions should not include the leading dot (e.g., `["js", "cjs"]`).
    fn extensions(&self) -> &[&str];

    /// Parses the source text into a syntax tree.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Syntax`] with the offending location when the
    /// text is not valid under `options`.
    fn parse<'a>(
        &self,
        arena: &'a AstArena,
        source: &'a str,
        options: &LanguageOptions,
    ) -> Result<ParsedProgram<'a>, ParseError>;

    /// Returns true if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
