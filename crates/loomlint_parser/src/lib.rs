//! # loomlint_parser
//!
//! Parser abstraction layer for LoomLint.
//!
//! This crate provides:
//! - A `Parser` trait that turns source text into a `loomlint_ast` tree
//! - [`LanguageOptions`] selecting the language edition and source type
//! - A built-in [`ScriptParser`] for a practical ECMAScript subset
//!
//! ## Example
//!
//! ```rust
//! use loomlint_ast::AstArena;
//! use loomlint_parser::{LanguageOptions, Parser, ScriptParser};
//!
//! let arena = AstArena::new();
//! let parser = ScriptParser::new();
//! let parsed = parser
//!     .parse(&arena, "const x = 9007199254740993;", &LanguageOptions::default())
//!     .unwrap();
//!
//! assert_eq!(parsed.tokens.len(), 5);
//! ```

mod error;
mod lexer;
mod options;
mod script;
mod traits;

use loomlint_ast::SourceText;

pub use error::ParseError;
pub use options::{LanguageOptions, SourceType};
pub use script::{MAX_NESTING_DEPTH, ScriptParser};
pub use traits::{ParsedProgram, Parser};

/// Builds a syntax error located at byte `offset` of `source`.
pub(crate) fn syntax_error(source: &str, message: impl Into<String>, offset: usize) -> ParseError {
    let text = SourceText::new(source);
    let offset = offset.min(source.len()) as u32;
    ParseError::syntax_at(message, offset, text.position(offset))
}
