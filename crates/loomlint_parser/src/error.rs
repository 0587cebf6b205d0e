//! Parse error types.

use loomlint_ast::Position;
use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The source text is not valid for the configured language options.
    #[error("{message} ({line}:{column})", line = .position.line, column = .position.column + 1)]
    Syntax {
        /// Error message.
        message: String,
        /// Byte offset where the error occurred.
        offset: u32,
        /// Line/column of `offset`.
        position: Position,
    },

    /// The parser encountered a construct it does not implement.
    #[error("Unsupported syntax: {0}")]
    Unsupported(String),
}

impl ParseError {
    /// Creates a syntax error at the given offset.
    pub fn syntax_at(message: impl Into<String>, offset: u32, position: Position) -> Self {
        Self::Syntax {
            message: message.into(),
            offset,
            position,
        }
    }

    /// Creates a new unsupported feature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::Unsupported(feature.into())
    }

    /// Returns the message without location information.
    pub fn message(&self) -> &str {
        match self {
            ParseError::Syntax { message, .. } => message,
            ParseError::Unsupported(message) => message,
        }
    }

    /// Returns the byte offset of the error, if known.
    pub fn offset(&self) -> Option<u32> {
        match self {
            ParseError::Syntax { offset, .. } => Some(*offset),
            ParseError::Unsupported(_) => None,
        }
    }

    /// Returns the position of the error, if known.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::Syntax { position, .. } => Some(*position),
            ParseError::Unsupported(_) => None,
        }
    }
}
