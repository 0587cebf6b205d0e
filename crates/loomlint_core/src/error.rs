//! Linter and rule error types.

use loomlint_parser::ParseError;
use thiserror::Error;

use crate::selector::SelectorError;

/// Errors that can occur during linting.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configured rule id is not registered.
    #[error("Definition for rule '{0}' was not found")]
    UnknownRule(String),

    /// Rule options do not match the rule's schema.
    #[error("Configuration for rule \"{rule}\" is invalid: {message}")]
    InvalidOptions { rule: String, message: String },

    /// File error.
    #[error("File error: {0}")]
    File(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a file error.
    pub fn file(message: impl Into<String>) -> Self {
        Self::File(message.into())
    }

    /// Creates an invalid options error.
    pub fn invalid_options(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Returns true for errors raised before any file is linted.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::UnknownRule(_) | Self::InvalidOptions { .. }
        )
    }
}

/// Internal failure of a single rule.
///
/// A rule that returns one of these (or panics) is disabled for the rest of
/// the file's pass; the failure is surfaced as a rule-fault diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// `report` named a message id missing from the rule's catalog.
    #[error("unknown messageId '{0}'")]
    UnknownMessageId(String),

    /// A fix was reported by a rule whose meta is not `fixable`.
    #[error("fixable rules must set the `fixable` meta property")]
    NotFixable,

    /// Suggestions were reported by a rule whose meta does not declare them.
    #[error("rules with suggestions must set the `has_suggestions` meta property")]
    SuggestionsNotDeclared,

    /// A listener key failed to compile.
    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),

    /// Options could not be converted to the rule's option type.
    #[error("invalid options: {0}")]
    Options(String),

    /// The rule panicked.
    #[error("rule panicked: {0}")]
    Panicked(String),

    /// Any other rule failure.
    #[error("{0}")]
    Failed(String),
}

impl RuleError {
    /// Creates a generic rule failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
