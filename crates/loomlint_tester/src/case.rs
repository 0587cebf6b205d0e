//! Test case definitions.

use loomlint_core::{LanguageOptions, NodeType};
use serde_json::Value;

/// Code that must produce no diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidCase {
    pub code: String,
    pub options: Vec<Value>,
    /// Overrides the tester's language options.
    pub language: Option<LanguageOptions>,
    pub name: Option<String>,
}

impl ValidCase {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    pub fn with_options(mut self, options: Vec<Value>) -> Self {
        self.options = options;
        self
    }

    pub fn with_language(mut self, language: LanguageOptions) -> Self {
        self.language = Some(language);
        self
    }

    /// Shorthand for `with_language(LanguageOptions::new(ecma_version))`.
    pub fn ecma(self, ecma_version: u32) -> Self {
        self.with_language(LanguageOptions::new(ecma_version))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl From<&str> for ValidCase {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for ValidCase {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

/// What the fix engine must produce for an invalid case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedOutput {
    /// Byte-exact fixed text.
    Text(String),
    /// No fix may be applied.
    Unchanged,
}

/// Code that must produce the declared diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvalidCase {
    pub code: String,
    pub options: Vec<Value>,
    pub language: Option<LanguageOptions>,
    pub name: Option<String>,
    /// Expected diagnostics, in report order.
    pub errors: Vec<ExpectedError>,
    pub output: Option<ExpectedOutput>,
}

impl InvalidCase {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    pub fn with_options(mut self, options: Vec<Value>) -> Self {
        self.options = options;
        self
    }

    pub fn with_language(mut self, language: LanguageOptions) -> Self {
        self.language = Some(language);
        self
    }

    pub fn ecma(self, ecma_version: u32) -> Self {
        self.with_language(LanguageOptions::new(ecma_version))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends one expected diagnostic.
    pub fn error(mut self, error: ExpectedError) -> Self {
        self.errors.push(error);
        self
    }

    /// Expects `count` diagnostics without asserting their fields.
    pub fn error_count(mut self, count: usize) -> Self {
        self.errors
            .extend(std::iter::repeat_n(ExpectedError::default(), count));
        self
    }

    /// Expects the fix engine to turn the code into `output`.
    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(ExpectedOutput::Text(output.into()));
        self
    }

    /// Expects the fix engine to apply nothing.
    pub fn no_output(mut self) -> Self {
        self.output = Some(ExpectedOutput::Unchanged);
        self
    }
}

/// Fields asserted on one diagnostic. Unset fields are not checked.
///
/// Columns are 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedError {
    pub message_id: Option<String>,
    pub message: Option<String>,
    pub node_type: Option<NodeType>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub end_line: Option<u32>,
    pub end_column: Option<u32>,
    pub suggestions: Option<Vec<ExpectedSuggestion>>,
}

impl ExpectedError {
    /// Expects the given messageId.
    pub fn message_id(message_id: impl Into<String>) -> Self {
        Self {
            message_id: Some(message_id.into()),
            ..Default::default()
        }
    }

    /// Expects the given resolved message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn node_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    pub fn line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }

    pub fn at(self, line: u32, column: u32) -> Self {
        self.line(line).column(column)
    }

    pub fn end(mut self, end_line: u32, end_column: u32) -> Self {
        self.end_line = Some(end_line);
        self.end_column = Some(end_column);
        self
    }

    /// Expects exactly these suggestions, in order.
    pub fn suggestions(mut self, suggestions: Vec<ExpectedSuggestion>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }
}

/// One expected suggestion: its messageId and the text after applying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedSuggestion {
    pub message_id: String,
    pub output: String,
}

impl ExpectedSuggestion {
    pub fn new(message_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            output: output.into(),
        }
    }
}

/// The valid and invalid cases of one rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestCases {
    pub valid: Vec<ValidCase>,
    pub invalid: Vec<InvalidCase>,
}

impl TestCases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn valid<I, C>(mut self, cases: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ValidCase>,
    {
        self.valid.extend(cases.into_iter().map(Into::into));
        self
    }

    pub fn invalid(mut self, cases: impl IntoIterator<Item = InvalidCase>) -> Self {
        self.invalid.extend(cases);
        self
    }

    pub fn len(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
