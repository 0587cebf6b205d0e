//! Diagnostic types for lint results.

use loomlint_ast::{Location, NodeType, SourceText, Span};
use loomlint_parser::ParseError;
use serde::{Deserialize, Serialize};

/// Severity level for diagnostics.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning - should be reviewed.
    Warning,
    /// Error - must be fixed.
    #[default]
    Error,
}

/// Where a diagnostic came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Reported by a rule.
    #[default]
    Lint,
    /// A rule failed internally and was disabled for the file.
    RuleFault,
    /// The source could not be parsed.
    Syntax,
}

/// An auto-fix for a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fix {
    /// The byte span to replace.
    pub span: Span,

    /// The replacement text.
    pub text: String,
}

impl Fix {
    /// Creates a new fix.
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            text: text.into(),
        }
    }

    /// Creates a fix that inserts text at a position.
    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::new(Span::empty(offset), text)
    }

    /// Creates a fix that deletes a span.
    pub fn delete(span: Span) -> Self {
        Self::new(span, String::new())
    }

    /// Returns true if the fix can be applied to `source`: the span lies in
    /// bounds and on character boundaries.
    pub fn is_applicable(&self, source: &str) -> bool {
        let (start, end) = (self.span.start as usize, self.span.end as usize);
        start <= end
            && end <= source.len()
            && source.is_char_boundary(start)
            && source.is_char_boundary(end)
    }
}

/// An alternative edit offered to the user but never applied automatically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub message_id: String,
    pub message: String,
    pub fix: Fix,
}

/// A diagnostic message from a lint rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// The rule that generated this diagnostic; `None` for syntax errors.
    pub rule_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// The resolved message.
    pub message: String,

    /// Severity level.
    #[serde(default)]
    pub severity: Severity,

    /// Byte span in the source.
    pub span: Span,

    /// Line/column location.
    pub loc: Location,

    /// Type of the reported node, if the report targeted a node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,

    /// Optional fix for this diagnostic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,

    #[serde(default)]
    pub kind: DiagnosticKind,

    /// True if the file could not be linted at all.
    #[serde(default)]
    pub fatal: bool,

    /// True if this diagnostic's fix was applied in the pass that produced it.
    #[serde(default)]
    pub fixed: bool,
}

impl Diagnostic {
    /// Creates a new lint diagnostic.
    pub fn new(
        rule_id: impl Into<String>,
        message: impl Into<String>,
        span: Span,
        loc: Location,
    ) -> Self {
        Self {
            rule_id: Some(rule_id.into()),
            message_id: None,
            message: message.into(),
            severity: Severity::Error,
            span,
            loc,
            node_type: None,
            fix: None,
            suggestions: Vec::new(),
            kind: DiagnosticKind::Lint,
            fatal: false,
            fixed: false,
        }
    }

    /// Creates the single fatal diagnostic for a file that failed to parse.
    pub fn syntax(error: &ParseError, source: &SourceText) -> Self {
        let offset = error.offset().unwrap_or(0).min(source.len());
        let span = Span::empty(offset);
        Self {
            rule_id: None,
            message_id: None,
            message: format!("Parsing error: {}", error.message()),
            severity: Severity::Error,
            span,
            loc: source.location(span),
            node_type: None,
            fix: None,
            suggestions: Vec::new(),
            kind: DiagnosticKind::Syntax,
            fatal: true,
            fixed: false,
        }
    }

    /// Creates a diagnostic for a rule that failed internally.
    pub fn rule_fault(
        rule_id: impl Into<String>,
        message: impl Into<String>,
        span: Span,
        loc: Location,
    ) -> Self {
        Self {
            kind: DiagnosticKind::RuleFault,
            ..Self::new(rule_id, message, span, loc)
        }
    }

    /// Sets the message id.
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Sets the severity level.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the node type.
    pub fn with_node_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    /// Sets an auto-fix.
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Adds a suggestion.
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// Returns true if the diagnostic carries a fix that was not applied.
    pub fn has_unapplied_fix(&self) -> bool {
        self.fix.is_some() && !self.fixed
    }
}
