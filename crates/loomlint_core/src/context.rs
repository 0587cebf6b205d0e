//! Per-file and per-rule context handed to rules.

use loomlint_ast::{
    Ancestors, Node, NodeType, Position, SourceText, Span, Token, TreeIndex, tokens_in,
};
use loomlint_parser::LanguageOptions;
use loomlint_scope::{Scope, ScopeTree};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::diagnostic::{Diagnostic, Fix, Severity, Suggestion};
use crate::error::RuleError;
use crate::rule::RuleMeta;

/// Everything derived from one parse of one file, shared read-only by all
/// rules during a pass.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    pub source: &'a SourceText,
    pub tokens: &'a [Token<'a>],
    pub index: &'a TreeIndex<'a>,
    pub scopes: &'a ScopeTree<'a>,
    pub language: LanguageOptions,
}

impl<'a> FileContext<'a> {
    /// Root node of the tree.
    pub fn root(&self) -> &'a Node<'a> {
        self.index.root()
    }
}

/// A report request: what a rule hands to [`RuleContext::report`].
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    message_id: String,
    span: Span,
    node_type: Option<NodeType>,
    data: Vec<(String, String)>,
    fix: Option<Fix>,
    suggestions: Vec<(String, Fix)>,
}

impl Report {
    /// Reports on the whole range of `node`.
    pub fn node(node: &Node<'_>, message_id: impl Into<String>) -> Self {
        Self {
            node_type: Some(node.node_type),
            ..Self::span(node.span, message_id)
        }
    }

    /// Reports on an explicit range.
    pub fn span(span: Span, message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            span,
            node_type: None,
            data: Vec::new(),
            fix: None,
            suggestions: Vec::new(),
        }
    }

    /// Narrows the reported range while keeping the node type.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Supplies a value for a `{{name}}` placeholder.
    pub fn with_data(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.data.push((name.into(), value.to_string()));
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn with_suggestion(mut self, message_id: impl Into<String>, fix: Fix) -> Self {
        self.suggestions.push((message_id.into(), fix));
        self
    }
}

/// The facade a rule sees while linting one file.
///
/// Created fresh for every (file, rule) pair in every pass.
pub struct RuleContext<'a> {
    file: &'a FileContext<'a>,
    meta: &'a RuleMeta,
    options: &'a [Value],
    severity: Severity,
    reports: Vec<Diagnostic>,
    fault: Option<RuleError>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        file: &'a FileContext<'a>,
        meta: &'a RuleMeta,
        options: &'a [Value],
        severity: Severity,
    ) -> Self {
        Self {
            file,
            meta,
            options,
            severity,
            reports: Vec::new(),
            fault: None,
        }
    }

    /// The id of the running rule.
    pub fn id(&self) -> &'static str {
        self.meta.name
    }

    pub fn meta(&self) -> &'a RuleMeta {
        self.meta
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    // === Options ===

    /// Options array as configured, already validated against the schema.
    pub fn options(&self) -> &'a [Value] {
        self.options
    }

    /// Deserializes the first option into `T`, or `T::default()` when no
    /// option is given.
    pub fn options_as<T: DeserializeOwned + Default>(&self) -> Result<T, RuleError> {
        match self.options.first() {
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|e| RuleError::Options(e.to_string()))
            }
            None => Ok(T::default()),
        }
    }

    // === Source ===

    pub fn source(&self) -> &'a SourceText {
        self.file.source
    }

    pub fn text(&self) -> &'a str {
        self.file.source.as_str()
    }

    /// Source text of `node`.
    pub fn text_of(&self, node: &Node<'_>) -> &'a str {
        self.file.source.slice(node.span).unwrap_or_default()
    }

    pub fn slice(&self, span: Span) -> Option<&'a str> {
        self.file.source.slice(span)
    }

    pub fn position(&self, offset: u32) -> Position {
        self.file.source.position(offset)
    }

    /// All tokens of the file, comments excluded.
    pub fn tokens(&self) -> &'a [Token<'a>] {
        self.file.tokens
    }

    /// Tokens fully inside `span`.
    pub fn tokens_in(&self, span: Span) -> &'a [Token<'a>] {
        tokens_in(self.file.tokens, span)
    }

    // === Tree ===

    pub fn root(&self) -> &'a Node<'a> {
        self.file.root()
    }

    pub fn parent(&self, node: &Node<'_>) -> Option<&'a Node<'a>> {
        self.file.index.parent(node)
    }

    /// Ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: &Node<'_>) -> Ancestors<'a, 'a> {
        self.file.index.ancestors(node)
    }

    // === Scope ===

    /// Innermost scope containing `node`.
    pub fn scope_for(&self, node: &Node<'_>) -> Option<&'a Scope<'a>> {
        self.file.scopes.scope_for(node)
    }

    pub fn scopes(&self) -> &'a ScopeTree<'a> {
        self.file.scopes
    }

    /// Returns true if `node` is in strict mode code.
    pub fn is_strict(&self, node: &Node<'_>) -> bool {
        self.file.scopes.is_strict(node)
    }

    pub fn language(&self) -> &LanguageOptions {
        &self.file.language
    }

    // === Reporting ===

    /// Records a diagnostic.
    ///
    /// # Errors
    ///
    /// Fails, and marks the rule as faulted, when the message id is not in
    /// the catalog or when a fix or suggestion is not allowed by the rule's
    /// meta.
    pub fn report(&mut self, report: Report) -> Result<(), RuleError> {
        match self.build_diagnostic(report) {
            Ok(diagnostic) => {
                self.reports.push(diagnostic);
                Ok(())
            }
            Err(error) => {
                self.fault.get_or_insert_with(|| error.clone());
                Err(error)
            }
        }
    }

    fn build_diagnostic(&self, report: Report) -> Result<Diagnostic, RuleError> {
        let template = self
            .meta
            .message(&report.message_id)
            .ok_or_else(|| RuleError::UnknownMessageId(report.message_id.clone()))?;
        if report.fix.is_some() && !self.meta.fixable {
            return Err(RuleError::NotFixable);
        }
        if !report.suggestions.is_empty() && !self.meta.has_suggestions {
            return Err(RuleError::SuggestionsNotDeclared);
        }

        let mut suggestions = Vec::with_capacity(report.suggestions.len());
        for (message_id, fix) in report.suggestions {
            let template = self
                .meta
                .message(&message_id)
                .ok_or_else(|| RuleError::UnknownMessageId(message_id.clone()))?;
            suggestions.push(Suggestion {
                message: interpolate(template, &report.data),
                message_id,
                fix,
            });
        }

        let mut diagnostic = Diagnostic::new(
            self.meta.name,
            interpolate(template, &report.data),
            report.span,
            self.file.source.location(report.span),
        )
        .with_message_id(report.message_id)
        .with_severity(self.severity);
        diagnostic.node_type = report.node_type;
        diagnostic.fix = report.fix;
        diagnostic.suggestions = suggestions;
        Ok(diagnostic)
    }

    /// Takes the first recorded fault, if any.
    pub(crate) fn take_fault(&mut self) -> Option<RuleError> {
        self.fault.take()
    }

    /// Consumes the context, returning everything it reported.
    pub(crate) fn into_reports(self) -> Vec<Diagnostic> {
        self.reports
    }
}

/// Fills `{{name}}` placeholders; unknown names stay verbatim.
pub(crate) fn interpolate(template: &str, data: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        let name = rest[open + 2..open + 2 + close].trim();
        out.push_str(&rest[..open]);
        match data.iter().find(|(key, _)| key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 4 + close]),
        }
        rest = &rest[open + 4 + close..];
    }

    out.push_str(rest);
    out
}
