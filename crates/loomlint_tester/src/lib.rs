//! # loomlint_tester
//!
//! Valid/invalid case harness for LoomLint rules.
//!
//! Each case runs through a fresh [`Linter`] with exactly one rule enabled at
//! error severity. Valid cases must report nothing; invalid cases must report
//! exactly the declared diagnostics, in order, and may assert the fixed
//! output and the offered suggestions.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use loomlint_core::{ListenerMap, NodeType, Report, Rule, RuleContext, RuleError, RuleMeta};
//! use loomlint_tester::{ExpectedError, InvalidCase, RuleTester, TestCases};
//!
//! struct NoEmptyStatement(RuleMeta);
//!
//! impl Rule for NoEmptyStatement {
//!     fn meta(&self) -> &RuleMeta {
//!         &self.0
//!     }
//!
//!     fn create<'a>(&self, _context: &RuleContext<'a>) -> Result<ListenerMap<'a>, RuleError> {
//!         ListenerMap::stateless()
//!             .on("EmptyStatement", |_, node, context| {
//!                 context.report(Report::node(node, "unexpected"))
//!             })
//!             .build()
//!     }
//! }
//!
//! let rule = Arc::new(NoEmptyStatement(RuleMeta::new(
//!     "no-empty-statement",
//!     &[("unexpected", "Unnecessary semicolon.")],
//! )));
//!
//! RuleTester::new().run(
//!     rule,
//!     &TestCases::new().valid(["a;"]).invalid([InvalidCase::new("a;;").error(
//!         ExpectedError::message_id("unexpected")
//!             .node_type(NodeType::EmptyStatement)
//!             .at(1, 3),
//!     )]),
//! );
//! ```

mod case;
mod failure;

use std::sync::Arc;

use loomlint_core::{
    DEFAULT_MAX_FIX_PASSES, Diagnostic, DiagnosticKind, Fix, LanguageOptions, Linter,
    LinterConfig, LinterError, LintReport, Rule, RuleLevel, RuleRegistry, RuleSetting,
};
use serde_json::Value;
use tracing::debug;

pub use case::{
    ExpectedError, ExpectedOutput, ExpectedSuggestion, InvalidCase, TestCases, ValidCase,
};
pub use failure::{CaseFailure, CaseKind, RunFailure};

/// Runs test cases against a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleTester {
    language: LanguageOptions,
    max_fix_passes: usize,
}

impl Default for RuleTester {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleTester {
    /// Creates a tester using the latest language edition.
    pub fn new() -> Self {
        Self {
            language: LanguageOptions::default(),
            max_fix_passes: DEFAULT_MAX_FIX_PASSES,
        }
    }

    /// Sets the language options used by cases that do not override them.
    pub fn with_language(mut self, language: LanguageOptions) -> Self {
        self.language = language;
        self
    }

    /// Shorthand for `with_language(LanguageOptions::new(ecma_version))`.
    pub fn ecma(self, ecma_version: u32) -> Self {
        self.with_language(LanguageOptions::new(ecma_version))
    }

    pub fn with_max_fix_passes(mut self, passes: usize) -> Self {
        self.max_fix_passes = passes;
        self
    }

    /// Runs every case and panics listing all failures.
    ///
    /// # Panics
    ///
    /// Panics if any case fails.
    pub fn run(&self, rule: Arc<dyn Rule>, cases: &TestCases) {
        if let Err(failure) = self.try_run(rule, cases) {
            panic!("{failure}");
        }
    }

    /// Runs every case and returns all failures.
    ///
    /// # Errors
    ///
    /// Returns a [`RunFailure`] listing each failing case.
    pub fn try_run(&self, rule: Arc<dyn Rule>, cases: &TestCases) -> Result<(), RunFailure> {
        debug!(
            "Running {} valid and {} invalid cases for {}",
            cases.valid.len(),
            cases.invalid.len(),
            rule.name()
        );

        let mut failures = Vec::new();

        for (index, case) in cases.valid.iter().enumerate() {
            let problems = self.check_valid(&rule, case);
            if !problems.is_empty() {
                failures.push(CaseFailure {
                    kind: CaseKind::Valid,
                    index,
                    label: label(case.name.as_deref(), &case.code),
                    problems,
                });
            }
        }

        for (index, case) in cases.invalid.iter().enumerate() {
            let problems = self.check_invalid(&rule, case);
            if !problems.is_empty() {
                failures.push(CaseFailure {
                    kind: CaseKind::Invalid,
                    index,
                    label: label(case.name.as_deref(), &case.code),
                    problems,
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(RunFailure {
                rule: rule.name().to_string(),
                total: cases.len(),
                failures,
            })
        }
    }

    fn linter(
        &self,
        rule: &Arc<dyn Rule>,
        options: &[Value],
        language: Option<LanguageOptions>,
    ) -> Result<Linter, LinterError> {
        let mut registry = RuleRegistry::new();
        registry.register(Arc::clone(rule))?;
        let config = LinterConfig::new()
            .with_rule(
                rule.name(),
                RuleSetting::new(RuleLevel::Error).with_options(options.to_vec()),
            )
            .with_language_options(language.unwrap_or(self.language))
            .with_max_fix_passes(self.max_fix_passes);
        Linter::new(&registry, config)
    }

    fn check_valid(&self, rule: &Arc<dyn Rule>, case: &ValidCase) -> Vec<String> {
        let linter = match self.linter(rule, &case.options, case.language) {
            Ok(linter) => linter,
            Err(e) => return vec![e.to_string()],
        };

        let report = linter.verify(&case.code);
        if let Some(problem) = blocking_problem(&report) {
            return vec![problem];
        }
        if report.is_empty() {
            return Vec::new();
        }
        vec![format!(
            "Should have no errors but had {}: {}",
            report.len(),
            describe(report.diagnostics())
        )]
    }

    fn check_invalid(&self, rule: &Arc<dyn Rule>, case: &InvalidCase) -> Vec<String> {
        if case.errors.is_empty() {
            return vec!["Invalid cases must declare at least one error".to_string()];
        }

        let linter = match self.linter(rule, &case.options, case.language) {
            Ok(linter) => linter,
            Err(e) => return vec![e.to_string()],
        };

        let report = linter.verify(&case.code);
        if let Some(problem) = blocking_problem(&report) {
            return vec![problem];
        }

        let diagnostics = report.diagnostics();
        if diagnostics.len() != case.errors.len() {
            return vec![format!(
                "Should have {} error{} but had {}: {}",
                case.errors.len(),
                if case.errors.len() == 1 { "" } else { "s" },
                diagnostics.len(),
                describe(diagnostics)
            )];
        }

        let mut problems = Vec::new();
        for (i, (expected, actual)) in case.errors.iter().zip(diagnostics).enumerate() {
            check_error(i, expected, actual, &case.code, &mut problems);
        }

        if let Some(expected) = &case.output {
            let fixed = linter.verify_and_fix(&case.code);
            match expected {
                ExpectedOutput::Text(text) if fixed.output != *text => problems.push(format!(
                    "Output is incorrect: expected {:?}, got {:?}",
                    text, fixed.output
                )),
                ExpectedOutput::Unchanged if fixed.fixes_applied > 0 => problems.push(format!(
                    "Expected no autofix but {} fix(es) were applied: {:?}",
                    fixed.fixes_applied, fixed.output
                )),
                _ => {}
            }
        }

        problems
    }
}

/// A syntax error or a rule fault fails the case outright.
fn blocking_problem(report: &LintReport) -> Option<String> {
    if let Some(fatal) = report.fatal() {
        return Some(format!("A fatal parsing error occurred: {}", fatal.message));
    }
    report
        .diagnostics()
        .iter()
        .find(|d| d.kind == DiagnosticKind::RuleFault)
        .map(|d| d.message.clone())
}

fn check_error(
    i: usize,
    expected: &ExpectedError,
    actual: &Diagnostic,
    code: &str,
    problems: &mut Vec<String>,
) {
    let mut mismatch = |field: &str, expected: &dyn std::fmt::Debug, actual: &dyn std::fmt::Debug| {
        problems.push(format!(
            "Error {i}: {field} should be {expected:?} but was {actual:?}"
        ));
    };

    if let Some(id) = &expected.message_id
        && actual.message_id.as_deref() != Some(id.as_str())
    {
        mismatch("messageId", id, &actual.message_id);
    }
    if let Some(message) = &expected.message
        && actual.message != *message
    {
        mismatch("message", message, &actual.message);
    }
    if let Some(node_type) = expected.node_type
        && actual.node_type != Some(node_type)
    {
        mismatch("type", &node_type, &actual.node_type);
    }

    let loc = actual.loc;
    if let Some(line) = expected.line
        && loc.start.line != line
    {
        mismatch("line", &line, &loc.start.line);
    }
    if let Some(column) = expected.column
        && loc.start.column + 1 != column
    {
        mismatch("column", &column, &(loc.start.column + 1));
    }
    if let Some(end_line) = expected.end_line
        && loc.end.line != end_line
    {
        mismatch("endLine", &end_line, &loc.end.line);
    }
    if let Some(end_column) = expected.end_column
        && loc.end.column + 1 != end_column
    {
        mismatch("endColumn", &end_column, &(loc.end.column + 1));
    }

    if let Some(suggestions) = &expected.suggestions {
        check_suggestions(i, suggestions, actual, code, problems);
    }
}

fn check_suggestions(
    i: usize,
    expected: &[ExpectedSuggestion],
    actual: &Diagnostic,
    code: &str,
    problems: &mut Vec<String>,
) {
    if expected.len() != actual.suggestions.len() {
        problems.push(format!(
            "Error {i}: should have {} suggestion(s) but had {}",
            expected.len(),
            actual.suggestions.len()
        ));
        return;
    }

    for (j, (expected, suggestion)) in expected.iter().zip(&actual.suggestions).enumerate() {
        if suggestion.message_id != expected.message_id {
            problems.push(format!(
                "Error {i} suggestion {j}: messageId should be {:?} but was {:?}",
                expected.message_id, suggestion.message_id
            ));
        }
        match apply_suggestion(code, &suggestion.fix) {
            Some(output) if output == expected.output => {}
            Some(output) => problems.push(format!(
                "Error {i} suggestion {j}: output should be {:?} but was {:?}",
                expected.output, output
            )),
            None => problems.push(format!(
                "Error {i} suggestion {j}: fix span {}..{} is out of bounds",
                suggestion.fix.span.start, suggestion.fix.span.end
            )),
        }
    }
}

fn apply_suggestion(code: &str, fix: &Fix) -> Option<String> {
    if !fix.is_applicable(code) {
        return None;
    }
    let range = fix.span.range();
    Some(format!("{}{}{}", &code[..range.start], fix.text, &code[range.end..]))
}

fn describe(diagnostics: &[Diagnostic]) -> String {
    let items: Vec<String> = diagnostics
        .iter()
        .map(|d| {
            format!(
                "{}:{} {}",
                d.loc.start.line,
                d.loc.start.column + 1,
                d.message_id.as_deref().unwrap_or(&d.message)
            )
        })
        .collect();
    format!("[{}]", items.join(", "))
}

fn label(name: Option<&str>, code: &str) -> String {
    name.unwrap_or(code).to_string()
}
