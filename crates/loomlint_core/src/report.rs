//! Aggregated lint results.

use std::path::PathBuf;

use serde::Serialize;

use crate::diagnostic::{Diagnostic, Severity};
use crate::fix::FixOutcome;

/// Diagnostics of one file, ordered by location.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintReport {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
    fixable_error_count: usize,
    fixable_warning_count: usize,
}

impl LintReport {
    /// Builds a report, sorting by (line, column). The sort is stable, so
    /// diagnostics at the same location keep rule registration order.
    pub fn new(mut diagnostics: Vec<Diagnostic>) -> Self {
        diagnostics.sort_by_key(|d| (d.loc.start.line, d.loc.start.column));

        let mut report = LintReport {
            diagnostics: Vec::new(),
            ..Default::default()
        };
        for diagnostic in &diagnostics {
            let fixable = diagnostic.has_unapplied_fix();
            match diagnostic.severity {
                Severity::Error => {
                    report.error_count += 1;
                    report.fixable_error_count += usize::from(fixable);
                }
                Severity::Warning => {
                    report.warning_count += 1;
                    report.fixable_warning_count += usize::from(fixable);
                }
            }
        }
        report.diagnostics = diagnostics;
        report
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Diagnostics whose fix could still be applied.
    pub fn fixable_count(&self) -> usize {
        self.fixable_error_count + self.fixable_warning_count
    }

    pub fn fixable_error_count(&self) -> usize {
        self.fixable_error_count
    }

    pub fn fixable_warning_count(&self) -> usize {
        self.fixable_warning_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_unapplied_fix(&self) -> bool {
        self.fixable_count() > 0
    }

    /// The fatal diagnostic of a file that failed to parse.
    pub fn fatal(&self) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.fatal)
    }
}

/// Result of linting with fixes applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixReport {
    /// Text after the last completed pass.
    pub output: String,
    /// Diagnostics of `output`.
    pub report: LintReport,
    pub outcome: FixOutcome,
    pub fixes_applied: usize,
    /// Whether `output` differs from the input text. Identity fixes and
    /// cycles back to the input leave this false.
    pub modified: bool,
}

impl FixReport {
    /// Returns true if the output differs from the input.
    pub fn is_modified(&self) -> bool {
        self.modified
    }
}

/// Report of one file from [`crate::Linter::lint_files`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub report: LintReport,
}

/// Fix result of one file from [`crate::Linter::fix_files`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFixReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub report: FixReport,
}
