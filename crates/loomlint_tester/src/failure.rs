//! Case failures.

use std::fmt;

use thiserror::Error;

/// Which list a failing case came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    Valid,
    Invalid,
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseKind::Valid => f.write_str("valid"),
            CaseKind::Invalid => f.write_str("invalid"),
        }
    }
}

/// One case that did not meet its expectations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} case #{index} {label:?}:\n  {}", .problems.join("\n  "))]
pub struct CaseFailure {
    pub kind: CaseKind,
    /// Position of the case in its list.
    pub index: usize,
    /// The case name, or its code when unnamed.
    pub label: String,
    pub problems: Vec<String>,
}

/// Every failure of one `try_run`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} of {total} cases failed for rule '{rule}':\n\n{}", .failures.len(), render(.failures))]
pub struct RunFailure {
    pub rule: String,
    pub total: usize,
    pub failures: Vec<CaseFailure>,
}

fn render(failures: &[CaseFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}
