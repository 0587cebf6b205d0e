//! Integration tests for parallel linting functionality.
//!
//! These tests verify that the linter correctly handles parallel processing
//! of multiple files and proper thread safety.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use loomlint_core::{
    DiagnosticKind, Fix, FixOutcome, Linter, LinterConfig, LinterError, ListenerMap, Report,
    Rule, RuleContext, RuleError, RuleMeta, RuleRegistry,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Reports empty statements and deletes them.
struct NoExtraSemi(RuleMeta);

impl Rule for NoExtraSemi {
    fn meta(&self) -> &RuleMeta {
        &self.0
    }

    fn create<'a>(&self, _context: &RuleContext<'a>) -> Result<ListenerMap<'a>, RuleError> {
        ListenerMap::stateless()
            .on("EmptyStatement", |_, node, context| {
                context.report(Report::node(node, "unexpected").with_fix(Fix::delete(node.span)))
            })
            .build()
    }
}

fn create_test_linter() -> Linter {
    let mut registry = RuleRegistry::new();
    registry
        .register(Arc::new(NoExtraSemi(
            RuleMeta::new("no-extra-semi", &[("unexpected", "Unnecessary semicolon.")]).fixable(),
        )))
        .unwrap();

    let config = LinterConfig::from_json(r#"{ "rules": { "no-extra-semi": "warn" } }"#).unwrap();
    Linter::new(&registry, config).expect("Failed to create linter")
}

#[test]
fn test_parallel_lint_empty_files_list() {
    let linter = create_test_linter();

    let files: Vec<PathBuf> = vec![];
    let result = linter.lint_files(&files);

    assert!(result.is_ok());
    let (successes, failures) = result.unwrap();
    assert!(successes.is_empty());
    assert!(failures.is_empty());
}

#[test]
fn test_parallel_lint_multiple_files() {
    let temp_dir = TempDir::new().unwrap();
    let linter = create_test_linter();

    let files: Vec<PathBuf> = (0..8)
        .map(|i| {
            let path = temp_dir.path().join(format!("file{i}.js"));
            fs::write(&path, ";".repeat(i)).unwrap();
            path
        })
        .collect();

    let (successes, failures) = linter.lint_files(&files).unwrap();

    assert!(failures.is_empty());
    assert_eq!(successes.len(), 8);
    for (i, result) in successes.iter().enumerate() {
        assert_eq!(result.path, files[i]);
        assert_eq!(result.report.warning_count(), i);
    }
}

#[test]
fn test_parallel_lint_reports_syntax_errors_per_file() {
    let temp_dir = TempDir::new().unwrap();
    let linter = create_test_linter();

    let broken = temp_dir.path().join("broken.js");
    let fine = temp_dir.path().join("fine.js");
    fs::write(&broken, "function (").unwrap();
    fs::write(&fine, "a;;").unwrap();

    let (successes, failures) = linter.lint_files(&[broken, fine]).unwrap();

    assert!(failures.is_empty());
    let fatal = successes[0].report.fatal().unwrap();
    assert_eq!(fatal.kind, DiagnosticKind::Syntax);
    assert_eq!(successes[1].report.len(), 1);
}

#[test]
fn test_parallel_lint_with_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let linter = create_test_linter();

    let existing = temp_dir.path().join("existing.js");
    fs::write(&existing, "a;").unwrap();
    let missing = temp_dir.path().join("missing.js");

    let (successes, failures) = linter.lint_files(&[existing, missing.clone()]).unwrap();

    assert_eq!(successes.len(), 1);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, missing);
    assert!(matches!(failures[0].1, LinterError::File(_)));
}

#[test]
fn test_parallel_fix_writes_changed_files_only() {
    let temp_dir = TempDir::new().unwrap();
    let linter = create_test_linter();

    let dirty = temp_dir.path().join("dirty.js");
    let clean = temp_dir.path().join("clean.js");
    fs::write(&dirty, "a;;\n;b;").unwrap();
    fs::write(&clean, "a;\n").unwrap();

    let (successes, failures) = linter.fix_files(&[dirty.clone(), clean.clone()]).unwrap();

    assert!(failures.is_empty());
    assert_eq!(fs::read_to_string(&dirty).unwrap(), "a;\nb;");
    assert_eq!(fs::read_to_string(&clean).unwrap(), "a;\n");
    assert_eq!(successes[0].report.fixes_applied, 2);
    assert_eq!(
        successes[0].report.outcome,
        FixOutcome::Converged { passes: 1 }
    );
    assert!(!successes[1].report.is_modified());
}
