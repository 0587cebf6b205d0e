//! Parallel file linting logic.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::LinterError;
use crate::linter::{FixFilesResult, LintFilesResult, Linter};
use crate::report::{FileFixReport, FileReport};

/// Lints `paths` in parallel. Each file is read, parsed and traversed on its
/// own; only the linter's rules and configuration are shared.
pub fn lint_files(linter: &Linter, paths: &[PathBuf]) -> LintFilesResult {
    let results: Vec<Result<FileReport, (PathBuf, LinterError)>> = paths
        .par_iter()
        .map(|path| {
            linter
                .lint_file(path)
                .map(|report| FileReport {
                    path: path.clone(),
                    report,
                })
                .map_err(|e| (path.clone(), e))
        })
        .collect();

    let (successes, failures) = split_results(results);
    info!(
        "Linted {} files ({} failed)",
        successes.len() + failures.len(),
        failures.len()
    );
    Ok((successes, failures))
}

/// Fixes `paths` in parallel, writing changed files back.
pub fn fix_files(linter: &Linter, paths: &[PathBuf]) -> FixFilesResult {
    let results: Vec<Result<FileFixReport, (PathBuf, LinterError)>> = paths
        .par_iter()
        .map(|path| {
            linter
                .fix_file(path)
                .map(|report| FileFixReport {
                    path: path.clone(),
                    report,
                })
                .map_err(|e| (path.clone(), e))
        })
        .collect();

    let (successes, failures) = split_results(results);
    info!(
        "Fixed {} files ({} failed)",
        successes.len() + failures.len(),
        failures.len()
    );
    Ok((successes, failures))
}

fn split_results<T>(
    results: Vec<Result<T, (PathBuf, LinterError)>>,
) -> (Vec<T>, Vec<(PathBuf, LinterError)>) {
    let mut successes = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(report) => successes.push(report),
            Err((path, error)) => {
                warn!("Failed to lint {}: {}", path.display(), error);
                failures.push((path, error));
            }
        }
    }
    (successes, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinterConfig;
    use crate::registry::RuleRegistry;

    #[test]
    fn test_lint_files_parallel_empty() {
        let linter = Linter::new(&RuleRegistry::new(), LinterConfig::new()).unwrap();

        let paths: Vec<PathBuf> = vec![];
        let result = lint_files(&linter, &paths);
        assert!(result.is_ok());

        let (successes, failures) = result.unwrap();
        assert!(successes.is_empty());
        assert!(failures.is_empty());
    }

    #[test]
    fn test_missing_file_is_a_per_file_failure() {
        let linter = Linter::new(&RuleRegistry::new(), LinterConfig::new()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.js");
        std::fs::write(&good, "a;").unwrap();
        let missing = dir.path().join("missing.js");

        let (successes, failures) = lint_files(&linter, &[good.clone(), missing.clone()]).unwrap();

        assert_eq!(successes.len(), 1);
        assert_eq!(successes[0].path, good);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, missing);
        assert!(matches!(failures[0].1, LinterError::File(_)));
    }
}
