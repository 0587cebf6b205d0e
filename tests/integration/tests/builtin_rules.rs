//! Integration tests for the built-in rules
//!
//! Tests the full pipeline: configuration file, parallel file linting and
//! JSON reports.

use std::fs;
use std::path::{Path, PathBuf};

use loomlint_core::{DiagnosticKind, Linter, LinterConfig, LinterError};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn linter_from_config(dir: &Path, config: &str) -> Result<Linter, LinterError> {
    let config_path = write(dir, "loomlint.json", config);
    let registry = loomlint_rules::builtin_registry()?;
    Linter::new(&registry, LinterConfig::from_file(config_path)?)
}

const CONFIG: &str = r#"{
    "rules": {
        "no-lone-blocks": "warn",
        "no-loss-of-precision": "error"
    },
    "languageOptions": { "ecmaVersion": 2022 }
}"#;

mod lint_files {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reports_each_file_in_input_order() {
        let dir = TempDir::new().unwrap();
        let linter = linter_from_config(dir.path(), CONFIG).unwrap();

        let files = vec![
            write(dir.path(), "clean.js", "{ let x = 1; }\nvar y = 0.5;\n"),
            write(dir.path(), "blocks.js", "{}\nif (a) { b(); {} }\n"),
            write(dir.path(), "numbers.js", "var big = 9007199254740993;\n"),
            write(
                dir.path(),
                "static.js",
                "class C {\n  static {\n    { 0x20000000000001; }\n  }\n}\n",
            ),
        ];

        let (reports, failures) = linter.lint_files(&files).unwrap();

        assert!(failures.is_empty());
        let counts: Vec<(usize, usize)> = reports
            .iter()
            .map(|r| (r.report.error_count(), r.report.warning_count()))
            .collect();
        assert_eq!(counts, vec![(0, 0), (0, 2), (1, 0), (1, 1)]);
        for (report, path) in reports.iter().zip(&files) {
            assert_eq!(&report.path, path);
        }
    }

    #[test]
    fn syntax_errors_do_not_stop_other_files() {
        let dir = TempDir::new().unwrap();
        let linter = linter_from_config(dir.path(), CONFIG).unwrap();

        let files = vec![
            write(dir.path(), "broken.js", "var = ;"),
            write(dir.path(), "blocks.js", "{}"),
        ];

        let (reports, failures) = linter.lint_files(&files).unwrap();

        assert!(failures.is_empty());
        let fatal = reports[0].report.fatal().unwrap();
        assert_eq!(fatal.kind, DiagnosticKind::Syntax);
        assert!(fatal.message.starts_with("Parsing error:"));
        assert_eq!(reports[0].report.len(), 1);
        assert_eq!(reports[1].report.warning_count(), 1);
    }

    #[test]
    fn deeply_nested_file_fails_alone() {
        let dir = TempDir::new().unwrap();
        let linter = linter_from_config(dir.path(), CONFIG).unwrap();

        let deep = format!("{}{}", "{".repeat(5000), "}".repeat(5000));
        let files = vec![
            write(dir.path(), "deep.js", &deep),
            write(dir.path(), "blocks.js", "{}"),
        ];

        let (reports, failures) = linter.lint_files(&files).unwrap();

        assert!(failures.is_empty());
        let fatal = reports[0].report.fatal().unwrap();
        assert_eq!(fatal.kind, DiagnosticKind::Syntax);
        assert_eq!(
            fatal.message,
            "Parsing error: Maximum nesting depth of 64 exceeded"
        );
        assert_eq!(reports[1].report.warning_count(), 1);
    }

    #[test]
    fn missing_files_are_reported_separately() {
        let dir = TempDir::new().unwrap();
        let linter = linter_from_config(dir.path(), CONFIG).unwrap();

        let missing = dir.path().join("missing.js");
        let (reports, failures) = linter
            .lint_files(&[write(dir.path(), "ok.js", "a();"), missing.clone()])
            .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, missing);
    }

    #[test]
    fn fix_files_leaves_unfixable_findings_in_place() {
        let dir = TempDir::new().unwrap();
        let linter = linter_from_config(dir.path(), CONFIG).unwrap();
        let path = write(dir.path(), "blocks.js", "{ foo(); }\n");

        let (reports, failures) = linter.fix_files(std::slice::from_ref(&path)).unwrap();

        assert!(failures.is_empty());
        assert!(!reports[0].report.is_modified());
        assert_eq!(reports[0].report.report.warning_count(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ foo(); }\n");
    }
}

mod configuration {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn language_options_come_from_config() {
        let dir = TempDir::new().unwrap();
        let es5 = linter_from_config(
            dir.path(),
            r#"{ "rules": { "no-lone-blocks": "error" }, "languageOptions": { "ecmaVersion": 5 } }"#,
        )
        .unwrap();
        let es2015 = linter_from_config(
            dir.path(),
            r#"{ "rules": { "no-lone-blocks": "error" }, "languageOptions": { "ecmaVersion": 2015 } }"#,
        )
        .unwrap();

        let source = "{ const x = 1; }";
        assert_eq!(es5.verify(source).len(), 1);
        assert!(es2015.verify(source).is_empty());
    }

    #[test]
    fn unknown_rule_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = linter_from_config(dir.path(), r#"{ "rules": { "no-such-rule": "error" } }"#)
            .unwrap_err();

        assert_eq!(err.to_string(), "Definition for rule 'no-such-rule' was not found");
    }

    #[test]
    fn options_for_optionless_rule_are_rejected() {
        let dir = TempDir::new().unwrap();
        let result = linter_from_config(
            dir.path(),
            r#"{ "rules": { "no-lone-blocks": ["error", { "allow": true }] } }"#,
        );

        assert!(matches!(result, Err(LinterError::InvalidOptions { .. })));
    }

    #[test]
    fn invalid_severity_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = linter_from_config(dir.path(), r#"{ "rules": { "no-lone-blocks": "fatal" } }"#)
            .unwrap_err();

        assert!(err.is_configuration());
    }
}

mod reports {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lint_report_serializes_to_json() {
        let dir = TempDir::new().unwrap();
        let linter = linter_from_config(dir.path(), CONFIG).unwrap();

        let report = linter.verify("{}");
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["errorCount"], json!(0));
        assert_eq!(value["warningCount"], json!(1));
        let diagnostic = &value["diagnostics"][0];
        assert_eq!(diagnostic["ruleId"], json!("no-lone-blocks"));
        assert_eq!(diagnostic["messageId"], json!("redundantBlock"));
        assert_eq!(diagnostic["message"], json!("Block is redundant."));
        assert_eq!(diagnostic["severity"], json!("warning"));
    }

    #[test]
    fn fix_report_serializes_outcome() {
        let dir = TempDir::new().unwrap();
        let linter = linter_from_config(dir.path(), CONFIG).unwrap();

        let fixed = linter.verify_and_fix("var x = 9007199254740993;");
        let value = serde_json::to_value(&fixed).unwrap();

        assert_eq!(value["outcome"], json!({ "status": "converged", "passes": 0 }));
        assert_eq!(value["fixesApplied"], json!(0));
        assert_eq!(value["output"], json!("var x = 9007199254740993;"));
    }
}
