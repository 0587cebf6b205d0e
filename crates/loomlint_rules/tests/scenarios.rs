//! End-to-end scenarios running the built-in rules through the linter.

use loomlint_core::{
    FixOutcome, LanguageOptions, Linter, LinterConfig, LintReport, Location, Position, Span,
};
use loomlint_rules::builtin_registry;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn linter(rules: &str, language: LanguageOptions) -> Linter {
    let registry = builtin_registry().unwrap();
    let config = LinterConfig::from_json(rules)
        .unwrap()
        .with_language_options(language);
    Linter::new(&registry, config).unwrap()
}

fn lone_blocks(language: LanguageOptions) -> Linter {
    linter(r#"{ "rules": { "no-lone-blocks": "error" } }"#, language)
}

fn precision() -> Linter {
    linter(
        r#"{ "rules": { "no-loss-of-precision": "error" } }"#,
        LanguageOptions::default(),
    )
}

fn message_ids(report: &LintReport) -> Vec<&str> {
    report
        .diagnostics()
        .iter()
        .filter_map(|d| d.message_id.as_deref())
        .collect()
}

#[test]
fn top_level_empty_block_is_redundant() {
    let report = lone_blocks(LanguageOptions::new(5)).verify("{}");

    assert_eq!(message_ids(&report), vec!["redundantBlock"]);
    let diagnostic = &report.diagnostics()[0];
    assert_eq!(diagnostic.span, Span::new(0, 2));
    assert_eq!(
        diagnostic.loc,
        Location::new(Position::new(1, 0), Position::new(1, 2))
    );
    assert_eq!(diagnostic.message, "Block is redundant.");
    assert_eq!(diagnostic.rule_id.as_deref(), Some("no-lone-blocks"));
}

#[test]
fn only_the_inner_block_is_nested() {
    let source = "if (foo) { bar(); {} baz(); }";
    let report = lone_blocks(LanguageOptions::new(5)).verify(source);

    assert_eq!(message_ids(&report), vec!["redundantNestedBlock"]);
    assert_eq!(report.diagnostics()[0].span, Span::new(18, 20));
    assert_eq!(report.diagnostics()[0].message, "Nested block is redundant.");
}

#[rstest]
#[case::es2015(LanguageOptions::new(2015), 0)]
#[case::es5(LanguageOptions::new(5), 1)]
fn let_binding_keeps_block_when_block_scoped(
    #[case] language: LanguageOptions,
    #[case] expected: usize,
) {
    // Before ES2015 `let` is a plain identifier.
    let report = lone_blocks(language).verify("{ let\nx = 1; }");

    assert_eq!(report.len(), expected);
}

#[test]
fn let_declaration_in_block_is_kept() {
    let report = lone_blocks(LanguageOptions::new(2015)).verify("{ let x = 1; }");

    assert!(report.is_empty());
}

#[test]
fn imprecise_decimal_literal_is_reported() {
    let report = precision().verify("var x = 9007199254740993");

    assert_eq!(message_ids(&report), vec!["noLossOfPrecision"]);
    assert_eq!(report.diagnostics()[0].span, Span::new(8, 24));
}

#[test]
fn precise_decimal_literal_is_not_reported() {
    let report = precision().verify("var x = 123.456");

    assert!(report.is_empty());
}

#[test]
fn separators_are_stripped_before_comparison() {
    let report = precision().verify("var x = 900719925474099_3");

    assert_eq!(message_ids(&report), vec!["noLossOfPrecision"]);
}

#[test]
fn both_rules_report_in_source_order() {
    let linter = linter(
        r#"{ "rules": { "no-lone-blocks": "warn", "no-loss-of-precision": ["error"] } }"#,
        LanguageOptions::new(2015),
    );
    let report = linter.verify("var a = 0x20000000000001;\n{ var b = 1; }\n{ let c = 2; }");

    assert_eq!(message_ids(&report), vec!["noLossOfPrecision", "redundantBlock"]);
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.warning_count(), 1);
    assert_eq!(report.fixable_count(), 0);
}

#[test]
fn fixing_without_fixable_rules_converges_immediately() {
    let linter = lone_blocks(LanguageOptions::new(5));
    let fixed = linter.verify_and_fix("{ foo(); }");

    assert_eq!(fixed.output, "{ foo(); }");
    assert_eq!(fixed.outcome, FixOutcome::Converged { passes: 0 });
    assert_eq!(fixed.report.len(), 1);
    assert!(!fixed.is_modified());
}

#[test]
fn results_are_deterministic() {
    let linter = linter(
        r#"{ "rules": { "no-lone-blocks": 2, "no-loss-of-precision": 1 } }"#,
        LanguageOptions::new(2022),
    );
    let source = "{ 9007199254740993; }\nclass C { static { { 0x20000000000001; } } }";

    let first = linter.verify(source);
    let second = linter.verify(source);

    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}
