//! Integration tests for the fix loop and its warnings.

use std::sync::{Arc, Mutex};

use loomlint_core::{
    Fix, FixOutcome, Linter, LinterConfig, ListenerMap, Report, Rule, RuleContext, RuleError,
    RuleLevel, RuleMeta, RuleRegistry, RuleSetting, Span,
};
use pretty_assertions::assert_eq;
use tracing_subscriber::prelude::*;

struct LogCounter {
    needle: &'static str,
    count: Arc<Mutex<usize>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCounter {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        if visitor.0.contains(self.needle) {
            *self.count.lock().unwrap() += 1;
        }
    }
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            use std::fmt::Write;
            let _ = write!(self.0, "{:?}", value);
        }
    }
}

/// Runs `f` with a thread-local subscriber counting messages containing
/// `needle`.
fn count_logs<R>(needle: &'static str, f: impl FnOnce() -> R) -> (R, usize) {
    let count = Arc::new(Mutex::new(0));
    let subscriber = tracing_subscriber::registry().with(LogCounter {
        needle,
        count: count.clone(),
    });
    let result = tracing::subscriber::with_default(subscriber, f);
    let total = *count.lock().unwrap();
    (result, total)
}

/// `a;` statements become `b;`.
struct StatementRule(RuleMeta);

impl Rule for StatementRule {
    fn meta(&self) -> &RuleMeta {
        &self.0
    }

    fn create<'a>(&self, _context: &RuleContext<'a>) -> Result<ListenerMap<'a>, RuleError> {
        ListenerMap::stateless()
            .on("ExpressionStatement", |_, node, context| {
                if context.text_of(node) != "a;" {
                    return Ok(());
                }
                context.report(Report::node(node, "statement").with_fix(Fix::new(node.span, "b;")))
            })
            .build()
    }
}

/// Identifiers `a` become `c`.
struct IdentifierRule(RuleMeta);

impl Rule for IdentifierRule {
    fn meta(&self) -> &RuleMeta {
        &self.0
    }

    fn create<'a>(&self, _context: &RuleContext<'a>) -> Result<ListenerMap<'a>, RuleError> {
        ListenerMap::stateless()
            .on("Identifier", |_, node, context| {
                if node.name() != Some("a") {
                    return Ok(());
                }
                context.report(Report::node(node, "identifier").with_fix(Fix::new(node.span, "c")))
            })
            .build()
    }
}

/// Appends an empty statement on every pass.
struct GrowRule(RuleMeta);

impl Rule for GrowRule {
    fn meta(&self) -> &RuleMeta {
        &self.0
    }

    fn create<'a>(&self, _context: &RuleContext<'a>) -> Result<ListenerMap<'a>, RuleError> {
        ListenerMap::stateless()
            .on("Program", |_, node, context| {
                context.report(Report::node(node, "grow").with_fix(Fix::insert(node.span.end, ";")))
            })
            .build()
    }
}

fn linter(max_fix_passes: usize) -> Linter {
    let mut registry = RuleRegistry::new();
    registry
        .register_all([
            Arc::new(StatementRule(
                RuleMeta::new("statement", &[("statement", "Statement.")]).fixable(),
            )) as Arc<dyn Rule>,
            Arc::new(IdentifierRule(
                RuleMeta::new("identifier", &[("identifier", "Identifier.")]).fixable(),
            )),
            Arc::new(GrowRule(RuleMeta::new("grow", &[("grow", "Grow.")]).fixable())),
        ])
        .unwrap();
    registry_linter(&registry, max_fix_passes, &["statement", "identifier"])
}

fn registry_linter(registry: &RuleRegistry, max_fix_passes: usize, enabled: &[&str]) -> Linter {
    let mut config = LinterConfig::new().with_max_fix_passes(max_fix_passes);
    for name in enabled {
        config = config.with_rule(*name, RuleSetting::new(RuleLevel::Error));
    }
    Linter::new(registry, config).unwrap()
}

#[test]
fn test_overlapping_fix_is_skipped_with_warning() {
    let linter = linter(10);

    let (fixed, warnings) = count_logs("Skipping overlapping fix", || linter.verify_and_fix("a;"));

    assert_eq!(warnings, 1);
    assert_eq!(fixed.output, "c;");
    assert_eq!(fixed.outcome, FixOutcome::Converged { passes: 1 });
    assert!(fixed.report.is_empty());
}

#[test]
fn test_overlap_keeps_skipped_diagnostic_unfixed() {
    let linter = linter(10);
    let report = linter.verify("a;");

    assert_eq!(report.len(), 2);
    assert_eq!(report.fixable_count(), 2);
    assert_eq!(report.diagnostics()[0].rule_id.as_deref(), Some("statement"));
    assert_eq!(report.diagnostics()[1].span, Span::new(0, 1));
}

#[test]
fn test_pass_ceiling_warns_and_keeps_last_text() {
    let mut registry = RuleRegistry::new();
    registry
        .register(Arc::new(GrowRule(
            RuleMeta::new("grow", &[("grow", "Grow.")]).fixable(),
        )))
        .unwrap();
    let linter = registry_linter(&registry, 3, &["grow"]);

    let (fixed, warnings) = count_logs("Fix pass ceiling", || linter.verify_and_fix("a"));

    assert_eq!(warnings, 1);
    assert_eq!(fixed.output, "a;;;");
    assert_eq!(fixed.outcome, FixOutcome::CeilingReached { passes: 3 });
    assert_eq!(fixed.fixes_applied, 3);
    assert_eq!(fixed.report.len(), 1);
    assert!(fixed.report.has_unapplied_fix());
}

#[test]
fn test_fixing_is_idempotent() {
    let linter = linter(10);
    let once = linter.verify_and_fix("a;\nd;\na;");
    let twice = linter.verify_and_fix(&once.output);

    assert_eq!(once.output, "c;\nd;\nc;");
    assert_eq!(twice.output, once.output);
    assert_eq!(twice.outcome, FixOutcome::Converged { passes: 0 });
}

#[test]
fn test_lint_is_deterministic() {
    let linter = linter(10);
    let source = "a;\n{ a; }\nfunction f() { a; }";

    assert_eq!(linter.verify(source), linter.verify(source));
}
