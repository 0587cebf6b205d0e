//! Single-pass traversal with listener dispatch.

use std::any::Any;
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};

use loomlint_ast::{Node, NodeType, VisitResult, Visitor, visitor::walk_children};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::context::{FileContext, RuleContext};
use crate::diagnostic::Diagnostic;
use crate::error::RuleError;
use crate::listener::ListenerMap;
use crate::registry::ConfiguredRule;
use crate::selector::Phase;

/// One (rule, listener) pair in a dispatch table.
#[derive(Debug, Clone, Copy)]
struct Entry {
    rule: usize,
    listener: usize,
    /// Whether the selector has to be checked against the ancestor stack.
    qualified: bool,
}

/// A rule activated for one file.
struct ActiveRule<'a> {
    id: &'static str,
    context: RuleContext<'a>,
    /// `None` once the rule faulted.
    listeners: Option<ListenerMap<'a>>,
    fault: Option<Diagnostic>,
}

/// Per-`NodeType` dispatch tables for enter and exit.
#[derive(Default)]
struct DispatchTable {
    enter: FxHashMap<NodeType, Vec<Entry>>,
    exit: FxHashMap<NodeType, Vec<Entry>>,
}

impl DispatchTable {
    fn build(rules: &[ActiveRule<'_>]) -> Self {
        let mut table = Self::default();
        for (rule_index, rule) in rules.iter().enumerate() {
            let Some(listeners) = &rule.listeners else {
                continue;
            };
            for (listener_index, key) in listeners.keys().iter().enumerate() {
                let entry = Entry {
                    rule: rule_index,
                    listener: listener_index,
                    qualified: key.selector.needs_ancestors(),
                };
                let target = match key.phase {
                    Phase::Enter => &mut table.enter,
                    Phase::Exit => &mut table.exit,
                };
                let types = key
                    .selector
                    .subject_types()
                    .unwrap_or_else(|| NodeType::ALL.to_vec());
                for node_type in types {
                    target.entry(node_type).or_default().push(entry);
                }
            }
        }
        table
    }
}

/// Walks the tree of `file` once, running every rule in `rules`.
///
/// Diagnostics are returned grouped by rule in registration order; a rule's
/// fault diagnostic follows its reports.
pub fn traverse<'a>(file: &'a FileContext<'a>, rules: &'a [ConfiguredRule]) -> Vec<Diagnostic> {
    let root = file.root();
    let mut active = Vec::with_capacity(rules.len());

    for configured in rules {
        let meta = configured.rule.meta();
        let context = RuleContext::new(file, meta, &configured.options, configured.severity);
        let created = panic::catch_unwind(AssertUnwindSafe(|| configured.rule.create(&context)))
            .unwrap_or_else(|payload| Err(RuleError::Panicked(panic_message(payload.as_ref()))));

        let mut rule = ActiveRule {
            id: meta.name,
            context,
            listeners: None,
            fault: None,
        };
        match created {
            Ok(listeners) => rule.listeners = Some(listeners),
            Err(error) => rule.record_fault(file, root, &error),
        }
        active.push(rule);
    }

    let table = DispatchTable::build(&active);
    debug!(
        "Traversing with {} rules ({} enter / {} exit node types)",
        active.len(),
        table.enter.len(),
        table.exit.len()
    );

    let mut walker = Walker {
        file,
        rules: active,
        table,
        ancestors: Vec::new(),
    };
    let _ = walker.visit_node(root);

    let mut diagnostics = Vec::new();
    for rule in walker.rules {
        let fault = rule.fault;
        diagnostics.extend(rule.context.into_reports());
        diagnostics.extend(fault);
    }
    diagnostics
}

impl<'a> ActiveRule<'a> {
    fn record_fault(&mut self, file: &FileContext<'a>, node: &Node<'_>, error: &RuleError) {
        warn!(
            "Rule {} failed on {} at {}..{}: {}",
            self.id, node.node_type, node.span.start, node.span.end, error
        );
        self.listeners = None;
        self.fault = Some(Diagnostic::rule_fault(
            self.id,
            format!("Rule `{}` failed: {}", self.id, error),
            node.span,
            file.source.location(node.span),
        ));
    }
}

struct Walker<'a> {
    file: &'a FileContext<'a>,
    rules: Vec<ActiveRule<'a>>,
    table: DispatchTable,
    /// Root first, parent of the current node last.
    ancestors: Vec<&'a Node<'a>>,
}

impl<'a> Walker<'a> {
    fn dispatch(&mut self, node: &'a Node<'a>, phase: Phase) {
        let table = match phase {
            Phase::Enter => &self.table.enter,
            Phase::Exit => &self.table.exit,
        };
        let Some(entries) = table.get(&node.node_type) else {
            return;
        };

        for entry in entries {
            let rule = &mut self.rules[entry.rule];
            let Some(listeners) = rule.listeners.as_mut() else {
                continue;
            };
            if entry.qualified
                && !listeners.keys()[entry.listener]
                    .selector
                    .matches(node, &self.ancestors)
            {
                continue;
            }

            let context = &mut rule.context;
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| listeners.call(entry.listener, node, context)));
            let error = match outcome {
                Ok(Ok(())) => rule.context.take_fault(),
                Ok(Err(error)) => {
                    rule.context.take_fault();
                    Some(error)
                }
                Err(payload) => Some(RuleError::Panicked(panic_message(payload.as_ref()))),
            };
            if let Some(error) = error {
                rule.record_fault(self.file, node, &error);
            }
        }
    }
}

impl<'a> Visitor<'a> for Walker<'a> {
    fn enter_node(&mut self, node: &'a Node<'a>) -> VisitResult {
        self.dispatch(node, Phase::Enter);
        ControlFlow::Continue(())
    }

    fn exit_node(&mut self, node: &'a Node<'a>) -> VisitResult {
        self.dispatch(node, Phase::Exit);
        ControlFlow::Continue(())
    }

    fn visit_children(&mut self, node: &'a Node<'a>) -> VisitResult {
        self.ancestors.push(node);
        let result = walk_children(self, node);
        self.ancestors.pop();
        result
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
