//! # loomlint_core
//!
//! Core lint engine for LoomLint.
//!
//! This crate provides:
//! - The `Rule` contract, listener maps and the per-rule `RuleContext`
//! - Single-pass traversal with listener dispatch and failure isolation
//! - The fixer and the multi-pass fix loop
//! - Configuration, option validation and the `Linter` orchestrator
//! - Parallel processing of files
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use loomlint_core::{
//!     Linter, LinterConfig, ListenerMap, Report, Rule, RuleContext, RuleError, RuleMeta,
//!     RuleRegistry,
//! };
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
//! let mut registry = RuleRegistry::new();
//! registry
//!     .register(Arc::new(NoEmptyStatement(RuleMeta::new(
//!         "no-empty-statement",
//!         &[("unexpected", "Unnecessary semicolon.")],
//!     ))))
//!     .unwrap();
//!
//! let config = LinterConfig::from_json(r#"{ "rules": { "no-empty-statement": "error" } }"#).unwrap();
//! let linter = Linter::new(&registry, config).unwrap();
//!
//! let report = linter.verify("a;;");
//! assert_eq!(report.error_count(), 1);
//! assert_eq!(report.diagnostics()[0].message, "Unnecessary semicolon.");
//! ```

mod config;
mod context;
mod diagnostic;
mod error;
mod fix;
mod fixer;
mod linter;
mod listener;
mod parallel;
mod registry;
mod report;
mod rule;
pub mod selector;
mod traverse;

pub use config::{
    DEFAULT_MAX_FIX_PASSES, LinterConfig, RuleLevel, RuleSetting, resolve_options,
};
pub use context::{FileContext, Report, RuleContext};
pub use diagnostic::{Diagnostic, DiagnosticKind, Fix, Severity, Suggestion};
pub use error::{LinterError, RuleError};
pub use fix::{CancellationToken, FixEngine, FixOptions, FixOutcome, FixRun};
pub use fixer::{FixerResult, apply_fixes};
pub use linter::{FixFilesResult, LintFilesResult, Linter};
pub use listener::{ListenerMap, ListenerMapBuilder, RuleResult};
pub use registry::{ConfiguredRule, RuleRegistry};
pub use report::{FileFixReport, FileReport, FixReport, LintReport};
pub use rule::{Rule, RuleKind, RuleMeta};
pub use selector::{ListenerKey, Phase, Selector, SelectorError};
pub use traverse::traverse;

pub use loomlint_ast::{Location, Node, NodeType, Position, Span};
pub use loomlint_parser::{LanguageOptions, SourceType};
