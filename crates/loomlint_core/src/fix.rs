//! Multi-pass fix loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use blake3::Hash;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::DEFAULT_MAX_FIX_PASSES;
use crate::diagnostic::Diagnostic;
use crate::fixer::apply_fixes;

/// Settings for the fix loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixOptions {
    /// Upper bound on lint-and-fix passes.
    pub max_passes: usize,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_FIX_PASSES,
        }
    }
}

/// Cooperative cancellation for the fix loop, checked between passes.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why the fix loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum FixOutcome {
    /// A pass applied no fixes.
    Converged { passes: usize },
    /// Fixes were still pending when the pass ceiling was hit.
    CeilingReached { passes: usize },
    /// A pass produced text seen after an earlier pass.
    #[serde(rename_all = "camelCase")]
    CycleDetected { passes: usize, cycle_length: usize },
    /// The token was cancelled between passes.
    Cancelled { passes: usize },
    /// The current text failed to parse.
    ParseFailed { passes: usize },
}

impl FixOutcome {
    /// Number of passes that applied fixes.
    pub fn passes(&self) -> usize {
        match *self {
            FixOutcome::Converged { passes }
            | FixOutcome::CeilingReached { passes }
            | FixOutcome::CycleDetected { passes, .. }
            | FixOutcome::Cancelled { passes }
            | FixOutcome::ParseFailed { passes } => passes,
        }
    }

    /// True if the loop ran until no fix was left to apply.
    pub fn is_converged(&self) -> bool {
        matches!(self, FixOutcome::Converged { .. })
    }
}

/// Output of [`FixEngine::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct FixRun {
    /// Text after the last completed pass.
    pub output: String,
    /// Diagnostics of `output`.
    pub diagnostics: Vec<Diagnostic>,
    pub outcome: FixOutcome,
    /// Total fixes applied over all passes.
    pub fixes_applied: usize,
}

/// Repeats lint-then-fix until the text stops changing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixEngine {
    options: FixOptions,
}

impl FixEngine {
    pub fn new(options: FixOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> FixOptions {
        self.options
    }

    /// Runs the loop on `source`.
    ///
    /// `lint` is called once per pass on the current text. The final
    /// diagnostics always belong to the returned text.
    pub fn run<F>(&self, source: &str, mut lint: F, cancel: Option<&CancellationToken>) -> FixRun
    where
        F: FnMut(&str) -> Vec<Diagnostic>,
    {
        let mut content = source.to_string();
        let mut history: Vec<Hash> = vec![hash_content(&content)];
        let mut passes = 0;
        let mut fixes_applied = 0;

        loop {
            let mut diagnostics = lint(&content);

            if diagnostics.iter().any(|d| d.fatal) {
                return FixRun {
                    output: content,
                    diagnostics,
                    outcome: FixOutcome::ParseFailed { passes },
                    fixes_applied,
                };
            }

            let pending = diagnostics
                .iter()
                .any(|d| d.fix.as_ref().is_some_and(|fix| fix.is_applicable(&content)));
            if pending && passes >= self.options.max_passes {
                warn!(
                    "Fix pass ceiling of {} reached; remaining fixes were not applied",
                    self.options.max_passes
                );
                return FixRun {
                    output: content,
                    diagnostics,
                    outcome: FixOutcome::CeilingReached { passes },
                    fixes_applied,
                };
            }

            let result = apply_fixes(&content, &mut diagnostics);
            if result.fixes_applied == 0 {
                debug!("Fix loop converged after {} passes", passes);
                return FixRun {
                    output: content,
                    diagnostics,
                    outcome: FixOutcome::Converged { passes },
                    fixes_applied,
                };
            }

            passes += 1;
            fixes_applied += result.fixes_applied;
            content = result.fixed_content;
            debug!("Pass {} applied {} fixes", passes, result.fixes_applied);

            let current_hash = hash_content(&content);
            if let Some(prev_idx) = history.iter().position(|h| *h == current_hash) {
                let cycle_length = history.len() - prev_idx;
                warn!(
                    "Fix cycle detected after {} passes (length {}), stopping",
                    passes, cycle_length
                );
                return self.finish(
                    content,
                    &mut lint,
                    FixOutcome::CycleDetected {
                        passes,
                        cycle_length,
                    },
                    fixes_applied,
                );
            }
            history.push(current_hash);

            if cancel.is_some_and(CancellationToken::is_cancelled) {
                debug!("Fix loop cancelled after {} passes", passes);
                return self.finish(
                    content,
                    &mut lint,
                    FixOutcome::Cancelled { passes },
                    fixes_applied,
                );
            }
        }
    }

    /// Lints the final text without fixing it.
    fn finish<F>(
        &self,
        content: String,
        lint: &mut F,
        outcome: FixOutcome,
        fixes_applied: usize,
    ) -> FixRun
    where
        F: FnMut(&str) -> Vec<Diagnostic>,
    {
        let diagnostics = lint(&content);
        let outcome = if diagnostics.iter().any(|d| d.fatal) {
            FixOutcome::ParseFailed {
                passes: outcome.passes(),
            }
        } else {
            outcome
        };
        FixRun {
            output: content,
            diagnostics,
            outcome,
            fixes_applied,
        }
    }
}

fn hash_content(content: &str) -> Hash {
    blake3::hash(content.as_bytes())
}
