//! Core linter engine.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use loomlint_ast::{AstArena, SourceText, TreeIndex};
use loomlint_parser::{LanguageOptions, Parser, ScriptParser};
use loomlint_scope::{ScopeAnalyzer, ScopeManager};
use tracing::{debug, info};

use crate::config::{LinterConfig, resolve_options};
use crate::context::FileContext;
use crate::diagnostic::Diagnostic;
use crate::error::LinterError;
use crate::fix::{CancellationToken, FixEngine, FixOptions};
use crate::parallel;
use crate::registry::{ConfiguredRule, RuleRegistry};
use crate::report::{FileFixReport, FileReport, FixReport, LintReport};
use crate::traverse::traverse;

/// Result type for `lint_files`.
///
/// Contains a tuple of:
/// - Successful lint results
/// - Failed files with their errors (path and error)
pub type LintFilesResult = Result<(Vec<FileReport>, Vec<(PathBuf, LinterError)>), LinterError>;

/// Result type for `fix_files`, shaped like [`LintFilesResult`].
pub type FixFilesResult = Result<(Vec<FileFixReport>, Vec<(PathBuf, LinterError)>), LinterError>;

/// The core linter engine.
///
/// Holds the rules enabled by a [`LinterConfig`], resolved and validated
/// once, and runs them over source text. A `Linter` is immutable and can be
/// shared across threads.
pub struct Linter {
    config: LinterConfig,
    rules: Vec<ConfiguredRule>,
    parser: Arc<dyn Parser>,
    scope_analyzer: Arc<dyn ScopeAnalyzer>,
}

impl Linter {
    /// Creates a linter running the rules of `registry` that `config`
    /// enables, in registration order.
    ///
    /// # Errors
    ///
    /// Fails if `config` names a rule missing from `registry` or if a rule's
    /// options do not match its schema.
    pub fn new(registry: &RuleRegistry, config: LinterConfig) -> Result<Self, LinterError> {
        let mut names: Vec<&str> = config.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        if let Some(unknown) = names.into_iter().find(|name| !registry.contains(name)) {
            return Err(LinterError::UnknownRule(unknown.to_string()));
        }

        let mut rules = Vec::new();
        for rule in registry.iter() {
            let Some(setting) = config.rules.get(rule.name()) else {
                continue;
            };
            let Some(severity) = setting.level.severity() else {
                continue;
            };
            let options = resolve_options(rule.meta(), &setting.options)?;
            rules.push(ConfiguredRule::new(Arc::clone(rule), severity).with_options(options));
        }

        info!("Linter ready with {} enabled rules", rules.len());

        Ok(Self {
            config,
            rules,
            parser: Arc::new(ScriptParser::new()),
            scope_analyzer: Arc::new(ScopeManager::new()),
        })
    }

    /// Replaces the parser.
    pub fn with_parser(mut self, parser: Arc<dyn Parser>) -> Self {
        self.parser = parser;
        self
    }

    /// Replaces the scope analyzer.
    pub fn with_scope_analyzer(mut self, analyzer: Arc<dyn ScopeAnalyzer>) -> Self {
        self.scope_analyzer = analyzer;
        self
    }

    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    pub fn language_options(&self) -> &LanguageOptions {
        &self.config.language_options
    }

    /// Enabled rules in execution order.
    pub fn rules(&self) -> &[ConfiguredRule] {
        &self.rules
    }

    /// Lints `source` once.
    pub fn verify(&self, source: &str) -> LintReport {
        LintReport::new(self.lint_source(source))
    }

    /// Lints `source` and applies fixes until no more apply.
    pub fn verify_and_fix(&self, source: &str) -> FixReport {
        self.fix_source(source, None)
    }

    /// Like [`Linter::verify_and_fix`], stopping between passes once
    /// `cancel` is cancelled.
    pub fn verify_and_fix_with_cancel(&self, source: &str, cancel: &CancellationToken) -> FixReport {
        self.fix_source(source, Some(cancel))
    }

    /// Reads and lints one file.
    pub fn lint_file(&self, path: &Path) -> Result<LintReport, LinterError> {
        let content = read_source(path)?;
        debug!("Linting {}", path.display());
        Ok(self.verify(&content))
    }

    /// Reads one file, fixes it and writes the result back if it changed.
    pub fn fix_file(&self, path: &Path) -> Result<FixReport, LinterError> {
        let content = read_source(path)?;
        let report = self.verify_and_fix(&content);

        if report.is_modified() {
            fs::write(path, &report.output).map_err(|e| {
                LinterError::file(format!("Failed to write {}: {}", path.display(), e))
            })?;
        }

        Ok(report)
    }

    /// Lints a list of files in parallel using rayon.
    ///
    /// Returns a tuple of (successful results, failed files with errors).
    pub fn lint_files(&self, paths: &[PathBuf]) -> LintFilesResult {
        parallel::lint_files(self, paths)
    }

    /// Fixes a list of files in parallel using rayon.
    pub fn fix_files(&self, paths: &[PathBuf]) -> FixFilesResult {
        parallel::fix_files(self, paths)
    }

    fn fix_source(&self, source: &str, cancel: Option<&CancellationToken>) -> FixReport {
        let engine = FixEngine::new(FixOptions {
            max_passes: self.config.max_fix_passes,
        });
        let run = engine.run(source, |text| self.lint_source(text), cancel);

        FixReport {
            modified: run.output != source,
            output: run.output,
            report: LintReport::new(run.diagnostics),
            outcome: run.outcome,
            fixes_applied: run.fixes_applied,
        }
    }

    /// One pass: parse, analyze, traverse. Everything allocated here is
    /// dropped when the pass returns.
    fn lint_source(&self, source: &str) -> Vec<Diagnostic> {
        let language = self.config.language_options;
        let text = SourceText::new(source);
        let arena = AstArena::for_source(source.len());

        let parsed = match self.parser.parse(&arena, source, &language) {
            Ok(parsed) => parsed,
            Err(error) => {
                debug!("Parse failed: {}", error);
                return vec![Diagnostic::syntax(&error, &text)];
            }
        };

        let index = TreeIndex::build(parsed.root);
        let scopes = self.scope_analyzer.analyze(parsed.root, &language);
        let file = FileContext {
            source: &text,
            tokens: parsed.tokens,
            index: &index,
            scopes: &scopes,
            language,
        };

        let diagnostics = traverse(&file, &self.rules);
        debug!(
            "Linted {} bytes with {} rules: {} diagnostics",
            source.len(),
            self.rules.len(),
            diagnostics.len()
        );
        diagnostics
    }
}

impl std::fmt::Debug for Linter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linter")
            .field("rules", &self.rules)
            .field("parser", &self.parser.name())
            .finish_non_exhaustive()
    }
}

fn read_source(path: &Path) -> Result<String, LinterError> {
    fs::read_to_string(path)
        .map_err(|e| LinterError::file(format!("Failed to read {}: {}", path.display(), e)))
}
