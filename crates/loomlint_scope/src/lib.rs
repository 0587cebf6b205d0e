//! # loomlint_scope
//!
//! Scope analysis for LoomLint.
//!
//! [`ScopeManager`] walks a `loomlint_ast` tree once and produces a
//! [`ScopeTree`]: the nested scopes with their bindings, the identifier
//! references resolved against them, and the strictness of every scope.
//! Rules query it read-only through the lint context.
//!
//! ## Example
//!
//! ```rust
//! use loomlint_ast::AstArena;
//! use loomlint_parser::{LanguageOptions, Parser, ScriptParser};
//! use loomlint_scope::{ScopeAnalyzer, ScopeKind, ScopeManager};
//!
//! let arena = AstArena::new();
//! let options = LanguageOptions::default();
//! let parsed = ScriptParser::new()
//!     .parse(&arena, "function f() { 'use strict'; }", &options)
//!     .unwrap();
//!
//! let tree = ScopeManager::new().analyze(parsed.root, &options);
//! let function = &tree.scopes()[1];
//! assert_eq!(function.kind, ScopeKind::Function);
//! assert!(function.strict);
//! assert!(!tree.global().strict);
//! ```

mod analyzer;
mod scope;

pub use analyzer::{ScopeAnalyzer, ScopeManager};
pub use scope::{Binding, BindingId, BindingKind, Reference, Scope, ScopeId, ScopeKind, ScopeTree};
