//! # loomlint_rules
//!
//! Built-in rules for LoomLint.
//!
//! | Rule | Kind | Fixable |
//! |------|------|---------|
//! | [`no-lone-blocks`](NoLoneBlocks) | suggestion | no |
//! | [`no-loss-of-precision`](NoLossOfPrecision) | problem | no |
//!
//! ```rust
//! use loomlint_core::{Linter, LinterConfig};
//!
//! let registry = loomlint_rules::builtin_registry().unwrap();
//! let config = LinterConfig::from_json(r#"{ "rules": { "no-lone-blocks": "error" } }"#).unwrap();
//! let linter = Linter::new(&registry, config).unwrap();
//!
//! assert_eq!(linter.verify("{}").error_count(), 1);
//! ```

mod no_lone_blocks;
mod no_loss_of_precision;

use std::sync::Arc;

use loomlint_core::{LinterError, Rule, RuleRegistry};
use tracing::debug;

pub use no_lone_blocks::NoLoneBlocks;
pub use no_loss_of_precision::NoLossOfPrecision;

/// Returns a fresh instance of every built-in rule.
pub fn builtin_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(NoLoneBlocks::new()) as Arc<dyn Rule>,
        Arc::new(NoLossOfPrecision::new()),
    ]
}

/// Returns a registry holding every built-in rule.
///
/// # Errors
///
/// Fails only if two built-in rules share an id.
pub fn builtin_registry() -> Result<RuleRegistry, LinterError> {
    let mut registry = RuleRegistry::new();
    registry.register_all(builtin_rules())?;
    debug!("Registered {} built-in rules", registry.len());
    Ok(registry)
}
