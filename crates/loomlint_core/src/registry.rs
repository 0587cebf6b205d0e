//! Rule registry.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::debug;

use crate::diagnostic::Severity;
use crate::error::LinterError;
use crate::rule::Rule;

/// Registered rules in registration order, looked up by id.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
    index: FxHashMap<&'static str, usize>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a rule with the same id exists.
    pub fn register(&mut self, rule: Arc<dyn Rule>) -> Result<(), LinterError> {
        let name = rule.name();
        if self.index.contains_key(name) {
            return Err(LinterError::config(format!(
                "Rule '{}' is already registered",
                name
            )));
        }
        debug!("Registered rule: {}", name);
        self.index.insert(name, self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Registers every rule in `rules`, stopping at the first duplicate.
    pub fn register_all(
        &mut self,
        rules: impl IntoIterator<Item = Arc<dyn Rule>>,
    ) -> Result<(), LinterError> {
        for rule in rules {
            self.register(rule)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Rule>> {
        self.index.get(name).map(|&i| &self.rules[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }

    /// Rule ids in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// A rule enabled by the configuration, with its resolved severity and
/// validated options.
#[derive(Clone)]
pub struct ConfiguredRule {
    pub rule: Arc<dyn Rule>,
    pub severity: Severity,
    pub options: Vec<Value>,
}

impl ConfiguredRule {
    /// Enables `rule` at `severity` with its default options.
    pub fn new(rule: Arc<dyn Rule>, severity: Severity) -> Self {
        let options = rule.meta().default_options.clone();
        Self {
            rule,
            severity,
            options,
        }
    }

    pub fn with_options(mut self, options: Vec<Value>) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &'static str {
        self.rule.name()
    }
}

impl std::fmt::Debug for ConfiguredRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredRule")
            .field("rule", &self.name())
            .field("severity", &self.severity)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::context::RuleContext;
    use crate::error::RuleError;
    use crate::listener::ListenerMap;
    use crate::rule::RuleMeta;

    struct Named(RuleMeta);

    impl Rule for Named {
        fn meta(&self) -> &RuleMeta {
            &self.0
        }

        fn create<'a>(&self, _context: &RuleContext<'a>) -> Result<ListenerMap<'a>, RuleError> {
            Ok(ListenerMap::empty())
        }
    }

    fn named(name: &'static str) -> Arc<dyn Rule> {
        Arc::new(Named(RuleMeta::new(name, &[])))
    }

    #[test]
    fn test_register_keeps_order() {
        let mut registry = RuleRegistry::new();
        registry
            .register_all([named("b-rule"), named("a-rule"), named("c-rule")])
            .unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["b-rule", "a-rule", "c-rule"]
        );
        assert!(registry.contains("a-rule"));
        assert_eq!(registry.get("c-rule").map(|r| r.name()), Some("c-rule"));
        assert!(registry.get("d-rule").is_none());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = RuleRegistry::new();
        registry.register(named("a-rule")).unwrap();
        let err = registry.register(named("a-rule")).unwrap_err();

        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "Configuration error: Rule 'a-rule' is already registered"
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_configured_rule_defaults() {
        let rule: Arc<dyn Rule> = Arc::new(Named(
            RuleMeta::new("opts", &[]).default_options(vec![json!({ "a": 1 })]),
        ));
        let configured = ConfiguredRule::new(rule, Severity::Warning);
        assert_eq!(configured.options, vec![json!({ "a": 1 })]);
        assert_eq!(configured.with_options(vec![]).options, Vec::<Value>::new());
    }
}
