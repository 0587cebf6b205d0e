//! Linter configuration.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use jsonschema::Validator;
use loomlint_parser::LanguageOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::LinterError;
use crate::diagnostic::Severity;
use crate::rule::RuleMeta;

/// Default number of fix passes before the fix loop gives up.
pub const DEFAULT_MAX_FIX_PASSES: usize = 10;

/// Resolved configuration for the linter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LinterConfig {
    /// Rule id to level and options.
    #[serde(default)]
    pub rules: HashMap<String, RuleSetting>,

    /// Parser and scope analysis settings.
    #[serde(default)]
    pub language_options: LanguageOptions,

    /// Upper bound on fix passes per file.
    #[serde(default = "default_max_fix_passes")]
    pub max_fix_passes: usize,
}

fn default_max_fix_passes() -> usize {
    DEFAULT_MAX_FIX_PASSES
}

/// Level of a configured rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Off,
    Warn,
    Error,
}

impl RuleLevel {
    /// Severity of reports, or `None` when the rule is off.
    pub fn severity(self) -> Option<Severity> {
        match self {
            RuleLevel::Off => None,
            RuleLevel::Warn => Some(Severity::Warning),
            RuleLevel::Error => Some(Severity::Error),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            RuleLevel::Off => "off",
            RuleLevel::Warn => "warn",
            RuleLevel::Error => "error",
        }
    }

    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(s) => match s.as_str() {
                "off" => Ok(RuleLevel::Off),
                "warn" => Ok(RuleLevel::Warn),
                "error" => Ok(RuleLevel::Error),
                other => Err(format!(
                    "Severity should be one of the following: 0 = off, 1 = warn, 2 = error (you passed '\"{}\"')",
                    other
                )),
            },
            Value::Number(n) => match n.as_u64() {
                Some(0) => Ok(RuleLevel::Off),
                Some(1) => Ok(RuleLevel::Warn),
                Some(2) => Ok(RuleLevel::Error),
                _ => Err(format!(
                    "Severity should be one of the following: 0 = off, 1 = warn, 2 = error (you passed '{}')",
                    n
                )),
            },
            other => Err(format!(
                "Severity should be one of the following: 0 = off, 1 = warn, 2 = error (you passed '{}')",
                other
            )),
        }
    }
}

impl fmt::Display for RuleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a single rule.
///
/// Accepts `"error"`, `"warn"`, `"off"`, `0`, `1`, `2`, or an array whose
/// first element is one of those and whose remaining elements are the
/// rule's options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRuleSetting", into = "Vec<Value>")]
pub struct RuleSetting {
    pub level: RuleLevel,
    pub options: Vec<Value>,
}

impl RuleSetting {
    pub fn new(level: RuleLevel) -> Self {
        Self {
            level,
            options: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: Vec<Value>) -> Self {
        self.options = options;
        self
    }

    /// Returns whether the rule is enabled.
    pub fn is_enabled(&self) -> bool {
        self.level != RuleLevel::Off
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRuleSetting {
    List(Vec<Value>),
    Level(Value),
}

impl TryFrom<RawRuleSetting> for RuleSetting {
    type Error = String;

    fn try_from(raw: RawRuleSetting) -> Result<Self, Self::Error> {
        match raw {
            RawRuleSetting::Level(value) => Ok(RuleSetting::new(RuleLevel::from_value(&value)?)),
            RawRuleSetting::List(mut values) => {
                if values.is_empty() {
                    return Err("rule configuration array must start with a severity".to_string());
                }
                let level = RuleLevel::from_value(&values.remove(0))?;
                Ok(RuleSetting::new(level).with_options(values))
            }
        }
    }
}

impl From<RuleSetting> for Vec<Value> {
    fn from(setting: RuleSetting) -> Self {
        let mut values = Vec::with_capacity(setting.options.len() + 1);
        values.push(Value::String(setting.level.as_str().to_string()));
        values.extend(setting.options);
        values
    }
}

impl LinterConfig {
    /// Creates a new empty configuration.
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
            language_options: LanguageOptions::default(),
            max_fix_passes: DEFAULT_MAX_FIX_PASSES,
        }
    }

    /// Loads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| LinterError::config(format!("Failed to read config: {}", e)))?;
        Self::from_json(&content)
    }

    /// Parses configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?;

        serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))
    }

    /// Sets the configuration of one rule.
    pub fn with_rule(mut self, name: impl Into<String>, setting: RuleSetting) -> Self {
        self.rules.insert(name.into(), setting);
        self
    }

    pub fn with_language_options(mut self, options: LanguageOptions) -> Self {
        self.language_options = options;
        self
    }

    pub fn with_max_fix_passes(mut self, passes: usize) -> Self {
        self.max_fix_passes = passes;
        self
    }

    /// Returns enabled rules, sorted by id.
    pub fn enabled_rules(&self) -> Vec<(&str, &RuleSetting)> {
        let mut enabled: Vec<_> = self
            .rules
            .iter()
            .filter(|(_, setting)| setting.is_enabled())
            .map(|(name, setting)| (name.as_str(), setting))
            .collect();
        enabled.sort_by_key(|(name, _)| *name);
        enabled
    }
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves the options a rule runs with: the configured options, or the
/// rule's defaults when none are configured. The result is validated against
/// the rule's schema.
///
/// A schema given as an array describes positional options; any other schema
/// describes the whole options array.
pub fn resolve_options(meta: &RuleMeta, configured: &[Value]) -> Result<Vec<Value>, LinterError> {
    let options = if configured.is_empty() {
        meta.default_options.clone()
    } else {
        configured.to_vec()
    };

    let Some(schema) = &meta.schema else {
        return Ok(options);
    };

    match schema {
        Value::Array(items) => {
            if options.len() > items.len() {
                return Err(LinterError::invalid_options(
                    meta.name,
                    format!(
                        "Value {} should NOT have more than {} items.",
                        Value::Array(options.clone()),
                        items.len()
                    ),
                ));
            }
            for (option, item_schema) in options.iter().zip(items) {
                validate(meta.name, item_schema, option)?;
            }
        }
        whole => validate(meta.name, whole, &Value::Array(options.clone()))?,
    }

    Ok(options)
}

fn validate(rule: &str, schema: &Value, instance: &Value) -> Result<(), LinterError> {
    let validator = Validator::new(schema).map_err(|e| {
        LinterError::config(format!("Invalid schema for rule \"{}\": {}", rule, e))
    })?;

    if let Err(e) = validator.validate(instance) {
        let error_msg = format!("{} at {}", e, e.instance_path());
        return Err(LinterError::invalid_options(rule, error_msg));
    }
    Ok(())
}
