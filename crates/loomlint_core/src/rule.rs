//! The rule contract.

use serde::Serialize;
use serde_json::Value;

use crate::context::RuleContext;
use crate::error::RuleError;
use crate::listener::ListenerMap;

/// Broad category of a rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Code that is likely an error.
    #[default]
    Problem,
    /// Code that could be written better.
    Suggestion,
    /// Whitespace and formatting.
    Layout,
}

/// Static description of a rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMeta {
    /// Rule id, e.g. `no-lone-blocks`.
    pub name: &'static str,
    pub description: &'static str,
    pub kind: RuleKind,
    pub recommended: bool,
    /// Whether the rule may attach fixes to its reports.
    pub fixable: bool,
    /// Whether the rule may attach suggestions to its reports.
    pub has_suggestions: bool,
    /// Message catalog: `(messageId, template)`.
    #[serde(skip)]
    pub messages: &'static [(&'static str, &'static str)],
    /// JSON schema for the options array, or for each positional option
    /// when given as an array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    /// Options used when the configuration supplies none.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_options: Vec<Value>,
}

impl RuleMeta {
    pub fn new(name: &'static str, messages: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            name,
            description: "",
            kind: RuleKind::Problem,
            recommended: false,
            fixable: false,
            has_suggestions: false,
            messages,
            schema: None,
            default_options: Vec::new(),
        }
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn kind(mut self, kind: RuleKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn recommended(mut self) -> Self {
        self.recommended = true;
        self
    }

    pub fn fixable(mut self) -> Self {
        self.fixable = true;
        self
    }

    pub fn with_suggestions(mut self) -> Self {
        self.has_suggestions = true;
        self
    }

    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn default_options(mut self, options: Vec<Value>) -> Self {
        self.default_options = options;
        self
    }

    /// Looks up a message template by id.
    pub fn message(&self, message_id: &str) -> Option<&'static str> {
        self.messages
            .iter()
            .find(|(id, _)| *id == message_id)
            .map(|(_, template)| *template)
    }
}

/// A lint rule.
///
/// Rules are stateless and shared across threads; per-file state belongs in
/// the [`ListenerMap`] returned by [`Rule::create`], which is built fresh for
/// every file and every fix pass.
///
/// # Example
///
/// ```rust
/// use loomlint_core::{ListenerMap, Report, Rule, RuleContext, RuleError, RuleMeta};
///
/// struct NoEmpty {
///     meta: RuleMeta,
/// }
///
/// impl Rule for NoEmpty {
///     fn meta(&self) -> &RuleMeta {
///         &self.meta
///     }
///
///     fn create<'a>(&self, _context: &RuleContext<'a>) -> Result<ListenerMap<'a>, RuleError> {
///         ListenerMap::stateless()
///             .on("EmptyStatement", |_, node, context| {
///                 context.report(Report::node(node, "unexpected"))
///             })
///             .build()
///     }
/// }
///
/// let rule = NoEmpty {
///     meta: RuleMeta::new("no-empty-statement", &[("unexpected", "Empty statement.")]),
/// };
/// assert_eq!(rule.meta().message("unexpected"), Some("Empty statement."));
/// ```
pub trait Rule: Send + Sync {
    /// Returns the rule's static description.
    fn meta(&self) -> &RuleMeta;

    /// Creates the listeners for one file.
    ///
    /// # Errors
    ///
    /// An error disables the rule for the file and is reported as a rule
    /// fault.
    fn create<'a>(&self, context: &RuleContext<'a>) -> Result<ListenerMap<'a>, RuleError>;

    /// Returns the rule id.
    fn name(&self) -> &'static str {
        self.meta().name
    }
}
