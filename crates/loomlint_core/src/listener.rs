//! Listener maps: the per-file callbacks a rule registers for traversal.

use loomlint_ast::Node;

use crate::context::RuleContext;
use crate::error::RuleError;
use crate::selector::ListenerKey;

/// Result of a single listener invocation.
pub type RuleResult = Result<(), RuleError>;

type Callback<'a, S> = Box<dyn FnMut(&mut S, &'a Node<'a>, &mut RuleContext<'a>) -> RuleResult + 'a>;

/// Listeners of one rule for one file, plus the rule-local state they share.
///
/// Built with [`ListenerMap::builder`] (stateful) or
/// [`ListenerMap::stateless`]. Keys are compiled when the map is built;
/// listeners keep their declaration order.
pub struct ListenerMap<'a> {
    keys: Vec<ListenerKey>,
    listeners: Box<dyn ErasedListeners<'a> + 'a>,
}

impl<'a> ListenerMap<'a> {
    /// Starts a map whose listeners share `state`.
    pub fn builder<S: 'a>(state: S) -> ListenerMapBuilder<'a, S> {
        ListenerMapBuilder {
            state,
            keys: Vec::new(),
            callbacks: Vec::new(),
        }
    }

    /// Starts a map without rule-local state.
    pub fn stateless() -> ListenerMapBuilder<'a, ()> {
        Self::builder(())
    }

    /// A map with no listeners.
    pub fn empty() -> Self {
        ListenerMap {
            keys: Vec::new(),
            listeners: Box::new(Stateful {
                state: (),
                callbacks: Vec::new(),
            }),
        }
    }

    /// Compiled keys, in declaration order.
    pub fn keys(&self) -> &[ListenerKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Invokes listener `index` on `node`.
    pub(crate) fn call(
        &mut self,
        index: usize,
        node: &'a Node<'a>,
        context: &mut RuleContext<'a>,
    ) -> RuleResult {
        self.listeners.call(index, node, context)
    }
}

impl std::fmt::Debug for ListenerMap<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerMap")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ListenerMap`].
pub struct ListenerMapBuilder<'a, S> {
    state: S,
    keys: Vec<String>,
    callbacks: Vec<Callback<'a, S>>,
}

impl<'a, S: 'a> ListenerMapBuilder<'a, S> {
    /// Registers a listener for `key`, e.g. `"BlockStatement"`,
    /// `"BlockStatement, StaticBlock"` or `"BlockStatement:exit"`.
    pub fn on<F>(mut self, key: &str, callback: F) -> Self
    where
        F: FnMut(&mut S, &'a Node<'a>, &mut RuleContext<'a>) -> RuleResult + 'a,
    {
        self.keys.push(key.to_string());
        self.callbacks.push(Box::new(callback));
        self
    }

    /// Registers an exit listener for `selector`.
    pub fn on_exit<F>(self, selector: &str, callback: F) -> Self
    where
        F: FnMut(&mut S, &'a Node<'a>, &mut RuleContext<'a>) -> RuleResult + 'a,
    {
        let key = format!("{selector}:exit");
        self.on(&key, callback)
    }

    /// Compiles every key.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Selector`] for the first key that fails to
    /// compile.
    pub fn build(self) -> Result<ListenerMap<'a>, RuleError> {
        let keys = self
            .keys
            .iter()
            .map(|key| ListenerKey::parse(key))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ListenerMap {
            keys,
            listeners: Box::new(Stateful {
                state: self.state,
                callbacks: self.callbacks,
            }),
        })
    }
}

trait ErasedListeners<'a> {
    fn call(
        &mut self,
        index: usize,
        node: &'a Node<'a>,
        context: &mut RuleContext<'a>,
    ) -> RuleResult;
}

struct Stateful<'a, S> {
    state: S,
    callbacks: Vec<Callback<'a, S>>,
}

impl<'a, S> ErasedListeners<'a> for Stateful<'a, S> {
    fn call(
        &mut self,
        index: usize,
        node: &'a Node<'a>,
        context: &mut RuleContext<'a>,
    ) -> RuleResult {
        match self.callbacks.get_mut(index) {
            Some(callback) => callback(&mut self.state, node, context),
            None => Ok(()),
        }
    }
}
