//! Scope tree data: scopes, bindings and references.

use loomlint_ast::{Node, NodeId};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Scope identifier, dense from zero in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Binding identifier, dense from zero in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BindingId(pub u32);

/// Scope kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeKind {
    /// Top-level scope of a script
    Global,
    /// Top-level scope of a module
    Module,
    /// Function or arrow function
    Function,
    /// Block, `for` head or `switch` body
    Block,
    /// `catch` clause
    Catch,
    /// Class body
    Class,
    /// Class static initialization block
    StaticBlock,
}

impl ScopeKind {
    /// True for scopes that receive hoisted `var` declarations.
    pub const fn is_variable_scope(self) -> bool {
        matches!(
            self,
            ScopeKind::Global | ScopeKind::Module | ScopeKind::Function | ScopeKind::StaticBlock
        )
    }
}

/// How a name was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Parameter,
    CatchParameter,
}

/// A declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding<'a> {
    pub id: BindingId,
    pub name: &'a str,
    pub kind: BindingKind,
    /// The declaring identifier.
    pub identifier: NodeId,
    pub scope: ScopeId,
}

/// An identifier read or written in expression position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'a> {
    pub identifier: NodeId,
    pub name: &'a str,
    /// Scope the reference occurs in.
    pub scope: ScopeId,
    /// `None` for implicit globals.
    pub resolved: Option<BindingId>,
}

/// Scope in the scope tree
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// Node that introduces the scope.
    pub node: NodeId,
    /// Parent scope (None for the top-level scope)
    pub parent: Option<ScopeId>,
    pub strict: bool,
    pub children: Vec<ScopeId>,
    pub(crate) bindings: FxHashMap<&'a str, BindingId>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(
        id: ScopeId,
        kind: ScopeKind,
        node: NodeId,
        parent: Option<ScopeId>,
        strict: bool,
    ) -> Self {
        Scope {
            id,
            kind,
            node,
            parent,
            strict,
            children: Vec::new(),
            bindings: FxHashMap::default(),
        }
    }

    /// Looks up a name declared directly in this scope.
    pub fn binding_id(&self, name: &str) -> Option<BindingId> {
        self.bindings.get(name).copied()
    }

    /// Number of names declared directly in this scope.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}

/// Result of scope analysis for one tree.
///
/// Every node of the analyzed tree maps to its innermost enclosing scope; a
/// node that introduces a scope maps to that scope.
#[derive(Debug, Clone)]
pub struct ScopeTree<'a> {
    pub(crate) scopes: Vec<Scope<'a>>,
    pub(crate) bindings: Vec<Binding<'a>>,
    pub(crate) references: Vec<Reference<'a>>,
    pub(crate) node_scopes: Vec<Option<ScopeId>>,
}

impl<'a> ScopeTree<'a> {
    /// All scopes, indexed by [`ScopeId`].
    pub fn scopes(&self) -> &[Scope<'a>] {
        &self.scopes
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope<'a>> {
        self.scopes.get(id.index())
    }

    /// The top-level scope. Analysis always creates it first.
    pub fn global(&self) -> &Scope<'a> {
        &self.scopes[0]
    }

    /// Returns the innermost scope containing `node`.
    pub fn scope_for(&self, node: &Node<'_>) -> Option<&Scope<'a>> {
        let id = self.node_scopes.get(node.id.index()).copied().flatten()?;
        self.get(id)
    }

    /// Returns true if `node` is in strict mode code.
    pub fn is_strict(&self, node: &Node<'_>) -> bool {
        self.scope_for(node).is_some_and(|scope| scope.strict)
    }

    /// Returns the nearest enclosing scope that receives `var` declarations.
    pub fn variable_scope(&self, id: ScopeId) -> Option<&Scope<'a>> {
        let mut scope = self.get(id)?;
        while !scope.kind.is_variable_scope() {
            scope = self.get(scope.parent?)?;
        }
        Some(scope)
    }

    pub fn binding(&self, id: BindingId) -> Option<&Binding<'a>> {
        self.bindings.get(id.0 as usize)
    }

    pub fn bindings(&self) -> &[Binding<'a>] {
        &self.bindings
    }

    /// Resolves `name` from `scope` outwards.
    pub fn resolve(&self, name: &str, scope: ScopeId) -> Option<&Binding<'a>> {
        let mut current = self.get(scope)?;
        loop {
            if let Some(id) = current.binding_id(name) {
                return self.binding(id);
            }
            current = self.get(current.parent?)?;
        }
    }

    /// All references in source order.
    pub fn references(&self) -> &[Reference<'a>] {
        &self.references
    }

    /// References that resolve to no declaration (implicit globals).
    pub fn unresolved_references(&self) -> impl Iterator<Item = &Reference<'a>> {
        self.references.iter().filter(|r| r.resolved.is_none())
    }
}
