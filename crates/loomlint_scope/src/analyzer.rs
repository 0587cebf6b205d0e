//! The scope analyzer.

use std::ops::ControlFlow;

use loomlint_ast::{DeclarationKind, Field, Node, NodeData, NodeType, VisitResult, Visitor};
use loomlint_parser::{LanguageOptions, SourceType};
use tracing::debug;

use crate::scope::{Binding, BindingId, BindingKind, Reference, Scope, ScopeId, ScopeKind, ScopeTree};

/// Computes lexical scopes for a syntax tree.
pub trait ScopeAnalyzer: Send + Sync {
    /// Analyzes the tree rooted at `root`.
    fn analyze<'a>(&self, root: &'a Node<'a>, options: &LanguageOptions) -> ScopeTree<'a>;
}

/// Default [`ScopeAnalyzer`] following ECMAScript scoping rules.
///
/// Block scopes exist only from ES2015 on; before that, `let`-like names
/// fall back to the enclosing function scope.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScopeManager;

impl ScopeManager {
    pub fn new() -> Self {
        Self
    }
}

impl ScopeAnalyzer for ScopeManager {
    fn analyze<'a>(&self, root: &'a Node<'a>, options: &LanguageOptions) -> ScopeTree<'a> {
        let mut builder = ScopeBuilder {
            options: *options,
            tree: ScopeTree {
                scopes: Vec::new(),
                bindings: Vec::new(),
                references: Vec::new(),
                node_scopes: Vec::new(),
            },
            ancestors: Vec::new(),
            current: None,
        };
        let _ = builder.visit_node(root);

        let mut tree = builder.tree;
        resolve_references(&mut tree);
        debug!(
            "Analyzed {} scopes, {} bindings, {} references",
            tree.scopes.len(),
            tree.bindings.len(),
            tree.references.len()
        );
        tree
    }
}

struct ScopeBuilder<'a> {
    options: LanguageOptions,
    tree: ScopeTree<'a>,
    ancestors: Vec<&'a Node<'a>>,
    current: Option<ScopeId>,
}

impl<'a> ScopeBuilder<'a> {
    fn push_scope(&mut self, kind: ScopeKind, node: &'a Node<'a>, strict: bool) {
        let id = ScopeId(self.tree.scopes.len() as u32);
        self.tree
            .scopes
            .push(Scope::new(id, kind, node.id, self.current, strict));
        if let Some(parent) = self.current {
            self.tree.scopes[parent.index()].children.push(id);
        }
        self.current = Some(id);
    }

    fn pop_scope(&mut self) {
        if let Some(current) = self.current {
            self.current = self.tree.scopes[current.index()].parent;
        }
    }

    fn current_strict(&self) -> bool {
        self.current
            .is_some_and(|id| self.tree.scopes[id.index()].strict)
    }

    /// Nearest scope that receives hoisted `var` declarations.
    fn variable_scope(&self) -> Option<ScopeId> {
        let mut id = self.current?;
        loop {
            let scope = &self.tree.scopes[id.index()];
            if scope.kind.is_variable_scope() {
                return Some(id);
            }
            id = scope.parent?;
        }
    }

    /// Scope for lexical (`let`/`const`/`class`) declarations.
    fn lexical_scope(&self) -> Option<ScopeId> {
        if self.options.has_block_scoping() {
            self.current
        } else {
            self.variable_scope()
        }
    }

    fn declare(&mut self, scope: Option<ScopeId>, identifier: &'a Node<'a>, kind: BindingKind) {
        let (Some(scope), Some(name)) = (scope, identifier.name()) else {
            return;
        };
        let id = BindingId(self.tree.bindings.len() as u32);
        let bindings = &mut self.tree.scopes[scope.index()].bindings;
        if bindings.contains_key(name) {
            // Redeclarations share the first binding.
            return;
        }
        bindings.insert(name, id);
        self.tree.bindings.push(Binding {
            id,
            name,
            kind,
            identifier: identifier.id,
            scope,
        });
    }

    fn record_node_scope(&mut self, node: &Node<'_>) {
        let index = node.id.index();
        if self.tree.node_scopes.len() <= index {
            self.tree.node_scopes.resize(index + 1, None);
        }
        self.tree.node_scopes[index] = self.current;
    }

    fn parent(&self) -> Option<&'a Node<'a>> {
        self.ancestors.last().copied()
    }

    /// Opens the scope `node` introduces, if any, and declares the names it
    /// binds.
    fn enter_scope(&mut self, node: &'a Node<'a>) {
        match node.node_type {
            NodeType::Program => {
                let kind = match self.options.source_type {
                    SourceType::Script => ScopeKind::Global,
                    SourceType::Module => ScopeKind::Module,
                };
                let strict = self.options.is_strict() || has_use_strict(node.children);
                self.push_scope(kind, node, strict);
            }
            NodeType::FunctionDeclaration
            | NodeType::FunctionExpression
            | NodeType::ArrowFunctionExpression => {
                if node.node_type == NodeType::FunctionDeclaration
                    && let Some(id) = node.child(Field::Id)
                {
                    let scope = self.lexical_scope();
                    self.declare(scope, id, BindingKind::Function);
                }

                let body_strict = node
                    .child(Field::Body)
                    .is_some_and(|body| body.is(NodeType::BlockStatement) && has_use_strict(body.children));
                let strict = self.current_strict() || body_strict;
                self.push_scope(ScopeKind::Function, node, strict);

                if node.node_type == NodeType::FunctionExpression
                    && let Some(id) = node.child(Field::Id)
                {
                    self.declare(self.current, id, BindingKind::Function);
                }
                for param in node.children_in(Field::Params) {
                    self.declare(self.current, param, BindingKind::Parameter);
                }
            }
            NodeType::ClassDeclaration | NodeType::ClassExpression => {
                if let Some(id) = node.child(Field::Id) {
                    if node.node_type == NodeType::ClassDeclaration {
                        let scope = self.lexical_scope();
                        self.declare(scope, id, BindingKind::Class);
                    }
                    self.push_scope(ScopeKind::Class, node, true);
                    if node.node_type == NodeType::ClassExpression {
                        self.declare(self.current, id, BindingKind::Class);
                    }
                } else {
                    self.push_scope(ScopeKind::Class, node, true);
                }
            }
            NodeType::StaticBlock => {
                self.push_scope(ScopeKind::StaticBlock, node, true);
            }
            NodeType::CatchClause => {
                let strict = self.current_strict();
                self.push_scope(ScopeKind::Catch, node, strict);
                if let Some(param) = node.child(Field::Param) {
                    self.declare(self.current, param, BindingKind::CatchParameter);
                }
            }
            NodeType::BlockStatement
                if self.options.has_block_scoping() && !self.is_function_body(node) =>
            {
                let strict = self.current_strict();
                self.push_scope(ScopeKind::Block, node, strict);
            }
            NodeType::SwitchStatement if self.options.has_block_scoping() => {
                let strict = self.current_strict();
                self.push_scope(ScopeKind::Block, node, strict);
            }
            NodeType::ForStatement
                if self.options.has_block_scoping()
                    && node.child(Field::Init).is_some_and(|init| {
                        matches!(
                            init.declaration_kind(),
                            Some(DeclarationKind::Let | DeclarationKind::Const)
                        )
                    }) =>
            {
                let strict = self.current_strict();
                self.push_scope(ScopeKind::Block, node, strict);
            }
            _ => {}
        }
    }

    fn is_function_body(&self, node: &Node<'_>) -> bool {
        node.field == Field::Body && self.parent().is_some_and(|parent| parent.node_type.is_function())
    }

    fn declare_variables(&mut self, declaration: &'a Node<'a>) {
        let Some(kind) = declaration.declaration_kind() else {
            return;
        };
        let (scope, binding_kind) = match kind {
            DeclarationKind::Var => (self.variable_scope(), BindingKind::Var),
            DeclarationKind::Let => (self.lexical_scope(), BindingKind::Let),
            DeclarationKind::Const => (self.lexical_scope(), BindingKind::Const),
        };
        for declarator in declaration.children_in(Field::Declarations) {
            if let Some(id) = declarator.child(Field::Id) {
                self.declare(scope, id, binding_kind);
            }
        }
    }

    /// Records `node` as a reference if it is an identifier in expression
    /// position.
    fn record_reference(&mut self, node: &'a Node<'a>) {
        let (Some(name), Some(scope)) = (node.name(), self.current) else {
            return;
        };
        if !node.is(NodeType::Identifier) || !self.is_reference_position(node) {
            return;
        }
        self.tree.references.push(Reference {
            identifier: node.id,
            name,
            scope,
            resolved: None,
        });
    }

    fn is_reference_position(&self, node: &Node<'_>) -> bool {
        let Some(parent) = self.parent() else {
            return true;
        };
        match node.field {
            Field::Id | Field::Params | Field::Param | Field::Label => false,
            Field::Property => {
                parent.node_type != NodeType::MemberExpression
                    || matches!(parent.data, NodeData::Member { computed: true })
            }
            Field::Key => match parent.data {
                NodeData::Property { computed, .. } => computed,
                NodeData::Method { .. } => false,
                _ => true,
            },
            _ => true,
        }
    }
}

impl<'a> Visitor<'a> for ScopeBuilder<'a> {
    fn enter_node(&mut self, node: &'a Node<'a>) -> VisitResult {
        self.enter_scope(node);
        self.record_node_scope(node);
        if node.is(NodeType::VariableDeclaration) {
            self.declare_variables(node);
        }
        self.record_reference(node);
        ControlFlow::Continue(())
    }

    fn visit_children(&mut self, node: &'a Node<'a>) -> VisitResult {
        self.ancestors.push(node);
        for child in node.children {
            self.visit_node(child)?;
        }
        self.ancestors.pop();
        ControlFlow::Continue(())
    }

    fn exit_node(&mut self, node: &'a Node<'a>) -> VisitResult {
        if self
            .current
            .is_some_and(|id| self.tree.scopes[id.index()].node == node.id)
        {
            self.pop_scope();
        }
        ControlFlow::Continue(())
    }
}

/// True if the directive prologue of `statements` contains `"use strict"`.
fn has_use_strict(statements: &[Node<'_>]) -> bool {
    statements
        .iter()
        .map_while(|statement| statement.directive())
        .any(|directive| directive == "use strict")
}

fn resolve_references(tree: &mut ScopeTree<'_>) {
    for i in 0..tree.references.len() {
        let reference = tree.references[i];
        let resolved = tree
            .resolve(reference.name, reference.scope)
            .map(|binding| binding.id);
        tree.references[i].resolved = resolved;
    }
}
