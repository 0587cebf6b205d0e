//! Visitor trait for read-only traversal.

use std::ops::ControlFlow;

use crate::Node;

use super::walk::{walk_children, walk_node};

/// Result type for visitor methods to control traversal.
///
/// - `ControlFlow::Continue(())` - continue visiting children
/// - `ControlFlow::Break(())` - stop traversal early
pub type VisitResult = ControlFlow<()>;

/// Visitor trait for traversing nodes without modification.
///
/// Nodes are handed out with the arena lifetime `'a`, so a visitor may keep
/// references to them (for example on an ancestor stack).
pub trait Visitor<'a>: Sized {
    /// Called before a node's children are visited.
    #[inline]
    fn enter_node(&mut self, _node: &'a Node<'a>) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Called after a node and all its children have been visited.
    #[inline]
    fn exit_node(&mut self, _node: &'a Node<'a>) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Visits a node: enter hook, children, exit hook.
    #[inline]
    fn visit_node(&mut self, node: &'a Node<'a>) -> VisitResult {
        walk_node(self, node)
    }

    /// Visits the children of a node.
    ///
    /// Override to prune subtrees.
    #[inline]
    fn visit_children(&mut self, node: &'a Node<'a>) -> VisitResult {
        walk_children(self, node)
    }
}
