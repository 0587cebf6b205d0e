//! Walk functions used by the default `Visitor` methods.

use std::ops::ControlFlow;

use crate::Node;

use super::visit::{VisitResult, Visitor};

/// Walks a node: calls `enter_node`, visits its children, then `exit_node`.
///
/// A `Break` from any hook stops the walk and is propagated.
pub fn walk_node<'a, V>(visitor: &mut V, node: &'a Node<'a>) -> VisitResult
where
    V: Visitor<'a>,
{
    visitor.enter_node(node)?;
    visitor.visit_children(node)?;
    visitor.exit_node(node)
}

/// Walks all children of a node in source order.
#[inline]
pub fn walk_children<'a, V>(visitor: &mut V, node: &'a Node<'a>) -> VisitResult
where
    V: Visitor<'a>,
{
    for child in node.children {
        visitor.visit_node(child)?;
    }
    ControlFlow::Continue(())
}
