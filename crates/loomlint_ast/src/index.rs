//! Derived parent index.
//!
//! The tree itself only points downwards. `TreeIndex` is built once per tree
//! with a single walk and answers `parent` and `ancestors` queries by node id.

use std::ops::ControlFlow;

use thiserror::Error;

use crate::visitor::{VisitResult, Visitor, walk_node};
use crate::{Node, NodeId, Span};

/// Structural problems detected by [`TreeIndex::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {child:?} at {child_span:?} is not contained in its parent at {parent_span:?}")]
    ChildOutsideParent {
        child: NodeId,
        child_span: Span,
        parent_span: Span,
    },

    #[error("sibling nodes at {first:?} and {second:?} overlap or are out of order")]
    OverlappingSiblings { first: Span, second: Span },

    #[error("node id {0:?} is used more than once")]
    DuplicateId(NodeId),
}

/// Node id to node and node id to parent lookup for one tree.
#[derive(Debug)]
pub struct TreeIndex<'a> {
    root: &'a Node<'a>,
    nodes: Vec<Option<&'a Node<'a>>>,
    parents: Vec<Option<NodeId>>,
    duplicate: Option<NodeId>,
}

impl<'a> TreeIndex<'a> {
    /// Indexes every node reachable from `root`.
    pub fn build(root: &'a Node<'a>) -> Self {
        let mut builder = IndexBuilder {
            index: TreeIndex {
                root,
                nodes: Vec::new(),
                parents: Vec::new(),
                duplicate: None,
            },
            stack: Vec::new(),
        };
        let _ = walk_node(&mut builder, root);
        builder.index
    }

    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> &'a Node<'a> {
        self.root
    }

    /// Returns the number of indexed nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns true if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks a node up by id.
    pub fn get(&self, id: NodeId) -> Option<&'a Node<'a>> {
        self.nodes.get(id.index()).copied().flatten()
    }

    /// Returns the parent of `node`, or `None` for the root.
    pub fn parent(&self, node: &Node<'_>) -> Option<&'a Node<'a>> {
        let parent = self.parents.get(node.id.index()).copied().flatten()?;
        self.get(parent)
    }

    /// Iterates from the parent of `node` up to the root.
    pub fn ancestors(&self, node: &Node<'_>) -> Ancestors<'_, 'a> {
        Ancestors {
            index: self,
            next: self.parent(node),
        }
    }

    /// Checks the structural invariants of the tree: every child lies inside
    /// its parent, siblings are ordered and disjoint, and ids are unique.
    pub fn validate(&self) -> Result<(), TreeError> {
        if let Some(id) = self.duplicate {
            return Err(TreeError::DuplicateId(id));
        }
        for node in self.nodes.iter().flatten() {
            let mut previous: Option<Span> = None;
            for child in node.children {
                if !node.span.contains_span(&child.span) {
                    return Err(TreeError::ChildOutsideParent {
                        child: child.id,
                        child_span: child.span,
                        parent_span: node.span,
                    });
                }
                if let Some(prev) = previous
                    && prev.end > child.span.start
                {
                    return Err(TreeError::OverlappingSiblings {
                        first: prev,
                        second: child.span,
                    });
                }
                previous = Some(child.span);
            }
        }
        Ok(())
    }

    fn insert(&mut self, node: &'a Node<'a>, parent: Option<NodeId>) {
        let idx = node.id.index();
        if idx >= self.nodes.len() {
            self.nodes.resize(idx + 1, None);
            self.parents.resize(idx + 1, None);
        }
        if self.nodes[idx].is_some() {
            self.duplicate.get_or_insert(node.id);
            return;
        }
        self.nodes[idx] = Some(node);
        self.parents[idx] = parent;
    }
}

/// Iterator returned by [`TreeIndex::ancestors`].
pub struct Ancestors<'i, 'a> {
    index: &'i TreeIndex<'a>,
    next: Option<&'a Node<'a>>,
}

impl<'a> Iterator for Ancestors<'_, 'a> {
    type Item = &'a Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.index.parent(current);
        Some(current)
    }
}

struct IndexBuilder<'a> {
    index: TreeIndex<'a>,
    stack: Vec<NodeId>,
}

impl<'a> Visitor<'a> for IndexBuilder<'a> {
    fn enter_node(&mut self, node: &'a Node<'a>) -> VisitResult {
        self.index.insert(node, self.stack.last().copied());
        self.stack.push(node.id);
        ControlFlow::Continue(())
    }

    fn exit_node(&mut self, _node: &'a Node<'a>) -> VisitResult {
        self.stack.pop();
        ControlFlow::Continue(())
    }
}
