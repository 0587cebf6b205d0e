//! Visitor pattern for syntax tree traversal.
//!
//! - [`Visitor`] - Read-only traversal trait with enter/exit hooks
//! - [`walk_node`] - Enter, visit children, exit
//! - [`walk_children`] - Traverse all children of a node in source order
//!
//! # Example
//!
//! ```rust
//! use loomlint_ast::{AstArena, Node, NodeId, NodeType, Span};
//! use loomlint_ast::visitor::{Visitor, VisitResult, walk_node};
//! use std::ops::ControlFlow;
//!
//! struct Depth {
//!     current: usize,
//!     max: usize,
//! }
//!
//! impl<'a> Visitor<'a> for Depth {
//!     fn enter_node(&mut self, _node: &'a Node<'a>) -> VisitResult {
//!         self.current += 1;
//!         self.max = self.max.max(self.current);
//!         ControlFlow::Continue(())
//!     }
//!
//!     fn exit_node(&mut self, _node: &'a Node<'a>) -> VisitResult {
//!         self.current -= 1;
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let arena = AstArena::new();
//! let inner = Node::leaf(NodeId(0), NodeType::BlockStatement, Span::new(0, 2));
//! let root = arena.alloc(Node::new(
//!     NodeId(1),
//!     NodeType::Program,
//!     Span::new(0, 2),
//!     arena.alloc_slice_copy(&[inner]),
//! ));
//!
//! let mut depth = Depth { current: 0, max: 0 };
//! let _ = walk_node(&mut depth, root);
//! assert_eq!(depth.max, 2);
//! ```

mod visit;
mod walk;

pub use visit::{VisitResult, Visitor};
pub use walk::{walk_children, walk_node};
