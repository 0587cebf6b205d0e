//! # loomlint_ast
//!
//! Syntax tree definitions for LoomLint.
//!
//! This crate holds the data the lint engine consumes: the immutable
//! [`SourceText`] with its line table, the arena-allocated [`Node`] tree with
//! ESTree-style [`NodeType`] tags, the [`Token`] stream, and the derived
//! [`TreeIndex`] used for parent lookups.
//!
//! ## Architecture
//!
//! - Uses `bumpalo` for Arena allocation (Oxc-like architecture)
//! - All nodes of one parse live in a single arena and are freed together
//! - Ownership flows strictly downwards; parents are looked up by [`NodeId`]
//!
//! ## Example
//!
//! ```rust
//! use loomlint_ast::{AstArena, Node, NodeId, NodeType, SourceText, Span, TreeIndex};
//!
//! let source = SourceText::new("{}\n");
//! let arena = AstArena::new();
//! let block = Node::leaf(NodeId(0), NodeType::BlockStatement, Span::new(0, 2));
//! let root = arena.alloc(Node::new(
//!     NodeId(1),
//!     NodeType::Program,
//!     Span::new(0, 3),
//!     arena.alloc_slice_copy(&[block]),
//! ));
//!
//! let index = TreeIndex::build(root);
//! let block = index.get(NodeId(0)).unwrap();
//! assert_eq!(index.parent(block).unwrap().node_type, NodeType::Program);
//! assert_eq!(source.slice(block.span), Some("{}"));
//! ```

mod arena;
mod index;
mod node;
mod node_type;
mod source;
mod span;
mod token;
pub mod visitor;

pub use arena::AstArena;
pub use index::{Ancestors, TreeError, TreeIndex};
pub use node::{
    DeclarationKind, Field, LiteralData, LiteralValue, MethodKind, Node, NodeData, NodeId,
};
pub use node_type::{NodeType, UnknownNodeType};
pub use source::{SourceText, is_line_terminator};
pub use span::{Location, Position, Span};
pub use token::{Token, TokenKind, tokens_in};

// Re-export commonly used visitor items for convenience
pub use visitor::{VisitResult, Visitor};
