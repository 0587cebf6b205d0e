//! Arena allocator for syntax tree nodes.
//!
//! Every pass of the linter parses the current text into a fresh arena.
//! Nodes, child slices and interned strings for that pass live in the same
//! bump allocator and are released together when the pass ends.

use bumpalo::Bump;

/// Arena allocator for syntax tree nodes.
///
/// # Example
///
/// ```rust
/// use loomlint_ast::{AstArena, Node, NodeId, NodeType, Span};
///
/// let arena = AstArena::new();
/// let children = arena.alloc_slice_copy(&[Node::leaf(NodeId(0), NodeType::EmptyStatement, Span::new(0, 1))]);
/// let program = arena.alloc(Node::new(NodeId(1), NodeType::Program, Span::new(0, 1), children));
/// assert_eq!(program.children.len(), 1);
/// ```
pub struct AstArena {
    bump: Bump,
}

impl AstArena {
    /// Creates a new arena allocator.
    #[inline]
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Creates an arena sized for a source of roughly `source_len` bytes.
    #[inline]
    pub fn for_source(source_len: usize) -> Self {
        // Tree nodes are several times larger than the text they cover.
        Self {
            bump: Bump::with_capacity(source_len.saturating_mul(4)),
        }
    }

    /// Allocates a value in the arena and returns a reference to it.
    #[inline]
    pub fn alloc<T>(&self, val: T) -> &T {
        self.bump.alloc(val)
    }

    /// Copies a string into the arena.
    #[inline]
    pub fn alloc_str(&self, s: &str) -> &str {
        self.bump.alloc_str(s)
    }

    /// Allocates a slice in the arena by copying from the input slice.
    #[inline]
    pub fn alloc_slice_copy<T: Copy>(&self, slice: &[T]) -> &[T] {
        self.bump.alloc_slice_copy(slice)
    }

    /// Returns the total bytes allocated in this arena.
    #[inline]
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for AstArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_alloc() {
        let arena = AstArena::new();
        let value = arena.alloc(42u32);
        assert_eq!(*value, 42);
    }

    #[test]
    fn test_arena_alloc_str() {
        let arena = AstArena::new();
        let s = arena.alloc_str("use strict");
        assert_eq!(s, "use strict");
    }

    #[test]
    fn test_arena_alloc_slice() {
        let arena = AstArena::new();
        let slice = arena.alloc_slice_copy(&[1, 2, 3]);
        assert_eq!(slice, &[1, 2, 3]);
    }

    #[test]
    fn test_arena_for_source_preallocates() {
        let arena = AstArena::for_source(1024);
        assert!(arena.allocated_bytes() >= 1024);
    }
}
