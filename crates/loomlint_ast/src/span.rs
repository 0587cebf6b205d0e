//! Span and position types for source locations.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A position in source text.
///
/// Lines are 1-indexed and columns are 0-indexed, following the ESTree
/// `loc` convention. Columns count UTF-16 code units, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (0-indexed).
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A half-open byte range `[start, end)` in source text.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Span {
    /// Start byte offset (0-indexed, inclusive).
    pub start: u32,
    /// End byte offset (0-indexed, exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new span.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates an empty span at the given offset.
    #[inline]
    pub const fn empty(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns the length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if this span contains the given offset.
    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns true if `other` lies entirely inside this span.
    #[inline]
    pub const fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true if the two spans share at least one byte.
    #[inline]
    pub const fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Merges two spans into one that covers both.
    #[inline]
    pub const fn merge(&self, other: &Span) -> Span {
        Span {
            start: if self.start < other.start {
                self.start
            } else {
                other.start
            },
            end: if self.end > other.end {
                self.end
            } else {
                other.end
            },
        }
    }

    /// Returns the span as a `usize` range for slicing.
    #[inline]
    pub const fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<Range<u32>> for Span {
    fn from(range: Range<u32>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Location information combining start and end positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Start position.
    pub start: Position,
    /// End position.
    pub end: Position,
}

impl Location {
    /// Creates a new location.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position() {
        let pos = Position::new(1, 0);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 0);
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(3, 1) < Position::new(3, 2));
    }

    #[test]
    fn test_span() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(span.contains(15));
        assert!(!span.contains(5));
        assert!(!span.contains(20));
    }

    #[test]
    fn test_span_contains_start() {
        let span = Span::new(10, 20);
        assert!(span.contains(10)); // Start is inclusive
    }

    #[test]
    fn test_empty_span() {
        let span = Span::empty(5);
        assert!(span.is_empty());
        assert_eq!(span.len(), 0);
    }

    #[test]
    fn test_span_contains_span() {
        let outer = Span::new(0, 10);
        assert!(outer.contains_span(&Span::new(0, 10)));
        assert!(outer.contains_span(&Span::new(3, 4)));
        assert!(!outer.contains_span(&Span::new(9, 11)));
    }

    #[test]
    fn test_span_overlaps() {
        let span = Span::new(5, 10);
        assert!(span.overlaps(&Span::new(9, 12)));
        assert!(!span.overlaps(&Span::new(10, 12)));
        assert!(!span.overlaps(&Span::new(0, 5)));
        // Touching at an insertion point is not an overlap.
        assert!(!span.overlaps(&Span::empty(10)));
    }

    #[test]
    fn test_span_merge() {
        let merged = Span::new(20, 30).merge(&Span::new(10, 15));
        assert_eq!(merged, Span::new(10, 30));
    }

    #[test]
    fn test_span_range() {
        assert_eq!(Span::new(2, 7).range(), 2..7);
        assert_eq!(Span::from(3..4), Span::new(3, 4));
    }

    #[test]
    fn test_location() {
        let loc = Location::new(Position::new(1, 0), Position::new(1, 10));

        assert_eq!(loc.start.line, 1);
        assert_eq!(loc.start.column, 0);
        assert_eq!(loc.end.line, 1);
        assert_eq!(loc.end.column, 10);
    }

    #[test]
    fn test_span_serialization() {
        let json = serde_json::to_string(&Span::new(1, 4)).unwrap();
        assert_eq!(json, r#"{"start":1,"end":4}"#);
    }
}
