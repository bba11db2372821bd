//! Source spans.
//!
//! Every span produced by the engine is a half-open range of UTF-8 byte
//! offsets into the text that was scanned. Use [`LineIndex`] to translate
//! them into line/column positions or character indices.
//!
//! [`LineIndex`]: crate::position::LineIndex

use std::fmt;
use std::ops::Range;

/// A half-open byte range `start..end` into a source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Offset of the first byte covered by the span.
    pub start: usize,
    /// Offset one past the last byte covered by the span.
    pub end: usize,
}

impl Span {
    /// Create a span. Reversed bounds are swapped.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// An empty span at `offset`.
    pub fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if `offset` falls inside the span.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Check if two spans overlap.
    ///
    /// An empty span intersects a span it touches, so a bare cursor sitting
    /// on either boundary of a flagged region still hits it.
    pub fn intersects(&self, other: Span) -> bool {
        if self.is_empty() || other.is_empty() {
            return self.start <= other.end && other.start <= self.end;
        }
        self.start < other.end && other.start < self.end
    }

    /// Shift both bounds forward by `delta` bytes.
    pub fn offset_by(&self, delta: usize) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// The text covered by this span, if it is in bounds and on char
    /// boundaries.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }

    /// The span as a standard range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_bounds_are_normalised() {
        let span = Span::new(9, 3);
        assert_eq!(span, Span { start: 3, end: 9 });
        assert_eq!(span.len(), 6);
    }

    #[test]
    fn intersection_is_half_open() {
        let a = Span::new(0, 5);
        assert!(a.intersects(Span::new(4, 8)));
        assert!(!a.intersects(Span::new(5, 8)));
    }

    #[test]
    fn cursor_on_boundary_intersects() {
        let decl = Span::new(10, 20);
        assert!(decl.intersects(Span::at(10)));
        assert!(decl.intersects(Span::at(20)));
        assert!(!decl.intersects(Span::at(21)));
    }

    #[test]
    fn slice_respects_char_boundaries() {
        let text = "a: é;";
        assert_eq!(Span::new(0, 1).slice(text), Some("a"));
        // 'é' is two bytes starting at offset 3
        assert_eq!(Span::new(3, 4).slice(text), None);
        assert_eq!(Span::new(3, 5).slice(text), Some("é"));
        assert_eq!(Span::new(3, 50).slice(text), None);
    }
}
