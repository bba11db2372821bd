//! Offset to line/column translation.
//!
//! The engine reports byte offsets. Editors address text by line and column,
//! and disagree on what a column counts: LSP-style hosts count UTF-16 code
//! units, others count bytes or Unicode scalar values. [`LineIndex`] converts
//! in both directions for any of these encodings.
//!
//! # Example
//!
//! ```
//! use calc_lint_core::position::{LineIndex, OffsetEncoding, Position};
//!
//! let text = "a {\n  width: 100% - 20px;\n}";
//! let index = LineIndex::new(text);
//!
//! let pos = index.position_at(text, 6, OffsetEncoding::Utf16);
//! assert_eq!(pos, Position::new(1, 2));
//! assert_eq!(index.offset_at(text, pos, OffsetEncoding::Utf16), 6);
//! ```

use crate::span::Span;

/// Unit used to count the `character` column of a [`Position`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OffsetEncoding {
    /// Columns count UTF-8 bytes.
    Utf8,
    /// Columns count UTF-16 code units.
    #[default]
    Utf16,
    /// Columns count Unicode scalar values.
    Utf32,
}

impl OffsetEncoding {
    fn width(self, c: char) -> usize {
        match self {
            Self::Utf8 => c.len_utf8(),
            Self::Utf16 => c.len_utf16(),
            Self::Utf32 => 1,
        }
    }

    fn measure(self, s: &str) -> usize {
        match self {
            Self::Utf8 => s.len(),
            Self::Utf16 => s.chars().map(char::len_utf16).sum(),
            Self::Utf32 => s.chars().count(),
        }
    }
}

/// A zero-based line/column position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based column, counted in the index's [`OffsetEncoding`].
    pub character: u32,
}

impl Position {
    /// Create a position.
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A range between two positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Range {
    /// Start position (inclusive).
    pub start: Position,
    /// End position (exclusive).
    pub end: Position,
}

impl Range {
    /// Create a range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Precomputed line starts for a text snapshot.
///
/// The index does not own the text. Pass the same snapshot it was built
/// from to every query; a stale index gives clamped but meaningless answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Build an index for `text`.
    ///
    /// `\n`, `\r\n` and a bare `\r` all terminate a line.
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    line_starts.push(i + 2);
                    i += 2;
                    continue;
                }
                b'\r' | b'\n' => line_starts.push(i + 1),
                _ => {}
            }
            i += 1;
        }

        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Number of lines in the text. An empty text has one (empty) line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte length of the indexed text.
    pub fn text_len(&self) -> usize {
        self.len
    }

    /// Convert a byte offset to a position.
    ///
    /// Offsets past the end clamp to the end of the text, and offsets inside
    /// a multi-byte character clamp to the start of that character.
    pub fn position_at(&self, text: &str, offset: usize, encoding: OffsetEncoding) -> Position {
        let offset = floor_char_boundary(text, offset.min(text.len()));
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let character = encoding.measure(&text[line_start..offset]);

        Position::new(line as u32, character as u32)
    }

    /// Convert a position to a byte offset.
    ///
    /// Lines past the end clamp to the text length; columns past the end of
    /// a line clamp to the end of its content, before the line terminator.
    pub fn offset_at(&self, text: &str, position: Position, encoding: OffsetEncoding) -> usize {
        let line = position.line as usize;
        let Some(&line_start) = self.line_starts.get(line) else {
            return text.len();
        };
        let line_end = self.content_end(text, line);

        let mut consumed = 0;
        let mut column = 0;
        for c in text[line_start..line_end].chars() {
            let width = encoding.width(c);
            if column + width > position.character as usize {
                break;
            }
            column += width;
            consumed += c.len_utf8();
        }

        line_start + consumed
    }

    /// Convert a span to a position range.
    pub fn range_of(&self, text: &str, span: Span, encoding: OffsetEncoding) -> Range {
        Range::new(
            self.position_at(text, span.start, encoding),
            self.position_at(text, span.end, encoding),
        )
    }

    /// Convert a position range to a span.
    pub fn span_of(&self, text: &str, range: Range, encoding: OffsetEncoding) -> Span {
        Span::new(
            self.offset_at(text, range.start, encoding),
            self.offset_at(text, range.end, encoding),
        )
    }

    /// Offset where the content of `line` ends, excluding its terminator.
    fn content_end(&self, text: &str, line: usize) -> usize {
        let start = self.line_starts[line];
        let end = self.line_starts.get(line + 1).copied().unwrap_or(text.len());
        let content = &text[start..end];
        let content = content
            .strip_suffix("\r\n")
            .or_else(|| content.strip_suffix('\n'))
            .or_else(|| content.strip_suffix('\r'))
            .unwrap_or(content);
        start + content.len()
    }
}

/// Character index of a byte offset.
///
/// This is the index a host that addresses text as a sequence of Unicode
/// scalar values would use. Offsets past the end clamp to the text length.
pub fn char_offset(text: &str, offset: usize) -> usize {
    let offset = floor_char_boundary(text, offset.min(text.len()));
    text[..offset].chars().count()
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_one_line() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.position_at("", 0, OffsetEncoding::Utf16), Position::new(0, 0));
        assert_eq!(index.position_at("", 7, OffsetEncoding::Utf16), Position::new(0, 0));
    }

    #[test]
    fn all_line_terminators() {
        let text = "a\nb\r\nc\rd";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.position_at(text, 2, OffsetEncoding::Utf8), Position::new(1, 0));
        assert_eq!(index.position_at(text, 5, OffsetEncoding::Utf8), Position::new(2, 0));
        assert_eq!(index.position_at(text, 7, OffsetEncoding::Utf8), Position::new(3, 0));
    }

    #[test]
    fn column_encodings_differ_on_wide_chars() {
        // U+1F600 is four UTF-8 bytes and two UTF-16 code units
        let text = "a: \u{1F600} + 1px;";
        let index = LineIndex::new(text);
        let plus = text.find('+').unwrap();

        assert_eq!(index.position_at(text, plus, OffsetEncoding::Utf8).character, 8);
        assert_eq!(index.position_at(text, plus, OffsetEncoding::Utf16).character, 6);
        assert_eq!(index.position_at(text, plus, OffsetEncoding::Utf32).character, 5);
    }

    #[test]
    fn offset_round_trips_through_position() {
        let text = "a {\n  width: \u{e9}10px + 5px;\n}\n";
        let index = LineIndex::new(text);
        for (offset, _) in text.char_indices() {
            let pos = index.position_at(text, offset, OffsetEncoding::Utf16);
            assert_eq!(index.offset_at(text, pos, OffsetEncoding::Utf16), offset);
        }
    }

    #[test]
    fn offset_at_clamps() {
        let text = "ab\ncd";
        let index = LineIndex::new(text);
        assert_eq!(index.offset_at(text, Position::new(0, 99), OffsetEncoding::Utf16), 2);
        assert_eq!(index.offset_at(text, Position::new(9, 0), OffsetEncoding::Utf16), 5);
    }

    #[test]
    fn offset_inside_surrogate_pair_stops_before_char() {
        let text = "\u{1F600}x";
        let index = LineIndex::new(text);
        assert_eq!(index.offset_at(text, Position::new(0, 1), OffsetEncoding::Utf16), 0);
        assert_eq!(index.offset_at(text, Position::new(0, 2), OffsetEncoding::Utf16), 4);
    }

    #[test]
    fn char_offset_counts_scalars() {
        let text = "é: 1px";
        assert_eq!(char_offset(text, 2), 1);
        assert_eq!(char_offset(text, 1), 0);
        assert_eq!(char_offset(text, 100), 6);
    }
}
