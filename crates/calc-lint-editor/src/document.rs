//! Document snapshots.

use std::path::Path;
use std::sync::OnceLock;

use calc_lint_core::position::{LineIndex, OffsetEncoding, Position, Range};
use calc_lint_core::span::Span;

/// An immutable snapshot of an open document.
///
/// Hosts hand the session a new snapshot for every edit, with a
/// monotonically increasing `version`.
#[derive(Debug, Clone)]
pub struct TextDocument {
    uri: String,
    language_id: String,
    version: i32,
    text: String,
    encoding: OffsetEncoding,
    line_index: OnceLock<LineIndex>,
}

impl TextDocument {
    /// Create a snapshot. Columns are counted in UTF-16 code units.
    pub fn new(
        uri: impl Into<String>,
        language_id: impl Into<String>,
        version: i32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            version,
            text: text.into(),
            encoding: OffsetEncoding::default(),
            line_index: OnceLock::new(),
        }
    }

    /// Create a snapshot of a file on disk, guessing the language from its
    /// extension.
    pub fn from_path(path: &Path, version: i32, text: impl Into<String>) -> Self {
        Self::new(path.display().to_string(), language_id_for_path(path), version, text)
    }

    /// Use a different column encoding.
    pub fn with_encoding(mut self, encoding: OffsetEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The snapshot that follows this one after an edit.
    pub fn edited(&self, version: i32, text: impl Into<String>) -> Self {
        Self {
            uri: self.uri.clone(),
            language_id: self.language_id.clone(),
            version,
            text: text.into(),
            encoding: self.encoding,
            line_index: OnceLock::new(),
        }
    }

    /// Document identifier.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Language identifier, e.g. `css`.
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// Version of this snapshot.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Full document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Column encoding used for positions.
    pub fn encoding(&self) -> OffsetEncoding {
        self.encoding
    }

    /// Line index, built on first use.
    pub fn line_index(&self) -> &LineIndex {
        self.line_index.get_or_init(|| LineIndex::new(&self.text))
    }

    /// Convert a byte offset to a position.
    pub fn position_at(&self, offset: usize) -> Position {
        self.line_index().position_at(&self.text, offset, self.encoding)
    }

    /// Convert a position to a byte offset.
    pub fn offset_at(&self, position: Position) -> usize {
        self.line_index().offset_at(&self.text, position, self.encoding)
    }

    /// Convert a byte span to a range.
    pub fn range_of(&self, span: Span) -> Range {
        self.line_index().range_of(&self.text, span, self.encoding)
    }

    /// Convert a range to a byte span.
    pub fn span_of(&self, range: Range) -> Span {
        self.line_index().span_of(&self.text, range, self.encoding)
    }

    /// Text covered by `range`.
    pub fn text_in(&self, range: Range) -> &str {
        let span = self.span_of(range);
        &self.text[span.range()]
    }
}

/// Guess a language identifier from a file extension.
pub fn language_id_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("css") => "css",
        Some("scss") => "scss",
        Some("less") => "less",
        Some("sass") => "sass",
        _ => "plaintext",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_use_utf16_by_default() {
        let doc = TextDocument::new("file:///a.css", "css", 1, "/* \u{1F600} */ a { top: 1px }");
        let offset = doc.text().find('a').unwrap();
        assert_eq!(doc.position_at(offset), Position::new(0, 9));

        let doc = doc.with_encoding(OffsetEncoding::Utf32);
        assert_eq!(doc.position_at(offset), Position::new(0, 8));
    }

    #[test]
    fn edited_snapshot_rebuilds_index() {
        let doc = TextDocument::new("file:///a.css", "css", 1, "a {}");
        assert_eq!(doc.line_index().line_count(), 1);

        let next = doc.edited(2, "a {\n}\n");
        assert_eq!(next.version(), 2);
        assert_eq!(next.uri(), "file:///a.css");
        assert_eq!(next.line_index().line_count(), 3);
    }

    #[test]
    fn text_in_range() {
        let doc = TextDocument::new("u", "css", 1, "a {\n  width: 1px + 2px;\n}");
        let range = Range::new(Position::new(1, 2), Position::new(1, 7));
        assert_eq!(doc.text_in(range), "width");
    }

    #[test]
    fn language_from_extension() {
        assert_eq!(language_id_for_path(Path::new("a/b.CSS")), "css");
        assert_eq!(language_id_for_path(Path::new("b.scss")), "scss");
        assert_eq!(language_id_for_path(Path::new("README")), "plaintext");
    }
}
