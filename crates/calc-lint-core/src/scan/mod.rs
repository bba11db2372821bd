//! The declaration scanner.
//!
//! The scanner parses a stylesheet, walks every declaration in document
//! order and flags those whose value fails [`needs_calc`]. It is a pure
//! function of its input: the same text always produces the same spans in
//! the same order.

mod predicate;

use std::path::Path;

pub use predicate::{is_standalone_var, needs_calc};

use crate::parser::{CssParser, StyleTree, TolerantParser};
use crate::span::Span;
use crate::{Error, Result};

/// Build the message reported for a value that is missing `calc()`.
pub fn calc_message(value: &str) -> String {
    format!("Consider using calc() for \"{value}\"")
}

/// A declaration suspected of needing `calc()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlaggedSpan {
    /// Source range of the whole declaration.
    pub span: Span,
    /// Human-readable explanation.
    pub message: String,
}

impl FlaggedSpan {
    /// Create a flagged span for `value`.
    pub fn new(span: Span, value: &str) -> Self {
        Self {
            span,
            message: calc_message(value),
        }
    }
}

/// Scans stylesheets for arithmetic that is missing `calc()`.
///
/// The parser is pluggable through [`CssParser`]; the default is the
/// tolerant `cssparser`-based [`TolerantParser`].
#[derive(Debug, Clone, Default)]
pub struct Scanner<P = TolerantParser> {
    parser: P,
}

impl Scanner {
    /// Create a scanner using the default parser.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: CssParser> Scanner<P> {
    /// Create a scanner using a custom parser.
    pub fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    /// The parser this scanner uses.
    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Scan `text` and return the flagged declarations in document order.
    pub fn scan(&self, text: &str) -> Vec<FlaggedSpan> {
        let tree = self.parser.parse(text);
        self.scan_tree(&tree)
    }

    /// Flag the declarations of an already parsed tree.
    ///
    /// Declarations without source offsets are skipped.
    pub fn scan_tree(&self, tree: &StyleTree) -> Vec<FlaggedSpan> {
        let mut flagged = vec![];
        let mut total = 0usize;

        for decl in tree.declarations() {
            total += 1;
            let Some(span) = decl.span else {
                continue;
            };
            if needs_calc(&decl.value) {
                tracing::trace!(property = %decl.property, value = %decl.value, %span, "flagged declaration");
                flagged.push(FlaggedSpan::new(span, &decl.value));
            }
        }

        tracing::debug!(declarations = total, flagged = flagged.len(), "scan complete");
        flagged
    }

    /// Read a stylesheet from disk and scan it.
    pub fn scan_file(&self, path: impl AsRef<Path>) -> Result<Vec<FlaggedSpan>> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(self.scan(&text))
    }
}

/// Scan `text` with the default parser.
///
/// # Example
///
/// ```
/// use calc_lint_core::scan::scan;
///
/// let css = "a { width: 100% - 20px; height: calc(1em + 2px); }";
/// let flagged = scan(css);
///
/// assert_eq!(flagged.len(), 1);
/// assert_eq!(flagged[0].message, "Consider using calc() for \"100% - 20px\"");
/// assert_eq!(flagged[0].span.slice(css), Some("width: 100% - 20px;"));
/// ```
pub fn scan(text: &str) -> Vec<FlaggedSpan> {
    Scanner::new().scan(text)
}

/// Read a stylesheet from disk and scan it with the default parser.
pub fn scan_file(path: impl AsRef<Path>) -> Result<Vec<FlaggedSpan>> {
    Scanner::new().scan_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Declaration;

    #[test]
    fn flags_arithmetic_declarations_only() {
        let css = "a { width: 100% - 20px; color: red; margin: var(--gap); top: 1px*2 }";
        let flagged = scan(css);

        let texts: Vec<_> = flagged.iter().map(|f| f.span.slice(css).unwrap()).collect();
        assert_eq!(texts, ["width: 100% - 20px;", "top: 1px*2"]);
    }

    #[test]
    fn one_span_per_declaration() {
        let css = "height: 10px + 5px + 3px;";
        let flagged = scan(css);

        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].span, Span::new(0, css.len()));
        assert_eq!(flagged[0].message, "Consider using calc() for \"10px + 5px + 3px\"");
    }

    #[test]
    fn synthetic_declarations_are_skipped() {
        let parser = |_: &str| {
            let mut tree = StyleTree::new();
            tree.push(Declaration::synthetic("width", "1px + 2px"));
            tree
        };
        let scanner = Scanner::with_parser(parser);
        assert!(scanner.scan("anything").is_empty());
    }

    #[test]
    fn scan_is_deterministic() {
        let css = "a { a: 1 - 2; b: 3 / 4 } @media x { c { d: 5 * 6 } }";
        let scanner = Scanner::new();
        assert_eq!(scanner.scan(css), scanner.scan(css));
        assert_eq!(scanner.scan(css).len(), 3);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(scan("").is_empty());
        assert!(scan("  \n ").is_empty());
        assert!(scan("/* a - b */").is_empty());
        assert!(scan("}}}{{{").is_empty());
    }

    #[test]
    fn scan_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.css");
        std::fs::write(&path, "main { width: 100vw - 2rem; }").unwrap();

        let flagged = scan_file(&path).unwrap();
        assert_eq!(flagged.len(), 1);
    }

    #[test]
    fn scan_file_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_file(dir.path().join("missing.css")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn message_omits_important_and_comments() {
        let flagged = scan("a { top: 1px + 2px !important /* c */; }");
        assert_eq!(flagged[0].message, "Consider using calc() for \"1px + 2px\"");
    }

    #[test]
    fn custom_parser_is_used() {
        let mut tree = StyleTree::new();
        tree.push(Declaration {
            span: Some(Span::new(0, 4)),
            ..Declaration::synthetic("top", "1px + 1px")
        });
        tree.push(Declaration::synthetic("left", "2px - 1px"));

        let scanner = Scanner::with_parser(move |_: &str| tree.clone());
        assert_eq!(scanner.parser().parse("ignored").declaration_count(), 2);

        let flagged = scanner.scan("ignored");
        assert_eq!(flagged, [FlaggedSpan::new(Span::new(0, 4), "1px + 1px")]);
    }
}
