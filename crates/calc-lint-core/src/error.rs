//! Error types for the detection engine.

use std::path::PathBuf;

use crate::span::Span;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the detection engine.
///
/// Scanning and rewriting text never fail; these errors only come from the
/// convenience entry points that touch the file system or take a caller
/// supplied range.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error.
    #[error("Failed to read stylesheet '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A range that does not address a valid slice of the document.
    #[error("Invalid range {start}..{end} for a document of {len} bytes")]
    InvalidRange { start: usize, end: usize, len: usize },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a range error for a span that cannot be sliced out of a
    /// document of `len` bytes.
    pub fn invalid_range(span: Span, len: usize) -> Self {
        Self::InvalidRange {
            start: span.start,
            end: span.end,
            len,
        }
    }
}
