//! Error types for the editor integration.

use std::path::PathBuf;

/// Result type alias for editor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the editor integration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {source}")]
    Config {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Error reported by the detection engine.
    #[error(transparent)]
    Engine(#[from] calc_lint_core::Error),

    /// File watching error.
    #[cfg(feature = "watch")]
    #[error("File watch error: {0}")]
    Watch(String),
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(path: Option<PathBuf>, source: toml::de::Error) -> Self {
        Self::Config { path, source }
    }
}
