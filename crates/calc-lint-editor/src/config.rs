//! Editor integration settings.
//!
//! Settings are plain data with sensible defaults and can be loaded from a
//! TOML file. Every key is optional:
//!
//! ```toml
//! enabled = true
//! language_ids = ["css", "scss"]
//! severity = "warning"
//! highlight_color = "#ffff004f"
//! prompt_on_activation = false
//! diagnostic_source = "dontForgetCalc"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostic::Severity;
use crate::{Error, Result};

/// Name of the configuration file inside the user config directory.
const CONFIG_FILE: &str = "config.toml";

/// Directory under the platform config directory that holds our settings.
const CONFIG_DIR: &str = "calc-lint";

/// Settings for a [`CalcSession`](crate::session::CalcSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Whether warnings are on when the session starts.
    pub enabled: bool,
    /// Language identifiers of the documents that are checked.
    pub language_ids: Vec<String>,
    /// Severity of published diagnostics.
    pub severity: Severity,
    /// Background color for highlighted declarations.
    pub highlight_color: String,
    /// Whether activation asks the user to turn warnings on.
    pub prompt_on_activation: bool,
    /// Source name attached to published diagnostics.
    pub diagnostic_source: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            language_ids: vec!["css".to_string()],
            severity: Severity::Warning,
            highlight_color: "#ffff004f".to_string(),
            prompt_on_activation: true,
            diagnostic_source: "dontForgetCalc".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config(None, e))
    }

    /// Load settings from a TOML file.
    pub fn load_toml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&text).map_err(|e| Error::config(Some(path.to_path_buf()), e))
    }

    /// Serialize settings to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Path of the per-user settings file, if the platform has a config
    /// directory.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the per-user settings file, falling back to defaults when it
    /// does not exist.
    pub fn load_user() -> Result<Self> {
        match Self::user_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Loading settings from {}", path.display());
                Self::load_toml(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Check if documents with `language_id` are checked.
    pub fn is_language_enabled(&self, language_id: &str) -> bool {
        self.language_ids.iter().any(|id| id == language_id)
    }
}
