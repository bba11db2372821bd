//! The seam between the session and an editor.

use std::collections::HashMap;

use crate::diagnostic::{Decoration, Diagnostic};

/// Answer to the activation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptChoice {
    Enable,
    Disable,
    /// The prompt was closed without a choice.
    Dismissed,
}

impl PromptChoice {
    /// Map a button label back to a choice.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("Enable") => Self::Enable,
            Some("Disable") => Self::Disable,
            _ => Self::Dismissed,
        }
    }
}

/// What a session needs from the editor it runs in.
///
/// The session decides *what* to show; the host decides *how*.
pub trait EditorHost {
    /// Replace the highlighted regions of a document.
    fn set_decorations(&mut self, uri: &str, decorations: &[Decoration]);

    /// Replace the diagnostics published for a document.
    fn set_diagnostics(&mut self, uri: &str, diagnostics: Vec<Diagnostic>);

    /// Remove every diagnostic this session has published.
    fn clear_diagnostics(&mut self);

    /// Show a short notification.
    fn show_information(&mut self, message: &str);
}

/// An [`EditorHost`] that just remembers what it was told.
///
/// Useful for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    /// Current decorations per document.
    pub decorations: HashMap<String, Vec<Decoration>>,
    /// Current diagnostics per document.
    pub diagnostics: HashMap<String, Vec<Diagnostic>>,
    /// Every notification shown, oldest first.
    pub messages: Vec<String>,
}

impl MemoryHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decorations currently shown for `uri`.
    pub fn decorations_for(&self, uri: &str) -> &[Decoration] {
        self.decorations.get(uri).map(Vec::as_slice).unwrap_or_default()
    }

    /// Diagnostics currently published for `uri`.
    pub fn diagnostics_for(&self, uri: &str) -> &[Diagnostic] {
        self.diagnostics.get(uri).map(Vec::as_slice).unwrap_or_default()
    }

    /// Most recent notification.
    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }
}

impl EditorHost for MemoryHost {
    fn set_decorations(&mut self, uri: &str, decorations: &[Decoration]) {
        self.decorations.insert(uri.to_string(), decorations.to_vec());
    }

    fn set_diagnostics(&mut self, uri: &str, diagnostics: Vec<Diagnostic>) {
        self.diagnostics.insert(uri.to_string(), diagnostics);
    }

    fn clear_diagnostics(&mut self) {
        self.diagnostics.clear();
    }

    fn show_information(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
