//! Editor integration for calc-lint.
//!
//! This crate turns the detection engine in `calc_lint_core` into something
//! an editor can drive:
//!
//! - **Session**: an on/off switch with an activation prompt and a toggle
//!   command, re-checking the active document as it changes
//! - **Host seam**: decorations, diagnostics and notifications go through
//!   the [`EditorHost`](host::EditorHost) trait
//! - **Quick fixes**: rewrite proposals surfaced as code actions
//! - **Configuration**: TOML settings loaded from the user config directory
//! - **Watching**: re-check stylesheets on disk as they change (`watch`
//!   feature)
//!
//! # Example
//!
//! ```
//! use calc_lint_editor::prelude::*;
//!
//! let mut host = MemoryHost::new();
//! let mut session = CalcSession::new(EditorConfig::default());
//! let doc = TextDocument::new("file:///app.css", "css", 1, "p { margin: 2em + 4px; }");
//!
//! if let Activation::Prompt(prompt) = session.activate(Some(&doc), &mut host) {
//!     assert_eq!(prompt.choices, ["Enable", "Disable"]);
//!     session.answer_prompt(PromptChoice::from_label(Some("Enable")), &mut host);
//! }
//!
//! assert_eq!(host.decorations_for(doc.uri()).len(), 1);
//! ```

pub mod config;
pub mod diagnostic;
pub mod document;
pub mod host;
pub mod session;

#[cfg(feature = "watch")]
pub mod watch;

mod error;

pub use error::{Error, Result};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::config::EditorConfig;
    pub use crate::diagnostic::{CodeAction, CodeActionKind, Decoration, Diagnostic, Severity, TextEdit};
    pub use crate::document::{TextDocument, language_id_for_path};
    pub use crate::host::{EditorHost, MemoryHost, PromptChoice};
    pub use crate::session::{Activation, CalcSession, Prompt, TOGGLE_WARNINGS_COMMAND};

    #[cfg(feature = "watch")]
    pub use crate::watch::StylesheetWatcher;
}
