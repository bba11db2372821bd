//! The editor session.
//!
//! A [`CalcSession`] owns the on/off state and decides when to run the
//! scanner and what to publish. The host drives it with editor events and
//! renders what it is told through [`EditorHost`]. Everything runs
//! synchronously on the caller's thread.
//!
//! # Example
//!
//! ```
//! use calc_lint_editor::prelude::*;
//!
//! let mut host = MemoryHost::new();
//! let mut session = CalcSession::new(EditorConfig::default());
//!
//! let doc = TextDocument::new("file:///site.css", "css", 1, "a { width: 100% - 20px; }");
//! session.did_change_active_editor(Some(&doc), &mut host);
//! assert!(host.diagnostics_for(doc.uri()).is_empty());
//!
//! session.answer_prompt(PromptChoice::Enable, &mut host);
//! assert_eq!(host.last_message(), Some("Calc warnings enabled"));
//! assert_eq!(host.diagnostics_for(doc.uri()).len(), 1);
//! ```

use std::collections::HashMap;

use calc_lint_core::parser::{CssParser, TolerantParser};
use calc_lint_core::position::Range;
use calc_lint_core::rewrite::propose_rewrites_in;
use calc_lint_core::scan::Scanner;

use crate::config::EditorConfig;
use crate::diagnostic::{CodeAction, Decoration, Diagnostic};
use crate::document::TextDocument;
use crate::host::{EditorHost, PromptChoice};
use crate::Result;

/// Command that flips warnings on and off.
pub const TOGGLE_WARNINGS_COMMAND: &str = "dontForgetCalc.toggleWarnings";

/// Question asked on activation.
pub const PROMPT_MESSAGE: &str = "Do you want to check for missing calcs?";

/// A question the host should put to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// The question.
    pub message: &'static str,
    /// Button labels, in display order.
    pub choices: [&'static str; 2],
    /// Whether the prompt blocks the editor until answered.
    pub modal: bool,
}

/// Outcome of [`CalcSession::activate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The host should show this prompt and report the answer through
    /// [`CalcSession::answer_prompt`].
    Prompt(Prompt),
    /// Nothing to ask; the session is running.
    Ready,
}

/// Editor-side state for the calc checker.
#[derive(Debug)]
pub struct CalcSession<P = TolerantParser> {
    config: EditorConfig,
    enabled: bool,
    scanner: Scanner<P>,
    active: Option<TextDocument>,
    versions: HashMap<String, i32>,
}

impl CalcSession {
    /// Create a session with the default parser.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_scanner(config, Scanner::new())
    }
}

impl<P: CssParser> CalcSession<P> {
    /// Create a session with a custom scanner.
    pub fn with_scanner(config: EditorConfig, scanner: Scanner<P>) -> Self {
        Self {
            enabled: config.enabled,
            config,
            scanner,
            active: None,
            versions: HashMap::new(),
        }
    }

    /// Current settings.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Whether warnings are on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The document in the active editor, as last reported.
    pub fn active_document(&self) -> Option<&TextDocument> {
        self.active.as_ref()
    }

    /// Start the session.
    ///
    /// Returns the prompt to show when the configuration asks for one, then
    /// checks the active document (which only has an effect when the
    /// configuration starts the session enabled).
    pub fn activate(
        &mut self,
        active: Option<&TextDocument>,
        host: &mut impl EditorHost,
    ) -> Activation {
        tracing::info!(enabled = self.enabled, "calc checker activated");
        self.active = active.cloned();
        if let Some(document) = active {
            self.update(document, host);
        }

        if self.config.prompt_on_activation {
            Activation::Prompt(Prompt {
                message: PROMPT_MESSAGE,
                choices: ["Enable", "Disable"],
                modal: true,
            })
        } else {
            Activation::Ready
        }
    }

    /// Apply the user's answer to the activation prompt.
    ///
    /// Anything other than [`PromptChoice::Enable`] turns warnings off.
    pub fn answer_prompt(&mut self, choice: PromptChoice, host: &mut impl EditorHost) {
        self.set_enabled(choice == PromptChoice::Enable, host);
    }

    /// Flip warnings on or off.
    pub fn toggle_warnings(&mut self, host: &mut impl EditorHost) {
        self.set_enabled(!self.enabled, host);
    }

    /// Turn warnings on or off.
    ///
    /// Turning them on checks the active document right away. Turning them
    /// off clears every diagnostic and the active document's highlights.
    pub fn set_enabled(&mut self, enable: bool, host: &mut impl EditorHost) {
        self.enabled = enable;
        let state = if enable { "enabled" } else { "disabled" };
        tracing::info!("Calc warnings {state}");
        host.show_information(&format!("Calc warnings {state}"));

        if enable {
            if let Some(document) = self.active.take() {
                self.update(&document, host);
                self.active = Some(document);
            }
        } else {
            host.clear_diagnostics();
            if let Some(document) = &self.active {
                host.set_decorations(document.uri(), &[]);
            }
        }
    }

    /// Run a named command. Returns `false` for commands this session does
    /// not know.
    pub fn execute_command(&mut self, command: &str, host: &mut impl EditorHost) -> bool {
        match command {
            TOGGLE_WARNINGS_COMMAND => {
                self.toggle_warnings(host);
                true
            }
            _ => {
                tracing::debug!(command, "ignoring unknown command");
                false
            }
        }
    }

    /// The active editor changed. `None` means no editor is focused.
    pub fn did_change_active_editor(
        &mut self,
        document: Option<&TextDocument>,
        host: &mut impl EditorHost,
    ) {
        self.active = document.cloned();
        if let Some(document) = document {
            self.update(document, host);
        }
    }

    /// A document was opened. Only the active document is checked.
    pub fn did_open(&mut self, document: &TextDocument, host: &mut impl EditorHost) {
        if self.is_active(document) {
            self.active = Some(document.clone());
            self.update(document, host);
        }
    }

    /// A document changed. Only the active document is checked, and a
    /// snapshot older than one already checked is dropped.
    pub fn did_change(&mut self, document: &TextDocument, host: &mut impl EditorHost) {
        if !self.is_active(document) {
            return;
        }
        if self.is_stale(document) {
            tracing::debug!(
                uri = document.uri(),
                version = document.version(),
                "dropping stale document snapshot"
            );
            return;
        }
        self.active = Some(document.clone());
        self.update(document, host);
    }

    /// A document was closed; forget it and remove what was shown for it.
    pub fn did_close(&mut self, uri: &str, host: &mut impl EditorHost) {
        self.versions.remove(uri);
        if self.active.as_ref().is_some_and(|doc| doc.uri() == uri) {
            self.active = None;
        }
        host.set_decorations(uri, &[]);
        host.set_diagnostics(uri, vec![]);
    }

    /// Check a document regardless of which editor is active.
    ///
    /// Does nothing while warnings are off. Used for documents that are not
    /// shown in an editor, such as watched files.
    pub fn refresh(&mut self, document: &TextDocument, host: &mut impl EditorHost) {
        self.update(document, host);
    }

    /// Quick fixes for the text in `range`.
    ///
    /// Fixes are offered for configured languages whether or not warnings
    /// are on. A range the document cannot map yields no fixes.
    pub fn code_actions(&self, document: &TextDocument, range: Range) -> Vec<CodeAction> {
        self.try_code_actions(document, range).unwrap_or_else(|e| {
            tracing::warn!(uri = document.uri(), "no code actions: {e}");
            vec![]
        })
    }

    /// Like [`code_actions`](Self::code_actions), but reports a failure.
    pub fn try_code_actions(&self, document: &TextDocument, range: Range) -> Result<Vec<CodeAction>> {
        if !self.config.is_language_enabled(document.language_id()) {
            return Ok(vec![]);
        }

        let span = document.span_of(range);
        let proposals = propose_rewrites_in(document.text(), span)?;
        Ok(proposals
            .iter()
            .map(|proposal| CodeAction::from_proposal(document, proposal))
            .collect())
    }

    fn is_active(&self, document: &TextDocument) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.uri() == document.uri())
    }

    fn is_stale(&self, document: &TextDocument) -> bool {
        self.versions
            .get(document.uri())
            .is_some_and(|&seen| document.version() < seen)
    }

    /// Publish decorations and diagnostics for `document` if warnings are on.
    fn update(&mut self, document: &TextDocument, host: &mut impl EditorHost) {
        if !self.enabled {
            return;
        }

        if !self.config.is_language_enabled(document.language_id()) {
            host.set_decorations(document.uri(), &[]);
            return;
        }

        self.versions
            .insert(document.uri().to_string(), document.version());

        let flagged = self.scanner.scan(document.text());
        tracing::debug!(
            uri = document.uri(),
            version = document.version(),
            flagged = flagged.len(),
            "checked document"
        );

        let decorations: Vec<_> = flagged
            .iter()
            .map(|f| Decoration::from_flagged(document, f, &self.config.highlight_color))
            .collect();
        let diagnostics = flagged
            .iter()
            .map(|f| {
                Diagnostic::from_flagged(
                    document,
                    f,
                    self.config.severity,
                    &self.config.diagnostic_source,
                )
            })
            .collect();

        host.set_diagnostics(document.uri(), diagnostics);
        host.set_decorations(document.uri(), &decorations);
    }
}
