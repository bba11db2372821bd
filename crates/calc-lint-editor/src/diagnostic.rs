//! Host-facing result types.
//!
//! These mirror what an editor shows: highlighted regions, entries in a
//! problems panel, and quick-fix actions. Each carries both a line/column
//! [`Range`] for the host and the engine's byte [`Span`].

use calc_lint_core::position::Range;
use calc_lint_core::rewrite::RewriteProposal;
use calc_lint_core::scan::FlaggedSpan;
use calc_lint_core::span::Span;
use serde::{Deserialize, Serialize};

use crate::document::TextDocument;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[default]
    Warning,
    Information,
    Hint,
}

/// A problem reported against a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Location in the host's coordinates.
    pub range: Range,
    /// Location as byte offsets.
    pub span: Span,
    /// Human-readable explanation.
    pub message: String,
    /// How serious the problem is.
    pub severity: Severity,
    /// Name of the tool that produced the diagnostic.
    pub source: String,
}

impl Diagnostic {
    /// Build a diagnostic for a flagged declaration.
    pub fn from_flagged(
        document: &TextDocument,
        flagged: &FlaggedSpan,
        severity: Severity,
        source: impl Into<String>,
    ) -> Self {
        Self {
            range: document.range_of(flagged.span),
            span: flagged.span,
            message: flagged.message.clone(),
            severity,
            source: source.into(),
        }
    }
}

/// A highlighted region of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// Location in the host's coordinates.
    pub range: Range,
    /// Location as byte offsets.
    pub span: Span,
    /// Background color, as a CSS hex color such as `#ffff004f`.
    pub color: String,
}

impl Decoration {
    /// Build a decoration for a flagged declaration.
    pub fn from_flagged(
        document: &TextDocument,
        flagged: &FlaggedSpan,
        color: impl Into<String>,
    ) -> Self {
        Self {
            range: document.range_of(flagged.span),
            span: flagged.span,
            color: color.into(),
        }
    }
}

/// Kind of a code action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeActionKind {
    QuickFix,
}

/// A single text replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Replaced region in the host's coordinates.
    pub range: Range,
    /// Replaced region as byte offsets.
    pub span: Span,
    /// Replacement text.
    pub new_text: String,
}

/// A fix the user can pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAction {
    /// Title shown in the host's menu.
    pub title: String,
    /// Kind of action.
    pub kind: CodeActionKind,
    /// The edit performed when the action is chosen.
    pub edit: TextEdit,
    /// Whether this is the default among actions at the same location.
    pub is_preferred: bool,
}

impl CodeAction {
    /// Build a quick fix from a rewrite proposal.
    pub fn from_proposal(document: &TextDocument, proposal: &RewriteProposal) -> Self {
        Self {
            title: proposal.label.clone(),
            kind: CodeActionKind::QuickFix,
            edit: TextEdit {
                range: document.range_of(proposal.span),
                span: proposal.span,
                new_text: proposal.replacement.clone(),
            },
            is_preferred: proposal.is_preferred,
        }
    }

    /// Apply the action's edit to `text`.
    ///
    /// Returns `None` when the edit does not fit the text.
    pub fn apply(&self, text: &str) -> Option<String> {
        let before = text.get(..self.edit.span.start)?;
        let after = text.get(self.edit.span.end..)?;
        Some(format!("{before}{}{after}", self.edit.new_text))
    }
}
