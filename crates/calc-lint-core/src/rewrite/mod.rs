//! The pattern rewriter.
//!
//! Unlike the scanner, the rewriter never parses. It runs a fixed regular
//! expression over raw text looking for
//!
//! ```text
//! : <digits><unit> <op> <digits><unit> ;
//! ```
//!
//! and proposes wrapping the two operands in `calc()`. Being purely lexical
//! it also matches inside comments and strings, and it only understands
//! exactly two operands: `10px + 5px + 3px;` yields no proposal at all,
//! because the second operand must be followed by the semicolon.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::scan::calc_message;
use crate::span::Span;
use crate::{Error, Result};

/// `(:\s*)` `(operand)` `op` `(operand)` `(\s*;)`, where an operand is one or
/// more ASCII digits followed by a run of ASCII word characters or `%`.
static ARITHMETIC_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(:\s*)([0-9]+\s*[%A-Za-z0-9_]+)\s*([+\-*/])\s*([0-9]+\s*[%A-Za-z0-9_]+)(\s*;)")
        .expect("arithmetic declaration pattern is valid")
});

/// A proposed text edit wrapping a matched expression in `calc()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RewriteProposal {
    /// Source range of the matched text, from the colon through the
    /// semicolon.
    pub span: Span,
    /// Text to put in place of the match.
    pub replacement: String,
    /// Human-readable title for the fix.
    pub label: String,
    /// Whether a host should pick this fix by default.
    pub is_preferred: bool,
}

impl RewriteProposal {
    /// Build a proposal from a match of [`ARITHMETIC_DECLARATION`].
    fn from_captures(caps: &Captures<'_>, base: usize) -> Option<Self> {
        let whole = caps.get(0)?;
        let colon = caps.get(1)?.as_str();
        let left = caps.get(2)?.as_str();
        let operator = caps.get(3)?.as_str();
        let right = caps.get(4)?.as_str();
        let semicolon = caps.get(5)?.as_str();

        Some(Self {
            span: Span::new(whole.start(), whole.end()).offset_by(base),
            replacement: format!("{colon}calc({left} {operator} {right}){semicolon}"),
            label: calc_message(whole.as_str()),
            is_preferred: true,
        })
    }

    /// The text this proposal replaces, if `text` is the snapshot it was
    /// computed from.
    pub fn matched_text<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.span.slice(text)
    }

    /// Apply this proposal to `text`, returning the edited text.
    ///
    /// Returns the text unchanged when the span does not fit it.
    pub fn apply(&self, text: &str) -> String {
        apply_rewrites(text, std::slice::from_ref(self))
    }
}

/// Propose rewrites for every match in `text`.
///
/// Matches are found left to right without overlap. Offsets are relative to
/// `text`.
///
/// # Example
///
/// ```
/// use calc_lint_core::rewrite::propose_rewrites;
///
/// let proposals = propose_rewrites("width: 100% - 20px;");
///
/// assert_eq!(proposals.len(), 1);
/// assert_eq!(proposals[0].replacement, ": calc(100% - 20px);");
/// assert_eq!(proposals[0].apply("width: 100% - 20px;"), "width: calc(100% - 20px);");
/// ```
pub fn propose_rewrites(text: &str) -> Vec<RewriteProposal> {
    collect(text, 0)
}

/// Propose rewrites inside `range` of `document`.
///
/// This is what a quick-fix provider needs: only the selected region is
/// matched, but the returned offsets address the whole document.
pub fn propose_rewrites_in(document: &str, range: Span) -> Result<Vec<RewriteProposal>> {
    let text = range
        .slice(document)
        .ok_or_else(|| Error::invalid_range(range, document.len()))?;
    Ok(collect(text, range.start))
}

fn collect(text: &str, base: usize) -> Vec<RewriteProposal> {
    let proposals: Vec<_> = ARITHMETIC_DECLARATION
        .captures_iter(text)
        .filter_map(|caps| RewriteProposal::from_captures(&caps, base))
        .collect();

    tracing::debug!(bytes = text.len(), proposals = proposals.len(), "rewrite scan complete");
    proposals
}

/// Apply several proposals to `text` in one pass.
///
/// Proposals are applied in order of their start offset. One that overlaps
/// an already applied proposal, or does not fit the text, is skipped.
pub fn apply_rewrites(text: &str, proposals: &[RewriteProposal]) -> String {
    let mut ordered: Vec<_> = proposals.iter().collect();
    ordered.sort_by_key(|p| p.span);

    let mut out = String::with_capacity(text.len() + proposals.len() * 6);
    let mut cursor = 0;
    for proposal in ordered {
        if proposal.span.start < cursor || proposal.span.slice(text).is_none() {
            tracing::debug!(span = %proposal.span, "skipping rewrite that does not apply");
            continue;
        }
        out.push_str(&text[cursor..proposal.span.start]);
        out.push_str(&proposal.replacement);
        cursor = proposal.span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_simple_subtraction() {
        let text = "width: 100% - 20px;";
        let proposals = propose_rewrites(text);

        assert_eq!(proposals.len(), 1);
        let p = &proposals[0];
        assert_eq!(p.span, Span::new(5, text.len()));
        assert_eq!(p.matched_text(text), Some(": 100% - 20px;"));
        assert_eq!(p.replacement, ": calc(100% - 20px);");
        assert_eq!(p.label, "Consider using calc() for \": 100% - 20px;\"");
        assert!(p.is_preferred);
    }

    #[test]
    fn spacing_is_normalised_around_operator() {
        let proposals = propose_rewrites("a{height:10px*2em;}");
        assert_eq!(proposals[0].replacement, ":calc(10px * 2em);");

        let proposals = propose_rewrites("top:  5vh   /   3vh  ;");
        assert_eq!(proposals[0].replacement, ":  calc(5vh / 3vh)  ;");
    }

    #[test]
    fn every_operator_is_recognised() {
        for op in ['+', '-', '*', '/'] {
            let text = format!("x: 1px {op} 2px;");
            let proposals = propose_rewrites(&text);
            assert_eq!(proposals.len(), 1, "operator {op}");
            assert_eq!(proposals[0].replacement, format!(": calc(1px {op} 2px);"));
        }
    }

    #[test]
    fn multiple_matches_in_order() {
        let text = "a { width: 100% - 20px; height: 50vh + 10px; }";
        let proposals = propose_rewrites(text);

        assert_eq!(proposals.len(), 2);
        assert!(proposals[0].span.end <= proposals[1].span.start);
        assert_eq!(
            apply_rewrites(text, &proposals),
            "a { width: calc(100% - 20px); height: calc(50vh + 10px); }"
        );
    }

    #[test]
    fn chained_arithmetic_has_no_proposal() {
        assert!(propose_rewrites("height: 10px + 5px + 3px;").is_empty());
    }

    #[test]
    fn no_match_cases() {
        assert!(propose_rewrites("").is_empty());
        assert!(propose_rewrites("margin: var(--gap);").is_empty());
        assert!(propose_rewrites("width: calc(100% - 20px);").is_empty());
        // decimals are outside the pattern
        assert!(propose_rewrites("width: 1.5em + 2px;").is_empty());
        // missing semicolon
        assert!(propose_rewrites("width: 100% - 20px").is_empty());
    }

    #[test]
    fn matches_inside_comments() {
        let proposals = propose_rewrites("/* width: 1px + 2px; */");
        assert_eq!(proposals.len(), 1);
    }

    #[test]
    fn range_offsets_address_the_document() {
        let doc = "a { color: red; }\nb { width: 100% - 20px; }";
        let start = doc.find('b').unwrap();
        let proposals = propose_rewrites_in(doc, Span::new(start, doc.len())).unwrap();

        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].matched_text(doc), Some(": 100% - 20px;"));
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        let doc = "é: 1px + 2px;";
        assert!(matches!(
            propose_rewrites_in(doc, Span::new(1, 4)),
            Err(Error::InvalidRange { start: 1, end: 4, .. })
        ));
        assert!(propose_rewrites_in(doc, Span::new(0, 99)).is_err());
    }

    #[test]
    fn overlapping_proposals_are_skipped() {
        let text = "w: 1px + 2px;";
        let p = propose_rewrites(text).remove(0);
        let applied = apply_rewrites(text, &[p.clone(), p]);
        assert_eq!(applied, "w: calc(1px + 2px);");
    }

    #[test]
    fn operands_are_ascii_only() {
        assert!(propose_rewrites("x: \u{0663}px + 2px;").is_empty());
        assert!(propose_rewrites("x: 1p\u{e9} + 2px;").is_empty());
        assert!(propose_rewrites("x: 1px + 2\u{0661}px;").is_empty());
        assert_eq!(propose_rewrites("x: 1px + 2px;").len(), 1);
    }
}
