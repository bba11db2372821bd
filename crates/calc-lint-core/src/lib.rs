//! Detection engine for CSS arithmetic that is missing `calc()`.
//!
//! Writing `width: 100% - 20px;` is a common slip: without `calc()` the
//! declaration is invalid and silently dropped by the browser. This crate
//! finds such declarations and proposes fixes. It has two independent
//! components with different trade-offs:
//!
//! - **Scanner** ([`scan`]): parses the stylesheet with a tolerant CSS parser
//!   and flags every declaration whose value contains an arithmetic operator,
//!   is not already wrapped in `calc()`, and is not a bare `var(--name)`.
//!   Structurally accurate, but it offers no fix.
//! - **Rewriter** ([`rewrite`]): a lexical pattern over raw text that
//!   recognises `: <n><unit> <op> <n><unit>;` and proposes
//!   `: calc(<n><unit> <op> <n><unit>);`. Less precise, but fixable.
//!
//! Both are pure, synchronous functions of their input text.
//!
//! # Example
//!
//! ```
//! use calc_lint_core::prelude::*;
//!
//! let css = "main { width: 100% - 20px; }";
//!
//! let flagged = scan(css);
//! assert_eq!(flagged.len(), 1);
//!
//! let fixes = propose_rewrites(css);
//! let fixed = apply_rewrites(css, &fixes);
//! assert_eq!(fixed, "main { width: calc(100% - 20px); }");
//! assert!(scan(&fixed).is_empty());
//! ```

pub mod parser;
pub mod position;
pub mod rewrite;
pub mod scan;
pub mod span;

mod error;

pub use error::{Error, Result};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::parser::{CssParser, Declaration, Node, StyleTree, TolerantParser, parse_css};
    pub use crate::position::{LineIndex, OffsetEncoding, Position, Range, char_offset};
    pub use crate::rewrite::{RewriteProposal, apply_rewrites, propose_rewrites, propose_rewrites_in};
    pub use crate::scan::{FlaggedSpan, Scanner, calc_message, needs_calc, scan, scan_file};
    pub use crate::span::Span;
}
