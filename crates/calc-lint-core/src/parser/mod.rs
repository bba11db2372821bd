//! CSS parsing module.

mod css_parser;
mod tree;

pub use css_parser::{CssParser, TolerantParser, parse_css};
pub use tree::{AtRule, Declaration, Declarations, Node, Rule, StyleTree};
