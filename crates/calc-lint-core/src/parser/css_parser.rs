//! Tolerant CSS parser built on the `cssparser` crate.
//!
//! The parser only needs to find declarations and their source ranges, so it
//! treats every block the same way: a rule body that may hold declarations,
//! nested qualified rules and at-rules. The top level of the stylesheet is
//! parsed as such a body too, which lets bare `property: value;` text (an
//! inline style, a snippet from a selection) be scanned like any other
//! declaration.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError as CssParseError, Parser, ParserInput,
    ParserState, QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, Token,
};

use super::tree::{AtRule, Declaration, Node, Rule, StyleTree};
use crate::span::Span;

/// The parser collaborator consumed by the scanner.
///
/// Implementations must never fail: malformed input yields a best-effort
/// tree, possibly an empty one.
pub trait CssParser {
    /// Parse `text` into a tree.
    fn parse(&self, text: &str) -> StyleTree;
}

impl<F> CssParser for F
where
    F: Fn(&str) -> StyleTree,
{
    fn parse(&self, text: &str) -> StyleTree {
        self(text)
    }
}

/// The default parser, backed by [`parse_css`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TolerantParser;

impl CssParser for TolerantParser {
    fn parse(&self, text: &str) -> StyleTree {
        parse_css(text)
    }
}

/// Parse CSS text into a [`StyleTree`].
///
/// Parsing never fails. Invalid rules and declarations are skipped with a
/// trace log and parsing resumes at the next `;` or rule boundary;
/// unterminated blocks, strings and comments at the end of input are closed
/// implicitly.
///
/// # Example
///
/// ```
/// use calc_lint_core::parser::parse_css;
///
/// let tree = parse_css("a { width: 100% - 20px; } b { color: red }");
/// let values: Vec<_> = tree.declarations().map(|d| d.value.as_str()).collect();
/// assert_eq!(values, ["100% - 20px", "red"]);
/// ```
pub fn parse_css(css: &str) -> StyleTree {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut body = BodyParser { source: css };

    let nodes = parse_body(&mut parser, &mut body);
    tracing::trace!(nodes = nodes.len(), bytes = css.len(), "parsed stylesheet");

    StyleTree { nodes }
}

/// Parse the items of a rule body (or the whole stylesheet).
fn parse_body<'i>(input: &mut Parser<'i, '_>, body: &mut BodyParser<'_>) -> Vec<Node> {
    let mut nodes = vec![];
    for item in RuleBodyParser::new(input, body) {
        match item {
            Ok(node) => nodes.push(node),
            Err((error, slice)) => {
                tracing::trace!("Skipping invalid CSS {:?}: {:?}", slice, error.kind);
            }
        }
    }
    nodes
}

/// Prelude of an at-rule, remembered until its block (or `;`) is reached.
struct AtRulePrelude {
    name: String,
    prelude: String,
    end: usize,
}

/// Rule body parser that records every item with its source range.
struct BodyParser<'s> {
    /// The full text being parsed; `cssparser` positions index into it.
    source: &'s str,
}

impl BodyParser<'_> {
    /// End of an item whose content stops at `end`: one past `terminator`
    /// when it follows, otherwise the end of the content with trailing
    /// whitespace dropped.
    fn item_end(&self, content_start: usize, end: usize, terminator: char) -> usize {
        if self.source[end..].starts_with(terminator) {
            end + terminator.len_utf8()
        } else {
            content_start + self.source[content_start..end].trim_end().len()
        }
    }
}

impl<'i> DeclarationParser<'i> for BodyParser<'_> {
    type Declaration = Node;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        declaration_start: &ParserState,
    ) -> Result<Self::Declaration, CssParseError<'i, Self::Error>> {
        let start = declaration_start.position().byte_index();
        let value_start = input.position().byte_index();
        let mut comments = vec![];

        loop {
            let before = input.position().byte_index();
            let piece = match input.next_including_whitespace_and_comments() {
                Ok(Token::Comment(_)) => Piece::Comment,
                Ok(Token::CurlyBracketBlock) => Piece::Block,
                Ok(_) => Piece::Other,
                Err(_) => break,
            };

            match piece {
                Piece::Comment => comments.push(Span::new(before, input.position().byte_index())),
                // A `{}` block means this was a nested rule that happened to
                // start with `ident:`, such as `a:hover { ... }`.
                Piece::Block => return Err(input.new_custom_error(())),
                Piece::Other => {}
            }
        }

        let end = input.position().byte_index();
        let value_end = content_end(self.source, value_start, end, &comments);
        let raw = &self.source[value_start..value_end];
        let leading = raw.len() - raw.trim_start().len();
        let (head, important) = split_important(raw.trim());
        let value_span = Span::new(value_start + leading, value_start + leading + head.len());
        let value = strip_comments(self.source, value_span, &comments);

        Ok(Node::Declaration(Declaration {
            property: name.to_string(),
            value: value.trim().to_string(),
            important,
            span: Some(Span::new(start, self.item_end(value_start, end, ';'))),
            value_span: Some(value_span),
        }))
    }
}

enum Piece {
    Comment,
    Block,
    Other,
}

impl<'i> QualifiedRuleParser<'i> for BodyParser<'_> {
    type Prelude = String;
    type QualifiedRule = Node;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, CssParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        Ok(input.slice_from(start).trim().to_string())
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, CssParseError<'i, Self::Error>> {
        let rule_start = start.position().byte_index();
        let block_start = input.position().byte_index();
        let children = parse_body(input, self);
        let end = input.position().byte_index();

        Ok(Node::Rule(Rule {
            prelude,
            span: Some(Span::new(rule_start, self.item_end(block_start, end, '}'))),
            children,
        }))
    }
}

impl<'i> AtRuleParser<'i> for BodyParser<'_> {
    type Prelude = AtRulePrelude;
    type AtRule = Node;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, CssParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        Ok(AtRulePrelude {
            name: name.to_string(),
            prelude: input.slice_from(start).trim().to_string(),
            end: input.position().byte_index(),
        })
    }

    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        let rule_start = start.position().byte_index();

        Ok(Node::AtRule(AtRule {
            span: Some(Span::new(rule_start, self.item_end(rule_start, prelude.end, ';'))),
            name: prelude.name,
            prelude: prelude.prelude,
            children: vec![],
        }))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, CssParseError<'i, Self::Error>> {
        let rule_start = start.position().byte_index();
        let block_start = input.position().byte_index();
        let children = parse_body(input, self);
        let end = input.position().byte_index();

        Ok(Node::AtRule(AtRule {
            name: prelude.name,
            prelude: prelude.prelude,
            span: Some(Span::new(rule_start, self.item_end(block_start, end, '}'))),
            children,
        }))
    }
}

impl<'i> RuleBodyItemParser<'i, Node, ()> for BodyParser<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        true
    }
}

/// Split a trailing `!important` (any case, optional space after `!`) off a
/// trimmed value.
fn split_important(value: &str) -> (&str, bool) {
    if let Some(bang) = value.rfind('!')
        && value[bang + 1..].trim().eq_ignore_ascii_case("important")
    {
        return (value[..bang].trim_end(), true);
    }
    (value, false)
}

/// End of the value text in `start..end` once trailing whitespace and
/// trailing comments are dropped.
fn content_end(source: &str, start: usize, mut end: usize, comments: &[Span]) -> usize {
    loop {
        end = start + source[start..end].trim_end().len();
        match comments.iter().find(|c| c.start >= start && c.end == end) {
            Some(comment) => end = comment.start,
            None => return end,
        }
    }
}

/// Copy the text of `span` without the comments that fall inside it.
fn strip_comments(source: &str, span: Span, comments: &[Span]) -> String {
    let mut out = String::with_capacity(span.len());
    let mut cursor = span.start;
    for comment in comments
        .iter()
        .filter(|c| c.start >= span.start && c.end <= span.end)
    {
        out.push_str(&source[cursor..comment.start]);
        cursor = comment.end;
    }
    out.push_str(&source[cursor..span.end]);
    out
}
