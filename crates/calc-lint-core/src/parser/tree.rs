//! The parse tree handed to the scanner.
//!
//! The tree is deliberately shallow: it records where rules and
//! declarations are and what text they hold, nothing more.

use crate::span::Span;

/// A single `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name as written.
    pub property: String,
    /// Value text with surrounding whitespace, comments and a trailing
    /// `!important` removed.
    pub value: String,
    /// Whether the declaration ended in `!important`.
    pub important: bool,
    /// Source range from the property name through the terminating `;`
    /// (or the end of the value when there is none).
    pub span: Option<Span>,
    /// Source range of the value text alone.
    pub value_span: Option<Span>,
}

impl Declaration {
    /// Create a declaration that has no source location.
    ///
    /// Synthetic declarations are carried through the tree but never
    /// reported by the scanner.
    pub fn synthetic(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important: false,
            span: None,
            value_span: None,
        }
    }

    /// Check if the declaration carries source offsets.
    pub fn has_source(&self) -> bool {
        self.span.is_some()
    }
}

/// A qualified rule: `prelude { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Raw prelude text, usually a selector list.
    pub prelude: String,
    /// Source range of the whole rule including its block.
    pub span: Option<Span>,
    /// Declarations and nested rules inside the block.
    pub children: Vec<Node>,
}

/// An at-rule such as `@media` or `@import`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// Name without the leading `@`.
    pub name: String,
    /// Raw prelude text.
    pub prelude: String,
    /// Source range of the whole at-rule.
    pub span: Option<Span>,
    /// Block contents. Empty for at-rules without a block.
    pub children: Vec<Node>,
}

/// A node of the parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Declaration(Declaration),
    Rule(Rule),
    AtRule(AtRule),
}

impl Node {
    /// Child nodes of a rule or at-rule. Declarations have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Declaration(_) => &[],
            Node::Rule(rule) => &rule.children,
            Node::AtRule(rule) => &rule.children,
        }
    }

    /// Source range of the node, if it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Node::Declaration(decl) => decl.span,
            Node::Rule(rule) => rule.span,
            Node::AtRule(rule) => rule.span,
        }
    }
}

impl From<Declaration> for Node {
    fn from(decl: Declaration) -> Self {
        Node::Declaration(decl)
    }
}

/// Root of a parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleTree {
    /// Top-level nodes in source order.
    pub nodes: Vec<Node>,
}

impl StyleTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a top-level node.
    pub fn push(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
    }

    /// Check if the tree has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every declaration, at any depth, in document order.
    pub fn declarations(&self) -> Declarations<'_> {
        Declarations {
            stack: vec![self.nodes.iter()],
        }
    }

    /// Count declarations at any depth.
    pub fn declaration_count(&self) -> usize {
        self.declarations().count()
    }
}

/// Depth-first iterator over the declarations of a [`StyleTree`].
#[derive(Debug, Clone)]
pub struct Declarations<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Declarations<'a> {
    type Item = &'a Declaration;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = match self.stack.last_mut()?.next() {
                Some(node) => node,
                None => {
                    self.stack.pop();
                    continue;
                }
            };

            match node {
                Node::Declaration(decl) => return Some(decl),
                Node::Rule(_) | Node::AtRule(_) => self.stack.push(node.children().iter()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(prelude: &str, children: Vec<Node>) -> Node {
        Node::Rule(Rule {
            prelude: prelude.to_string(),
            span: None,
            children,
        })
    }

    #[test]
    fn declarations_walk_in_document_order() {
        let mut tree = StyleTree::new();
        tree.push(Declaration::synthetic("a", "1"));
        tree.push(rule(
            "x",
            vec![
                Declaration::synthetic("b", "2").into(),
                rule("y", vec![Declaration::synthetic("c", "3").into()]),
                Declaration::synthetic("d", "4").into(),
            ],
        ));
        tree.push(Declaration::synthetic("e", "5"));

        let names: Vec<_> = tree.declarations().map(|d| d.property.as_str()).collect();
        assert_eq!(names, ["a", "b", "c", "d", "e"]);
        assert_eq!(tree.declaration_count(), 5);
    }

    #[test]
    fn empty_rules_are_skipped() {
        let mut tree = StyleTree::new();
        tree.push(rule("x", vec![]));
        tree.push(rule("y", vec![rule("z", vec![])]));
        assert!(!tree.is_empty());
        assert_eq!(tree.declarations().next(), None);
    }

    #[test]
    fn synthetic_declarations_have_no_source() {
        let decl = Declaration::synthetic("width", "1px + 2px");
        assert!(!decl.has_source());
        assert_eq!(Node::from(decl).span(), None);
    }
}
