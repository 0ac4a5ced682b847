//! Syntax tree of one grammar rule's right-hand side
//!
//! The tree is strict (no sharing, no back-edges): every node owns its children.
//! Containers always hold at least two children; a one-item grouping collapses
//! to the item itself while reading.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Classification of a terminal, used by renderers to style it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminalClass {
    #[default]
    None,
    Literal,
    Regex,
    CharClass,
    Comment,
}

impl TerminalClass {
    pub fn as_str(self) -> &'static str {
        match self {
            TerminalClass::None => "",
            TerminalClass::Literal => "literal",
            TerminalClass::Regex => "regex",
            TerminalClass::CharClass => "char-class",
            TerminalClass::Comment => "comment",
        }
    }
}

impl fmt::Display for TerminalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf holding surface text exactly as written, delimiters and escapes included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Terminal {
    pub text: String,
    pub class: TerminalClass,
}

impl Terminal {
    pub fn new(text: impl Into<String>, class: TerminalClass) -> Self {
        Self {
            text: text.into(),
            class,
        }
    }
}

/// One node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// `a | b | c`, first branch is the preferred one
    Alternation(Vec<Node>),
    /// `a b c`
    Sequence(Vec<Node>),
    /// `a?`
    Optional(Box<Node>),
    /// `a*`
    ZeroOrMore(Box<Node>),
    /// `a+`
    OneOrMore(Box<Node>),
    Terminal(Terminal),
    /// Reference to another rule, never resolved here
    NonTerminal(String),
}

impl Node {
    /// Build an alternation, rejecting fewer than two branches.
    pub fn alternation(items: Vec<Node>) -> DomainResult<Self> {
        check_arity("alternation", &items)?;
        Ok(Node::Alternation(items))
    }

    /// Build a sequence, rejecting fewer than two items.
    pub fn sequence(items: Vec<Node>) -> DomainResult<Self> {
        check_arity("sequence", &items)?;
        Ok(Node::Sequence(items))
    }

    pub fn optional(item: Node) -> Self {
        Node::Optional(Box::new(item))
    }

    pub fn zero_or_more(item: Node) -> Self {
        Node::ZeroOrMore(Box::new(item))
    }

    pub fn one_or_more(item: Node) -> Self {
        Node::OneOrMore(Box::new(item))
    }

    pub fn terminal(text: impl Into<String>, class: TerminalClass) -> Self {
        Node::Terminal(Terminal::new(text, class))
    }

    pub fn non_terminal(name: impl Into<String>) -> Self {
        Node::NonTerminal(name.into())
    }

    /// Collapse a run of alternatives: one item stays itself.
    pub(crate) fn collapse_alternation(mut items: Vec<Node>) -> Option<Self> {
        match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(Node::Alternation(items)),
        }
    }

    /// Collapse a run of sequence items: one item stays itself.
    pub(crate) fn collapse_sequence(mut items: Vec<Node>) -> Option<Self> {
        match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(Node::Sequence(items)),
        }
    }

    /// Suffix of a quantifier node, `None` for everything else.
    pub fn quantifier_suffix(&self) -> Option<char> {
        match self {
            Node::Optional(_) => Some('?'),
            Node::ZeroOrMore(_) => Some('*'),
            Node::OneOrMore(_) => Some('+'),
            _ => None,
        }
    }

    pub fn is_quantifier(&self) -> bool {
        self.quantifier_suffix().is_some()
    }

    pub fn is_comment(&self) -> bool {
        matches!(
            self,
            Node::Terminal(Terminal {
                class: TerminalClass::Comment,
                ..
            })
        )
    }

    /// Children in order; leaves have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Alternation(items) | Node::Sequence(items) => items,
            Node::Optional(item) | Node::ZeroOrMore(item) | Node::OneOrMore(item) => {
                std::slice::from_ref(item.as_ref())
            }
            Node::Terminal(_) | Node::NonTerminal(_) => &[],
        }
    }

    /// Verify the structural invariants of the whole subtree.
    ///
    /// Trees produced by the reader always pass; hand-built trees may not.
    pub fn validate(&self) -> DomainResult<()> {
        match self {
            Node::Alternation(items) => check_arity("alternation", items)?,
            Node::Sequence(items) => check_arity("sequence", items)?,
            _ => {}
        }
        self.children().iter().try_for_each(Node::validate)
    }
}

fn check_arity(kind: &str, items: &[Node]) -> DomainResult<()> {
    if items.len() < 2 {
        return Err(DomainError::MalformedTree {
            reason: format!("{kind} needs at least two items, got {}", items.len()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_single_item_when_building_alternation_then_rejects() {
        let result = Node::alternation(vec![Node::non_terminal("a")]);
        assert!(matches!(result, Err(DomainError::MalformedTree { .. })));
    }

    #[test]
    fn given_two_items_when_building_sequence_then_accepts() {
        let node = Node::sequence(vec![Node::non_terminal("a"), Node::non_terminal("b")])
            .expect("two items");
        assert_eq!(node.children().len(), 2);
    }

    #[test]
    fn given_single_item_when_collapsing_then_returns_item_itself() {
        let collapsed = Node::collapse_sequence(vec![Node::non_terminal("a")]);
        assert_eq!(collapsed, Some(Node::non_terminal("a")));
        assert_eq!(Node::collapse_alternation(vec![]), None);
    }

    #[test]
    fn given_nested_one_item_container_when_validating_then_fails() {
        let tree = Node::optional(Node::Sequence(vec![Node::non_terminal("a")]));
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_quantifier_suffixes() {
        let a = Node::non_terminal("a");
        assert_eq!(Node::optional(a.clone()).quantifier_suffix(), Some('?'));
        assert_eq!(Node::zero_or_more(a.clone()).quantifier_suffix(), Some('*'));
        assert_eq!(Node::one_or_more(a.clone()).quantifier_suffix(), Some('+'));
        assert_eq!(a.quantifier_suffix(), None);
    }

    #[test]
    fn test_terminal_class_names() {
        assert_eq!(TerminalClass::CharClass.to_string(), "char-class");
        assert_eq!(TerminalClass::None.as_str(), "");
    }
}
