//! Indented tree display of a syntax tree (termtree)

use termtree::Tree;
use tracing::instrument;

use crate::domain::node::{Node, TerminalClass};

pub trait ToTermTree {
    fn to_term_tree(&self) -> Tree<String>;
}

impl ToTermTree for Node {
    #[instrument(level = "trace", skip(self))]
    fn to_term_tree(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children().iter().map(|c| c.to_term_tree()).collect();
        Tree::new(label(self)).with_leaves(leaves)
    }
}

fn label(node: &Node) -> String {
    match node {
        Node::Alternation(_) => "Alternation".to_string(),
        Node::Sequence(_) => "Sequence".to_string(),
        Node::Optional(_) => "Optional".to_string(),
        Node::ZeroOrMore(_) => "ZeroOrMore".to_string(),
        Node::OneOrMore(_) => "OneOrMore".to_string(),
        Node::Terminal(t) if t.class == TerminalClass::None => format!("Terminal {}", t.text),
        Node::Terminal(t) => format!("Terminal({}) {}", t.class, t.text),
        Node::NonTerminal(name) => format!("NonTerminal {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_nested_tree_when_displayed_then_lists_every_node() {
        let node = Node::Sequence(vec![
            Node::non_terminal("foo"),
            Node::zero_or_more(Node::terminal("'x'", TerminalClass::Literal)),
        ]);
        let text = node.to_term_tree().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Sequence");
        assert!(lines[1].ends_with("NonTerminal foo"));
        assert!(lines[2].ends_with("ZeroOrMore"));
        assert!(lines[3].ends_with("Terminal(literal) 'x'"));
        assert_eq!(lines.len(), 4);
    }
}
