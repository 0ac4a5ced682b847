//! Railroad diagram model for a syntax tree
//!
//! Drawing-agnostic primitives, one per tree node; a diagram renderer turns
//! them into SVG or anything else. No layout happens here.

use serde::Serialize;

use crate::domain::node::{Node, TerminalClass};

/// Anchor prefix used for rule cross-references unless configured otherwise.
pub const DEFAULT_ANCHOR_PREFIX: &str = "rule-";

/// Abstract railroad primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagramNode {
    /// Branches drawn in parallel; `default` is the straight-through path.
    Choice {
        default: usize,
        branches: Vec<DiagramNode>,
    },
    Sequence {
        items: Vec<DiagramNode>,
    },
    Optional {
        item: Box<DiagramNode>,
    },
    ZeroOrMore {
        item: Box<DiagramNode>,
    },
    OneOrMore {
        item: Box<DiagramNode>,
    },
    Terminal {
        text: String,
        class: TerminalClass,
    },
    /// Rule reference; `href` points at the rule's anchor in the same document.
    NonTerminal {
        text: String,
        href: String,
    },
}

/// Map `node` onto diagram primitives using [`DEFAULT_ANCHOR_PREFIX`].
pub fn to_diagram(node: &Node) -> DiagramNode {
    to_diagram_with_anchor(node, DEFAULT_ANCHOR_PREFIX)
}

/// Map `node` onto diagram primitives; rule references link to `#<anchor_prefix><name>`.
pub fn to_diagram_with_anchor(node: &Node, anchor_prefix: &str) -> DiagramNode {
    let convert = |item: &Node| to_diagram_with_anchor(item, anchor_prefix);
    match node {
        Node::Alternation(items) => DiagramNode::Choice {
            default: 0,
            branches: items.iter().map(convert).collect(),
        },
        Node::Sequence(items) => DiagramNode::Sequence {
            items: items.iter().map(convert).collect(),
        },
        Node::Optional(item) => DiagramNode::Optional {
            item: Box::new(convert(item)),
        },
        Node::ZeroOrMore(item) => DiagramNode::ZeroOrMore {
            item: Box::new(convert(item)),
        },
        Node::OneOrMore(item) => DiagramNode::OneOrMore {
            item: Box::new(convert(item)),
        },
        Node::Terminal(terminal) => DiagramNode::Terminal {
            text: terminal.text.clone(),
            class: terminal.class,
        },
        Node::NonTerminal(name) => DiagramNode::NonTerminal {
            text: name.clone(),
            href: anchor_href(anchor_prefix, name),
        },
    }
}

/// Same-document link target for a rule name.
pub fn anchor_href(anchor_prefix: &str, name: &str) -> String {
    format!("#{anchor_prefix}{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_alternation_when_projecting_then_choice_defaults_to_first_branch() {
        let node = Node::Alternation(vec![
            Node::terminal("'a'", TerminalClass::Literal),
            Node::non_terminal("b"),
        ]);
        let diagram = to_diagram(&node);
        assert_eq!(
            diagram,
            DiagramNode::Choice {
                default: 0,
                branches: vec![
                    DiagramNode::Terminal {
                        text: "'a'".into(),
                        class: TerminalClass::Literal,
                    },
                    DiagramNode::NonTerminal {
                        text: "b".into(),
                        href: "#rule-b".into(),
                    },
                ],
            }
        );
    }

    #[test]
    fn given_custom_anchor_prefix_when_projecting_then_href_uses_it() {
        let node = Node::zero_or_more(Node::non_terminal("item"));
        let diagram = to_diagram_with_anchor(&node, "syntax-");
        let item = match diagram {
            DiagramNode::ZeroOrMore { item } => item,
            other => panic!("expected zero-or-more, got {other:?}"),
        };
        assert_eq!(
            *item,
            DiagramNode::NonTerminal {
                text: "item".into(),
                href: "#syntax-item".into(),
            }
        );
    }

    #[test]
    fn given_diagram_when_serialized_then_tags_primitive_and_class() {
        let node = Node::optional(Node::terminal("[0-9]", TerminalClass::CharClass));
        let json = serde_json::to_value(to_diagram(&node)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "optional",
                "item": { "type": "terminal", "text": "[0-9]", "class": "char-class" }
            })
        );
    }
}
