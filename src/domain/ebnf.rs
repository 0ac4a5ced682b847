//! Canonical EBNF text for a syntax tree
//!
//! Parentheses are decided by the parent: containers are wrapped only when the
//! caller asks for grouping. A sequence always asks its children for grouping;
//! an alternation only asks it of nested alternations, since `|` binds loosest.

use itertools::Itertools;

use crate::domain::node::Node;

/// Render `node` as notation text, wrapping a container in `(...)` when `grouped`.
pub fn to_text(node: &Node, grouped: bool) -> String {
    match node {
        Node::Alternation(items) => container(
            items.iter().map(|item| to_text(item, alternative_grouped(item))),
            " | ",
            grouped,
        ),
        Node::Sequence(items) => container(items.iter().map(|item| to_text(item, true)), " ", grouped),
        Node::Optional(item) => quantifier(item, '?'),
        Node::ZeroOrMore(item) => quantifier(item, '*'),
        Node::OneOrMore(item) => quantifier(item, '+'),
        Node::Terminal(terminal) => terminal.text.clone(),
        Node::NonTerminal(name) => name.clone(),
    }
}

fn quantifier(item: &Node, suffix: char) -> String {
    let inner = to_text(item, true);
    // `a??` and `/* c */?` do not read back, so those operands keep a group
    if item.is_quantifier() || item.is_comment() {
        format!("({inner}){suffix}")
    } else {
        format!("{inner}{suffix}")
    }
}

/// Grouping an alternation requests for one of its branches.
fn alternative_grouped(item: &Node) -> bool {
    matches!(item, Node::Alternation(_))
}

fn container(mut parts: impl Iterator<Item = String>, separator: &str, grouped: bool) -> String {
    let text = parts.join(separator);
    if grouped {
        format!("({text})")
    } else {
        text
    }
}

/// Render a full rule body in the multi-line listing format.
///
/// ```text
/// <prefix>::= <alt-1><separator><prefix>  | <alt-2>...
/// ```
///
/// Only a root alternation is split across lines; anything else is one line.
pub fn render_rule(node: &Node, prefix: &str, separator: &str) -> String {
    match node {
        Node::Alternation(items) => {
            let mut out = String::new();
            for (i, item) in items.iter().enumerate() {
                if i == 0 {
                    out.push_str(prefix);
                    out.push_str("::= ");
                } else {
                    out.push_str(separator);
                    out.push_str(prefix);
                    out.push_str("  | ");
                }
                out.push_str(&to_text(item, alternative_grouped(item)));
            }
            out
        }
        _ => format!("{prefix}::= {}", to_text(node, false)),
    }
}
