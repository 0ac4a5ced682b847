//! Tests for the EBNF text projection, with properties shared by the diagram projection

use proptest::prelude::*;
use rstest::rstest;

use syndoc::domain::{parse, render_rule, to_diagram, to_text, Node, TerminalClass};

/// Leaves as the reader produces them.
fn leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,5}".prop_map(Node::non_terminal),
        "'[a-z ]{0,4}'".prop_map(|t| Node::terminal(t, TerminalClass::Literal)),
        "\"[a-z]{1,3}\"".prop_map(|t| Node::terminal(t, TerminalClass::Literal)),
        "/[a-z]{1,3}/i?".prop_map(|t| Node::terminal(t, TerminalClass::Regex)),
        "\\[\\^?[a-z]{1,2}(-[a-z])?\\]".prop_map(|t| Node::terminal(t, TerminalClass::CharClass)),
        Just(Node::terminal(".", TerminalClass::CharClass)),
        "/\\* [a-z]{1,4} \\*/".prop_map(|t| Node::terminal(t, TerminalClass::Comment)),
    ]
}

/// Arbitrary well-formed trees: containers hold two or more children.
fn tree() -> impl Strategy<Value = Node> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..4).prop_map(Node::Alternation),
            prop::collection::vec(inner.clone(), 2..4).prop_map(Node::Sequence),
            inner.clone().prop_map(Node::optional),
            inner.clone().prop_map(Node::zero_or_more),
            inner.prop_map(Node::one_or_more),
        ]
    })
}

proptest! {
    #[test]
    fn given_any_tree_when_rendered_and_reparsed_then_tree_is_unchanged(node in tree()) {
        let text = to_text(&node, false);
        let reparsed = parse(&text).map_err(|e| TestCaseError::fail(format!("{text}: {e}")))?;
        prop_assert_eq!(reparsed, node);
    }

    #[test]
    fn given_any_tree_when_rendered_twice_then_output_is_identical(node in tree()) {
        prop_assert_eq!(to_text(&node, false), to_text(&node, false));
        prop_assert_eq!(render_rule(&node, "  ", "\n"), render_rule(&node, "  ", "\n"));
    }

    #[test]
    fn given_any_tree_when_diagrammed_twice_then_model_is_identical(node in tree()) {
        let first = to_diagram(&node);
        prop_assert_eq!(&first, &to_diagram(&node));
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&to_diagram(&node)).unwrap()
        );
    }

    #[test]
    fn given_any_tree_when_text_is_reparsed_then_diagram_is_unchanged(node in tree()) {
        let text = to_text(&node, false);
        let reparsed = parse(&text).map_err(|e| TestCaseError::fail(format!("{text}: {e}")))?;
        prop_assert_eq!(to_diagram(&reparsed), to_diagram(&node));
    }
}

#[rstest]
#[case("'a' | 'b'", "'a' | 'b'")]
#[case("foo bar*", "foo bar*")]
#[case("(a | b) c", "(a | b) c")]
#[case("a   b |c", "a b | c")]
#[case("(a b)*", "(a b)*")]
#[case("((a b) c)", "(a b) c")]
#[case("(a | b) | c", "(a | b) | c")]
#[case("(a+)?", "(a+)?")]
#[case("( /* c */ )*", "(/* c */)*")]
#[case("[a-z-[aeiou]]+", "[a-z-[aeiou]]+")]
fn given_notation_when_rendered_then_canonical_text(#[case] source: &str, #[case] expected: &str) {
    // Arrange
    let node = parse(source).unwrap();

    // Act
    let text = to_text(&node, false);

    // Assert
    assert_eq!(text, expected);
}

#[test]
fn given_sequence_with_optional_leaf_when_rendered_then_leaf_is_not_parenthesized() {
    let node = Node::Sequence(vec![
        Node::non_terminal("a"),
        Node::optional(Node::non_terminal("b")),
    ]);
    assert_eq!(to_text(&node, false), "a b?");
}

#[test]
fn given_forced_grouping_when_rendering_leaf_then_leaf_is_unchanged() {
    let node = Node::terminal("'x'", TerminalClass::Literal);
    assert_eq!(to_text(&node, true), "'x'");
}

#[test]
fn given_root_alternation_when_rendering_rule_then_lists_one_alternative_per_line() {
    // Arrange
    let node = parse("'+' term | '-' term | term").unwrap();

    // Act
    let listing = render_rule(&node, "    ", "\n");

    // Assert
    assert_eq!(
        listing,
        "    ::= '+' term\n      | '-' term\n      | term"
    );
}

#[test]
fn given_nested_alternation_branch_when_rendering_rule_then_branch_keeps_group() {
    let node = parse("(a | b) | c").unwrap();
    assert_eq!(render_rule(&node, "", "\n"), "::= (a | b)\n  | c");
}

#[test]
fn given_custom_separator_when_rendering_rule_then_joins_with_it() {
    let node = parse("a | b").unwrap();
    assert_eq!(render_rule(&node, "", " "), "::= a   | b");
}
