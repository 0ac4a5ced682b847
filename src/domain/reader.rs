//! Notation reader: recursive descent over a single cursor offset
//!
//! ```text
//! alternation := sequence ('|' sequence)*
//! sequence    := item+
//! item        := atom quantifier? | comment
//! atom        := identifier | literal | regex | char-class | '.' | '(' alternation ')'
//! quantifier  := '?' | '*' | '+'
//! ```
//!
//! Each sub-rule peeks before it commits, so the cursor only ever moves forward.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{instrument, trace};

use crate::domain::error::{SyntaxError, SyntaxErrorKind};
use crate::domain::node::{Node, TerminalClass};

/// Class member: plain char, escaped bracket/backslash/dash, `\xNN`, `\uNNNN`, `\U{N..}`.
const CLASS_CHAR: &str =
    r"(?:[^\[\]\\\-]|\\[\[\]\\\-]|\\x[0-9a-fA-F]{2}|\\u[0-9a-fA-F]{4}|\\U\{[0-9a-fA-F]{1,6}\})";

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})")).expect("static notation pattern")
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| anchored(r"\s+"));
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| anchored(r"\w[\w.\-]*"));
static LITERAL_SQ: Lazy<Regex> = Lazy::new(|| anchored(r"'(?:[^'\\]|\\.)*'"));
static LITERAL_DQ: Lazy<Regex> = Lazy::new(|| anchored(r#""(?:[^"\\]|\\.)*""#));
static COMMENT: Lazy<Regex> = Lazy::new(|| anchored(r"/\*(?:[^*/]|[^*]/|\*[^/])*\*/"));
static REGEX: Lazy<Regex> = Lazy::new(|| anchored(r"/(?:[^/\\]|\\.)*/i?"));
static CLASS_BUILTIN: Lazy<Regex> = Lazy::new(|| anchored(r"\\[DSWdsw]"));
static CLASS_ITEM: Lazy<Regex> =
    Lazy::new(|| anchored(&format!("{CLASS_CHAR}(?:-{CLASS_CHAR})?")));

/// Deepest group or nested char class the reader will open.
pub const MAX_NESTING: usize = 128;

/// Whether a token read may be preceded by insignificant whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Space {
    Skip,
    Keep,
}

/// Position of the reader in its source.
#[derive(Debug)]
pub struct Cursor<'a> {
    source: &'a str,
    offset: usize,
    depth: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            depth: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    pub fn skip_whitespace(&mut self) {
        if let Some(m) = WHITESPACE.find(self.rest()) {
            self.offset += m.end();
        }
    }

    /// Consume `value` if the source continues with it.
    fn eat(&mut self, value: &str, space: Space) -> bool {
        if space == Space::Skip {
            self.skip_whitespace();
        }
        if self.rest().starts_with(value) {
            self.offset += value.len();
            true
        } else {
            false
        }
    }

    /// Consume the longest anchored match of `pattern`, returning its text.
    fn eat_match(&mut self, pattern: &Regex, space: Space) -> Option<&'a str> {
        if space == Space::Skip {
            self.skip_whitespace();
        }
        let rest = self.rest();
        let m = pattern.find(rest)?;
        self.offset += m.end();
        Some(&rest[..m.end()])
    }

    fn peek_is(&self, value: &str) -> bool {
        self.rest().starts_with(value)
    }

    /// Open one nesting level for the bracket that starts at `open`.
    fn enter(&mut self, open: usize) -> Result<(), SyntaxError> {
        if self.depth >= MAX_NESTING {
            return Err(SyntaxError::new(
                SyntaxErrorKind::NestingTooDeep,
                open,
                self.source,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(kind, self.offset, self.source)
    }
}

/// Parse one rule's notation into a syntax tree.
///
/// Fails if the notation is malformed or if anything but whitespace is left
/// after the top-level alternation.
#[instrument(level = "trace")]
pub fn parse(source: &str) -> Result<Node, SyntaxError> {
    let mut cursor = Cursor::new(source);
    let node = alternation(&mut cursor)?;
    cursor.skip_whitespace();
    if !cursor.is_at_end() {
        return Err(cursor.error(SyntaxErrorKind::InvalidCharacter));
    }
    trace!("parsed {} bytes", source.len());
    Ok(node)
}

/// `sequence ('|' sequence)*`, collapsing a single alternative.
pub fn alternation(cursor: &mut Cursor<'_>) -> Result<Node, SyntaxError> {
    let mut branches = vec![sequence(cursor)?];
    while cursor.eat("|", Space::Skip) {
        branches.push(sequence(cursor)?);
    }
    Node::collapse_alternation(branches).ok_or_else(|| empty_error(cursor))
}

/// `item+`, collapsing a single item.
pub fn sequence(cursor: &mut Cursor<'_>) -> Result<Node, SyntaxError> {
    let mut items = Vec::new();
    while let Some(node) = item(cursor)? {
        items.push(node);
    }
    Node::collapse_sequence(items).ok_or_else(|| empty_error(cursor))
}

fn empty_error(cursor: &mut Cursor<'_>) -> SyntaxError {
    cursor.skip_whitespace();
    if cursor.is_at_end() {
        cursor.error(SyntaxErrorKind::UnexpectedEnd)
    } else {
        cursor.error(SyntaxErrorKind::InvalidCharacter)
    }
}

/// One atom with an optional quantifier, or a comment.
///
/// Returns `None` when no item starts here, having consumed only leading
/// whitespace. After an atom, whitespace up to a possible quantifier is
/// consumed as well.
pub fn item(cursor: &mut Cursor<'_>) -> Result<Option<Node>, SyntaxError> {
    let atom = if let Some(text) = cursor.eat_match(&IDENTIFIER, Space::Skip) {
        Node::non_terminal(text)
    } else if let Some(text) = cursor
        .eat_match(&LITERAL_SQ, Space::Skip)
        .or_else(|| cursor.eat_match(&LITERAL_DQ, Space::Keep))
    {
        Node::terminal(text, TerminalClass::Literal)
    } else if let Some(text) = cursor.eat_match(&COMMENT, Space::Skip) {
        // annotations are not grammatical units and take no quantifier
        return Ok(Some(Node::terminal(text, TerminalClass::Comment)));
    } else if let Some(text) = cursor.eat_match(&REGEX, Space::Skip) {
        Node::terminal(text, TerminalClass::Regex)
    } else if let Some(text) = char_class(cursor)? {
        Node::terminal(text, TerminalClass::CharClass)
    } else if cursor.eat(".", Space::Skip) {
        Node::terminal(".", TerminalClass::CharClass)
    } else if cursor.eat("(", Space::Skip) {
        group(cursor)?
    } else {
        unterminated_check(cursor)?;
        return Ok(None);
    };

    Ok(Some(quantified(cursor, atom)))
}

/// Body of a group after its `(`.
fn group(cursor: &mut Cursor<'_>) -> Result<Node, SyntaxError> {
    cursor.enter(cursor.offset() - 1)?;
    let inner = group_body(cursor);
    cursor.leave();
    inner
}

fn group_body(cursor: &mut Cursor<'_>) -> Result<Node, SyntaxError> {
    cursor.skip_whitespace();
    if cursor.peek_is(")") {
        return Err(cursor.error(SyntaxErrorKind::EmptyGroup));
    }
    let inner = alternation(cursor)?;
    if !cursor.eat(")", Space::Skip) {
        return Err(cursor.error(SyntaxErrorKind::UnclosedGroup));
    }
    Ok(inner)
}

/// Wrap `atom` once if a quantifier follows; quantifiers never stack.
fn quantified(cursor: &mut Cursor<'_>, atom: Node) -> Node {
    if cursor.eat("?", Space::Skip) {
        Node::optional(atom)
    } else if cursor.eat("*", Space::Skip) {
        Node::zero_or_more(atom)
    } else if cursor.eat("+", Space::Skip) {
        Node::one_or_more(atom)
    } else {
        atom
    }
}

/// Report an opening delimiter whose token never closes.
///
/// Only runs once no atom matched, so it never changes what is accepted.
fn unterminated_check(cursor: &Cursor<'_>) -> Result<(), SyntaxError> {
    let kind = if cursor.peek_is("'") || cursor.peek_is("\"") {
        SyntaxErrorKind::UnterminatedLiteral
    } else if cursor.peek_is("/*") {
        SyntaxErrorKind::UnterminatedComment
    } else if cursor.peek_is("/") {
        SyntaxErrorKind::UnterminatedRegex
    } else {
        return Ok(());
    };
    Err(cursor.error(kind))
}

/// `[` `^`? `-`? class-item+ (`-` nested-class?)? `]`, returned as its verbatim text.
///
/// A nested class after a trailing `-` is spliced into the outer text as-is.
pub fn char_class(cursor: &mut Cursor<'_>) -> Result<Option<String>, SyntaxError> {
    if !cursor.eat("[", Space::Skip) {
        return Ok(None);
    }
    Ok(Some(char_class_body(cursor)?))
}

fn char_class_body(cursor: &mut Cursor<'_>) -> Result<String, SyntaxError> {
    let mut text = String::from("[");
    let mut count = 0usize;

    for flag in ["^", "-"] {
        if cursor.eat(flag, Space::Keep) {
            text.push_str(flag);
            count += 1;
        }
    }
    while let Some(item) = class_item(cursor) {
        text.push_str(item);
        count += 1;
    }
    if count == 0 {
        return Err(cursor.error(SyntaxErrorKind::EmptyCharClass));
    }

    if cursor.eat("-", Space::Keep) {
        text.push('-');
        if cursor.eat("[", Space::Keep) {
            cursor.enter(cursor.offset() - 1)?;
            let nested = char_class_body(cursor);
            cursor.leave();
            text.push_str(&nested?);
        }
    }

    if !cursor.eat("]", Space::Keep) {
        return Err(cursor.error(SyntaxErrorKind::UnclosedCharClass));
    }
    text.push(']');
    Ok(text)
}

/// Built-in escape or (possibly ranged) class character; whitespace is significant.
fn class_item<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    cursor
        .eat_match(&CLASS_BUILTIN, Space::Keep)
        .or_else(|| cursor.eat_match(&CLASS_ITEM, Space::Keep))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nt(name: &str) -> Node {
        Node::non_terminal(name)
    }

    #[test]
    fn given_identifier_when_reading_item_then_returns_bare_non_terminal() {
        let mut cursor = Cursor::new("  foo.bar-baz rest");
        let node = item(&mut cursor).unwrap().unwrap();
        assert_eq!(node, nt("foo.bar-baz"));
        // space after the atom goes with the quantifier lookahead
        assert_eq!(cursor.offset(), 14);
    }

    #[test]
    fn given_identifier_at_end_when_reading_item_then_stops_after_it() {
        let mut cursor = Cursor::new("  foo.bar-baz");
        assert_eq!(item(&mut cursor).unwrap().unwrap(), nt("foo.bar-baz"));
        assert_eq!(cursor.offset(), 13);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn given_groups_at_nesting_limit_when_parsing_then_accepted() {
        let source = format!("{}a{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(parse(&source).unwrap(), nt("a"));
    }

    #[test]
    fn given_groups_past_nesting_limit_when_parsing_then_reports_innermost_bracket() {
        let depth = MAX_NESTING + 1;
        let source = format!("x {}a{}", "(".repeat(depth), ")".repeat(depth));
        let err = parse(&source).unwrap_err();
        assert_eq!(err.kind(), SyntaxErrorKind::NestingTooDeep);
        assert_eq!(err.offset(), 2 + MAX_NESTING);
    }

    #[test]
    fn given_sibling_groups_when_read_then_depth_is_released() {
        let mut cursor = Cursor::new("(a) (b)");
        for _ in 0..2 {
            item(&mut cursor).unwrap().unwrap();
        }
        assert_eq!(cursor.depth, 0);
    }

    #[test]
    fn given_nested_classes_past_limit_when_reading_then_reports_nesting() {
        let levels = MAX_NESTING + 1;
        let source = format!("[{}a{}]", "a-[".repeat(levels), "]".repeat(levels));
        let err = parse(&source).unwrap_err();
        assert_eq!(err.kind(), SyntaxErrorKind::NestingTooDeep);
        assert_eq!(err.offset(), 1 + 3 * MAX_NESTING + 2);
    }

    #[test]
    fn given_no_item_when_reading_item_then_consumes_nothing_but_space() {
        let mut cursor = Cursor::new(" | b");
        assert_eq!(item(&mut cursor).unwrap(), None);
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn given_double_quoted_literal_with_escape_when_reading_then_keeps_text_verbatim() {
        let node = parse(r#""a\"b""#).unwrap();
        assert_eq!(node, Node::terminal(r#""a\"b""#, TerminalClass::Literal));
    }

    #[test]
    fn given_case_insensitive_regex_when_reading_then_keeps_flag() {
        let node = parse(r"/[a-z]+\//i").unwrap();
        assert_eq!(node, Node::terminal(r"/[a-z]+\//i", TerminalClass::Regex));
    }

    #[test]
    fn given_nested_class_when_reading_then_splices_text() {
        let mut cursor = Cursor::new("[a-z-[aeiou]]");
        let text = char_class(&mut cursor).unwrap().unwrap();
        assert_eq!(text, "[a-z-[aeiou]]");
        assert!(cursor.is_at_end());
    }

    #[test]
    fn given_class_with_space_member_when_reading_then_keeps_space() {
        let mut cursor = Cursor::new("[ _]");
        assert_eq!(char_class(&mut cursor).unwrap().unwrap(), "[ _]");
    }

    #[test]
    fn given_class_flags_only_when_reading_then_counts_as_items() {
        let mut cursor = Cursor::new("[^-]");
        assert_eq!(char_class(&mut cursor).unwrap().unwrap(), "[^-]");
    }

    #[test]
    fn given_unclosed_class_when_reading_then_reports_missing_bracket() {
        let mut cursor = Cursor::new("[abc");
        let err = char_class(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), SyntaxErrorKind::UnclosedCharClass);
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn given_group_when_reading_item_then_returns_inner_quantified() {
        let mut cursor = Cursor::new("(a b)+");
        let node = item(&mut cursor).unwrap().unwrap();
        assert_eq!(
            node,
            Node::one_or_more(Node::Sequence(vec![nt("a"), nt("b")]))
        );
    }

    #[test]
    fn given_comment_followed_by_quantifier_when_reading_item_then_leaves_quantifier() {
        let mut cursor = Cursor::new("/* note */?");
        let node = item(&mut cursor).unwrap().unwrap();
        assert_eq!(node, Node::terminal("/* note */", TerminalClass::Comment));
        assert_eq!(cursor.offset(), 10);
    }

    #[test]
    fn given_unterminated_tokens_when_reading_then_names_the_token() {
        let cases = [
            ("'abc", SyntaxErrorKind::UnterminatedLiteral),
            ("a \"b", SyntaxErrorKind::UnterminatedLiteral),
            ("/abc", SyntaxErrorKind::UnterminatedRegex),
            ("/* abc", SyntaxErrorKind::UnterminatedComment),
        ];
        for (source, kind) in cases {
            assert_eq!(parse(source).unwrap_err().kind(), kind, "{source}");
        }
    }
}
