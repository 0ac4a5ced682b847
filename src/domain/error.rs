//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

/// Characters shown on each side of the failure point in an excerpt.
const EXCERPT_RADIUS: usize = 40;

/// Domain errors: malformed notation or a tree that breaks its invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    #[error("malformed syntax tree: {reason}")]
    MalformedTree { reason: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// What went wrong while reading notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    UnexpectedEnd,
    InvalidCharacter,
    UnterminatedLiteral,
    UnterminatedRegex,
    UnterminatedComment,
    EmptyGroup,
    UnclosedGroup,
    EmptyCharClass,
    UnclosedCharClass,
    NestingTooDeep,
}

impl SyntaxErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            SyntaxErrorKind::UnexpectedEnd => "unexpected end of text",
            SyntaxErrorKind::InvalidCharacter => "invalid character",
            SyntaxErrorKind::UnterminatedLiteral => "unterminated literal",
            SyntaxErrorKind::UnterminatedRegex => "unterminated regex",
            SyntaxErrorKind::UnterminatedComment => "unterminated comment",
            SyntaxErrorKind::EmptyGroup => "expecting alternation after '('",
            SyntaxErrorKind::UnclosedGroup => "expecting closing brace ')'",
            SyntaxErrorKind::EmptyCharClass => "expecting char-class items",
            SyntaxErrorKind::UnclosedCharClass => "expecting closing ']'",
            SyntaxErrorKind::NestingTooDeep => "nesting too deep",
        }
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// 1-based line and column (in characters) of a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    /// Byte offset where the line containing the position starts
    pub line_start: usize,
}

impl Location {
    /// Locate `offset` in `source`; `\r`, `\n` and `\r\n` each count as one break.
    pub fn of(source: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        let mut line_start = 0;
        let mut last = None;

        for (i, c) in source[..offset].char_indices() {
            match c {
                '\r' => {
                    line += 1;
                    column = 1;
                    line_start = i + 1;
                }
                '\n' => {
                    if last != Some('\r') {
                        line += 1;
                        column = 1;
                    }
                    line_start = i + 1;
                }
                _ => column += 1,
            }
            last = Some(c);
        }

        Self {
            line,
            column,
            line_start,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Positioned failure of a single parse.
///
/// Only the byte offset is recorded while parsing; line, column and the
/// excerpt are derived when asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    kind: SyntaxErrorKind,
    offset: usize,
    source: String,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, offset: usize, source: impl Into<String>) -> Self {
        Self {
            kind,
            offset,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> SyntaxErrorKind {
        self.kind
    }

    /// Byte offset into the notation source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn location(&self) -> Location {
        Location::of(&self.source, self.offset)
    }

    /// Source excerpt around the offset, clipped to its line, plus the caret column.
    pub fn excerpt(&self) -> (&str, usize) {
        let source = self.source.as_str();
        let offset = self.offset;
        let line_start = self.location().line_start;

        let before = &source[line_start..offset];
        let start = before
            .char_indices()
            .rev()
            .nth(EXCERPT_RADIUS - 1)
            .map_or(line_start, |(i, _)| line_start + i);

        let after = &source[offset..];
        let end = after
            .char_indices()
            .take(EXCERPT_RADIUS)
            .find(|&(_, c)| c == '\r' || c == '\n')
            .map(|(i, _)| offset + i)
            .unwrap_or_else(|| {
                offset
                    + after
                        .char_indices()
                        .nth(EXCERPT_RADIUS)
                        .map_or(after.len(), |(i, _)| i)
            });

        let caret = source[start..offset].chars().count();
        (&source[start..end], caret)
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (text, caret) = self.excerpt();
        write!(
            f,
            "error at {}: {}\n{}\n{}^",
            self.location(),
            self.kind,
            text,
            " ".repeat(caret)
        )
    }
}

impl std::error::Error for SyntaxError {}
