//! Lexer error types

use filterql_ast::{Position, Span};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character")]
    UnexpectedCharacter,

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid escape sequence in string literal")]
    InvalidEscape,

    #[error("number literal out of range")]
    NumberOutOfRange,
}

/// Text that starts no valid token.
///
/// `text` is the offending fragment: the single unexpected character, the
/// rest of the line after an unclosed quote, or the whole bad literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} {text:?} at {position}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub text: String,
    pub position: Position,
    pub span: Span,
}

impl LexError {
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}
