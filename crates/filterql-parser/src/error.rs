//! Parser error types

use filterql_ast::{Position, Span};
use filterql_lexer::{LexError, Token};
use thiserror::Error;

/// Longest token fragment quoted in a syntax error
const FRAGMENT_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("syntax error at '{fragment}' ({position}): expected {expected}")]
    UnexpectedToken {
        /// Printable token value, cut to 20 characters
        fragment: String,
        /// Full token value
        value: String,
        expected: String,
        position: Position,
        span: Span,
    },

    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },
}

impl ParseError {
    pub fn unexpected(expected: impl Into<String>, found: &Token) -> Self {
        let value = found.value_text();
        ParseError::UnexpectedToken {
            fragment: fragment(&value),
            value,
            expected: expected.into(),
            position: found.position,
            span: found.span,
        }
    }

    pub fn eof(expected: impl Into<String>) -> Self {
        ParseError::UnexpectedEof {
            expected: expected.into(),
        }
    }

    /// Short message without location, as shown to end users
    pub fn message(&self) -> String {
        match self {
            ParseError::UnexpectedToken { fragment, .. } => format!("syntax error at '{}'", fragment),
            ParseError::UnexpectedEof { .. } => "unexpected end of input".to_string(),
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            ParseError::UnexpectedToken { value, .. } => Some(value),
            ParseError::UnexpectedEof { .. } => None,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::UnexpectedToken { position, .. } => Some(*position),
            ParseError::UnexpectedEof { .. } => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::UnexpectedToken { span, .. } => Some(*span),
            ParseError::UnexpectedEof { .. } => None,
        }
    }
}

fn fragment(value: &str) -> String {
    if value.chars().count() > FRAGMENT_LIMIT {
        let head: String = value.chars().take(FRAGMENT_LIMIT - 3).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

/// Any failure of a parse call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    pub fn message(&self) -> String {
        match self {
            Error::Lex(err) => err.message(),
            Error::Parse(err) => err.message(),
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Lex(err) => Some(err.position),
            Error::Parse(err) => err.position(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Lex(err) => Some(err.span),
            Error::Parse(err) => err.span(),
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Error::Parse(ParseError::UnexpectedEof { .. }))
    }
}
