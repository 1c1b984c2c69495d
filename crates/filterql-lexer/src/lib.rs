//! FilterQL Lexer - Tokenization using logos
//!
//! Turns a query string into positioned tokens. Notes on the token set:
//! - Reserved words (`and`, `or`, `not`, `in`, `True`, `False`, `None`) are
//!   case-sensitive and only match whole identifiers
//! - Dotted paths come out as `NAME DOT NAME ...`; the parser joins them
//! - `not in` is two tokens, there is no standalone negation

mod completion;
mod error;
mod token;

pub use completion::*;
pub use error::*;
pub use token::*;

use filterql_ast::{Const, Position, Span, ToQuery};
use logos::Logos;

/// A token with its value and location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub span: Span,
    /// Line and column of the first character
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// Names and punctuation carry their source text
    Text(String),
    /// Literal tokens carry the typed value
    Literal(Const),
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }

    /// Printable form of the value; string literals come out unescaped
    pub fn value_text(&self) -> String {
        match &self.value {
            TokenValue::Text(text) => text.clone(),
            TokenValue::Literal(Const::String(value)) => value.clone(),
            TokenValue::Literal(value) => value.to_query(),
        }
    }

    pub fn literal(&self) -> Option<&Const> {
        match &self.value {
            TokenValue::Literal(value) => Some(value),
            TokenValue::Text(_) => None,
        }
    }
}

/// Lazy token stream over one query string.
///
/// Yields tokens in source order. After the first error nothing more is
/// produced; create a new lexer for new input.
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, TokenKind>,
    line: usize,
    line_start: usize,
    scanned: usize,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: TokenKind::lexer(source),
            line: 1,
            line_start: 0,
            scanned: 0,
            failed: false,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Line/column of a byte offset. Offsets must not go backwards.
    fn position_at(&mut self, offset: usize) -> Position {
        let skipped = &self.source[self.scanned..offset];
        if let Some(last_newline) = skipped.rfind('\n') {
            self.line += skipped.matches('\n').count();
            self.line_start = self.scanned + last_newline + 1;
        }
        self.scanned = offset;
        let column = self.source[self.line_start..offset].chars().count() + 1;
        Position::new(self.line, column)
    }

    fn error(&mut self, kind: LexErrorKind, span: Span) -> LexError {
        self.failed = true;
        LexError {
            kind,
            text: self.source[span.start..span.end].to_string(),
            position: self.position_at(span.start),
            span,
        }
    }

    /// Work out why no token matched at `start`
    fn classify_error(&mut self, start: usize) -> LexError {
        let rest = &self.source[start..];
        let Some(first) = rest.chars().next() else {
            return self.error(LexErrorKind::UnexpectedCharacter, Span::point(start));
        };

        if first == '"' || first == '\'' {
            return match closing_quote(rest, first) {
                Some(end) => self.error(LexErrorKind::InvalidEscape, Span::new(start, start + end)),
                None => {
                    let line_end = rest.find(['\r', '\n']).unwrap_or(rest.len());
                    self.error(
                        LexErrorKind::UnterminatedString,
                        Span::new(start, start + line_end),
                    )
                }
            };
        }

        self.error(
            LexErrorKind::UnexpectedCharacter,
            Span::new(start, start + first.len_utf8()),
        )
    }

    fn value_of(&self, kind: TokenKind, slice: &str) -> Result<TokenValue, LexErrorKind> {
        let value = match kind {
            TokenKind::IntValue => TokenValue::Literal(Const::Int(
                slice.parse().map_err(|_| LexErrorKind::NumberOutOfRange)?,
            )),
            TokenKind::FloatValue => {
                let value: f64 = slice.parse().map_err(|_| LexErrorKind::NumberOutOfRange)?;
                if !value.is_finite() {
                    return Err(LexErrorKind::NumberOutOfRange);
                }
                TokenValue::Literal(Const::Float(value))
            }
            TokenKind::StringValue => {
                let inner = &slice[1..slice.len() - 1];
                TokenValue::Literal(Const::String(
                    unescape(inner).ok_or(LexErrorKind::InvalidEscape)?,
                ))
            }
            TokenKind::True => TokenValue::Literal(Const::Bool(true)),
            TokenKind::False => TokenValue::Literal(Const::Bool(false)),
            TokenKind::None => TokenValue::Literal(Const::None),
            _ => TokenValue::Text(slice.to_string()),
        };
        Ok(value)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let result = self.inner.next()?;
        let span = Span::from(self.inner.span());

        let kind = match result {
            Ok(kind) => kind,
            Err(()) => return Some(Err(self.classify_error(span.start))),
        };

        let value = match self.value_of(kind, self.inner.slice()) {
            Ok(value) => value,
            Err(error_kind) => return Some(Err(self.error(error_kind, span))),
        };

        let position = self.position_at(span.start);
        Some(Ok(Token {
            kind,
            value,
            span,
            position,
        }))
    }
}

/// Tokenize a whole query, stopping at the first lexical error
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}

/// Tokenize as far as possible, silently dropping everything from the
/// first lexical error on. Meant for half-typed input.
pub fn tokenize_lenient(source: &str) -> Vec<Token> {
    Lexer::new(source).map_while(Result::ok).collect()
}

/// Byte length of a quoted literal starting at `text[0]`, or `None` if the
/// quote is not closed before the end of the line
fn closing_quote(text: &str, quote: char) -> Option<usize> {
    let mut chars = text.char_indices().skip(1);
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, '\r' | '\n')) | None => return None,
                Some(_) => {}
            },
            '\r' | '\n' => return None,
            c if c == quote => return Some(idx + c.len_utf8()),
            _ => {}
        }
    }
    None
}

/// Resolve escape sequences in the body of a string literal
fn unescape(body: &str) -> Option<String> {
    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        let escaped = match chars.next()? {
            '"' => '"',
            '\'' => '\'',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => {
                let high = hex4(&mut chars)?;
                if (0xD800..0xDC00).contains(&high) {
                    // Surrogate pair: a low surrogate escape must follow
                    if chars.next()? != '\\' || chars.next()? != 'u' {
                        return None;
                    }
                    let low = hex4(&mut chars)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return None;
                    }
                    char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))?
                } else {
                    char::from_u32(high)?
                }
            }
            _ => return None,
        };
        result.push(escaped);
    }
    Some(result)
}

fn hex4(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 {
        return None;
    }
    u32::from_str_radix(&digits, 16).ok()
}
