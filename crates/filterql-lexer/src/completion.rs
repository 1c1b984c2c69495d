//! Completion context for query editors
//!
//! Given half-typed query text and a cursor, decide what kind of thing the
//! user is typing next. Only the tokens before the cursor are looked at and
//! nothing is resolved against a schema; that is up to the host.

use filterql_ast::Name;
use serde::Serialize;

use crate::{tokenize_lenient, Token, TokenKind};

/// What is expected at the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// A field name, possibly continuing a dotted path
    Field,
    /// A comparison operator after a complete name
    Comparison,
    /// A literal after a comparison operator
    Value,
    /// `and` / `or` after a complete comparison
    Logical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionContext {
    /// Partially typed text directly before the cursor
    pub prefix: String,
    /// `None` when nothing sensible can follow
    pub scope: Option<Scope>,
    /// For `Field`, the completed path segments before the prefix
    /// (`author.na` gives `author`). For `Comparison` and `Value`, the name
    /// being compared.
    pub path: Option<Name>,
}

/// Classify the cursor position in `text`.
///
/// `cursor` is a byte offset; it is clamped to the text and moved back to
/// the nearest character boundary.
pub fn completion_context(text: &str, cursor: usize) -> CompletionContext {
    let mut cursor = cursor.min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    let before = &text[..cursor];

    let mut tokens = tokenize_lenient(before);
    // The token under the cursor may be incomplete, so it becomes the prefix
    if tokens.last().is_some_and(|t| t.span.end >= cursor) {
        tokens.pop();
    }

    let gap_start = tokens.last().map_or(0, |t| t.span.end);
    let gap = &before[gap_start..];
    let trimmed = gap.trim_start();
    let whitespace = trimmed.len() != gap.len();

    // A dotted path being typed: pull its completed segments into the prefix
    let continues_path = !whitespace
        && (trimmed.starts_with('.') || tokens.last().is_some_and(|t| t.kind == TokenKind::Dot));
    if continues_path {
        let start = path_start(&tokens, tokens.len());
        let prefix_start = tokens.get(start).map_or(gap_start, |t| t.span.start);
        tokens.truncate(start);
        let typed = &before[prefix_start..];
        let (path, partial) = match typed.rsplit_once('.') {
            Some((path, partial)) => (Name::from_dotted(path), partial),
            None => (None, typed),
        };
        return CompletionContext {
            prefix: partial.to_string(),
            scope: path.as_ref().map(|_| Scope::Field),
            path,
        };
    }

    let mut prefix = trimmed.to_string();
    if prefix == "(" {
        prefix.clear();
    }

    let last = tokens.last().map(|t| t.kind);
    let next_to_last = tokens.len().checked_sub(2).map(|i| tokens[i].kind);

    let (scope, path) = if prefix == ")" && !whitespace {
        (None, None)
    } else if last.is_none()
        || (last.is_some_and(|k| k.is_logical()) && whitespace)
        || (last == Some(TokenKind::ParenL)
            && next_to_last.map_or(true, |k| k.is_logical() || k == TokenKind::ParenL))
    {
        (Some(Scope::Field), None)
    } else if whitespace
        && last.is_some_and(|k| k.is_value_comparison() || k == TokenKind::In)
        && next_to_last == Some(TokenKind::Name)
    {
        (Some(Scope::Value), name_ending_at(&tokens, tokens.len() - 1))
    } else if whitespace && last == Some(TokenKind::Name) {
        (Some(Scope::Comparison), name_ending_at(&tokens, tokens.len()))
    } else if whitespace && last.is_some_and(|k| k.is_literal() || k == TokenKind::ParenR) {
        (Some(Scope::Logical), None)
    } else {
        (None, None)
    };

    CompletionContext {
        prefix,
        scope,
        path,
    }
}

/// Index of the first token of the contiguous `NAME (DOT NAME)* DOT?` run
/// that ends at `end` (exclusive)
fn path_start(tokens: &[Token], end: usize) -> usize {
    let mut start = end;
    while start > 0 {
        let token = &tokens[start - 1];
        let adjacent = start == end || token.span.end == tokens[start].span.start;
        let expected = if start == end {
            matches!(token.kind, TokenKind::Name | TokenKind::Dot)
        } else if tokens[start].kind == TokenKind::Dot {
            token.kind == TokenKind::Name
        } else {
            token.kind == TokenKind::Dot
        };
        if !adjacent || !expected {
            break;
        }
        start -= 1;
    }
    // A run cannot begin with a dot
    while start < end && tokens[start].kind == TokenKind::Dot {
        start += 1;
    }
    start
}

/// The dotted name whose last token sits just before `end`
fn name_ending_at(tokens: &[Token], end: usize) -> Option<Name> {
    if end == 0 || tokens[end - 1].kind != TokenKind::Name {
        return None;
    }
    let start = path_start(tokens, end);
    let parts: Vec<String> = tokens[start..end]
        .iter()
        .filter(|t| t.kind == TokenKind::Name)
        .map(Token::value_text)
        .collect();
    Name::try_from(parts).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_end(text: &str) -> CompletionContext {
        completion_context(text, text.len())
    }

    #[test]
    fn test_empty_input_expects_field() {
        let ctx = at_end("");
        assert_eq!(ctx.scope, Some(Scope::Field));
        assert_eq!(ctx.prefix, "");
        assert_eq!(ctx.path, None);
    }

    #[test]
    fn test_partial_field_name() {
        let ctx = at_end("auth");
        assert_eq!(ctx.scope, Some(Scope::Field));
        assert_eq!(ctx.prefix, "auth");
    }

    #[test]
    fn test_dotted_path() {
        let ctx = at_end("a = 1 and author.na");
        assert_eq!(ctx.scope, Some(Scope::Field));
        assert_eq!(ctx.prefix, "na");
        assert_eq!(ctx.path, Name::from_dotted("author"));

        let ctx = at_end("book.author.");
        assert_eq!(ctx.scope, Some(Scope::Field));
        assert_eq!(ctx.prefix, "");
        assert_eq!(ctx.path, Name::from_dotted("book.author"));
    }

    #[test]
    fn test_after_logical() {
        let ctx = at_end("a = 1 and ");
        assert_eq!(ctx.scope, Some(Scope::Field));
        let ctx = at_end("a = 1 and (");
        assert_eq!(ctx.scope, Some(Scope::Field));
        assert_eq!(ctx.prefix, "");
    }

    #[test]
    fn test_comparison_after_name() {
        let ctx = at_end("author.country ");
        assert_eq!(ctx.scope, Some(Scope::Comparison));
        assert_eq!(ctx.path, Name::from_dotted("author.country"));
    }

    #[test]
    fn test_value_after_operator() {
        let ctx = at_end("author.name = \"Ja");
        assert_eq!(ctx.scope, Some(Scope::Value));
        assert_eq!(ctx.prefix, "\"Ja");
        assert_eq!(ctx.path, Name::from_dotted("author.name"));
    }

    #[test]
    fn test_logical_after_value() {
        assert_eq!(at_end("age > 10 ").scope, Some(Scope::Logical));
        assert_eq!(at_end("(a = 1) ").scope, Some(Scope::Logical));
        assert_eq!(at_end("flag = True ").scope, Some(Scope::Logical));
    }

    #[test]
    fn test_nothing_after_closing_paren() {
        assert_eq!(at_end("(a = 1)").scope, None);
    }

    #[test]
    fn test_cursor_in_the_middle() {
        let text = "age > 10 and name = 'x'";
        let ctx = completion_context(text, 13);
        assert_eq!(ctx.scope, Some(Scope::Field));
    }

    #[test]
    fn test_cursor_is_clamped() {
        let ctx = completion_context("é", 1);
        assert_eq!(ctx.scope, Some(Scope::Field));
        assert_eq!(ctx.prefix, "");
        assert_eq!(completion_context("a", 99).prefix, "a");
    }
}
