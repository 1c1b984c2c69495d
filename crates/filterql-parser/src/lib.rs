//! FilterQL Parser - Recursive descent parser
//!
//! Parses filter queries such as `age > 10 and author.country in ('US', 'CA')`
//! into an [`Expression`] tree. Key points:
//! - `and` binds tighter than `or`, both are left-associative
//! - Parentheses group but leave no node behind
//! - The comparison operator decides which literals may follow it
//! - The first error ends the parse; there is no recovery

mod error;
mod parser;

pub use error::*;
pub use parser::*;

use filterql_ast::Expression;
use filterql_lexer::{Lexer, Token};

/// Parse a query string into an expression tree
pub fn parse(source: &str) -> Result<Expression, Error> {
    parse_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

/// Parse with a custom cap on parenthesis nesting
pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<Expression, Error> {
    let mut parser = Parser::new(Lexer::new(source)).with_max_depth(max_depth);
    let expr = parser.parse_query()?;
    tracing::trace!(len = source.len(), depth = expr.depth(), "parsed query");
    Ok(expr)
}

/// Parse an already tokenized query
pub fn parse_tokens(tokens: impl IntoIterator<Item = Token>) -> Result<Expression, Error> {
    let mut parser = Parser::new(tokens.into_iter().map(Ok));
    parser.parse_query()
}
