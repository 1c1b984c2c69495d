//! Recursive descent parser implementation
//!
//! Grammar:
//!
//! ```text
//! expression      := '(' expression ')'
//!                  | expression logical expression
//!                  | name comparison_eq (boolean | none)
//!                  | name comparison number_or_string
//!                  | name comparison_contains STRING_VALUE
//!                  | name comparison_list '(' value (',' value)* ')'
//! logical         := 'and' | 'or'
//! comparison      := comparison_eq | '>' | '>=' | '<' | '<='
//! comparison_eq   := '=' | '!='
//! comparison_contains := '~' | '!~'
//! comparison_list := 'in' | 'not' 'in'
//! name            := NAME ('.' NAME)*
//! ```
//!
//! `expression logical expression` is resolved by precedence climbing with
//! the binding powers from [`LogicalOp::precedence`]: `and` over `or`, both
//! left-associative.
//!
//! Each open parenthesis costs a level of recursion, so nesting is capped at
//! [`DEFAULT_MAX_DEPTH`] unless the caller picks another limit.

use filterql_ast::*;
use filterql_lexer::{LexError, Lexer, Token, TokenKind};

use crate::{Error, ParseError};

/// Deepest parenthesis nesting accepted by default
pub const DEFAULT_MAX_DEPTH: usize = 128;

pub struct Parser<I> {
    tokens: I,
    peeked: Option<Token>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<Lexer<'a>> {
    pub fn from_source(source: &'a str) -> Self {
        Self::new(Lexer::new(source))
    }
}

impl<I> Parser<I>
where
    I: Iterator<Item = Result<Token, LexError>>,
{
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            peeked: None,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Reject input nested deeper than `max_depth` parentheses
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    // === Utilities ===

    fn fill(&mut self) -> Result<(), Error> {
        if self.peeked.is_none() {
            self.peeked = self.tokens.next().transpose()?;
        }
        Ok(())
    }

    fn peek(&mut self) -> Result<Option<TokenKind>, Error> {
        self.fill()?;
        Ok(self.peeked.as_ref().map(|t| t.kind))
    }

    fn at(&mut self, kind: TokenKind) -> Result<bool, Error> {
        Ok(self.peek()? == Some(kind))
    }

    /// Take the next token, failing on end of input
    fn advance(&mut self, expected: &str) -> Result<Token, Error> {
        self.fill()?;
        self.peeked
            .take()
            .ok_or_else(|| ParseError::eof(expected).into())
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Token, Error> {
        let token = self.advance(kind.describe())?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(ParseError::unexpected(kind.describe(), &token).into())
        }
    }

    // === Expressions ===

    /// Parse the whole input as a single expression
    pub fn parse_query(&mut self) -> Result<Expression, Error> {
        let expr = self.parse_expression(0)?;
        self.fill()?;
        match self.peeked.take() {
            None => Ok(expr),
            Some(token) => Err(ParseError::unexpected("'and', 'or' or end of input", &token).into()),
        }
    }

    fn parse_expression(&mut self, min_precedence: u8) -> Result<Expression, Error> {
        let mut left = self.parse_primary()?;

        loop {
            let operator = match self.peek()? {
                Some(TokenKind::And) => LogicalOp::And,
                Some(TokenKind::Or) => LogicalOp::Or,
                _ => break,
            };
            if operator.precedence() < min_precedence {
                break;
            }
            self.advance(operator.symbol())?;
            let right = self.parse_expression(operator.precedence() + 1)?;
            left = Expression::logical(left, operator, right);
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expression, Error> {
        const EXPECTED: &str = "'(' or a name";

        match self.peek()? {
            Some(TokenKind::ParenL) => {
                let open = self.advance(EXPECTED)?;
                if self.depth >= self.max_depth {
                    let expected = format!("at most {} nested parentheses", self.max_depth);
                    return Err(ParseError::unexpected(expected, &open).into());
                }
                self.depth += 1;
                let inner = self.parse_expression(0)?;
                self.consume(TokenKind::ParenR)?;
                self.depth -= 1;
                Ok(inner)
            }
            Some(TokenKind::Name) => self.parse_comparison(),
            _ => {
                let token = self.advance(EXPECTED)?;
                Err(ParseError::unexpected(EXPECTED, &token).into())
            }
        }
    }

    fn parse_comparison(&mut self) -> Result<Expression, Error> {
        const EXPECTED: &str = "a comparison operator";

        let left = self.parse_name()?;
        let token = self.advance(EXPECTED)?;

        let (operator, right) = match token.kind {
            TokenKind::Equals => (ComparisonOp::Eq, self.parse_value()?),
            TokenKind::NotEquals => (ComparisonOp::Ne, self.parse_value()?),
            TokenKind::Greater => (ComparisonOp::Gt, self.parse_number_or_string()?),
            TokenKind::GreaterEqual => (ComparisonOp::Ge, self.parse_number_or_string()?),
            TokenKind::Less => (ComparisonOp::Lt, self.parse_number_or_string()?),
            TokenKind::LessEqual => (ComparisonOp::Le, self.parse_number_or_string()?),
            TokenKind::Contains => (ComparisonOp::Contains, self.parse_string()?),
            TokenKind::NotContains => (ComparisonOp::NotContains, self.parse_string()?),
            TokenKind::In => (ComparisonOp::In, self.parse_list()?),
            TokenKind::Not => {
                self.consume(TokenKind::In)?;
                (ComparisonOp::NotIn, self.parse_list()?)
            }
            _ => return Err(ParseError::unexpected(EXPECTED, &token).into()),
        };

        Ok(Expression::comparison(left, operator, right))
    }

    fn parse_name(&mut self) -> Result<Name, Error> {
        let first = self.consume(TokenKind::Name)?;
        let mut name = Name::new(first.value_text());

        while self.at(TokenKind::Dot)? {
            self.advance("'.'")?;
            let segment = self.consume(TokenKind::Name)?;
            name.push(segment.value_text());
        }

        Ok(name)
    }

    // === Values ===

    /// Any literal: number, string, boolean or `None`
    fn parse_value(&mut self) -> Result<Operand, Error> {
        Ok(Operand::Const(self.parse_const()?))
    }

    fn parse_const(&mut self) -> Result<Const, Error> {
        const EXPECTED: &str = "a value";

        let token = self.advance(EXPECTED)?;
        match token.literal() {
            Some(value) => Ok(value.clone()),
            None => Err(ParseError::unexpected(EXPECTED, &token).into()),
        }
    }

    fn parse_number_or_string(&mut self) -> Result<Operand, Error> {
        const EXPECTED: &str = "a number or string";

        let token = self.advance(EXPECTED)?;
        match token.literal() {
            Some(value) if value.is_number_or_string() => Ok(Operand::Const(value.clone())),
            _ => Err(ParseError::unexpected(EXPECTED, &token).into()),
        }
    }

    fn parse_string(&mut self) -> Result<Operand, Error> {
        const EXPECTED: &str = "a string";

        let token = self.advance(EXPECTED)?;
        match token.literal() {
            Some(value @ Const::String(_)) => Ok(Operand::Const(value.clone())),
            _ => Err(ParseError::unexpected(EXPECTED, &token).into()),
        }
    }

    /// `'(' value (',' value)* ')'`
    fn parse_list(&mut self) -> Result<Operand, Error> {
        self.consume(TokenKind::ParenL)?;
        let mut list = ConstList::new(self.parse_const()?);

        loop {
            const EXPECTED: &str = "',' or ')'";
            let token = self.advance(EXPECTED)?;
            match token.kind {
                TokenKind::Comma => list.push(self.parse_const()?),
                TokenKind::ParenR => break,
                _ => return Err(ParseError::unexpected(EXPECTED, &token).into()),
            }
        }

        Ok(Operand::List(list))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Expression, Error> {
        Parser::from_source(source).parse_query()
    }

    fn cmp(name: &str, operator: ComparisonOp, value: impl Into<Operand>) -> Expression {
        Expression::comparison(Name::from_dotted(name).unwrap(), operator, value)
    }

    #[test]
    fn test_single_comparison() {
        assert_eq!(
            parse("age >= 18").unwrap(),
            cmp("age", ComparisonOp::Ge, 18i64)
        );
    }

    #[test]
    fn test_dotted_name() {
        assert_eq!(
            parse("book.author.name != 'x'").unwrap(),
            cmp("book.author.name", ComparisonOp::Ne, "x")
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let expected = Expression::or(
            cmp("a", ComparisonOp::Eq, 1i64),
            Expression::and(cmp("b", ComparisonOp::Eq, 2i64), cmp("c", ComparisonOp::Eq, 3i64)),
        );
        assert_eq!(parse("a = 1 or b = 2 and c = 3").unwrap(), expected);
    }

    #[test]
    fn test_left_associative() {
        let expected = Expression::or(
            Expression::or(cmp("a", ComparisonOp::Eq, 1i64), cmp("b", ComparisonOp::Eq, 2i64)),
            cmp("c", ComparisonOp::Eq, 3i64),
        );
        assert_eq!(parse("a = 1 or b = 2 or c = 3").unwrap(), expected);
    }

    #[test]
    fn test_not_in() {
        let mut list = ConstList::new(1i64);
        list.push(2.5);
        list.push(Const::None);
        assert_eq!(
            parse("id not in (1, 2.5, None)").unwrap(),
            cmp("id", ComparisonOp::NotIn, list)
        );
    }

    #[test]
    fn test_contains() {
        assert_eq!(
            parse("title ~ \"rust\"").unwrap(),
            cmp("title", ComparisonOp::Contains, "rust")
        );
        assert!(parse("title ~ 1").is_err());
    }

    #[test]
    fn test_ordering_rejects_bool_and_none() {
        let err = parse("age > True").unwrap_err();
        assert_eq!(err.message(), "syntax error at 'True'");
        assert!(parse("age < None").is_err());
    }

    #[test]
    fn test_equality_accepts_bool() {
        assert_eq!(
            parse("is_active = False").unwrap(),
            cmp("is_active", ComparisonOp::Eq, false)
        );
    }

    #[test]
    fn test_not_without_in() {
        let err = parse("a not = 1").unwrap_err();
        assert_eq!(err.message(), "syntax error at '='");
    }

    #[test]
    fn test_empty_list_rejected() {
        let err = parse("a in ()").unwrap_err();
        assert_eq!(err.message(), "syntax error at ')'");
    }

    #[test]
    fn test_unbalanced_parens() {
        assert!(parse("(a = 1").unwrap_err().is_eof());
        let err = parse("a = 1)").unwrap_err();
        assert_eq!(err.message(), "syntax error at ')'");
    }

    #[test]
    fn test_trailing_logical() {
        assert!(parse("a = 1 and").unwrap_err().is_eof());
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}a = 1{}", "(".repeat(depth), ")".repeat(depth));

        assert!(parse(&nested(DEFAULT_MAX_DEPTH)).is_ok());

        let err = parse(&nested(DEFAULT_MAX_DEPTH + 1)).unwrap_err();
        assert_eq!(err.message(), "syntax error at '('");
        assert_eq!(err.position().map(|p| p.column), Some(DEFAULT_MAX_DEPTH + 1));
        assert!(err.to_string().ends_with("expected at most 128 nested parentheses"));
    }

    #[test]
    fn test_deep_nesting_fails_without_overflow() {
        let depth = 32 * 1024;
        let source = format!("{}a = 1{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse(&source).is_err());
    }

    #[test]
    fn test_sibling_groups_do_not_add_up() {
        let group = format!("{}a = 1{}", "(".repeat(100), ")".repeat(100));
        let source = format!("{} and {} or {}", group, group, group);
        assert!(parse(&source).is_ok());
    }

    #[test]
    fn test_custom_depth_limit() {
        let parse_shallow =
            |source: &str| Parser::from_source(source).with_max_depth(1).parse_query();
        assert!(parse_shallow("(a = 1) and (b = 2)").is_ok());
        assert!(parse_shallow("((a = 1))").is_err());
        assert!(parse_shallow("a in (1, 2)").is_ok());
    }

    #[test]
    fn test_lex_error_surfaces_lazily() {
        // The grammar error comes first in the text, so it wins
        let err = parse("a >> 'unterminated").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));

        let err = parse("a = 'unterminated").unwrap_err();
        assert!(matches!(err, Error::Lex(_)));
    }
}
