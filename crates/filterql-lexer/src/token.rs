//! Token definitions for FilterQL

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")] // Skip whitespace
pub enum TokenKind {
    // === Reserved words (case-sensitive) ===
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("in")]
    In,
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("None")]
    None,

    // === Comparison operators ===
    #[token("=")]
    Equals,
    #[token("!=")]
    NotEquals,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,
    #[token("~")]
    Contains,
    #[token("!~")]
    NotContains,

    // === Punctuation ===
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("(")]
    ParenL,
    #[token(")")]
    ParenR,

    // === Literals ===
    #[regex(r"-?(0|[1-9][0-9]*)")]
    IntValue,

    #[regex(r"-?(0|[1-9][0-9]*)(\.[0-9]+([eE][+-]?[0-9]+)?|[eE][+-]?[0-9]+)")]
    FloatValue,

    #[regex(r#""([^"\\\r\n]|\\["'\\/bfnrt]|\\u[0-9A-Fa-f]{4})*""#)]
    #[regex(r#"'([^'\\\r\n]|\\["'\\/bfnrt]|\\u[0-9A-Fa-f]{4})*'"#)]
    StringValue,

    // === Identifiers ===
    #[regex(r"[_A-Za-z][_0-9A-Za-z]*")]
    Name,
}

impl TokenKind {
    pub fn is_logical(&self) -> bool {
        matches!(self, TokenKind::And | TokenKind::Or)
    }

    /// Operators that sit between a name and a single value
    pub fn is_value_comparison(&self) -> bool {
        matches!(
            self,
            TokenKind::Equals
                | TokenKind::NotEquals
                | TokenKind::Greater
                | TokenKind::GreaterEqual
                | TokenKind::Less
                | TokenKind::LessEqual
                | TokenKind::Contains
                | TokenKind::NotContains
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::IntValue
                | TokenKind::FloatValue
                | TokenKind::StringValue
                | TokenKind::True
                | TokenKind::False
                | TokenKind::None
        )
    }

    /// Grammar symbol name, as used in diagnostics and token dumps
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::In => "IN",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::None => "NONE",
            TokenKind::Equals => "EQUALS",
            TokenKind::NotEquals => "NOT_EQUALS",
            TokenKind::Greater => "GREATER",
            TokenKind::GreaterEqual => "GREATER_EQUAL",
            TokenKind::Less => "LESS",
            TokenKind::LessEqual => "LESS_EQUAL",
            TokenKind::Contains => "CONTAINS",
            TokenKind::NotContains => "NOT_CONTAINS",
            TokenKind::Dot => "DOT",
            TokenKind::Comma => "COMMA",
            TokenKind::ParenL => "PAREN_L",
            TokenKind::ParenR => "PAREN_R",
            TokenKind::IntValue => "INT_VALUE",
            TokenKind::FloatValue => "FLOAT_VALUE",
            TokenKind::StringValue => "STRING_VALUE",
            TokenKind::Name => "NAME",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::And => "'and'",
            TokenKind::Or => "'or'",
            TokenKind::Not => "'not'",
            TokenKind::In => "'in'",
            TokenKind::True => "'True'",
            TokenKind::False => "'False'",
            TokenKind::None => "'None'",
            TokenKind::Equals => "'='",
            TokenKind::NotEquals => "'!='",
            TokenKind::Greater => "'>'",
            TokenKind::GreaterEqual => "'>='",
            TokenKind::Less => "'<'",
            TokenKind::LessEqual => "'<='",
            TokenKind::Contains => "'~'",
            TokenKind::NotContains => "'!~'",
            TokenKind::Dot => "'.'",
            TokenKind::Comma => "','",
            TokenKind::ParenL => "'('",
            TokenKind::ParenR => "')'",
            TokenKind::IntValue => "integer",
            TokenKind::FloatValue => "float",
            TokenKind::StringValue => "string",
            TokenKind::Name => "name",
        }
    }
}
