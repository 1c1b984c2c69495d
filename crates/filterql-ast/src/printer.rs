//! Canonical text printer for filter expressions
//!
//! Serializes an AST back to query text that parses to the same tree.
//! Parentheses are emitted only where the tree shape differs from what
//! precedence and left associativity would produce on their own.

use std::fmt;

use crate::{Const, ConstList, Expression, LogicalOp, Name, Operand};

/// Trait for converting AST nodes to canonical query text.
pub trait ToQuery {
    fn to_query(&self) -> String;
}

/// Escape a string for output inside double quotes
fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\u{8}' => result.push_str("\\b"),
            '\u{c}' => result.push_str("\\f"),
            c if c.is_control() => result.push_str(&format!("\\u{:04x}", c as u32)),
            _ => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Render a float so that it lexes back as a float literal
fn format_float(value: f64) -> String {
    // Debug keeps a fraction or exponent on every finite value ("1.0", "1e100")
    format!("{:?}", value)
}

impl ToQuery for Name {
    fn to_query(&self) -> String {
        self.dotted()
    }
}

impl ToQuery for Const {
    fn to_query(&self) -> String {
        match self {
            Const::Int(value) => value.to_string(),
            Const::Float(value) => format_float(*value),
            Const::String(value) => escape_string(value),
            Const::Bool(true) => "True".to_string(),
            Const::Bool(false) => "False".to_string(),
            Const::None => "None".to_string(),
        }
    }
}

impl ToQuery for ConstList {
    fn to_query(&self) -> String {
        let items: Vec<_> = self.items().iter().map(ToQuery::to_query).collect();
        format!("({})", items.join(", "))
    }
}

impl ToQuery for Operand {
    fn to_query(&self) -> String {
        match self {
            Operand::Const(value) => value.to_query(),
            Operand::List(list) => list.to_query(),
        }
    }
}

impl ToQuery for Expression {
    fn to_query(&self) -> String {
        match self {
            Expression::Comparison {
                left,
                operator,
                right,
            } => format!("{} {} {}", left.to_query(), operator.symbol(), right.to_query()),
            Expression::Logical {
                left,
                operator,
                right,
            } => {
                let left_text = wrap(left, *operator, false);
                let right_text = wrap(right, *operator, true);
                format!("{} {} {}", left_text, operator.symbol(), right_text)
            }
        }
    }
}

/// Render a child of a logical node, parenthesizing when the parent's
/// operator would otherwise capture it differently on re-parse.
fn wrap(child: &Expression, parent: LogicalOp, is_right: bool) -> String {
    let text = child.to_query();
    match child {
        Expression::Logical { operator, .. } => {
            let needs_parens = if is_right {
                operator.precedence() <= parent.precedence()
            } else {
                operator.precedence() < parent.precedence()
            };
            if needs_parens {
                format!("({})", text)
            } else {
                text
            }
        }
        Expression::Comparison { .. } => text,
    }
}

macro_rules! display_via_to_query {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.to_query())
                }
            }
        )*
    };
}

display_via_to_query!(Expression, Name, Const, ConstList, Operand);
