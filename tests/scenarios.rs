//! End-to-end behaviour of the query front end on representative input

mod common;

use common::assertions::*;
use filterql::ast::*;
use filterql::lexer::{LexErrorKind, Scope};
use filterql::parser::ParseError;
use filterql::Error;

#[test]
fn scenario_logical_and() {
    let expr = assert_parses("age > 10 and name = 'Bob'");

    let (left, op, right) = assert_logical(&expr);
    assert_eq!(op, LogicalOp::And);

    let (name_l, op_l, rhs_l) = assert_comparison(left);
    assert_eq!(name_l, &name("age"));
    assert_eq!(op_l, ComparisonOp::Gt);
    assert_eq!(rhs_l, &Operand::Const(Const::Int(10)));

    let (name_r, op_r, rhs_r) = assert_comparison(right);
    assert_eq!(name_r, &name("name"));
    assert_eq!(op_r, ComparisonOp::Eq);
    assert_eq!(rhs_r, &Operand::Const(Const::String("Bob".into())));
}

#[test]
fn scenario_membership_list() {
    let expr = assert_parses("author.country in ('US', 'CA')");

    let (left, op, right) = assert_comparison(&expr);
    assert_eq!(left.parts(), ["author", "country"]);
    assert_eq!(op, ComparisonOp::In);
    match right {
        Operand::List(list) => assert_eq!(
            list.items(),
            [Const::String("US".into()), Const::String("CA".into())]
        ),
        other => panic!("Expected list operand, got {:?}", other),
    }
}

#[test]
fn scenario_none_literal() {
    let expr = assert_parses("deleted_at = None");
    let (_, op, right) = assert_comparison(&expr);
    assert_eq!(op, ComparisonOp::Eq);
    assert_eq!(right, &Operand::Const(Const::None));
}

#[test]
fn scenario_parentheses_leave_no_node() {
    let expr = assert_parses("(a = 1 or b = 2) and c = 3");

    let (left, op, right) = assert_logical(&expr);
    assert_eq!(op, LogicalOp::And);

    let (_, inner_op, _) = assert_logical(left);
    assert_eq!(inner_op, LogicalOp::Or);

    let (c, _, three) = assert_comparison(right);
    assert_eq!(c, &name("c"));
    assert_eq!(three, &Operand::Const(Const::Int(3)));

    assert_eq!(expr, assert_parses("((a = 1 or b = 2)) and (c = 3)"));
}

#[test]
fn scenario_repeated_operator() {
    let err = assert_parse_fails("name >>> 1");
    match err {
        Error::Parse(ParseError::UnexpectedToken {
            fragment, position, ..
        }) => {
            assert_eq!(fragment, ">");
            assert_eq!((position.line, position.column), (1, 7));
        }
        other => panic!("Expected unexpected-token error, got {:?}", other),
    }
}

#[test]
fn scenario_empty_input() {
    let err = assert_parse_fails("");
    assert!(matches!(err, Error::Parse(ParseError::UnexpectedEof { .. })));
    assert_eq!(err.position(), None);
}

#[test]
fn scenario_unterminated_string() {
    match assert_parse_fails("name = 'abc") {
        Error::Lex(err) => {
            assert_eq!(err.kind, LexErrorKind::UnterminatedString);
            assert_eq!(err.text, "'abc");
            assert_eq!((err.position.line, err.position.column), (1, 8));
        }
        other => panic!("Expected lex error, got {:?}", other),
    }
}

#[test]
fn precedence_and_over_or() {
    let loose = assert_parses("a = 1 or b = 2 and c = 3");
    let grouped = assert_parses("a = 1 or (b = 2 and c = 3)");
    assert_eq!(loose, grouped);

    let chained = assert_parses("a = 1 and b = 2 and c = 3");
    let (left, _, _) = assert_logical(&chained);
    assert!(!left.is_comparison(), "and must associate to the left");
}

#[test]
fn literal_types_are_fixed_by_token() {
    let cases = [
        ("x = 3", Const::Int(3)),
        ("x = 3.0", Const::Float(3.0)),
        ("x = '3'", Const::String("3".into())),
        ("x = True", Const::Bool(true)),
        ("x = None", Const::None),
    ];
    for (source, expected) in cases {
        let expr = assert_parses(source);
        let (_, _, right) = assert_comparison(&expr);
        assert_eq!(right, &Operand::Const(expected), "for {:?}", source);
    }
}

#[test]
fn every_grammar_operator_is_accepted() {
    for op in ["=", "!=", ">", ">=", "<", "<="] {
        assert_parses(&format!("n {} 1", op));
        assert_parses(&format!("n {} 'x'", op));
    }
    for op in ["=", "!="] {
        assert_parses(&format!("n {} True", op));
        assert_parses(&format!("n {} None", op));
    }
    assert_parses("n ~ 'x'");
    assert_parses("n !~ 'x'");
    assert_parses("n in (1)");
    assert_parses("n not in (1, 'x', None)");
}

#[test]
fn error_display_includes_location() {
    let err = assert_parse_fails("a = 1 and\n  b = = 2");
    assert_eq!(
        err.to_string(),
        "syntax error at '=' (line 2, column 7): expected a value"
    );
}

#[test]
fn completion_follows_typing() {
    let query = "author.country in ('US') and ";
    let ctx = filterql::lexer::completion_context(query, query.len());
    assert_eq!(ctx.scope, Some(Scope::Field));

    let ctx = filterql::lexer::completion_context("author.country ", 15);
    assert_eq!(ctx.scope, Some(Scope::Comparison));
    assert_eq!(ctx.path, Some(name("author.country")));
}

#[test]
fn ast_serializes_to_json() {
    let expr = assert_parses("a.b = 1");
    let json = serde_json::to_value(&expr).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "comparison": {
                "left": ["a", "b"],
                "operator": "eq",
                "right": { "const": { "int": 1 } }
            }
        })
    );
    let back: Expression = serde_json::from_value(json).unwrap();
    assert_eq!(back, expr);
}
