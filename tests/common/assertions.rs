use filterql::ast::*;

/// Assert that parsing succeeds
pub fn assert_parses(source: &str) -> Expression {
    filterql::parse(source)
        .unwrap_or_else(|e| panic!("Expected {:?} to parse, got: {}", source, e))
}

/// Assert that parsing fails
pub fn assert_parse_fails(source: &str) -> filterql::Error {
    match filterql::parse(source) {
        Ok(expr) => panic!("Expected {:?} to fail parsing, got {:?}", source, expr),
        Err(e) => e,
    }
}

/// Unpack a comparison node
pub fn assert_comparison(expr: &Expression) -> (&Name, ComparisonOp, &Operand) {
    match expr {
        Expression::Comparison {
            left,
            operator,
            right,
        } => (left, *operator, right),
        other => panic!("Expected comparison, got {:?}", other),
    }
}

/// Unpack a logical node
pub fn assert_logical(expr: &Expression) -> (&Expression, LogicalOp, &Expression) {
    match expr {
        Expression::Logical {
            left,
            operator,
            right,
        } => (left, *operator, right),
        other => panic!("Expected logical node, got {:?}", other),
    }
}

pub fn name(path: &str) -> Name {
    Name::from_dotted(path).unwrap_or_else(|| panic!("Bad name in test: {}", path))
}
