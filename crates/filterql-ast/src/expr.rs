//! Expression AST nodes

use serde::{Deserialize, Serialize};

/// A filter expression.
///
/// The tree is owned top-down: every logical node owns both children, and
/// comparison nodes are the leaves. Parentheses in the query text leave no
/// trace here.
///
/// Deserializing rejects comparisons whose operand the operator cannot take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "ExpressionRepr")]
pub enum Expression {
    /// Comparison: `age > 10`, `author.country in ("US", "CA")`
    Comparison {
        left: Name,
        operator: ComparisonOp,
        right: Operand,
    },

    /// Logical composition: `a = 1 and b = 2`
    Logical {
        left: Box<Expression>,
        operator: LogicalOp,
        right: Box<Expression>,
    },
}

impl Expression {
    /// Build a comparison. `operator` must accept `right`; see
    /// [`Expression::try_comparison`] for untrusted operands.
    pub fn comparison(left: Name, operator: ComparisonOp, right: impl Into<Operand>) -> Self {
        let right = right.into();
        debug_assert!(operator.accepts(&right), "{:?} cannot take {:?}", operator, right);
        Expression::Comparison {
            left,
            operator,
            right,
        }
    }

    pub fn try_comparison(
        left: Name,
        operator: ComparisonOp,
        right: impl Into<Operand>,
    ) -> Result<Self, String> {
        let right = right.into();
        if !operator.accepts(&right) {
            let found = match &right {
                Operand::Const(value) => value.kind_name(),
                Operand::List(_) => "list",
            };
            return Err(format!("operator '{}' does not take a {} operand", operator.symbol(), found));
        }
        Ok(Expression::Comparison {
            left,
            operator,
            right,
        })
    }

    pub fn logical(left: Expression, operator: LogicalOp, right: Expression) -> Self {
        Expression::Logical {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Self::logical(left, LogicalOp::And, right)
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::logical(left, LogicalOp::Or, right)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self, Expression::Comparison { .. })
    }

    /// Height of the tree; a lone comparison has depth 1
    pub fn depth(&self) -> usize {
        match self {
            Expression::Comparison { .. } => 1,
            Expression::Logical { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Every name referenced by the expression, left to right
    pub fn names(&self) -> Vec<&Name> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a Name>) {
        match self {
            Expression::Comparison { left, .. } => out.push(left),
            Expression::Logical { left, right, .. } => {
                left.collect_names(out);
                right.collect_names(out);
            }
        }
    }
}

/// Incoming shape of [`Expression`] before the operand check
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum ExpressionRepr {
    Comparison {
        left: Name,
        operator: ComparisonOp,
        right: Operand,
    },
    Logical {
        left: Box<Expression>,
        operator: LogicalOp,
        right: Box<Expression>,
    },
}

impl TryFrom<ExpressionRepr> for Expression {
    type Error = String;

    fn try_from(repr: ExpressionRepr) -> Result<Self, Self::Error> {
        match repr {
            ExpressionRepr::Comparison {
                left,
                operator,
                right,
            } => Expression::try_comparison(left, operator, right),
            ExpressionRepr::Logical {
                left,
                operator,
                right,
            } => Ok(Expression::Logical {
                left,
                operator,
                right,
            }),
        }
    }
}

/// Dotted field path: `author.name` is `["author", "name"]`.
///
/// Always holds at least one segment, and every segment is an identifier
/// that is not a reserved word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Name {
    parts: Vec<String>,
}

impl Name {
    pub fn new(first: impl Into<String>) -> Self {
        let first = first.into();
        debug_assert!(is_field_segment(&first), "bad name segment {:?}", first);
        Self { parts: vec![first] }
    }

    /// Append a segment: `Name::new("author").child("name")`
    pub fn child(mut self, segment: impl Into<String>) -> Self {
        self.push(segment);
        self
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        let segment = segment.into();
        debug_assert!(is_field_segment(&segment), "bad name segment {:?}", segment);
        self.parts.push(segment);
    }

    /// Build a name from `a.b.c`; `None` unless every segment is an identifier
    pub fn from_dotted(path: &str) -> Option<Self> {
        Self::try_from(path.split('.').map(str::to_string).collect::<Vec<_>>()).ok()
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn first(&self) -> &str {
        &self.parts[0]
    }

    pub fn last(&self) -> &str {
        &self.parts[self.parts.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn dotted(&self) -> String {
        self.parts.join(".")
    }
}

/// Words that lex as keywords or literals, never as a name
pub const RESERVED_WORDS: [&str; 7] = ["and", "or", "not", "in", "True", "False", "None"];

pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// True for `[_A-Za-z][_0-9A-Za-z]*`
pub fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// An identifier that lexes as `NAME`
pub fn is_field_segment(segment: &str) -> bool {
    is_identifier(segment) && !is_reserved_word(segment)
}

impl TryFrom<Vec<String>> for Name {
    type Error = &'static str;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        if parts.is_empty() {
            return Err("name must have at least one segment");
        }
        if !parts.iter().all(|p| is_identifier(p)) {
            return Err("name segments must be identifiers");
        }
        if parts.iter().any(|p| is_reserved_word(p)) {
            return Err("name segments must not be reserved words");
        }
        Ok(Self { parts })
    }
}

impl From<Name> for Vec<String> {
    fn from(name: Name) -> Self {
        name.parts
    }
}

/// A typed literal. The variant is fixed by the token it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "ConstRepr")]
pub enum Const {
    Int(i64),
    /// Always finite. NaN and infinities have no literal syntax, so the
    /// lexer never produces them and deserializing refuses them.
    Float(f64),
    String(String),
    Bool(bool),
    None,
}

impl Const {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Const::Int(_) => "int",
            Const::Float(_) => "float",
            Const::String(_) => "string",
            Const::Bool(_) => "bool",
            Const::None => "none",
        }
    }

    pub fn is_number_or_string(&self) -> bool {
        matches!(self, Const::Int(_) | Const::Float(_) | Const::String(_))
    }

    /// Whether the printer can render this literal as query text
    pub fn is_printable(&self) -> bool {
        match self {
            Const::Float(value) => value.is_finite(),
            _ => true,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum ConstRepr {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    None,
}

impl TryFrom<ConstRepr> for Const {
    type Error = &'static str;

    fn try_from(repr: ConstRepr) -> Result<Self, Self::Error> {
        Ok(match repr {
            ConstRepr::Int(value) => Const::Int(value),
            ConstRepr::Float(value) if !value.is_finite() => {
                return Err("float literal must be finite")
            }
            ConstRepr::Float(value) => Const::Float(value),
            ConstRepr::String(value) => Const::String(value),
            ConstRepr::Bool(value) => Const::Bool(value),
            ConstRepr::None => Const::None,
        })
    }
}

impl From<i64> for Const {
    fn from(value: i64) -> Self {
        Const::Int(value)
    }
}

impl From<f64> for Const {
    fn from(value: f64) -> Self {
        debug_assert!(value.is_finite(), "non-finite float literal {}", value);
        Const::Float(value)
    }
}

impl From<bool> for Const {
    fn from(value: bool) -> Self {
        Const::Bool(value)
    }
}

impl From<&str> for Const {
    fn from(value: &str) -> Self {
        Const::String(value.to_string())
    }
}

impl From<String> for Const {
    fn from(value: String) -> Self {
        Const::String(value)
    }
}

/// Non-empty literal list, the right operand of `in` / `not in`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Const>", into = "Vec<Const>")]
pub struct ConstList {
    items: Vec<Const>,
}

impl ConstList {
    pub fn new(first: impl Into<Const>) -> Self {
        Self {
            items: vec![first.into()],
        }
    }

    pub fn push(&mut self, item: impl Into<Const>) {
        self.items.push(item.into());
    }

    pub fn items(&self) -> &[Const] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl TryFrom<Vec<Const>> for ConstList {
    type Error = &'static str;

    fn try_from(items: Vec<Const>) -> Result<Self, Self::Error> {
        if items.is_empty() {
            return Err("literal list must not be empty");
        }
        Ok(Self { items })
    }
}

impl From<ConstList> for Vec<Const> {
    fn from(list: ConstList) -> Self {
        list.items
    }
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    Const(Const),
    List(ConstList),
}

impl From<Const> for Operand {
    fn from(value: Const) -> Self {
        Operand::Const(value)
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Const(Const::Int(value))
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Const(Const::from(value))
    }
}

impl From<bool> for Operand {
    fn from(value: bool) -> Self {
        Operand::Const(Const::Bool(value))
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::Const(Const::String(value.to_string()))
    }
}

impl From<ConstList> for Operand {
    fn from(list: ConstList) -> Self {
        Operand::List(list)
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    In,
    NotIn,
    Contains,
    NotContains,
}

impl ComparisonOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::In => "in",
            ComparisonOp::NotIn => "not in",
            ComparisonOp::Contains => "~",
            ComparisonOp::NotContains => "!~",
        }
    }

    /// `=` and `!=`: the only operators that accept booleans and `None`
    pub fn is_equality(&self) -> bool {
        matches!(self, ComparisonOp::Eq | ComparisonOp::Ne)
    }

    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            ComparisonOp::Gt | ComparisonOp::Ge | ComparisonOp::Lt | ComparisonOp::Le
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ComparisonOp::In | ComparisonOp::NotIn)
    }

    pub fn is_contains(&self) -> bool {
        matches!(self, ComparisonOp::Contains | ComparisonOp::NotContains)
    }

    /// Whether the grammar admits `operand` on the right of this operator
    pub fn accepts(&self, operand: &Operand) -> bool {
        match operand {
            Operand::List(_) => self.is_list(),
            Operand::Const(value) if self.is_ordering() => value.is_number_or_string(),
            Operand::Const(value) if self.is_contains() => matches!(value, Const::String(_)),
            Operand::Const(_) => self.is_equality(),
        }
    }
}

/// Logical connectives.
///
/// `and` binds tighter than `or`; both associate to the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }

    /// Binding power; higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            LogicalOp::Or => 1,
            LogicalOp::And => 2,
        }
    }
}
