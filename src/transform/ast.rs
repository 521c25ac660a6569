//! Abstract syntax tree for the transform expression language.

use serde_json::Value;

/// A parsed transform expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal value (number, string, boolean, null).
    Literal(Value),

    /// A variable reference (`value` or `source`).
    Variable(String),

    /// Field access on an object (`source.department`).
    FieldAccess {
        object: Box<Expression>,
        field: String,
    },

    /// Bracket indexing into an array or string (`split(value, " ")[0]`).
    Index {
        object: Box<Expression>,
        index: Box<Expression>,
    },

    /// A binary operation.
    BinaryOp {
        left: Box<Expression>,
        operator: Operator,
        right: Box<Expression>,
    },

    /// A unary operation.
    UnaryOp {
        operator: UnaryOperator,
        expr: Box<Expression>,
    },

    /// A call to a built-in function (`Boolean(value)`).
    FunctionCall { name: String, args: Vec<Expression> },

    /// A ternary conditional (`cond ? a : b`).
    Conditional {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },
}

/// Binary operators, lowest to highest precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Or,
    And,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Not,
}
