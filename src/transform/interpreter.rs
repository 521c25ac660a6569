//! Interpreter for the transform expression language.
//!
//! Evaluates an AST against the bindings supplied by the mapping engine.
//! Evaluation is pure value computation: the only reachable state is the
//! variable map and the built-in function registry, and every recursive step
//! draws down a fixed budget so a pathological expression fails instead of
//! hanging the transform call.

use std::collections::HashMap;

use serde_json::{Number, Value};

use super::ast::{Expression, Operator, UnaryOperator};
use super::builtins::{builtin_functions, stringify_scalar, TransformFunction};
use crate::error::{MapError, MapResult};

/// Budget of AST-node visits for one evaluation.
const STEP_BUDGET: u32 = 4096;

/// Interpreter for transform expressions.
pub struct Interpreter {
    /// Variables in scope for the expression.
    variables: HashMap<String, Value>,

    /// Built-in functions.
    functions: HashMap<String, TransformFunction>,

    /// Remaining evaluation steps.
    steps: u32,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self {
            variables: HashMap::new(),
            functions: builtin_functions(),
            steps: STEP_BUDGET,
        }
    }
}

impl Interpreter {
    /// Creates a new interpreter with no variables bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new interpreter with the given variables.
    pub fn with_variables(variables: HashMap<String, Value>) -> Self {
        let mut interpreter = Self::new();
        interpreter.variables = variables;
        interpreter
    }

    /// Creates an interpreter with the engine's two standard bindings.
    pub fn with_bindings(value: &Value, source: &Value) -> Self {
        let mut variables = HashMap::new();
        variables.insert("value".to_string(), value.clone());
        variables.insert("source".to_string(), source.clone());
        Self::with_variables(variables)
    }

    /// Evaluates an expression.
    pub fn evaluate(&mut self, expr: &Expression) -> MapResult<Value> {
        if self.steps == 0 {
            return Err(MapError::evaluation("expression step budget exhausted"));
        }
        self.steps -= 1;

        match expr {
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Variable(name) => self.evaluate_variable(name),
            Expression::FieldAccess { object, field } => self.evaluate_field_access(object, field),
            Expression::Index { object, index } => self.evaluate_index(object, index),
            Expression::BinaryOp {
                left,
                operator,
                right,
            } => self.evaluate_binary_op(left, operator, right),
            Expression::UnaryOp { operator, expr } => self.evaluate_unary_op(operator, expr),
            Expression::FunctionCall { name, args } => self.evaluate_function_call(name, args),
            Expression::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                let cond = self.evaluate(condition)?;
                if truthy(&cond) {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            }
        }
    }

    /// Evaluates a variable reference.
    fn evaluate_variable(&self, name: &str) -> MapResult<Value> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| MapError::evaluation(format!("Variable not found: {}", name)))
    }

    /// Evaluates field access expressions (`object.field`). A missing field
    /// on an object resolves to null so defaulting idioms like
    /// `source.middle || ''` work.
    fn evaluate_field_access(&mut self, object: &Expression, field: &str) -> MapResult<Value> {
        let obj = self.evaluate(object)?;
        match obj {
            Value::Object(map) => Ok(map.get(field).cloned().unwrap_or(Value::Null)),
            other => Err(MapError::evaluation(format!(
                "Cannot access field '{}' on non-object value {}",
                field, other
            ))),
        }
    }

    /// Evaluates bracket indexing into arrays and strings. Out-of-range
    /// indices resolve to null, matching the miss-tolerant field access.
    fn evaluate_index(&mut self, object: &Expression, index: &Expression) -> MapResult<Value> {
        let obj = self.evaluate(object)?;
        let idx = self.evaluate(index)?;

        if let (Value::Object(map), Value::String(key)) = (&obj, &idx) {
            return Ok(map.get(key).cloned().unwrap_or(Value::Null));
        }

        let position = idx.as_f64().ok_or_else(|| {
            MapError::evaluation(format!("Index must be a number, found {}", idx))
        })?;
        if position < 0.0 || position.fract() != 0.0 {
            return Err(MapError::evaluation(format!(
                "Index must be a non-negative integer, found {}",
                position
            )));
        }
        let position = position as usize;
        match &obj {
            Value::Array(items) => Ok(items.get(position).cloned().unwrap_or(Value::Null)),
            Value::String(s) => Ok(s
                .chars()
                .nth(position)
                .map(|c| Value::String(c.to_string()))
                .unwrap_or(Value::Null)),
            other => Err(MapError::evaluation(format!(
                "Cannot index into value {}",
                other
            ))),
        }
    }

    /// Evaluates function calls against the builtin registry.
    fn evaluate_function_call(&mut self, name: &str, args: &[Expression]) -> MapResult<Value> {
        let mut evaluated_args = Vec::new();
        for arg in args {
            evaluated_args.push(self.evaluate(arg)?);
        }

        if let Some(func) = self.functions.get(name) {
            func(evaluated_args).map_err(MapError::Evaluation)
        } else {
            Err(MapError::evaluation(format!(
                "Function not found: {}",
                name
            )))
        }
    }

    /// Evaluates binary operations. `&&` and `||` short-circuit and return
    /// the deciding operand, the way the source system's rule authors expect.
    fn evaluate_binary_op(
        &mut self,
        left: &Expression,
        operator: &Operator,
        right: &Expression,
    ) -> MapResult<Value> {
        match operator {
            Operator::And => {
                let left_val = self.evaluate(left)?;
                if !truthy(&left_val) {
                    return Ok(left_val);
                }
                return self.evaluate(right);
            }
            Operator::Or => {
                let left_val = self.evaluate(left)?;
                if truthy(&left_val) {
                    return Ok(left_val);
                }
                return self.evaluate(right);
            }
            _ => {}
        }

        let left_val = self.evaluate(left)?;
        let right_val = self.evaluate(right)?;

        match operator {
            Operator::Add => add(&left_val, &right_val),
            Operator::Subtract => arithmetic(&left_val, &right_val, "subtract", |a, b| a - b),
            Operator::Multiply => arithmetic(&left_val, &right_val, "multiply", |a, b| a * b),
            Operator::Divide => {
                if right_val.as_f64() == Some(0.0) {
                    return Err(MapError::evaluation("Division by zero"));
                }
                arithmetic(&left_val, &right_val, "divide", |a, b| a / b)
            }
            Operator::Modulo => {
                if right_val.as_f64() == Some(0.0) {
                    return Err(MapError::evaluation("Division by zero"));
                }
                arithmetic(&left_val, &right_val, "take remainder of", |a, b| a % b)
            }
            Operator::Equal => Ok(Value::Bool(values_equal(&left_val, &right_val))),
            Operator::NotEqual => Ok(Value::Bool(!values_equal(&left_val, &right_val))),
            Operator::LessThan => compare(&left_val, &right_val, |o| o.is_lt()),
            Operator::LessThanOrEqual => compare(&left_val, &right_val, |o| o.is_le()),
            Operator::GreaterThan => compare(&left_val, &right_val, |o| o.is_gt()),
            Operator::GreaterThanOrEqual => compare(&left_val, &right_val, |o| o.is_ge()),
            Operator::And | Operator::Or => unreachable!(),
        }
    }

    /// Evaluates unary operations.
    fn evaluate_unary_op(&mut self, operator: &UnaryOperator, expr: &Expression) -> MapResult<Value> {
        let val = self.evaluate(expr)?;
        match operator {
            UnaryOperator::Not => Ok(Value::Bool(!truthy(&val))),
            UnaryOperator::Negate => {
                let n = val.as_f64().ok_or_else(|| {
                    MapError::evaluation(format!("Cannot negate non-numeric value {}", val))
                })?;
                number_value(-n)
            }
        }
    }
}

/// Truthiness used by boolean coercion, conditionals, and logical operators:
/// null, false, zero, and the empty string are falsy; everything else,
/// including empty arrays and objects, is truthy.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Builds a JSON number, keeping integral results integral.
pub(crate) fn number_value(n: f64) -> MapResult<Value> {
    if !n.is_finite() {
        return Err(MapError::evaluation(format!(
            "Arithmetic produced a non-finite number: {}",
            n
        )));
    }
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Ok(Value::from(n as i64))
    } else {
        Number::from_f64(n)
            .map(Value::Number)
            .ok_or_else(|| MapError::evaluation("Arithmetic produced an unrepresentable number"))
    }
}

/// Numbers compare in their integer representations where both sides have
/// one; ids above 2^53 would lose precision through f64.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
                x == y
            } else {
                a.as_f64().zip(b.as_f64()).is_some_and(|(x, y)| x == y)
            }
        }
        _ => left == right,
    }
}

fn add(left: &Value, right: &Value) -> MapResult<Value> {
    if let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) {
        return number_value(a + b);
    }
    // String on either side concatenates, scalar operands only.
    if left.is_string() || right.is_string() {
        let a = stringify_scalar(left).ok_or_else(|| {
            MapError::evaluation(format!("Cannot concatenate non-scalar value {}", left))
        })?;
        let b = stringify_scalar(right).ok_or_else(|| {
            MapError::evaluation(format!("Cannot concatenate non-scalar value {}", right))
        })?;
        return Ok(Value::String(format!("{}{}", a, b)));
    }
    Err(MapError::evaluation(format!(
        "Cannot add values {} and {}",
        left, right
    )))
}

fn arithmetic(
    left: &Value,
    right: &Value,
    verb: &str,
    op: fn(f64, f64) -> f64,
) -> MapResult<Value> {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => number_value(op(a, b)),
        _ => Err(MapError::evaluation(format!(
            "Cannot {} non-numeric values {} and {}",
            verb, left, right
        ))),
    }
}

fn compare(
    left: &Value,
    right: &Value,
    check: fn(std::cmp::Ordering) -> bool,
) -> MapResult<Value> {
    let ordering = match (left, right) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).ok_or_else(|| {
                MapError::evaluation("Cannot compare non-ordered numbers")
            })?,
            _ => {
                return Err(MapError::evaluation(format!(
                    "Cannot compare values {} and {}",
                    left, right
                )))
            }
        },
    };
    Ok(Value::Bool(check(ordering)))
}
