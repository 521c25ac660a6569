//! Parser for the transform expression language.
//!
//! Recursive descent with one precedence level per method, lowest first:
//! ternary, `||`, `&&`, equality, comparison, additive, multiplicative,
//! unary, postfix (field access, indexing, calls), primary.

use serde_json::{Number, Value};

use super::ast::{Expression, Operator, UnaryOperator};
use super::lexer::{tokenize, Token};
use crate::error::{MapError, MapResult};

/// Upper bound on expression nesting. Rule expressions are one-liners;
/// anything deeper is a generated pathology, rejected at parse time so rule
/// compilation can never exhaust the stack.
const MAX_EXPRESSION_DEPTH: u32 = 64;

/// Parse an expression string into an AST.
///
/// # Errors
///
/// Returns `MapError::ExpressionSyntax` carrying the offending expression
/// text and a reason.
pub fn parse_expression(input: &str) -> MapResult<Expression> {
    let syntax_error = |reason: String| MapError::ExpressionSyntax {
        expression: input.to_string(),
        reason,
    };

    let tokens = tokenize(input).map_err(&syntax_error)?;
    if tokens.is_empty() {
        return Err(syntax_error("empty expression".to_string()));
    }

    let mut parser = ExprParser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.ternary().map_err(&syntax_error)?;
    if parser.pos != parser.tokens.len() {
        return Err(syntax_error(format!(
            "unexpected token {:?} after end of expression",
            parser.tokens[parser.pos]
        )));
    }
    Ok(expr)
}

struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
    depth: u32,
}

impl ExprParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> Result<(), String> {
        if self.eat(&token) {
            Ok(())
        } else {
            Err(match self.peek() {
                Some(found) => format!("expected {:?}, found {:?}", token, found),
                None => format!("expected {:?}, found end of expression", token),
            })
        }
    }

    /// Bumps the nesting depth around a recursive entry point. `ternary` and
    /// `unary` are the only methods that recurse, so guarding them bounds the
    /// whole parse.
    fn enter(&mut self) -> Result<(), String> {
        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(format!(
                "expression nesting exceeds {} levels",
                MAX_EXPRESSION_DEPTH
            ));
        }
        Ok(())
    }

    fn ternary(&mut self) -> Result<Expression, String> {
        self.enter()?;
        let result = self.ternary_expr();
        self.depth -= 1;
        result
    }

    fn ternary_expr(&mut self) -> Result<Expression, String> {
        let condition = self.or_expr()?;
        if self.eat(&Token::Question) {
            let then_branch = self.ternary()?;
            self.expect(Token::Colon)?;
            let else_branch = self.ternary()?;
            return Ok(Expression::Conditional {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            });
        }
        Ok(condition)
    }

    fn or_expr(&mut self) -> Result<Expression, String> {
        let mut left = self.and_expr()?;
        while self.eat(&Token::OrOr) {
            let right = self.and_expr()?;
            left = binary(left, Operator::Or, right);
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Expression, String> {
        let mut left = self.equality()?;
        while self.eat(&Token::AndAnd) {
            let right = self.equality()?;
            left = binary(left, Operator::And, right);
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expression, String> {
        let mut left = self.comparison()?;
        loop {
            let operator = match self.peek() {
                Some(Token::Eq) => Operator::Equal,
                Some(Token::NotEq) => Operator::NotEqual,
                _ => break,
            };
            self.pos += 1;
            let right = self.comparison()?;
            left = binary(left, operator, right);
        }
        Ok(left)
    }

    fn comparison(&mut self) -> Result<Expression, String> {
        let mut left = self.additive()?;
        loop {
            let operator = match self.peek() {
                Some(Token::Lt) => Operator::LessThan,
                Some(Token::LtEq) => Operator::LessThanOrEqual,
                Some(Token::Gt) => Operator::GreaterThan,
                Some(Token::GtEq) => Operator::GreaterThanOrEqual,
                _ => break,
            };
            self.pos += 1;
            let right = self.additive()?;
            left = binary(left, operator, right);
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<Expression, String> {
        let mut left = self.multiplicative()?;
        loop {
            let operator = match self.peek() {
                Some(Token::Plus) => Operator::Add,
                Some(Token::Minus) => Operator::Subtract,
                _ => break,
            };
            self.pos += 1;
            let right = self.multiplicative()?;
            left = binary(left, operator, right);
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<Expression, String> {
        let mut left = self.unary()?;
        loop {
            let operator = match self.peek() {
                Some(Token::Star) => Operator::Multiply,
                Some(Token::Slash) => Operator::Divide,
                Some(Token::Percent) => Operator::Modulo,
                _ => break,
            };
            self.pos += 1;
            let right = self.unary()?;
            left = binary(left, operator, right);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expression, String> {
        self.enter()?;
        let result = self.unary_expr();
        self.depth -= 1;
        result
    }

    fn unary_expr(&mut self) -> Result<Expression, String> {
        if self.eat(&Token::Bang) {
            let expr = self.unary()?;
            return Ok(Expression::UnaryOp {
                operator: UnaryOperator::Not,
                expr: Box::new(expr),
            });
        }
        if self.eat(&Token::Minus) {
            let expr = self.unary()?;
            return Ok(Expression::UnaryOp {
                operator: UnaryOperator::Negate,
                expr: Box::new(expr),
            });
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expression, String> {
        let mut expr = self.primary()?;
        loop {
            if self.eat(&Token::Dot) {
                match self.advance() {
                    Some(Token::Ident(field)) => {
                        expr = Expression::FieldAccess {
                            object: Box::new(expr),
                            field,
                        };
                    }
                    other => {
                        return Err(format!("expected field name after '.', found {:?}", other))
                    }
                }
            } else if self.eat(&Token::LBracket) {
                let index = self.ternary()?;
                self.expect(Token::RBracket)?;
                expr = Expression::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expression, String> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expression::Literal(number_literal(n))),
            Some(Token::Str(s)) => Ok(Expression::Literal(Value::String(s))),
            Some(Token::Ident(name)) => match name.as_str() {
                "true" => Ok(Expression::Literal(Value::Bool(true))),
                "false" => Ok(Expression::Literal(Value::Bool(false))),
                "null" => Ok(Expression::Literal(Value::Null)),
                _ => {
                    if self.eat(&Token::LParen) {
                        let mut args = Vec::new();
                        if !self.eat(&Token::RParen) {
                            loop {
                                args.push(self.ternary()?);
                                if self.eat(&Token::Comma) {
                                    continue;
                                }
                                self.expect(Token::RParen)?;
                                break;
                            }
                        }
                        Ok(Expression::FunctionCall { name, args })
                    } else {
                        Ok(Expression::Variable(name))
                    }
                }
            },
            Some(Token::LParen) => {
                let expr = self.ternary()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Some(other) => Err(format!("unexpected token {:?}", other)),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}

fn binary(left: Expression, operator: Operator, right: Expression) -> Expression {
    Expression::BinaryOp {
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }
}

/// Integral literals stay integers so arithmetic on whole numbers does not
/// serialize with a trailing `.0`.
fn number_literal(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_precedence() {
        let expr = parse_expression("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            binary(
                Expression::Literal(json!(1)),
                Operator::Add,
                binary(
                    Expression::Literal(json!(2)),
                    Operator::Multiply,
                    Expression::Literal(json!(3)),
                ),
            )
        );
    }

    #[test]
    fn test_parse_ternary() {
        let expr = parse_expression("value ? 'yes' : 'no'").unwrap();
        assert!(matches!(expr, Expression::Conditional { .. }));
    }

    #[test]
    fn test_parse_nested_ternary_is_right_associative() {
        let expr = parse_expression("a ? 1 : b ? 2 : 3").unwrap();
        let Expression::Conditional { else_branch, .. } = expr else {
            panic!("expected conditional");
        };
        assert!(matches!(*else_branch, Expression::Conditional { .. }));
    }

    #[test]
    fn test_parse_call_with_postfix_index() {
        let expr = parse_expression("split(value, ' ')[0]").unwrap();
        let Expression::Index { object, index } = expr else {
            panic!("expected index");
        };
        assert_eq!(*index, Expression::Literal(json!(0)));
        assert!(matches!(*object, Expression::FunctionCall { .. }));
    }

    #[test]
    fn test_parse_field_access_chain() {
        let expr = parse_expression("source.manager.email").unwrap();
        let Expression::FieldAccess { object, field } = expr else {
            panic!("expected field access");
        };
        assert_eq!(field, "email");
        assert!(matches!(*object, Expression::FieldAccess { .. }));
    }

    #[test]
    fn test_parse_rejects_syntax_errors() {
        for bad in ["", "1 +", "value ? 1", "f(1,", "(1", "a.[0]", "1 2"] {
            assert!(
                matches!(
                    parse_expression(bad),
                    Err(MapError::ExpressionSyntax { .. })
                ),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_bounds_nesting_depth() {
        // Pathological nesting is rejected at parse time instead of
        // recursing without bound.
        let deep = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
        assert!(matches!(
            parse_expression(&deep),
            Err(MapError::ExpressionSyntax { .. })
        ));

        let acceptable = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        assert!(parse_expression(&acceptable).is_ok());
    }

    #[test]
    fn test_parse_keyword_literals() {
        assert_eq!(
            parse_expression("true").unwrap(),
            Expression::Literal(Value::Bool(true))
        );
        assert_eq!(
            parse_expression("null").unwrap(),
            Expression::Literal(Value::Null)
        );
    }
}
