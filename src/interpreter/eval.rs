//! Expression-tree evaluation.
//!
//! Identifier leaves go through the supplied resolver callback at
//! evaluation time. `&&` and `||` genuinely short-circuit: when the first
//! operand decides the outcome, the second operand is never evaluated and
//! its identifiers are never resolved.

use crate::ast::{BinOp, Expr, UnaryOp};
use crate::error::EvalError;
use crate::parser;

use super::value::Value;

/// Parse and evaluate an expression substring in one step.
///
/// The resolver embodies the active binding set, the lexical context and
/// the resolution mode; returning `None` for a leaf is a terminal
/// resolution failure for this evaluation.
pub fn evaluate<R>(text: &str, resolver: &mut R) -> Result<Value, EvalError>
where
    R: FnMut(&str) -> Option<Value>,
{
    let expr = parser::parse(text)?;
    expr.eval(resolver)
}

impl Expr {
    pub fn eval<R>(&self, resolver: &mut R) -> Result<Value, EvalError>
    where
        R: FnMut(&str) -> Option<Value>,
    {
        match self {
            Expr::Number(value) => Ok(Value::Int(*value)),
            Expr::Ident(name) => {
                resolver(name).ok_or_else(|| EvalError::Unresolved(name.clone()))
            }
            Expr::Unary { op, operand } => {
                let value = operand.eval(resolver)?;
                Ok(match op {
                    UnaryOp::Plus => value,
                    UnaryOp::Minus => Value::Int(-value.as_int()),
                    UnaryOp::Not => Value::Bool(!value.truthy()),
                })
            }
            Expr::Binary {
                op: BinOp::And,
                left,
                right,
            } => {
                let first = left.eval(resolver)?;
                if first.truthy() {
                    right.eval(resolver)
                } else {
                    Ok(first)
                }
            }
            Expr::Binary {
                op: BinOp::Or,
                left,
                right,
            } => {
                let first = left.eval(resolver)?;
                if first.truthy() {
                    Ok(first)
                } else {
                    right.eval(resolver)
                }
            }
            Expr::Binary { op, left, right } => {
                let lhs = left.eval(resolver)?.as_int();
                let rhs = right.eval(resolver)?.as_int();
                Ok(match op {
                    BinOp::Add => Value::Int(lhs + rhs),
                    BinOp::Sub => Value::Int(lhs - rhs),
                    BinOp::Mul => Value::Int(lhs * rhs),
                    BinOp::Lt => Value::Bool(lhs < rhs),
                    BinOp::Le => Value::Bool(lhs <= rhs),
                    BinOp::Gt => Value::Bool(lhs > rhs),
                    BinOp::Ge => Value::Bool(lhs >= rhs),
                    BinOp::Eq => Value::Bool(lhs == rhs),
                    BinOp::Ne => Value::Bool(lhs != rhs),
                    BinOp::And | BinOp::Or => unreachable!("handled by the short-circuit arms"),
                })
            }
        }
    }
}
