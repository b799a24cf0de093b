//! Infix-to-tree expression parsing via the shunting-yard algorithm.
//!
//! The operator stack pops only while the stacked operator binds *strictly*
//! tighter than the incoming one. Equal-precedence operators are never
//! popped, which makes same-precedence chains group right-associatively:
//! `10 - 3 - 2` parses as `10 - (3 - 2)` and evaluates to 9, not 5. This is
//! a reproduced property of the language, kept as-is rather than "fixed" to
//! conventional left-associativity.

use crate::ast::{BinOp, Expr, UnaryOp};
use crate::error::ParseError;
use crate::lexer::{tokenize, Op, Token};

/// Parse an expression substring into a tree.
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(text)?;
    let mut postfix = to_postfix(tokens)?;
    let expr = build_tree(&mut postfix)?;
    if !postfix.is_empty() {
        return Err(ParseError::new("dangling operand"));
    }
    Ok(expr)
}

/// Convert an infix token stream to postfix order.
fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) | Token::Ident(_) => output.push(token),
            Token::LParen => operators.push(token),
            Token::RParen => loop {
                match operators.pop() {
                    Some(Token::LParen) => break,
                    Some(op) => output.push(op),
                    None => return Err(ParseError::new("unbalanced parentheses")),
                }
            },
            Token::Op(incoming) => {
                while let Some(&Token::Op(top)) = operators.last() {
                    if top.precedence() < incoming.precedence() {
                        let popped = operators.pop().expect("stack top was just inspected");
                        output.push(popped);
                    } else {
                        break;
                    }
                }
                operators.push(Token::Op(incoming));
            }
        }
    }

    while let Some(op) = operators.pop() {
        if matches!(op, Token::LParen) {
            return Err(ParseError::new("unbalanced parentheses"));
        }
        output.push(op);
    }

    Ok(output)
}

/// Consume the postfix output back-to-front as a stack machine. The first
/// operand recursively built for a binary operator is its right operand,
/// the second its left; the order is observable for `-` and comparisons.
fn build_tree(postfix: &mut Vec<Token>) -> Result<Expr, ParseError> {
    match postfix.pop() {
        None => Err(ParseError::new("empty operand")),
        Some(Token::Number(value)) => Ok(Expr::Number(value)),
        Some(Token::Ident(name)) => Ok(Expr::Ident(name)),
        Some(Token::Op(op)) if op.is_unary() => {
            let operand = Box::new(build_tree(postfix)?);
            let op = match op {
                Op::UnaryPlus => UnaryOp::Plus,
                Op::UnaryMinus => UnaryOp::Minus,
                Op::Not => UnaryOp::Not,
                _ => unreachable!("is_unary covers exactly these"),
            };
            Ok(Expr::Unary { op, operand })
        }
        Some(Token::Op(op)) => {
            let right = Box::new(build_tree(postfix)?);
            let left = Box::new(build_tree(postfix)?);
            let op = match op {
                Op::Add => BinOp::Add,
                Op::Sub => BinOp::Sub,
                Op::Mul => BinOp::Mul,
                Op::Lt => BinOp::Lt,
                Op::Le => BinOp::Le,
                Op::Gt => BinOp::Gt,
                Op::Ge => BinOp::Ge,
                Op::Eq => BinOp::Eq,
                Op::Ne => BinOp::Ne,
                Op::And => BinOp::And,
                Op::Or => BinOp::Or,
                Op::Not | Op::UnaryPlus | Op::UnaryMinus => {
                    unreachable!("unary operators handled above")
                }
            };
            Ok(Expr::Binary { op, left, right })
        }
        Some(Token::LParen) | Some(Token::RParen) => {
            Err(ParseError::new("unbalanced parentheses"))
        }
    }
}
