//! Expression tree definitions.
//!
//! Trees are built by the parser, evaluated once, and discarded; identifier
//! leaves are resolved at evaluation time, never during construction.

/// Binary operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

/// Unary operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `+` in prefix position; evaluates to its operand unchanged.
    Plus,
    /// `-` in prefix position; arithmetic negation.
    Minus,
    /// `!`; logical negation.
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number(i64),
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}
