//! Token types produced by the [`TokenReader`](super::TokenReader).

use core::fmt;

use super::flags::TokenClass;
use crate::values::{FunctionDef, Value, Variable};

/// The fixed set of binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Le,
    Ge,
    Ne,
    Eq,
    Lt,
    Gt,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    And,
    Or,
}

impl BinaryOp {
    /// Binding strength; higher binds tighter. All operators are left
    /// associative, `^` included.
    pub fn priority(self) -> u8 {
        match self {
            BinaryOp::And | BinaryOp::Or => 1,
            BinaryOp::Le
            | BinaryOp::Ge
            | BinaryOp::Ne
            | BinaryOp::Eq
            | BinaryOp::Lt
            | BinaryOp::Gt => 2,
            BinaryOp::Add | BinaryOp::Sub => 3,
            BinaryOp::Mul | BinaryOp::Div => 4,
            BinaryOp::Pow => 5,
        }
    }

    /// Canonical spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Ne => "!=",
            BinaryOp::Eq => "=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone)]
pub enum TokenKind {
    End,
    Comma,
    OpenParen,
    CloseParen,
    BinOp(BinaryOp),
    Var(Variable),
    /// Numeric literal, string literal or named constant.
    Val(Value),
    Func(FunctionDef),
    PostfixOp(FunctionDef),
    InfixOp(FunctionDef),
}

/// One lexical unit of a formula.
#[derive(Debug, Clone)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// The formula text the token was read from.
    pub text: &'src str,
    /// Byte offset of `text` in the formula.
    pub pos: usize,
}

impl Token<'_> {
    pub fn class(&self) -> TokenClass {
        match &self.kind {
            TokenKind::End => TokenClass::End,
            TokenKind::Comma => TokenClass::Comma,
            TokenKind::OpenParen => TokenClass::OpenParen,
            TokenKind::CloseParen => TokenClass::CloseParen,
            TokenKind::BinOp(_) => TokenClass::BinaryOp,
            TokenKind::Var(_) => TokenClass::Variable,
            TokenKind::Val(Value::Str(_)) => TokenClass::String,
            TokenKind::Val(_) => TokenClass::Value,
            TokenKind::Func(_) => TokenClass::Function,
            TokenKind::PostfixOp(_) => TokenClass::PostfixOp,
            TokenKind::InfixOp(_) => TokenClass::InfixOp,
        }
    }

    /// The literal payload.
    ///
    /// # Panics
    ///
    /// Panics if the token is not a value token.
    pub fn value(&self) -> &Value {
        match &self.kind {
            TokenKind::Val(value) => value,
            other => panic!("value() called on {other:?} token"),
        }
    }

    /// The binary operator payload.
    ///
    /// # Panics
    ///
    /// Panics if the token is not a binary operator.
    pub fn binary_op(&self) -> BinaryOp {
        match &self.kind {
            TokenKind::BinOp(op) => *op,
            other => panic!("binary_op() called on {other:?} token"),
        }
    }

    /// The callback of a function or unary operator token.
    ///
    /// # Panics
    ///
    /// Panics for tokens that carry no callback.
    pub fn function(&self) -> &FunctionDef {
        match &self.kind {
            TokenKind::Func(def) | TokenKind::PostfixOp(def) | TokenKind::InfixOp(def) => def,
            other => panic!("function() called on {other:?} token"),
        }
    }
}
