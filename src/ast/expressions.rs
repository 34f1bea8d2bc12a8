use std::fmt::Display;

use crate::{lexer::tokens::TokenKind, Span};

use super::{ast::Node, types::Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(BinaryOperator::Add),
            TokenKind::Dash => Some(BinaryOperator::Subtract),
            TokenKind::Star => Some(BinaryOperator::Multiply),
            TokenKind::Slash => Some(BinaryOperator::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// `left op right`; typed as its left operand.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub operator: BinaryOperator,
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub ty: Type,
    pub span: Span,
}

/// A reference to a variable, parameter or function.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntLiteral {
    pub value: i32,
    pub ty: Type,
    pub span: Span,
}

/// A string literal as the bytes its escapes decode to, without a
/// terminating NUL.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: Vec<u8>,
    pub ty: Type,
    pub span: Span,
}

/// A call by name; typed as the callee's return type.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: String,
    pub arguments: Vec<Node>,
    pub ty: Type,
    pub span: Span,
}
