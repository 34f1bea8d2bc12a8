use std::fmt::Display;

use crate::{symbols::symbols::SymbolTable, Span};

use super::{
    expressions::{BinaryOp, Call, Identifier, IntLiteral, StringLiteral},
    statements::{ArgDecl, FunctionDecl, ReturnDecl, VarDecl},
    types::Type,
};

/// Every kind of node the parser can produce.
///
/// Passes match on this exhaustively, so adding a variant forces each pass
/// to decide how to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    FunctionDecl(FunctionDecl),
    ArgDecl(ArgDecl),
    VarDecl(VarDecl),
    ReturnDecl(ReturnDecl),
    BinaryOp(BinaryOp),
    Identifier(Identifier),
    IntLiteral(IntLiteral),
    StringLiteral(StringLiteral),
    Call(Call),
}

impl Node {
    pub fn get_type(&self) -> &Type {
        match self {
            Node::FunctionDecl(node) => &node.ty,
            Node::ArgDecl(node) => &node.ty,
            Node::VarDecl(node) => &node.ty,
            Node::ReturnDecl(node) => &node.ty,
            Node::BinaryOp(node) => &node.ty,
            Node::Identifier(node) => &node.ty,
            Node::IntLiteral(node) => &node.ty,
            Node::StringLiteral(node) => &node.ty,
            Node::Call(node) => &node.ty,
        }
    }

    pub fn get_span(&self) -> &Span {
        match self {
            Node::FunctionDecl(node) => &node.span,
            Node::ArgDecl(node) => &node.span,
            Node::VarDecl(node) => &node.span,
            Node::ReturnDecl(node) => &node.span,
            Node::BinaryOp(node) => &node.span,
            Node::Identifier(node) => &node.span,
            Node::IntLiteral(node) => &node.span,
            Node::StringLiteral(node) => &node.span,
            Node::Call(node) => &node.span,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::FunctionDecl(_) => "FunctionDecl",
            Node::ArgDecl(_) => "ArgDecl",
            Node::VarDecl(_) => "VarDecl",
            Node::ReturnDecl(_) => "ReturnDecl",
            Node::BinaryOp(_) => "BinaryOp",
            Node::Identifier(_) => "Identifier",
            Node::IntLiteral(_) => "IntLiteral",
            Node::StringLiteral(_) => "StringLiteral",
            Node::Call(_) => "Call",
        }
    }
}

/// Compact source-like rendering; binary operations are fully parenthesized.
impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::FunctionDecl(function) => {
                let parameters = function
                    .parameters
                    .iter()
                    .map(|parameter| format!("{} {}", parameter.name, parameter.ty))
                    .collect::<Vec<String>>()
                    .join(", ");
                if function.is_external {
                    write!(f, "extern ")?;
                }
                write!(
                    f,
                    "fn {}({}) -> {}",
                    function.name, parameters, function.return_type
                )?;
                if !function.is_external {
                    write!(f, " {{")?;
                    for node in function.body.iter() {
                        write!(f, " {}", node)?;
                    }
                    write!(f, " }}")?;
                }
                Ok(())
            }
            Node::ArgDecl(arg) => write!(f, "{} {}", arg.name, arg.ty),
            Node::VarDecl(var) => match &var.explicit_type {
                Some(explicit_type) => {
                    write!(f, "{} : {} = {}", var.name, explicit_type, var.value)
                }
                None => write!(f, "{} := {}", var.name, var.value),
            },
            Node::ReturnDecl(ret) => write!(f, "ret {}", ret.value),
            Node::BinaryOp(binary) => {
                write!(f, "({} {} {})", binary.left, binary.operator, binary.right)
            }
            Node::Identifier(identifier) => write!(f, "{}", identifier.name),
            Node::IntLiteral(literal) => write!(f, "{}", literal.value),
            Node::StringLiteral(literal) => write!(f, "\"{}\"", literal.value.escape_ascii()),
            Node::Call(call) => {
                let arguments = call
                    .arguments
                    .iter()
                    .map(|argument| argument.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "{}({})", call.callee, arguments)
            }
        }
    }
}

/// The parsed program: top-level declarations plus the scope arena that
/// their `FunctionDecl::scope` ids point into.
#[derive(Debug, Clone)]
pub struct Program {
    pub nodes: Vec<Node>,
    pub scopes: SymbolTable<Type>,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.nodes.iter().filter_map(|node| match node {
            Node::FunctionDecl(function) => Some(function),
            _ => None,
        })
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions().find(|function| function.name == name)
    }
}
