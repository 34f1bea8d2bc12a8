use crate::{symbols::symbols::ScopeId, Span};

use super::{ast::Node, types::Type};

/// A function definition or an external declaration.
///
/// `scope` is the scope opened for the parameter list and body while
/// parsing; it belongs to the program's scope arena.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub parameters: Vec<ArgDecl>,
    pub return_type: Type,
    pub body: Vec<Node>,
    pub is_external: bool,
    pub is_entry_point: bool,
    pub scope: ScopeId,
    pub ty: Type,
    pub span: Span,
}

impl FunctionDecl {
    pub fn parameter_types(&self) -> Vec<Type> {
        self.parameters
            .iter()
            .map(|parameter| parameter.ty.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgDecl {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

/// `name := value` or `name : type = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub value: Box<Node>,
    pub explicit_type: Option<Type>,
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnDecl {
    pub value: Box<Node>,
    pub ty: Type,
    pub span: Span,
}
