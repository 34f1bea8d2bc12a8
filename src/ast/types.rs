//! Semantic types attached to every AST node.
//!
//! Types are compared structurally: two types are equal when they carry the
//! same tag and the same canonical name.

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// Placeholder for anything resolution could not determine
    Unresolved,
    Void,
    Function(FunctionType),
    Int32,
    Int32Pointer,
    Int8,
    Int8Pointer,
    StringLiteral,
    UserDefined(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub parameters: Vec<Type>,
    pub return_type: Box<Type>,
}

impl Type {
    pub fn function(parameters: Vec<Type>, return_type: Type) -> Self {
        Type::Function(FunctionType {
            parameters,
            return_type: Box::new(return_type),
        })
    }

    /// Canonical name, as written in source where a spelling exists.
    pub fn name(&self) -> String {
        match self {
            Type::Unresolved => String::from("unresolved"),
            Type::Void => String::from("void"),
            Type::Function(function) => {
                let parameters = function
                    .parameters
                    .iter()
                    .map(|parameter| parameter.name())
                    .collect::<Vec<String>>()
                    .join(", ");
                format!("fn({}) -> {}", parameters, function.return_type.name())
            }
            Type::Int32 => String::from("i32"),
            Type::Int32Pointer => String::from("*i32"),
            Type::Int8 => String::from("i8"),
            Type::Int8Pointer => String::from("*i8"),
            Type::StringLiteral => String::from("string"),
            Type::UserDefined(name) => name.clone(),
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Type::Unresolved)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Int32 | Type::Int8)
    }

    /// The pointer type whose pointee is `self`, if the language has one.
    pub fn pointer_to(&self) -> Option<Type> {
        match self {
            Type::Int32 => Some(Type::Int32Pointer),
            Type::Int8 => Some(Type::Int8Pointer),
            _ => None,
        }
    }

    /// Whether a value of type `other` may be used where `self` is expected.
    ///
    /// String literals are byte pointers, so they satisfy `*i8`. Unresolved
    /// types are compatible with everything; they have already been reported.
    pub fn accepts(&self, other: &Type) -> bool {
        if self.is_unresolved() || other.is_unresolved() {
            return true;
        }

        matches!(
            (self, other),
            (Type::Int8Pointer, Type::StringLiteral) | (Type::StringLiteral, Type::Int8Pointer)
        ) || self == other
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
