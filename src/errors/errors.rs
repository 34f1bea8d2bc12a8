use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// Number of diagnostics after which a pass stops collecting and gives up.
pub const MAX_DIAGNOSTICS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::FunctionNotDeclared { .. } => "FunctionNotDeclared",
            ErrorImpl::NotAFunction { .. } => "NotAFunction",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::UnsupportedOperand { .. } => "UnsupportedOperand",
            ErrorImpl::InvalidDeclarationType { .. } => "InvalidDeclarationType",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::UnreachableCode => "UnreachableCode",
            ErrorImpl::UnregisteredFunction { .. } => "UnregisteredFunction",
            ErrorImpl::UnboundVariable { .. } => "UnboundVariable",
            ErrorImpl::UnmappableType { .. } => "UnmappableType",
            ErrorImpl::BackendError { .. } => "BackendError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::VariableAlreadyDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` already declared", variable))
            }
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            ErrorImpl::FunctionNotDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` not declared", function))
            }
            ErrorImpl::NotAFunction { name, type_ } => ErrorTip::Suggestion(format!(
                "`{}` has type `{}` and cannot be called",
                name, type_
            )),
            ErrorImpl::UnexpectedArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::ArgumentTypeMatchError { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected argument type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::UnsupportedOperand { operator, type_ } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to `{}`",
                operator, type_
            )),
            ErrorImpl::InvalidDeclarationType { variable, type_ } => ErrorTip::Suggestion(
                format!("Variable `{}` cannot have type `{}`", variable, type_),
            ),
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::MissingReturn { function } => ErrorTip::Suggestion(format!(
                "Function `{}` must end with `ret`",
                function
            )),
            ErrorImpl::UnreachableCode => {
                ErrorTip::Suggestion(String::from("Nothing may follow `ret` in a function body"))
            }
            ErrorImpl::UnregisteredFunction { .. }
            | ErrorImpl::UnboundVariable { .. }
            | ErrorImpl::UnmappableType { .. } => ErrorTip::Suggestion(String::from(
                "This is a compiler bug: the checked program could not be lowered",
            )),
            ErrorImpl::BackendError { message } => {
                ErrorTip::Suggestion(format!("LLVM rejected the generated code: {}", message))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("function {function:?} already declared")]
    FunctionAlreadyDeclared { function: String },
    #[error("function {function:?} not declared")]
    FunctionNotDeclared { function: String },
    #[error("{name:?} of type {type_} is not a function")]
    NotAFunction { name: String, type_: String },
    #[error("unexpected arguments: expected {expected:?}, received {received:?}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("missing arguments: expected {expected:?}, received {received:?}")]
    MissingArguments { expected: usize, received: usize },
    #[error("argument types do not match: expected {expected:?}, received {received:?}")]
    ArgumentTypeMatchError { expected: String, received: String },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMatchError { expected: String, received: String },
    #[error("operator {operator:?} cannot be applied to {type_}")]
    UnsupportedOperand { operator: String, type_: String },
    #[error("variable {variable:?} cannot be declared with type {type_}")]
    InvalidDeclarationType { variable: String, type_: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("function {function:?} does not end with a return")]
    MissingReturn { function: String },
    #[error("unreachable code after return")]
    UnreachableCode,
    #[error("function {function:?} was never registered with the module")]
    UnregisteredFunction { function: String },
    #[error("variable {variable:?} has no storage slot")]
    UnboundVariable { variable: String },
    #[error("type {type_} has no backend representation")]
    UnmappableType { type_: String },
    #[error("backend error: {message}")]
    BackendError { message: String },
}

/// Failure of a whole compile.
///
/// Syntax errors and lowering inconsistencies stop the pipeline on their own;
/// semantic diagnostics are collected and reported together. A syntax error
/// keeps the diagnostics collected before it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("syntax error at {error}")]
    Syntax {
        error: Error,
        diagnostics: Vec<Error>,
    },
    #[error("compilation failed with {} error(s)", .0.len())]
    Diagnostics(Vec<Error>),
    #[error("compilation aborted after {} errors", .0.len())]
    DiagnosticLimit(Vec<Error>),
    #[error("internal lowering error at {0}")]
    Lowering(Error),
}

impl CompileError {
    /// Every error carried by this failure, in the order they were found.
    pub fn errors(&self) -> Vec<&Error> {
        match self {
            CompileError::Syntax { error, diagnostics } => {
                diagnostics.iter().chain(std::iter::once(error)).collect()
            }
            CompileError::Lowering(error) => vec![error],
            CompileError::Diagnostics(errors) | CompileError::DiagnosticLimit(errors) => {
                errors.iter().collect()
            }
        }
    }

    /// Attaches diagnostics found before a syntax error to it.
    pub fn with_diagnostics(self, collected: &[Error]) -> Self {
        match self {
            CompileError::Syntax { error, .. } => CompileError::Syntax {
                error,
                diagnostics: collected.to_vec(),
            },
            other => other,
        }
    }
}

impl From<Error> for CompileError {
    fn from(error: Error) -> Self {
        CompileError::Syntax {
            error,
            diagnostics: vec![],
        }
    }
}
