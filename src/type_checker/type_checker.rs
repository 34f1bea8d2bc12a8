use log::debug;

use crate::{
    ast::{ast::Node, expressions::BinaryOperator, types::Type},
    errors::errors::{CompileError, Error, ErrorImpl},
    parser::parser::Parser,
    Position,
};

/// Declares a variable or parameter in the current scope.
///
/// A name already bound in this same scope is reported and keeps its
/// original binding; a name bound only further out is shadowed.
pub fn declare_variable(
    parser: &mut Parser<'_>,
    variable_name: &str,
    variable_type: Type,
    current_position: Position,
) -> Result<(), CompileError> {
    let scope = parser.current_scope();
    if parser.scopes_mut().add(scope, variable_name, variable_type) {
        return Ok(());
    }

    parser.report(Error::new(
        ErrorImpl::VariableAlreadyDeclared {
            variable: variable_name.to_string(),
        },
        current_position,
    ))
}

/// Binds a function's signature in the global scope, whatever scope is
/// current, so later declarations can call it.
pub fn register_function(
    parser: &mut Parser<'_>,
    function_name: &str,
    function_type: Type,
    current_position: Position,
) -> Result<(), CompileError> {
    debug!("Registering function {}: {}", function_name, function_type);
    let scope = parser.current_scope();
    if parser
        .scopes_mut()
        .add_root(scope, function_name, function_type)
    {
        return Ok(());
    }

    parser.report(Error::new(
        ErrorImpl::FunctionAlreadyDeclared {
            function: function_name.to_string(),
        },
        current_position,
    ))
}

/// Type of a name used as a value; `Unresolved` after reporting if the name
/// is not visible.
pub fn resolve_identifier(
    parser: &mut Parser<'_>,
    variable_name: &str,
    current_position: Position,
) -> Result<Type, CompileError> {
    if let Some(ty) = parser.lookup(variable_name) {
        return Ok(ty.clone());
    }

    parser.report(Error::new(
        ErrorImpl::VariableNotDeclared {
            variable: variable_name.to_string(),
        },
        current_position,
    ))?;
    Ok(Type::Unresolved)
}

/// A binary operation takes the type of its left operand.
///
/// Both operands must be integers of the same type. Operands that are
/// already unresolved are not reported again.
pub fn resolve_binary(
    parser: &mut Parser<'_>,
    operator: BinaryOperator,
    left: &Type,
    right: &Type,
    current_position: Position,
) -> Result<Type, CompileError> {
    if left.is_unresolved() || right.is_unresolved() {
        return Ok(left.clone());
    }

    if !left.is_integer() {
        parser.report(Error::new(
            ErrorImpl::UnsupportedOperand {
                operator: operator.to_string(),
                type_: left.name(),
            },
            current_position,
        ))?;
    } else if left != right {
        parser.report(Error::new(
            ErrorImpl::TypeMatchError {
                expected: left.name(),
                received: right.name(),
            },
            current_position,
        ))?;
    }

    Ok(left.clone())
}

/// Checks a call against the callee's signature and returns the callee's
/// return type.
pub fn resolve_call(
    parser: &mut Parser<'_>,
    callee: &str,
    arguments: &[Node],
    call_position: Position,
    end_position: Position,
) -> Result<Type, CompileError> {
    let function = match parser.lookup(callee) {
        Some(Type::Function(function)) => function.clone(),
        Some(other) => {
            let type_ = other.name();
            parser.report(Error::new(
                ErrorImpl::NotAFunction {
                    name: callee.to_string(),
                    type_,
                },
                call_position,
            ))?;
            return Ok(Type::Unresolved);
        }
        None => {
            parser.report(Error::new(
                ErrorImpl::FunctionNotDeclared {
                    function: callee.to_string(),
                },
                call_position,
            ))?;
            return Ok(Type::Unresolved);
        }
    };

    let expected = function.parameters.len();
    let received = arguments.len();
    if received > expected {
        parser.report(Error::new(
            ErrorImpl::UnexpectedArguments { expected, received },
            arguments[expected].get_span().start.clone(),
        ))?;
    } else if received < expected {
        parser.report(Error::new(
            ErrorImpl::MissingArguments { expected, received },
            end_position,
        ))?;
    }

    for (parameter, argument) in function.parameters.iter().zip(arguments.iter()) {
        if !parameter.accepts(argument.get_type()) {
            parser.report(Error::new(
                ErrorImpl::ArgumentTypeMatchError {
                    expected: parameter.name(),
                    received: argument.get_type().name(),
                },
                argument.get_span().start.clone(),
            ))?;
        }
    }

    Ok(*function.return_type)
}

/// Type a declared variable will have.
///
/// With an annotation the initializer must be compatible with it. Variables
/// cannot hold nothing or a function; those are reported and the variable is
/// left unresolved.
pub fn resolve_declaration(
    parser: &mut Parser<'_>,
    variable_name: &str,
    explicit_type: Option<&Type>,
    value_type: &Type,
    current_position: Position,
) -> Result<Type, CompileError> {
    if let Some(explicit_type) = explicit_type {
        if !explicit_type.accepts(value_type) {
            parser.report(Error::new(
                ErrorImpl::TypeMatchError {
                    expected: explicit_type.name(),
                    received: value_type.name(),
                },
                current_position.clone(),
            ))?;
        }
    }

    let declared = explicit_type.unwrap_or(value_type).clone();
    if matches!(declared, Type::Void | Type::Function(_)) {
        parser.report(Error::new(
            ErrorImpl::InvalidDeclarationType {
                variable: variable_name.to_string(),
                type_: declared.name(),
            },
            current_position,
        ))?;
        return Ok(Type::Unresolved);
    }

    Ok(declared)
}

/// Checks a returned value against the enclosing function's return type.
pub fn check_return(
    parser: &mut Parser<'_>,
    value_type: &Type,
    current_position: Position,
) -> Result<(), CompileError> {
    let expected = match parser.return_type() {
        Some(expected) => expected.clone(),
        None => return Ok(()),
    };

    if expected.accepts(value_type) {
        return Ok(());
    }

    parser.report(Error::new(
        ErrorImpl::TypeMatchError {
            expected: expected.name(),
            received: value_type.name(),
        },
        current_position,
    ))
}

/// Resolves a named type annotation. The language has no way to define
/// types, so only names already bound to themselves as user types resolve.
pub fn resolve_named_type(
    parser: &mut Parser<'_>,
    type_name: &str,
    current_position: Position,
) -> Result<Type, CompileError> {
    let user_type = Type::UserDefined(type_name.to_string());
    if parser.lookup(type_name) == Some(&user_type) {
        return Ok(user_type);
    }

    parser.report(Error::new(
        ErrorImpl::UnknownType {
            type_: type_name.to_string(),
        },
        current_position,
    ))?;
    Ok(Type::Unresolved)
}
