use inkwell::values::{BasicValueEnum, FunctionValue};
use log::debug;

use crate::{
    ast::{
        ast::Node,
        statements::{FunctionDecl, ReturnDecl, VarDecl},
        types::Type,
    },
    errors::errors::Error,
};

use super::{
    compiler::{backend_error, Compiler},
    expr::{gen_expression, gen_value},
};

/// Lowers one top-level declaration or body statement.
pub fn gen_statement<'a>(compiler: &mut Compiler<'a>, statement: &Node) -> Result<(), Error> {
    match statement {
        Node::FunctionDecl(function) => gen_function(compiler, function),
        Node::VarDecl(var_decl) => gen_var_decl(compiler, var_decl).map(|_| ()),
        Node::ReturnDecl(ret) => gen_return(compiler, ret),
        _ => gen_expression(compiler, statement).map(|_| ()),
    }
}

fn gen_function<'a>(compiler: &mut Compiler<'a>, function: &FunctionDecl) -> Result<(), Error> {
    let value = compiler.declare_function(function)?;
    if function.is_external {
        return Ok(());
    }

    debug!("Lowering function {}", function.name);
    compiler.create_function(value);

    compiler.push_scope();
    let body = gen_function_body(compiler, function, value);
    compiler.pop_scope();
    body?;

    if !value.verify(false) {
        let details = compiler
            .module
            .verify()
            .err()
            .map(|message| message.to_string())
            .unwrap_or_default();
        return Err(backend_error(
            format!("function {:?} failed verification: {}", function.name, details),
            &function.span.start,
        ));
    }

    Ok(())
}

fn gen_function_body<'a>(
    compiler: &mut Compiler<'a>,
    function: &FunctionDecl,
    value: FunctionValue<'a>,
) -> Result<(), Error> {
    // Every parameter gets a slot, so parameters and locals load the same way.
    for (parameter, incoming) in function.parameters.iter().zip(value.get_param_iter()) {
        let position = &parameter.span.start;
        let slot = compiler
            .builder
            .build_alloca(compiler.convert_type(&parameter.ty, position)?, &parameter.name)
            .map_err(|error| backend_error(format!("{:?}", error), position))?;
        compiler
            .builder
            .build_store(slot, incoming)
            .map_err(|error| backend_error(format!("{:?}", error), position))?;
        compiler.bind_slot(&parameter.name, slot, position)?;
    }

    for statement in function.body.iter() {
        gen_statement(compiler, statement)?;
    }

    Ok(())
}

/// Lowers the initializer, then gives the variable a slot holding it.
/// Returns the stored value.
pub fn gen_var_decl<'a>(
    compiler: &mut Compiler<'a>,
    var_decl: &VarDecl,
) -> Result<BasicValueEnum<'a>, Error> {
    let position = &var_decl.span.start;
    let value = gen_value(compiler, &var_decl.value)?;

    let slot = compiler
        .builder
        .build_alloca(compiler.convert_type(&var_decl.ty, position)?, &var_decl.name)
        .map_err(|error| backend_error(format!("{:?}", error), position))?;
    compiler
        .builder
        .build_store(slot, value)
        .map_err(|error| backend_error(format!("{:?}", error), position))?;
    compiler.bind_slot(&var_decl.name, slot, position)?;

    Ok(value)
}

/// `ret value`. A call to a void function may be returned from a void
/// function; no other return is ever synthesized.
pub fn gen_return<'a>(compiler: &mut Compiler<'a>, ret: &ReturnDecl) -> Result<(), Error> {
    let position = &ret.span.start;

    let result = if ret.ty == Type::Void {
        gen_expression(compiler, &ret.value)?;
        compiler.builder.build_return(None)
    } else {
        let value = gen_value(compiler, &ret.value)?;
        compiler.builder.build_return(Some(&value))
    };

    result
        .map(|_| ())
        .map_err(|error| backend_error(format!("{:?}", error), position))
}
