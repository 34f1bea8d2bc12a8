use inkwell::{
    module::Linkage,
    values::{BasicMetadataValueEnum, BasicValueEnum, IntValue, PointerValue},
    AddressSpace,
};

use crate::{
    ast::{
        ast::Node,
        expressions::{BinaryOp, BinaryOperator, Call},
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    compiler::{backend_error, Compiler},
    stmt::{gen_return, gen_var_decl},
};

/// Generates LLVM IR for the given expression.
///
/// Returns `None` for expressions that produce no value: calls to void
/// functions and returns.
pub fn gen_expression<'a>(
    compiler: &mut Compiler<'a>,
    expression: &Node,
) -> Result<Option<BasicValueEnum<'a>>, Error> {
    let position = &expression.get_span().start;

    match expression {
        Node::IntLiteral(literal) => Ok(Some(
            compiler
                .context
                .i32_type()
                .const_int(literal.value as u64, true)
                .into(),
        )),
        Node::StringLiteral(literal) => Ok(Some(gen_string(compiler, &literal.value).into())),
        Node::Identifier(identifier) => {
            let slot = compiler.lookup_slot(&identifier.name, position)?;
            let value = compiler
                .builder
                .build_load(slot, &identifier.name)
                .map_err(|error| backend_error(format!("{:?}", error), position))?;
            Ok(Some(value))
        }
        Node::BinaryOp(binary) => gen_binary(compiler, binary, position).map(Some),
        Node::Call(call) => gen_call(compiler, call, position),
        Node::VarDecl(var_decl) => gen_var_decl(compiler, var_decl).map(Some),
        Node::ReturnDecl(ret) => gen_return(compiler, ret).map(|_| None),
        Node::FunctionDecl(_) | Node::ArgDecl(_) => Err(backend_error(
            format!("{} cannot be lowered as an expression", expression.kind_name()),
            position,
        )),
    }
}

/// Lowers an expression that must produce a value.
pub fn gen_value<'a>(
    compiler: &mut Compiler<'a>,
    expression: &Node,
) -> Result<BasicValueEnum<'a>, Error> {
    gen_expression(compiler, expression)?.ok_or_else(|| {
        backend_error(
            format!("{} produces no value", expression),
            &expression.get_span().start,
        )
    })
}

/// Emits `bytes` and a terminating NUL as a private constant and returns an
/// `i8*` to the first byte. Embedded NULs are kept.
fn gen_string<'a>(compiler: &Compiler<'a>, bytes: &[u8]) -> PointerValue<'a> {
    let value = compiler.context.const_string(bytes, true);

    let global = compiler.module.add_global(value.get_type(), None, "str");
    global.set_initializer(&value);
    global.set_constant(true);
    global.set_linkage(Linkage::Private);
    global.set_unnamed_addr(true);

    let i8_ptr_type = compiler.context.i8_type().ptr_type(AddressSpace::default());
    global.as_pointer_value().const_cast(i8_ptr_type)
}

fn gen_int_value<'a>(compiler: &mut Compiler<'a>, operand: &Node) -> Result<IntValue<'a>, Error> {
    match gen_value(compiler, operand)? {
        BasicValueEnum::IntValue(value) => Ok(value),
        _ => Err(backend_error(
            format!("operand {} is not an integer", operand),
            &operand.get_span().start,
        )),
    }
}

/// Left operand first, then right. Division is signed and unguarded.
fn gen_binary<'a>(
    compiler: &mut Compiler<'a>,
    binary: &BinaryOp,
    position: &Position,
) -> Result<BasicValueEnum<'a>, Error> {
    let left = gen_int_value(compiler, &binary.left)?;
    let right = gen_int_value(compiler, &binary.right)?;

    let builder = &compiler.builder;
    let result = match binary.operator {
        BinaryOperator::Add => builder.build_int_add(left, right, "add"),
        BinaryOperator::Subtract => builder.build_int_sub(left, right, "sub"),
        BinaryOperator::Multiply => builder.build_int_mul(left, right, "mul"),
        BinaryOperator::Divide => builder.build_int_signed_div(left, right, "div"),
    };

    result
        .map(BasicValueEnum::from)
        .map_err(|error| backend_error(format!("{:?}", error), position))
}

/// Arguments are lowered left to right before the call is emitted.
fn gen_call<'a>(
    compiler: &mut Compiler<'a>,
    call: &Call,
    position: &Position,
) -> Result<Option<BasicValueEnum<'a>>, Error> {
    let function = compiler.module.get_function(&call.callee).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnregisteredFunction {
                function: call.callee.clone(),
            },
            position.clone(),
        )
    })?;

    let mut args: Vec<BasicMetadataValueEnum<'a>> = vec![];
    for argument in call.arguments.iter() {
        args.push(gen_value(compiler, argument)?.into());
    }

    let site = compiler
        .builder
        .build_call(function, &args, "")
        .map_err(|error| backend_error(format!("{:?}", error), position))?;

    Ok(site.try_as_basic_value().left())
}
