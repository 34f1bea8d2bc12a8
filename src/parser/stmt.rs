use crate::{
    ast::{
        ast::Node,
        statements::{ArgDecl, FunctionDecl, ReturnDecl, VarDecl},
        types::Type,
    },
    errors::errors::{CompileError, Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    symbols::symbols::ScopeId,
    type_checker::type_checker::{
        check_return, declare_variable, register_function, resolve_declaration,
    },
    Position,
};

use super::{expr::parse_expr, lookups::BindingPower, parser::Parser, types::parse_type};

/// `fn name(params) -> type { body }`
pub fn parse_fn_decl(parser: &mut Parser<'_>) -> Result<Node, CompileError> {
    let start = parser.expect(TokenKind::Fn)?.span.start;
    parse_function(parser, start, false)
}

/// `extern fn name(params) -> type`, a signature with no body.
pub fn parse_extern_decl(parser: &mut Parser<'_>) -> Result<Node, CompileError> {
    let start = parser.expect(TokenKind::Extern)?.span.start;
    parser.expect_error(TokenKind::Fn, Some("expected 'fn' after 'extern'"))?;
    parse_function(parser, start, true)
}

fn parse_function(
    parser: &mut Parser<'_>,
    start: Position,
    is_external: bool,
) -> Result<Node, CompileError> {
    let name = parser.expect_error(TokenKind::Identifier, Some("expected function name"))?;

    // Parameters and body share one scope, closed even when parsing fails.
    let scope = parser.push_scope();
    let function = parse_function_in_scope(parser, name, start, scope, is_external);
    parser.pop_scope();

    function
}

fn parse_function_in_scope(
    parser: &mut Parser<'_>,
    name: Token,
    start: Position,
    scope: ScopeId,
    is_external: bool,
) -> Result<Node, CompileError> {
    let parameters = parse_parameters(parser)?;

    let return_type = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        parse_type(parser)?
    } else {
        Type::Void
    };

    let ty = Type::function(
        parameters.iter().map(|parameter| parameter.ty.clone()).collect(),
        return_type.clone(),
    );

    // Registered before the body so the function can call itself.
    register_function(parser, &name.value, ty.clone(), name.span.start.clone())?;

    let body = if is_external {
        vec![]
    } else {
        parse_fn_body(parser, &name.value, &return_type)?
    };

    Ok(Node::FunctionDecl(FunctionDecl {
        is_entry_point: !is_external && parser.is_entry_point(&name.value),
        name: name.value,
        parameters,
        return_type,
        body,
        is_external,
        scope,
        ty,
        span: parser.span_from(start),
    }))
}

fn parse_parameters(parser: &mut Parser<'_>) -> Result<Vec<ArgDecl>, CompileError> {
    parser.expect_error(TokenKind::OpenParen, Some("expected '(' before parameters"))?;

    let mut parameters = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        let name = parser.expect_error(TokenKind::Identifier, Some("expected parameter name"))?;
        let ty = parse_type(parser)?;
        declare_variable(parser, &name.value, ty.clone(), name.span.start.clone())?;

        parameters.push(ArgDecl {
            span: parser.span_from(name.span.start),
            name: name.value,
            ty,
        });

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    parser.expect_error(TokenKind::CloseParen, Some("expected ')' after parameters"))?;
    Ok(parameters)
}

fn parse_fn_body(
    parser: &mut Parser<'_>,
    name: &str,
    return_type: &Type,
) -> Result<Vec<Node>, CompileError> {
    parser.expect_error(TokenKind::OpenCurly, Some("expected '{' before function body"))?;

    let previous = parser.replace_return_type(Some(return_type.clone()));
    let body = parse_body_nodes(parser, name);
    parser.replace_return_type(previous);

    body
}

// A body must end with `ret`, and nothing may follow it.
fn parse_body_nodes(parser: &mut Parser<'_>, name: &str) -> Result<Vec<Node>, CompileError> {
    let mut body = vec![];
    let mut returned = false;
    let mut unreachable_reported = false;

    while !matches!(
        parser.current_token_kind(),
        TokenKind::CloseCurly | TokenKind::EOF
    ) {
        if returned && !unreachable_reported {
            let start = parser.current_token().span.start.clone();
            parser.report(Error::new(ErrorImpl::UnreachableCode, start))?;
            unreachable_reported = true;
        }

        let node = parse_stmt(parser)?;
        returned |= matches!(node, Node::ReturnDecl(_));
        body.push(node);
    }

    let close =
        parser.expect_error(TokenKind::CloseCurly, Some("expected '}' after function body"))?;
    if !returned {
        parser.report(Error::new(
            ErrorImpl::MissingReturn {
                function: name.to_string(),
            },
            close.span.start,
        ))?;
    }

    Ok(body)
}

/// Parses one entry of a function body: a statement rule if the current
/// token has one, an expression otherwise.
pub fn parse_stmt(parser: &mut Parser<'_>) -> Result<Node, CompileError> {
    match parser.grammar().get_stmt(parser.current_token_kind()) {
        Some(handler) => handler(parser),
        None => parse_expr(parser, BindingPower::Default),
    }
}

/// `name := value`
pub fn parse_short_dec(parser: &mut Parser<'_>) -> Result<Node, CompileError> {
    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::ShortDec)?;

    let value = parse_expr(parser, BindingPower::Default)?;
    parse_var_decl(parser, name, None, value)
}

/// `name : type = value`
pub fn parse_explicit_dec(parser: &mut Parser<'_>) -> Result<Node, CompileError> {
    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Colon)?;
    let explicit_type = parse_type(parser)?;
    parser.expect_error(TokenKind::Assignment, Some("expected '=' after type"))?;

    let value = parse_expr(parser, BindingPower::Default)?;
    parse_var_decl(parser, name, Some(explicit_type), value)
}

fn parse_var_decl(
    parser: &mut Parser<'_>,
    name: Token,
    explicit_type: Option<Type>,
    value: Node,
) -> Result<Node, CompileError> {
    // The initializer is resolved before the name is bound, so it cannot
    // refer to the variable it initializes.
    let ty = resolve_declaration(
        parser,
        &name.value,
        explicit_type.as_ref(),
        value.get_type(),
        name.span.start.clone(),
    )?;
    declare_variable(parser, &name.value, ty.clone(), name.span.start.clone())?;

    Ok(Node::VarDecl(VarDecl {
        span: parser.span_from(name.span.start),
        name: name.value,
        value: Box::new(value),
        explicit_type,
        ty,
    }))
}

/// `ret value`, only valid as a statement.
pub fn parse_ret_decl(parser: &mut Parser<'_>) -> Result<Node, CompileError> {
    let start = parser.expect(TokenKind::Ret)?.span.start;
    let value = parse_expr(parser, BindingPower::Default)?;
    check_return(parser, value.get_type(), value.get_span().start.clone())?;

    Ok(Node::ReturnDecl(ReturnDecl {
        ty: value.get_type().clone(),
        value: Box::new(value),
        span: parser.span_from(start),
    }))
}
