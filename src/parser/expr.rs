use log::trace;

use crate::{
    ast::{
        ast::Node,
        expressions::{BinaryOp, BinaryOperator, Call, Identifier, IntLiteral, StringLiteral},
        types::Type,
    },
    errors::errors::{CompileError, Error, ErrorImpl},
    lexer::{lexer::unescape, tokens::TokenKind},
    type_checker::type_checker::{resolve_binary, resolve_call, resolve_identifier},
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

/// Parses one expression whose operators bind tighter than `bp`.
///
/// The leading rule is chosen from the two-token table first, then the
/// prefix table. Infix rules then fold onto the left operand for as long as
/// the next operator outranks `bp`.
pub fn parse_expr(parser: &mut Parser<'_>, bp: BindingPower) -> Result<Node, CompileError> {
    let grammar = parser.grammar();
    let token_kind = parser.current_token_kind();
    let next_kind = parser.peek_token_kind();

    let nud = grammar
        .get_lookahead(token_kind, next_kind)
        .or_else(|| grammar.get_nud(token_kind));
    let Some(nud) = nud else {
        return Err(parser.unexpected_token().into());
    };
    trace!("Prefix rule for {} {}", token_kind, next_kind);

    let mut left = nud(parser)?;

    while grammar.get_binding_power(parser.current_token_kind()) > bp {
        let token_kind = parser.current_token_kind();
        let Some(led) = grammar.get_led(token_kind) else {
            return Err(parser.unexpected_token().into());
        };
        trace!("Infix rule for {}", token_kind);

        left = led(parser, left, grammar.get_binding_power(token_kind))?;
    }

    Ok(left)
}

pub fn parse_identifier_expr(parser: &mut Parser<'_>) -> Result<Node, CompileError> {
    let token = parser.expect(TokenKind::Identifier)?;
    let ty = resolve_identifier(parser, &token.value, token.span.start.clone())?;

    Ok(Node::Identifier(Identifier {
        name: token.value,
        ty,
        span: token.span,
    }))
}

pub fn parse_int_literal_expr(parser: &mut Parser<'_>) -> Result<Node, CompileError> {
    let token = parser.expect(TokenKind::Number)?;
    let value = token.value.parse::<i32>().map_err(|_| {
        Error::new(
            ErrorImpl::NumberParseError {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )
    })?;

    Ok(Node::IntLiteral(IntLiteral {
        value,
        ty: Type::Int32,
        span: token.span,
    }))
}

pub fn parse_string_literal_expr(parser: &mut Parser<'_>) -> Result<Node, CompileError> {
    let token = parser.expect(TokenKind::String)?;

    Ok(Node::StringLiteral(StringLiteral {
        value: unescape(&token.value),
        ty: Type::StringLiteral,
        span: token.span,
    }))
}

/// `( expr )`; the parentheses leave no node behind.
pub fn parse_grouping_expr(parser: &mut Parser<'_>) -> Result<Node, CompileError> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Infix arithmetic. The right operand is parsed at the operator's own
/// binding power, so operators of equal precedence group to the left.
pub fn parse_binary_expr(
    parser: &mut Parser<'_>,
    left: Node,
    bp: BindingPower,
) -> Result<Node, CompileError> {
    let operator_token = parser.advance();
    let Some(operator) = BinaryOperator::from_token(operator_token.kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.value,
            },
            operator_token.span.start,
        )
        .into());
    };

    let right = parse_expr(parser, bp)?;
    let ty = resolve_binary(
        parser,
        operator,
        left.get_type(),
        right.get_type(),
        operator_token.span.start.clone(),
    )?;

    Ok(Node::BinaryOp(BinaryOp {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone(),
        },
        operator,
        left: Box::new(left),
        right: Box::new(right),
        ty,
    }))
}

/// `name(arg, ...)`
pub fn parse_call_expr(parser: &mut Parser<'_>) -> Result<Node, CompileError> {
    let callee = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    let close = parser.expect_error(TokenKind::CloseParen, Some("expected ')' after arguments"))?;
    let ty = resolve_call(
        parser,
        &callee.value,
        &arguments,
        callee.span.start.clone(),
        close.span.start.clone(),
    )?;

    Ok(Node::Call(Call {
        callee: callee.value,
        arguments,
        ty,
        span: Span {
            start: callee.span.start,
            end: close.span.end,
        },
    }))
}
