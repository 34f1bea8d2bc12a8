//! Type annotation parsing.
//!
//! Supports the builtin integer types, pointers to them (`*i32`, `*i8`) and
//! named types. Like expressions, annotations dispatch through the
//! grammar's type rules on their leading token.

use crate::{
    ast::types::Type,
    errors::errors::{CompileError, Error, ErrorImpl},
    lexer::tokens::TokenKind,
    type_checker::type_checker::resolve_named_type,
};

use super::{lookups::Grammar, parser::Parser};

/// Registers the type annotation rules.
pub fn create_token_type_lookups(grammar: &mut Grammar) {
    grammar.type_nud(TokenKind::I32, parse_i32_type);
    grammar.type_nud(TokenKind::I8, parse_i8_type);
    grammar.type_nud(TokenKind::Star, parse_pointer_type);
    grammar.type_nud(TokenKind::Identifier, parse_symbol_type);
}

pub fn parse_type(parser: &mut Parser<'_>) -> Result<Type, CompileError> {
    let kind = parser.current_token_kind();
    match parser.grammar().get_type_nud(kind) {
        Some(handler) => handler(parser),
        None => Err(parser.unexpected_token().into()),
    }
}

pub fn parse_i32_type(parser: &mut Parser<'_>) -> Result<Type, CompileError> {
    parser.expect(TokenKind::I32)?;
    Ok(Type::Int32)
}

pub fn parse_i8_type(parser: &mut Parser<'_>) -> Result<Type, CompileError> {
    parser.expect(TokenKind::I8)?;
    Ok(Type::Int8)
}

pub fn parse_pointer_type(parser: &mut Parser<'_>) -> Result<Type, CompileError> {
    parser.expect(TokenKind::Star)?;
    let start = parser.current_token().span.start.clone();
    let pointee = parse_type(parser)?;

    if pointee.is_unresolved() {
        return Ok(Type::Unresolved);
    }

    match pointee.pointer_to() {
        Some(pointer) => Ok(pointer),
        None => {
            parser.report(Error::new(
                ErrorImpl::UnknownType {
                    type_: format!("*{}", pointee),
                },
                start,
            ))?;
            Ok(Type::Unresolved)
        }
    }
}

pub fn parse_symbol_type(parser: &mut Parser<'_>) -> Result<Type, CompileError> {
    let token = parser.expect(TokenKind::Identifier)?;
    resolve_named_type(parser, &token.value, token.span.start.clone())
}
