use std::collections::HashMap;

use crate::{
    ast::{ast::Node, types::Type},
    errors::errors::CompileError,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*, types::create_token_type_lookups};

/// Precedence classes, lowest first. An infix rule keeps folding while the
/// current operator binds tighter than the caller's minimum.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    ConditionalOr,
    ConditionalAnd,
    LogicalOr,
    LogicalAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Unary,
}

pub type GlobalHandler = fn(&mut Parser<'_>) -> Result<Node, CompileError>;
pub type StmtHandler = fn(&mut Parser<'_>) -> Result<Node, CompileError>;
pub type NUDHandler = fn(&mut Parser<'_>) -> Result<Node, CompileError>;
pub type LEDHandler = fn(&mut Parser<'_>, Node, BindingPower) -> Result<Node, CompileError>;
pub type TypeNUDHandler = fn(&mut Parser<'_>) -> Result<Type, CompileError>;

pub type GlobalLookup = HashMap<TokenKind, GlobalHandler>;
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
pub type LookaheadLookup = HashMap<(TokenKind, TokenKind), NUDHandler>;
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// The rule tables a parser dispatches through.
///
/// Built once and lent to each parser, so differently configured grammars
/// can coexist (tests register their own rules on an empty grammar).
#[derive(Default, Clone)]
pub struct Grammar {
    /// Top-level declarations, keyed by their leading keyword
    global_lookup: GlobalLookup,
    /// Rules only allowed directly in a function body
    stmt_lookup: StmtLookup,
    /// Prefix rules, keyed by the first token of an expression
    nud_lookup: NUDLookup,
    /// Infix rules, keyed by the operator token
    led_lookup: LEDLookup,
    /// Precedence of each infix operator
    binding_power_lookup: BPLookup,
    /// Rules chosen by the current token together with the one after it
    lookahead_lookup: LookaheadLookup,
    /// Type annotation rules
    type_nud_lookup: TypeNUDLookup,
}

impl Grammar {
    /// A grammar with every rule of the language registered.
    pub fn new() -> Self {
        let mut grammar = Grammar::empty();
        create_token_lookups(&mut grammar);
        create_token_type_lookups(&mut grammar);
        grammar
    }

    /// A grammar with no rules at all.
    pub fn empty() -> Self {
        Grammar::default()
    }

    /// Registers an infix rule and its precedence.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a prefix rule.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a rule for `first` immediately followed by `second`. These
    /// take priority over the prefix rule for `first`.
    pub fn lookahead(&mut self, first: TokenKind, second: TokenKind, nud_fn: NUDHandler) {
        self.lookahead_lookup.insert((first, second), nud_fn);
    }

    /// Registers a top-level declaration rule.
    pub fn global(&mut self, kind: TokenKind, global_fn: GlobalHandler) {
        self.global_lookup.insert(kind, global_fn);
    }

    /// Registers a rule for a statement that cannot appear inside an
    /// expression.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type annotation rule.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    pub fn get_nud(&self, kind: TokenKind) -> Option<NUDHandler> {
        self.nud_lookup.get(&kind).copied()
    }

    pub fn get_led(&self, kind: TokenKind) -> Option<LEDHandler> {
        self.led_lookup.get(&kind).copied()
    }

    pub fn get_lookahead(&self, first: TokenKind, second: TokenKind) -> Option<NUDHandler> {
        self.lookahead_lookup.get(&(first, second)).copied()
    }

    pub fn get_global(&self, kind: TokenKind) -> Option<GlobalHandler> {
        self.global_lookup.get(&kind).copied()
    }

    pub fn get_stmt(&self, kind: TokenKind) -> Option<StmtHandler> {
        self.stmt_lookup.get(&kind).copied()
    }

    pub fn get_type_nud(&self, kind: TokenKind) -> Option<TypeNUDHandler> {
        self.type_nud_lookup.get(&kind).copied()
    }

    /// Precedence of `kind` as an infix operator; `Default` for any token
    /// that is not one, which ends the climb.
    pub fn get_binding_power(&self, kind: TokenKind) -> BindingPower {
        self.binding_power_lookup
            .get(&kind)
            .copied()
            .unwrap_or(BindingPower::Default)
    }
}

pub fn create_token_lookups(grammar: &mut Grammar) {
    // Additive and multiplicative
    grammar.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    grammar.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    grammar.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    grammar.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);

    // Identifier followed by something that changes its meaning
    grammar.lookahead(TokenKind::Identifier, TokenKind::ShortDec, parse_short_dec);
    grammar.lookahead(TokenKind::Identifier, TokenKind::Colon, parse_explicit_dec);
    grammar.lookahead(TokenKind::Identifier, TokenKind::OpenParen, parse_call_expr);

    // Literals and symbols
    grammar.nud(TokenKind::Identifier, parse_identifier_expr);
    grammar.nud(TokenKind::Number, parse_int_literal_expr);
    grammar.nud(TokenKind::String, parse_string_literal_expr);
    grammar.nud(TokenKind::OpenParen, parse_grouping_expr);

    // Statements
    grammar.stmt(TokenKind::Ret, parse_ret_decl);

    // Top level
    grammar.global(TokenKind::Fn, parse_fn_decl);
    grammar.global(TokenKind::Extern, parse_extern_decl);
}
