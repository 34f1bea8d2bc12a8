//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct: the token cursor, the scope
//! chain used for name resolution while parsing, and the diagnostics list.
//! Rules themselves live in the `Grammar` the parser is given.

use std::rc::Rc;

use log::debug;

use crate::{
    ast::{
        ast::{Node, Program},
        types::Type,
    },
    errors::errors::{CompileError, Error, ErrorImpl, MAX_DIAGNOSTICS},
    lexer::tokens::{Token, TokenKind},
    symbols::symbols::{ScopeId, SymbolTable},
    Position, Span, MK_TOKEN,
};

use super::lookups::Grammar;

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream, the scopes opened so far and the
/// diagnostics reported so far. The grammar is borrowed, so one grammar can
/// serve any number of parsers.
pub struct Parser<'g> {
    /// The list of tokens to parse, always terminated by EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Rule tables used for dispatch
    grammar: &'g Grammar,
    /// Every scope opened during the parse
    scopes: SymbolTable<Type>,
    /// The innermost open scope
    current_scope: ScopeId,
    /// Semantic errors found so far, in order
    diagnostics: Vec<Error>,
    /// Name of the function to flag as the entry point
    entry_point: String,
    /// Declared return type of the function whose body is being parsed
    return_type: Option<Type>,
}

impl<'g> Parser<'g> {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `file` - Reference-counted string containing the source file name
    /// * `grammar` - The rule tables to dispatch through
    ///
    /// # Returns
    ///
    /// A new Parser instance positioned on the first token, with only the
    /// global scope open.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>, grammar: &'g Grammar) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position::new(1, 1, Rc::clone(&file)));
            tokens.push(MK_TOKEN!(
                TokenKind::EOF,
                String::from("EOF"),
                Span {
                    start: end.clone(),
                    end
                }
            ));
        }

        let scopes = SymbolTable::new();
        let current_scope = scopes.root();

        Parser {
            tokens,
            pos: 0,
            file,
            grammar,
            scopes,
            current_scope,
            diagnostics: vec![],
            entry_point: String::from("main"),
            return_type: None,
        }
    }

    /// Sets which function name is flagged as the entry point.
    pub fn with_entry_point(mut self, name: &str) -> Self {
        self.entry_point = name.to_string();
        self
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the token after the current one; EOF past the end.
    pub fn peek_token(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    pub fn peek_token_kind(&self) -> TokenKind {
        self.peek_token().kind
    }

    /// Advances to the next token and returns the previous token. The cursor
    /// never moves past EOF.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if token.kind != TokenKind::EOF {
            self.pos += 1;
        }
        token
    }

    /// End of the most recently consumed token.
    pub fn previous_end(&self) -> Position {
        match self.pos.checked_sub(1) {
            Some(index) => self.tokens[index].span.end.clone(),
            None => self.current_token().span.start.clone(),
        }
    }

    /// Span from `start` to the end of the most recently consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        Span {
            start,
            end: self.previous_end(),
        }
    }

    /// Expects a token of the specified kind, with optional custom message.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `message` - Optional description of what was expected
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) and advances if the current token matches, otherwise
    /// returns an error positioned at the current token.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        message: Option<&str>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() == expected_kind {
            return Ok(self.advance());
        }

        let token = self.current_token();
        let error = match message {
            Some(message) => ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: message.to_string(),
            },
            None => ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
            },
        };
        Err(Error::new(error, token.span.start.clone()))
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// An `UnexpectedToken` error for the current token.
    pub fn unexpected_token(&self) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Records a semantic error and lets parsing continue, unless the
    /// diagnostics limit has been reached.
    pub fn report(&mut self, error: Error) -> Result<(), CompileError> {
        debug!("Diagnostic: {}", error);
        self.diagnostics.push(error);
        if self.diagnostics.len() >= MAX_DIAGNOSTICS {
            return Err(CompileError::DiagnosticLimit(self.diagnostics.clone()));
        }
        Ok(())
    }

    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    pub fn scopes(&self) -> &SymbolTable<Type> {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut SymbolTable<Type> {
        &mut self.scopes
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current_scope
    }

    /// Opens a scope nested in the current one and makes it current.
    pub fn push_scope(&mut self) -> ScopeId {
        let scope = self.scopes.create_scope(self.current_scope);
        debug!("Entering scope {}", scope.index());
        self.current_scope = scope;
        scope
    }

    /// Returns to the enclosing scope. The global scope is never left.
    pub fn pop_scope(&mut self) {
        if let Some(parent) = self.scopes.parent(self.current_scope) {
            debug!("Leaving scope {}", self.current_scope.index());
            self.current_scope = parent;
        }
    }

    /// Looks `name` up through the current scope chain.
    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.scopes
            .get(self.current_scope, name)
            .map(|symbol| &symbol.value)
    }

    pub fn is_entry_point(&self, name: &str) -> bool {
        self.entry_point == name
    }

    pub fn return_type(&self) -> Option<&Type> {
        self.return_type.as_ref()
    }

    /// Sets the expected return type for the body about to be parsed and
    /// returns the previous one.
    pub fn replace_return_type(&mut self, return_type: Option<Type>) -> Option<Type> {
        std::mem::replace(&mut self.return_type, return_type)
    }

    /// Parses every top-level declaration until EOF.
    ///
    /// Syntax errors and hitting the diagnostics limit abort the parse; a
    /// syntax error carries the diagnostics collected before it. Other
    /// diagnostics are only collected; call `finish` to turn them into an
    /// error. The returned program owns the scopes opened during the parse.
    pub fn parse_program(&mut self) -> Result<Program, CompileError> {
        let mut nodes = vec![];

        while self.has_tokens() {
            match parse_global(self) {
                Ok(node) => nodes.push(node),
                Err(error) => return Err(error.with_diagnostics(&self.diagnostics)),
            }
        }

        Ok(Program {
            nodes,
            scopes: self.scopes.clone(),
        })
    }

    /// Fails with every collected diagnostic if there are any.
    pub fn finish(&self) -> Result<(), CompileError> {
        if self.diagnostics.is_empty() {
            Ok(())
        } else {
            Err(CompileError::Diagnostics(self.diagnostics.clone()))
        }
    }
}

/// Dispatches on the leading token of a top-level declaration.
pub fn parse_global(parser: &mut Parser<'_>) -> Result<Node, CompileError> {
    let kind = parser.current_token_kind();
    match parser.grammar().get_global(kind) {
        Some(handler) => handler(parser),
        None => Err(parser.unexpected_token().into()),
    }
}

/// Parses a stream of tokens into a program using the full grammar.
///
/// This is the main entry point for parsing. Any diagnostic makes it fail.
///
/// # Arguments
///
/// * `tokens` - Vector of tokens to parse
/// * `file` - Reference-counted string containing the source file name
///
/// # Returns
///
/// The parsed program, or the first syntax error, or the collected
/// diagnostics.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Program, CompileError> {
    let grammar = Grammar::new();
    let mut parser = Parser::new(tokens, file, &grammar);
    let program = parser.parse_program()?;
    parser.finish()?;
    Ok(program)
}
