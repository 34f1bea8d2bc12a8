#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc, time::Instant};

use inkwell::context::Context;
use log::info;

use crate::{
    compiler::compiler::{compile_program, Compiler},
    errors::errors::CompileError,
    lexer::lexer::tokenize,
    parser::{lookups::Grammar, parser::Parser},
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod symbols;
pub mod type_checker;

extern crate regex;

/// A point in a source file. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(line: u32, column: u32, file: Rc<String>) -> Self {
        Position { line, column, file }
    }

    pub fn null() -> Self {
        Position::new(0, 0, Rc::new(String::from("<null>")))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Settings for a single compile. Every compile starts from fresh scopes and
/// an empty diagnostics list; nothing here is shared between runs.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Name reported in positions and used as the LLVM module name
    pub file_name: String,
    /// Function flagged as the entry point
    pub entry_point: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            file_name: String::from("shell"),
            entry_point: String::from("main"),
        }
    }
}

/// Runs the whole front end: tokenize, parse with inline resolution, and
/// lower into an LLVM module owned by `context`.
///
/// Returns the compiler holding the finished module. Any diagnostic makes the
/// compile fail with the aggregated list, and no module is returned.
pub fn compile<'a>(
    source: &str,
    options: &CompileOptions,
    context: &'a Context,
) -> Result<Compiler<'a>, CompileError> {
    let file = Rc::new(options.file_name.clone());

    let start = Instant::now();
    let tokens = tokenize(source, Some(options.file_name.clone()))?;
    info!("Tokenized {} tokens in {:?}", tokens.len(), start.elapsed());

    let parse_start = Instant::now();
    let grammar = Grammar::new();
    let mut parser = Parser::new(tokens, Rc::clone(&file), &grammar)
        .with_entry_point(&options.entry_point);
    let program = parser.parse_program()?;
    parser.finish()?;
    info!("Parsed in {:?}", parse_start.elapsed());

    let lower_start = Instant::now();
    let compiled = compile_program(&program, &options.file_name, context)?;
    info!("Lowered in {:?}", lower_start.elapsed());
    info!("Total time for IR generation: {:?}", start.elapsed());

    Ok(compiled)
}
