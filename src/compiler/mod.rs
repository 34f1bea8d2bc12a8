//! Code generation module for the compiler.
//!
//! This module contains the LLVM-based code generator that transforms
//! the typed AST into LLVM IR, and runs the result. It handles:
//!
//! - Lowering of declarations, statements and expressions
//! - Type conversion from AST types to LLVM types
//! - JIT execution of an entry point

pub mod compiler;
pub mod expr;
pub mod jit;
pub mod stmt;

#[cfg(test)]
mod tests;
