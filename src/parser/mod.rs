//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a typed AST. Expressions are parsed by precedence climbing over
//! rule tables held in a `Grammar`:
//!
//! - two-token rules, consulted first, for constructs that share a leading
//!   token (`x := ...`, `x : i32 = ...`, `f(...)`)
//! - NUD (null denotation) rules for prefix positions
//! - LED (left denotation) rules with a binding power for infix operators
//! - statement rules, only valid directly in a function body (`ret`)
//! - global rules for top-level declarations
//! - type rules for annotations
//!
//! Names are resolved and types assigned while parsing; semantic problems
//! are collected as diagnostics instead of stopping the parse.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
