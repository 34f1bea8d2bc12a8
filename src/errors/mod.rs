//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the compilation
//! process. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for parsing, resolution and lowering
//! - The pipeline-level `CompileError` that separates fatal failures from
//!   aggregated diagnostics

pub mod errors;
