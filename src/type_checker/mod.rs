//! Name resolution and type checking.
//!
//! There is no separate checking pass. Parser rules call into this module as
//! each node is built, so every node carries its type when it leaves the
//! parser:
//!
//! - declarations bind names in the current scope, functions in the global one
//! - identifiers and calls are resolved through the scope chain
//! - operands, arguments, annotations and returns are checked for agreement
//!
//! Problems are reported through the parser's diagnostics and replaced by
//! `Type::Unresolved`, which is compatible with everything so a single
//! mistake is reported once.

pub mod type_checker;

#[cfg(test)]
mod tests;
