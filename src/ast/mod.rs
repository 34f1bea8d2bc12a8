/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The `Node` sum type and the parsed `Program`
/// - expressions: Expression node payloads
/// - statements: Declaration node payloads
/// - types: Semantic types carried by every node
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
