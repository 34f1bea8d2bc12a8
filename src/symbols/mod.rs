//! Name resolution support shared by the parser and the lowering pass.

pub mod symbols;

#[cfg(test)]
mod tests;
