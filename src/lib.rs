//! FilterQL - Filter query language front end
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use filterql_ast as ast;
pub use filterql_lexer as lexer;
pub use filterql_parser as parser;

pub use filterql_parser::{parse, Error};
