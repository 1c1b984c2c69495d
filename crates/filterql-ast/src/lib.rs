//! FilterQL AST - Core types for the abstract syntax tree
//!
//! This crate defines the expression tree produced by the parser, spans and
//! positions for source locations, and a printer that renders trees back
//! to query text.

mod span;
mod expr;
mod printer;

pub use span::*;
pub use expr::*;
pub use printer::*;
