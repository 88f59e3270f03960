//! Parser for the cell notation

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::*;
pub use grammar::{parse_cell, MAX_REPEAT};
