//! Hack VM Translator - Frontend
//! 
//! This crate turns VM source text into a stream of classified commands:
//! - Lexer: strips comments and splits each line into positioned tokens
//! - Parser: classifies a token line into a `Command` and checks its operands

pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, Token};
pub use parser::Parser;

use vmt_common::{Command, CompilerError};

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Parse a whole VM source file, stopping at the first malformed line
    pub fn parse_source(source: &str, filename: &str) -> Result<Vec<Command>, CompilerError> {
        Parser::new(source, filename).collect()
    }
}
