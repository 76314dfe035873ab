//! Hack VM Translator - Common Types and Utilities
//! 
//! This crate contains the command model, error definitions, and source
//! location types shared by the frontend, code generator and driver.

pub mod error;
pub mod command;
pub mod source_loc;

pub use error::CompilerError;
pub use command::{ArithmeticOp, Command, CommandKind, Segment};
pub use source_loc::SourceLocation;
