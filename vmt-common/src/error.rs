//! Error handling for the Hack VM translator
//! 
//! Every failure is fatal for the run: the frontend reports malformed
//! commands, the code generator reports contract violations, and I/O errors
//! are propagated to the driver unchanged.

use crate::source_loc::SourceLocation;
use thiserror::Error;

/// Main error type that encompasses all phases of translation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Parse error at {location}: {message}")]
    ParseError {
        location: SourceLocation,
        message: String,
    },

    #[error("Code generation error: {message}")]
    CodegenError { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl CompilerError {
    /// Create a parse error
    pub fn parse_error(message: impl Into<String>, location: SourceLocation) -> Self {
        CompilerError::ParseError {
            location,
            message: message.into(),
        }
    }

    /// Create a codegen error
    pub fn codegen_error(message: impl Into<String>) -> Self {
        CompilerError::CodegenError {
            message: message.into(),
        }
    }

    /// Location of the offending command, if the error carries one
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            CompilerError::ParseError { location, .. } => Some(location),
            _ => None,
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}
