//! Hack VM Translator - Code Generation
//! 
//! This crate turns VM commands into Hack assembly. It includes:
//! 
//! - Typed Hack instructions with validation (`asm`)
//! - Segment addressing (`segment`)
//! - Per-category lowering: arithmetic, memory, control flow, call protocol,
//!   bootstrap (`lower`)
//! - Text emission and the run-wide `CodeWriter` (`emit`)

pub mod asm;
pub mod builder;
pub mod segment;
pub mod lower;
pub mod emit;

#[cfg(test)]
mod tests;

pub use asm::{Address, AsmInst, Comp, Dest, Jump, Reg};
pub use lower::{Translator, TranslatorState};
pub use emit::{emit_instructions, CodeWriter, CodegenError};

/// Default entry function called by the bootstrap sequence
pub const DEFAULT_ENTRY_FUNCTION: &str = "Sys.init";

/// First RAM word of the stack
pub const DEFAULT_STACK_BASE: u16 = 256;

/// Options for translation
#[derive(Debug, Clone)]
pub struct TranslatorOptions {
    /// Precede each construct with a `// <command>` line
    pub emit_comments: bool,
    pub stack_base: u16,
    pub entry_function: String,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            emit_comments: true,
            stack_base: DEFAULT_STACK_BASE,
            entry_function: DEFAULT_ENTRY_FUNCTION.to_string(),
        }
    }
}

/// Translate a single unit's commands to assembly text (no bootstrap)
pub fn generate_assembly(
    unit: &str,
    commands: &[vmt_common::Command],
    options: TranslatorOptions,
) -> Result<String, CodegenError> {
    let mut writer = CodeWriter::new(Vec::new(), options);
    writer.set_current_unit(unit);
    for cmd in commands {
        writer.write_command(cmd)?;
    }
    let bytes = writer.finish()?;
    String::from_utf8(bytes)
        .map_err(|e| CodegenError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
