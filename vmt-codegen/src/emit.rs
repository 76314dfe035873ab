//! Assembly emission
//! 
//! Validates typed instructions and renders them as Hack assembly text.
//! `CodeWriter` drives a `Translator` over one output stream for a whole run
//! and stops accepting input after the first error.

use crate::asm::{AsmInst, InstError};
use crate::lower::Translator;
use crate::TranslatorOptions;
use log::{debug, warn};
use std::io::{self, BufWriter, Write};
use thiserror::Error;
use vmt_common::{Command, CompilerError, Segment};

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Cannot pop into the constant segment")]
    PopToConstant,

    #[error("Index {index} out of range for segment '{segment}' (limit {limit})")]
    IndexOutOfRange { segment: Segment, index: u16, limit: u16 },

    #[error("Constant {0} does not fit in an A-instruction")]
    ConstantOutOfRange(u32),

    #[error("Invalid assembly symbol: '{0}'")]
    InvalidSymbol(String),

    #[error("Comment spans multiple lines: {0:?}")]
    InvalidComment(String),

    #[error("No source unit set; call set_current_unit before translating")]
    NoCurrentUnit,

    #[error("Bootstrap misuse: {0}")]
    BootstrapOrder(&'static str),

    #[error("Writer is unusable after an earlier error")]
    Poisoned,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<InstError> for CodegenError {
    fn from(err: InstError) -> Self {
        match err {
            InstError::ConstantOutOfRange(value) => CodegenError::ConstantOutOfRange(value),
            InstError::InvalidSymbol(symbol) => CodegenError::InvalidSymbol(symbol),
            InstError::InvalidComment(text) => CodegenError::InvalidComment(text),
        }
    }
}

impl From<CodegenError> for CompilerError {
    fn from(err: CodegenError) -> Self {
        match err {
            CodegenError::Io(io) => CompilerError::from(io),
            other => CompilerError::codegen_error(other.to_string()),
        }
    }
}

/// Validate every instruction, then render one per line
pub fn emit_instructions(insts: &[AsmInst]) -> Result<String, CodegenError> {
    for inst in insts {
        inst.validate()?;
    }
    let mut out = String::new();
    for inst in insts {
        out.push_str(&inst.to_string());
        out.push('\n');
    }
    Ok(out)
}

/// Streams translated commands to an output for the length of one run
pub struct CodeWriter<W: Write> {
    translator: Translator,
    out: BufWriter<W>,
    poisoned: bool,
    instructions_written: usize,
}

impl<W: Write> CodeWriter<W> {
    pub fn new(out: W, options: TranslatorOptions) -> Self {
        Self {
            translator: Translator::new(options),
            out: BufWriter::new(out),
            poisoned: false,
            instructions_written: 0,
        }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Must be called before each source file
    pub fn set_current_unit(&mut self, name: &str) {
        self.translator.set_current_unit(name);
    }

    pub fn write_command(&mut self, cmd: &Command) -> Result<(), CodegenError> {
        self.guard(|t| t.translate(cmd))
    }

    /// Translate a command stream, stopping at the first error of either kind
    pub fn write_commands<I>(&mut self, commands: I) -> Result<usize, CompilerError>
    where
        I: IntoIterator<Item = Result<Command, CompilerError>>,
    {
        let mut count = 0;
        for cmd in commands {
            let cmd = match cmd {
                Ok(cmd) => cmd,
                Err(e) => {
                    self.poisoned = true;
                    return Err(e);
                }
            };
            self.write_command(&cmd)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn write_bootstrap(&mut self) -> Result<(), CodegenError> {
        self.guard(|t| t.bootstrap())
    }

    pub fn write_halt_loop(&mut self) -> Result<(), CodegenError> {
        self.guard(|t| Ok(t.halt_loop()))
    }

    /// Number of machine instructions (ROM words) written so far
    pub fn instructions_written(&self) -> usize {
        self.instructions_written
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> Result<W, CodegenError> {
        if self.poisoned {
            warn!("Finishing a writer that failed earlier; output is incomplete");
        }
        self.out.flush()?;
        debug!("Wrote {} instructions", self.instructions_written);
        self.out.into_inner().map_err(|e| CodegenError::Io(e.into_error()))
    }

    fn guard<F>(&mut self, lower: F) -> Result<(), CodegenError>
    where
        F: FnOnce(&mut Translator) -> Result<Vec<AsmInst>, CodegenError>,
    {
        if self.poisoned {
            return Err(CodegenError::Poisoned);
        }
        let result = lower(&mut self.translator).and_then(|insts| {
            let text = emit_instructions(&insts)?;
            self.out.write_all(text.as_bytes())?;
            Ok(insts.iter().filter(|i| i.is_machine_instruction()).count())
        });
        match result {
            Ok(n) => {
                self.instructions_written += n;
                Ok(())
            }
            Err(e) => {
                self.poisoned = true;
                Err(e)
            }
        }
    }
}
