//! Lowering of VM commands to Hack instructions
//! 
//! `TranslatorState` carries everything that must stay consistent across a
//! whole run (label and call-site counters, current unit and function). One
//! instance is threaded through every generator so labels stay unique across
//! all translated files.

pub mod arithmetic;
pub mod bootstrap;
pub mod call;
pub mod flow;
pub mod memory;

use crate::asm::AsmInst;
use crate::builder::InstBuilder;
use crate::emit::CodegenError;
use crate::TranslatorOptions;
use log::{debug, trace};
use vmt_common::Command;

/// Scope used for return addresses emitted outside any function. VM names
/// never contain `$`, so no scoped label can start with `VM$$`.
pub const BOOTSTRAP_SCOPE: &str = "VM$$Bootstrap";

/// Run-wide translation state
#[derive(Debug, Default)]
pub struct TranslatorState {
    label_counter: u32,
    call_counter: u32,
    current_unit: String,
    current_function: Option<String>,
}

impl TranslatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to a new source unit. The function scope does not carry over.
    pub fn set_current_unit(&mut self, name: &str) {
        self.current_unit = name.to_string();
        self.current_function = None;
    }

    pub fn current_unit(&self) -> &str {
        &self.current_unit
    }

    pub fn current_function(&self) -> Option<&str> {
        self.current_function.as_deref()
    }

    pub fn enter_function(&mut self, name: &str) {
        self.current_function = Some(name.to_string());
    }

    /// Next id from the run-wide label counter
    pub fn next_label_id(&mut self) -> u32 {
        let id = self.label_counter;
        self.label_counter += 1;
        id
    }

    /// Fresh return-address label for a call site
    pub fn next_return_label(&mut self) -> String {
        let n = self.call_counter;
        self.call_counter += 1;
        let scope = self.current_function.as_deref().unwrap_or(BOOTSTRAP_SCOPE);
        format!("{}$ret.{}", scope, n)
    }

    /// Qualify a raw VM label with the current unit and function
    pub fn scoped_label(&self, raw: &str) -> Result<String, CodegenError> {
        if self.current_unit.is_empty() {
            return Err(CodegenError::NoCurrentUnit);
        }
        Ok(match &self.current_function {
            Some(function) => format!("{}.{}${}", self.current_unit, function, raw),
            None => format!("{}${}", self.current_unit, raw),
        })
    }

    pub fn labels_allocated(&self) -> u32 {
        self.label_counter
    }

    pub fn calls_emitted(&self) -> u32 {
        self.call_counter
    }
}

/// Turns commands into instruction sequences
#[derive(Debug)]
pub struct Translator {
    state: TranslatorState,
    options: TranslatorOptions,
    commands_translated: usize,
    bootstrapped: bool,
}

impl Translator {
    pub fn new(options: TranslatorOptions) -> Self {
        Self {
            state: TranslatorState::new(),
            options,
            commands_translated: 0,
            bootstrapped: false,
        }
    }

    pub fn state(&self) -> &TranslatorState {
        &self.state
    }

    pub fn set_current_unit(&mut self, name: &str) {
        debug!("Translating unit '{}'", name);
        self.state.set_current_unit(name);
    }

    /// Lower one command, preceded by a comment naming it when enabled
    pub fn translate(&mut self, cmd: &Command) -> Result<Vec<AsmInst>, CodegenError> {
        trace!("{}: {}", self.state.current_unit(), cmd);
        let mut b = InstBuilder::new();
        if self.options.emit_comments {
            b.comment(cmd.to_string());
        }

        match cmd {
            Command::Arithmetic(op) => arithmetic::lower_arithmetic(&mut b, &mut self.state, *op),
            Command::Push { segment, index } => {
                memory::lower_push(&mut b, &self.state, *segment, *index)?
            }
            Command::Pop { segment, index } => {
                memory::lower_pop(&mut b, &self.state, *segment, *index)?
            }
            Command::Label(label) => flow::lower_label(&mut b, &self.state, label)?,
            Command::Goto(label) => flow::lower_goto(&mut b, &self.state, label)?,
            Command::IfGoto(label) => flow::lower_if_goto(&mut b, &self.state, label)?,
            Command::Function { name, n_locals } => {
                debug!("Entering function '{}' ({} locals)", name, n_locals);
                call::lower_function(&mut b, &mut self.state, name, *n_locals)
            }
            Command::Call { name, n_args } => {
                call::lower_call(&mut b, &mut self.state, name, *n_args)?
            }
            Command::Return => call::lower_return(&mut b),
        }

        self.commands_translated += 1;
        Ok(b.build())
    }

    /// Program entry sequence. Allowed once, before any command.
    pub fn bootstrap(&mut self) -> Result<Vec<AsmInst>, CodegenError> {
        if self.bootstrapped {
            return Err(CodegenError::BootstrapOrder("bootstrap already emitted"));
        }
        if self.commands_translated > 0 {
            return Err(CodegenError::BootstrapOrder(
                "bootstrap must precede all translated commands",
            ));
        }
        self.bootstrapped = true;
        debug!(
            "Bootstrap: SP={} then call {}",
            self.options.stack_base, self.options.entry_function
        );

        let mut b = InstBuilder::new();
        if self.options.emit_comments {
            b.comment("bootstrap");
        }
        bootstrap::lower_bootstrap(
            &mut b,
            &mut self.state,
            self.options.stack_base,
            &self.options.entry_function,
        )?;
        Ok(b.build())
    }

    /// Terminal self-loop
    pub fn halt_loop(&self) -> Vec<AsmInst> {
        let mut b = InstBuilder::new();
        if self.options.emit_comments {
            b.comment("halt");
        }
        bootstrap::lower_halt(&mut b);
        b.build()
    }
}
