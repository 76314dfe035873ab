//! Program entry and shutdown sequences

use crate::asm::{Comp, Dest, Reg};
use crate::builder::InstBuilder;
use crate::emit::CodegenError;
use crate::lower::{call, TranslatorState};

/// Label of the terminal self-loop
pub const HALT_LABEL: &str = "VM$$HALT";

/// SP = stack_base, then `call entry 0`
pub fn lower_bootstrap(
    b: &mut InstBuilder,
    state: &mut TranslatorState,
    stack_base: u16,
    entry: &str,
) -> Result<(), CodegenError> {
    b.at(stack_base)
        .assign(Dest::D, Comp::A)
        .at(Reg::SP)
        .assign(Dest::M, Comp::D);
    call::lower_call(b, state, entry, 0)
}

pub fn lower_halt(b: &mut InstBuilder) {
    b.label(HALT_LABEL).goto(HALT_LABEL);
}
