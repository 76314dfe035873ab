//! label / goto / if-goto
//! 
//! Raw label text is qualified with the current unit and function, so the
//! same name in two functions never collides.

use crate::asm::{Comp, Jump};
use crate::builder::InstBuilder;
use crate::emit::CodegenError;
use crate::lower::TranslatorState;

pub fn lower_label(
    b: &mut InstBuilder,
    state: &TranslatorState,
    raw: &str,
) -> Result<(), CodegenError> {
    b.label(state.scoped_label(raw)?);
    Ok(())
}

pub fn lower_goto(
    b: &mut InstBuilder,
    state: &TranslatorState,
    raw: &str,
) -> Result<(), CodegenError> {
    b.goto(state.scoped_label(raw)?);
    Ok(())
}

/// Branch on any nonzero value, not only on -1
pub fn lower_if_goto(
    b: &mut InstBuilder,
    state: &TranslatorState,
    raw: &str,
) -> Result<(), CodegenError> {
    let target = state.scoped_label(raw)?;
    b.pop_d().at(target).jump(Comp::D, Jump::Jne);
    Ok(())
}
