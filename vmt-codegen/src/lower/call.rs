//! Function call protocol
//! 
//! Frame layout pushed by `call`, growing upward from the caller's stack:
//! 
//! ```text
//! ARG ->  arg 0 .. arg n-1
//!         return address
//!         saved LCL
//!         saved ARG
//!         saved THIS
//!         saved THAT
//! LCL ->  local 0 .. local k-1
//! ```
//! 
//! `return` walks back from LCL to restore the caller and resumes at the
//! saved return address. The saved pointers are values read from the base
//! registers, never the register addresses themselves.

use crate::asm::{Address, Comp, Dest, Jump, Reg, MAX_CONSTANT};
use crate::builder::InstBuilder;
use crate::emit::CodegenError;
use crate::lower::TranslatorState;

/// Caller pointers saved by `call`, in push order
pub const SAVED_POINTERS: [Reg; 4] = [Reg::LCL, Reg::ARG, Reg::THIS, Reg::THAT];

/// Words pushed by `call` before the callee runs (return address + pointers)
pub const FRAME_SIZE: u16 = 1 + SAVED_POINTERS.len() as u16;

/// Scratch cell holding the callee frame pointer during `return`
const FRAME: Reg = Reg::R13;
/// Scratch cell holding the return address during `return`
const RET_ADDR: Reg = Reg::R14;

/// `function name n_locals`: entry label and zeroed locals
pub fn lower_function(b: &mut InstBuilder, state: &mut TranslatorState, name: &str, n_locals: u16) {
    state.enter_function(name);
    b.label(name);
    if n_locals > 0 {
        b.assign(Dest::D, Comp::Zero);
        for _ in 0..n_locals {
            b.push_d();
        }
    }
}

/// `call name n_args`
pub fn lower_call(
    b: &mut InstBuilder,
    state: &mut TranslatorState,
    name: &str,
    n_args: u16,
) -> Result<(), CodegenError> {
    // ARG = SP - FRAME_SIZE - n_args, measured after the frame is pushed
    let arg_offset = n_args as u32 + FRAME_SIZE as u32;
    if arg_offset > MAX_CONSTANT as u32 {
        return Err(CodegenError::ConstantOutOfRange(arg_offset));
    }
    let return_label = state.next_return_label();

    b.at(return_label.as_str()).assign(Dest::D, Comp::A).push_d();
    for reg in SAVED_POINTERS {
        b.at(reg).assign(Dest::D, Comp::M).push_d();
    }

    b.at(Reg::SP)
        .assign(Dest::D, Comp::M)
        .at(arg_offset as u16)
        .assign(Dest::D, Comp::DMinusA)
        .at(Reg::ARG)
        .assign(Dest::M, Comp::D);

    b.at(Reg::SP)
        .assign(Dest::D, Comp::M)
        .at(Reg::LCL)
        .assign(Dest::M, Comp::D);

    b.goto(Address::Symbol(name.to_string())).label(return_label);
    Ok(())
}

/// `return`
pub fn lower_return(b: &mut InstBuilder) {
    // FRAME = LCL
    b.at(Reg::LCL)
        .assign(Dest::D, Comp::M)
        .at(FRAME)
        .assign(Dest::M, Comp::D);

    // RET = *(FRAME - 5), read before *ARG is overwritten
    b.at(FRAME_SIZE)
        .assign(Dest::A, Comp::DMinusA)
        .assign(Dest::D, Comp::M)
        .at(RET_ADDR)
        .assign(Dest::M, Comp::D);

    // *ARG = pop()
    b.pop_d()
        .at(Reg::ARG)
        .assign(Dest::A, Comp::M)
        .assign(Dest::M, Comp::D);

    // SP = ARG + 1
    b.at(Reg::ARG)
        .assign(Dest::D, Comp::MPlusOne)
        .at(Reg::SP)
        .assign(Dest::M, Comp::D);

    // THAT, THIS, ARG, LCL = *(--FRAME)
    for reg in SAVED_POINTERS.iter().rev() {
        b.at(FRAME)
            .assign(Dest::AM, Comp::MMinusOne)
            .assign(Dest::D, Comp::M)
            .at(*reg)
            .assign(Dest::M, Comp::D);
    }

    b.at(RET_ADDR).assign(Dest::A, Comp::M).jump(Comp::Zero, Jump::Jmp);
}
