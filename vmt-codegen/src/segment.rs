//! Segment resolver
//! 
//! Maps a logical VM segment and index to the physical addressing mode the
//! generated code must use. Every segment is matched exhaustively; there is
//! no fallback case.

use crate::asm::{Address, Reg};
use crate::emit::CodegenError;
use vmt_common::Segment;

/// First RAM word of the temp window (R5)
pub const TEMP_BASE: u16 = 5;
/// Number of temp slots (R5-R12)
pub const TEMP_SIZE: u16 = 8;
/// Valid `pointer` indices: 0 (THIS) and 1 (THAT)
pub const POINTER_SIZE: u16 = 2;

/// How a segment slot is reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addressing {
    /// The index itself is the value (`constant`); no backing store
    Immediate(u16),
    /// RAM[RAM[base] + offset] (`local`, `argument`, `this`, `that`)
    Indirect { base: Reg, offset: u16 },
    /// A fixed RAM cell known at translation time (`temp`, `pointer`, `static`)
    Direct(Address),
}

/// Physical symbol of static variable `index` in `unit`
pub fn static_symbol(unit: &str, index: u16) -> String {
    format!("{}.{}", unit, index)
}

/// Resolve `segment index` for the source unit `unit`
pub fn resolve(segment: Segment, index: u16, unit: &str) -> Result<Addressing, CodegenError> {
    match segment {
        Segment::Constant => Ok(Addressing::Immediate(index)),
        Segment::Local => Ok(Addressing::Indirect { base: Reg::LCL, offset: index }),
        Segment::Argument => Ok(Addressing::Indirect { base: Reg::ARG, offset: index }),
        Segment::This => Ok(Addressing::Indirect { base: Reg::THIS, offset: index }),
        Segment::That => Ok(Addressing::Indirect { base: Reg::THAT, offset: index }),
        Segment::Temp => {
            check_bounds(segment, index, TEMP_SIZE)?;
            Ok(Addressing::Direct(Address::Const(TEMP_BASE + index)))
        }
        Segment::Pointer => {
            check_bounds(segment, index, POINTER_SIZE)?;
            let base = if index == 0 { Reg::THIS } else { Reg::THAT };
            Ok(Addressing::Direct(Address::Reg(base)))
        }
        Segment::Static => {
            if unit.is_empty() {
                return Err(CodegenError::NoCurrentUnit);
            }
            Ok(Addressing::Direct(Address::Symbol(static_symbol(unit, index))))
        }
    }
}

fn check_bounds(segment: Segment, index: u16, limit: u16) -> Result<(), CodegenError> {
    if index >= limit {
        return Err(CodegenError::IndexOutOfRange { segment, index, limit });
    }
    Ok(())
}
