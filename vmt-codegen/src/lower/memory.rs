//! push / pop across all segments

use crate::asm::{Comp, Dest, Reg, MAX_CONSTANT};
use crate::builder::InstBuilder;
use crate::emit::CodegenError;
use crate::lower::TranslatorState;
use crate::segment::{resolve, Addressing};
use vmt_common::Segment;

/// Scratch cell holding a computed pop destination
const POP_ADDR: Reg = Reg::R13;

/// Load the segment value into D, then push D
pub fn lower_push(
    b: &mut InstBuilder,
    state: &TranslatorState,
    segment: Segment,
    index: u16,
) -> Result<(), CodegenError> {
    match resolve(segment, index, state.current_unit())? {
        Addressing::Immediate(value) if value > MAX_CONSTANT => {
            // A-instructions carry 15 bits; load the complement and invert
            b.at(!value).assign(Dest::D, Comp::NotA);
        }
        Addressing::Immediate(value) => {
            b.at(value).assign(Dest::D, Comp::A);
        }
        Addressing::Indirect { base, offset } => {
            b.at(offset)
                .assign(Dest::D, Comp::A)
                .at(base)
                .assign(Dest::A, Comp::DPlusM)
                .assign(Dest::D, Comp::M);
        }
        Addressing::Direct(addr) => {
            b.at(addr).assign(Dest::D, Comp::M);
        }
    }
    b.push_d();
    Ok(())
}

/// Pop the stack top into the segment slot
pub fn lower_pop(
    b: &mut InstBuilder,
    state: &TranslatorState,
    segment: Segment,
    index: u16,
) -> Result<(), CodegenError> {
    match resolve(segment, index, state.current_unit())? {
        Addressing::Immediate(_) => return Err(CodegenError::PopToConstant),
        Addressing::Indirect { base, offset } => {
            // destination address must be computed before D is reused
            b.at(offset)
                .assign(Dest::D, Comp::A)
                .at(base)
                .assign(Dest::D, Comp::DPlusM)
                .at(POP_ADDR)
                .assign(Dest::M, Comp::D)
                .pop_d()
                .at(POP_ADDR)
                .assign(Dest::A, Comp::M)
                .assign(Dest::M, Comp::D);
        }
        Addressing::Direct(addr) => {
            b.pop_d().at(addr).assign(Dest::M, Comp::D);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state() -> TranslatorState {
        let mut s = TranslatorState::new();
        s.set_current_unit("Foo");
        s
    }

    fn push(segment: Segment, index: u16) -> Vec<String> {
        let mut b = InstBuilder::new();
        lower_push(&mut b, &state(), segment, index).unwrap();
        b.build().iter().map(|i| i.to_string()).collect()
    }

    fn pop(segment: Segment, index: u16) -> Result<Vec<String>, CodegenError> {
        let mut b = InstBuilder::new();
        lower_pop(&mut b, &state(), segment, index)?;
        Ok(b.build().iter().map(|i| i.to_string()).collect())
    }

    #[test]
    fn test_push_constant() {
        assert_eq!(
            push(Segment::Constant, 7),
            vec!["@7", "D=A", "@SP", "A=M", "M=D", "@SP", "M=M+1"]
        );
    }

    #[test]
    fn test_push_constant_above_15_bits() {
        assert_eq!(push(Segment::Constant, 40000)[..2].to_vec(), vec!["@25535", "D=!A"]);
        assert_eq!(push(Segment::Constant, 32768)[..2].to_vec(), vec!["@32767", "D=!A"]);
        assert_eq!(push(Segment::Constant, 65535)[..2].to_vec(), vec!["@0", "D=!A"]);
    }

    #[test]
    fn test_push_local_reads_value_through_base() {
        assert_eq!(
            push(Segment::Local, 2)[..5].to_vec(),
            vec!["@2", "D=A", "@LCL", "A=D+M", "D=M"]
        );
    }

    #[test]
    fn test_push_static_and_temp() {
        assert_eq!(push(Segment::Static, 3)[..2].to_vec(), vec!["@Foo.3", "D=M"]);
        assert_eq!(push(Segment::Temp, 6)[..2].to_vec(), vec!["@11", "D=M"]);
        assert_eq!(push(Segment::Pointer, 1)[..2].to_vec(), vec!["@THAT", "D=M"]);
    }

    #[test]
    fn test_pop_argument() {
        assert_eq!(
            pop(Segment::Argument, 1).unwrap(),
            vec![
                "@1", "D=A", "@ARG", "D=D+M", "@R13", "M=D",
                "@SP", "AM=M-1", "D=M",
                "@R13", "A=M", "M=D",
            ]
        );
    }

    #[test]
    fn test_pop_direct() {
        assert_eq!(
            pop(Segment::Pointer, 0).unwrap(),
            vec!["@SP", "AM=M-1", "D=M", "@THIS", "M=D"]
        );
        assert_eq!(pop(Segment::Static, 0).unwrap()[3], "@Foo.0");
    }

    #[test]
    fn test_pop_constant_fails() {
        assert!(matches!(pop(Segment::Constant, 0), Err(CodegenError::PopToConstant)));
    }

    #[test]
    fn test_out_of_range_indices_fail() {
        assert!(pop(Segment::Temp, 9).is_err());
        assert!(pop(Segment::Pointer, 2).is_err());
    }
}
