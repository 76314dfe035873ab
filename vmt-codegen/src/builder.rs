//! Instruction builder
//! 
//! Thin accumulator over `Vec<AsmInst>` with the handful of idioms every
//! generator needs (stack push/pop through D, short C-instruction forms).

use crate::asm::{Address, AsmInst, Comp, Dest, Jump, Reg};

#[derive(Debug, Default)]
pub struct InstBuilder {
    insts: Vec<AsmInst>,
}

impl InstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(&mut self, addr: impl Into<Address>) -> &mut Self {
        self.insts.push(AsmInst::At(addr.into()));
        self
    }

    pub fn compute(&mut self, dest: Dest, comp: Comp, jump: Jump) -> &mut Self {
        self.insts.push(AsmInst::Compute { dest, comp, jump });
        self
    }

    /// `dest=comp`
    pub fn assign(&mut self, dest: Dest, comp: Comp) -> &mut Self {
        self.compute(dest, comp, Jump::Null)
    }

    /// `comp;jump`
    pub fn jump(&mut self, comp: Comp, jump: Jump) -> &mut Self {
        self.compute(Dest::Null, comp, jump)
    }

    /// `@target` followed by `0;JMP`
    pub fn goto(&mut self, target: impl Into<Address>) -> &mut Self {
        self.at(target).jump(Comp::Zero, Jump::Jmp)
    }

    pub fn label(&mut self, name: impl Into<String>) -> &mut Self {
        self.insts.push(AsmInst::Label(name.into()));
        self
    }

    pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.insts.push(AsmInst::Comment(text.into()));
        self
    }

    /// RAM[SP] = D; SP++
    pub fn push_d(&mut self) -> &mut Self {
        self.at(Reg::SP)
            .assign(Dest::A, Comp::M)
            .assign(Dest::M, Comp::D)
            .at(Reg::SP)
            .assign(Dest::M, Comp::MPlusOne)
    }

    /// SP--; D = RAM[SP]. Leaves A pointing at the popped slot.
    pub fn pop_d(&mut self) -> &mut Self {
        self.at(Reg::SP)
            .assign(Dest::AM, Comp::MMinusOne)
            .assign(Dest::D, Comp::M)
    }

    /// RAM[SP] = comp, without moving SP
    pub fn store_top(&mut self, comp: Comp) -> &mut Self {
        self.at(Reg::SP).assign(Dest::A, Comp::M).assign(Dest::M, comp)
    }

    pub fn len(&self) -> usize {
        self.insts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    pub fn build(self) -> Vec<AsmInst> {
        self.insts
    }
}
