//! Hack Assembly Instruction Definitions
//! 
//! This module defines the instruction set of the 16-bit Hack platform as
//! typed data. Instructions are validated before they are rendered to text,
//! so malformed symbols or out-of-range constants never reach the assembler.

use std::fmt;

/// Largest value an A-instruction can load (15 bits)
pub const MAX_CONSTANT: u16 = 0x7FFF;

/// Predefined Hack register symbols
/// 
/// - SP: stack pointer (RAM[0])
/// - LCL, ARG, THIS, THAT: segment base pointers (RAM[1..=4])
/// - R13-R15: general purpose scratch registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    SP,
    LCL,
    ARG,
    THIS,
    THAT,
    R13,
    R14,
    R15,
}

impl Reg {
    /// Fixed RAM address the assembler binds this symbol to
    pub fn address(&self) -> u16 {
        match self {
            Reg::SP => 0,
            Reg::LCL => 1,
            Reg::ARG => 2,
            Reg::THIS => 3,
            Reg::THAT => 4,
            Reg::R13 => 13,
            Reg::R14 => 14,
            Reg::R15 => 15,
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reg::SP => write!(f, "SP"),
            Reg::LCL => write!(f, "LCL"),
            Reg::ARG => write!(f, "ARG"),
            Reg::THIS => write!(f, "THIS"),
            Reg::THAT => write!(f, "THAT"),
            Reg::R13 => write!(f, "R13"),
            Reg::R14 => write!(f, "R14"),
            Reg::R15 => write!(f, "R15"),
        }
    }
}

/// Operand of an A-instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    Const(u16),
    Reg(Reg),
    Symbol(String),
}

impl From<u16> for Address {
    fn from(value: u16) -> Self {
        Address::Const(value)
    }
}

impl From<Reg> for Address {
    fn from(reg: Reg) -> Self {
        Address::Reg(reg)
    }
}

impl From<String> for Address {
    fn from(symbol: String) -> Self {
        Address::Symbol(symbol)
    }
}

impl From<&str> for Address {
    fn from(symbol: &str) -> Self {
        Address::Symbol(symbol.to_string())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Const(value) => write!(f, "{}", value),
            Address::Reg(reg) => write!(f, "{}", reg),
            Address::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// Destination field of a C-instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dest {
    Null,
    M,
    D,
    MD,
    A,
    AM,
    AD,
    AMD,
}

impl Dest {
    pub fn writes_a(&self) -> bool {
        matches!(self, Dest::A | Dest::AM | Dest::AD | Dest::AMD)
    }

    pub fn writes_d(&self) -> bool {
        matches!(self, Dest::D | Dest::MD | Dest::AD | Dest::AMD)
    }

    pub fn writes_m(&self) -> bool {
        matches!(self, Dest::M | Dest::MD | Dest::AM | Dest::AMD)
    }
}

impl fmt::Display for Dest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dest::Null => "",
            Dest::M => "M",
            Dest::D => "D",
            Dest::MD => "MD",
            Dest::A => "A",
            Dest::AM => "AM",
            Dest::AD => "AD",
            Dest::AMD => "AMD",
        };
        write!(f, "{}", s)
    }
}

/// ALU computation of a C-instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comp {
    Zero,
    One,
    NegOne,
    D,
    A,
    NotD,
    NotA,
    NegD,
    NegA,
    DPlusOne,
    APlusOne,
    DMinusOne,
    AMinusOne,
    DPlusA,
    DMinusA,
    AMinusD,
    DAndA,
    DOrA,
    M,
    NotM,
    NegM,
    MPlusOne,
    MMinusOne,
    DPlusM,
    DMinusM,
    MMinusD,
    DAndM,
    DOrM,
}

impl Comp {
    /// Whether the computation reads memory (the `a` bit of the encoding)
    pub fn reads_memory(&self) -> bool {
        matches!(
            self,
            Comp::M
                | Comp::NotM
                | Comp::NegM
                | Comp::MPlusOne
                | Comp::MMinusOne
                | Comp::DPlusM
                | Comp::DMinusM
                | Comp::MMinusD
                | Comp::DAndM
                | Comp::DOrM
        )
    }
}

impl fmt::Display for Comp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Comp::Zero => "0",
            Comp::One => "1",
            Comp::NegOne => "-1",
            Comp::D => "D",
            Comp::A => "A",
            Comp::NotD => "!D",
            Comp::NotA => "!A",
            Comp::NegD => "-D",
            Comp::NegA => "-A",
            Comp::DPlusOne => "D+1",
            Comp::APlusOne => "A+1",
            Comp::DMinusOne => "D-1",
            Comp::AMinusOne => "A-1",
            Comp::DPlusA => "D+A",
            Comp::DMinusA => "D-A",
            Comp::AMinusD => "A-D",
            Comp::DAndA => "D&A",
            Comp::DOrA => "D|A",
            Comp::M => "M",
            Comp::NotM => "!M",
            Comp::NegM => "-M",
            Comp::MPlusOne => "M+1",
            Comp::MMinusOne => "M-1",
            Comp::DPlusM => "D+M",
            Comp::DMinusM => "D-M",
            Comp::MMinusD => "M-D",
            Comp::DAndM => "D&M",
            Comp::DOrM => "D|M",
        };
        write!(f, "{}", s)
    }
}

/// Jump field of a C-instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jump {
    Null,
    Jgt,
    Jeq,
    Jge,
    Jlt,
    Jne,
    Jle,
    Jmp,
}

impl Jump {
    /// Whether the jump is taken for the given ALU output
    pub fn taken(&self, value: i16) -> bool {
        match self {
            Jump::Null => false,
            Jump::Jgt => value > 0,
            Jump::Jeq => value == 0,
            Jump::Jge => value >= 0,
            Jump::Jlt => value < 0,
            Jump::Jne => value != 0,
            Jump::Jle => value <= 0,
            Jump::Jmp => true,
        }
    }
}

impl fmt::Display for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Jump::Null => "",
            Jump::Jgt => "JGT",
            Jump::Jeq => "JEQ",
            Jump::Jge => "JGE",
            Jump::Jlt => "JLT",
            Jump::Jne => "JNE",
            Jump::Jle => "JLE",
            Jump::Jmp => "JMP",
        };
        write!(f, "{}", s)
    }
}

/// Hack Assembly Instructions
/// 
/// `At` and `Compute` are the two machine instruction forms; `Label` and
/// `Comment` are assembler pseudo-instructions that occupy no ROM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmInst {
    At(Address),                                     // @value
    Compute { dest: Dest, comp: Comp, jump: Jump },  // dest=comp;jump
    Label(String),                                   // (LABEL)
    Comment(String),                                 // // text
}

/// Hack symbols: letters, digits, `_`, `.`, `$`, `:`; not starting with a digit
pub fn is_valid_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    match chars.next() {
        None => false,
        Some(first) if first.is_ascii_digit() => false,
        Some(first) => std::iter::once(first)
            .chain(chars)
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':')),
    }
}

impl AsmInst {
    /// Check the instruction can be rendered as legal assembly
    pub fn validate(&self) -> Result<(), InstError> {
        match self {
            AsmInst::At(Address::Const(value)) if *value > MAX_CONSTANT => {
                Err(InstError::ConstantOutOfRange(*value as u32))
            }
            AsmInst::At(Address::Symbol(symbol)) | AsmInst::Label(symbol) => {
                if is_valid_symbol(symbol) {
                    Ok(())
                } else {
                    Err(InstError::InvalidSymbol(symbol.clone()))
                }
            }
            AsmInst::Comment(text) if text.contains('\n') || text.contains('\r') => {
                Err(InstError::InvalidComment(text.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Whether the instruction occupies a ROM word
    pub fn is_machine_instruction(&self) -> bool {
        matches!(self, AsmInst::At(_) | AsmInst::Compute { .. })
    }
}

/// Reasons an instruction fails validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstError {
    ConstantOutOfRange(u32),
    InvalidSymbol(String),
    InvalidComment(String),
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmInst::At(addr) => write!(f, "@{}", addr),
            AsmInst::Compute { dest, comp, jump } => {
                if *dest != Dest::Null {
                    write!(f, "{}=", dest)?;
                }
                write!(f, "{}", comp)?;
                if *jump != Jump::Null {
                    write!(f, ";{}", jump)?;
                }
                Ok(())
            }
            AsmInst::Label(label) => write!(f, "({})", label),
            AsmInst::Comment(text) => write!(f, "// {}", text),
        }
    }
}
