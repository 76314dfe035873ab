//! VM command model
//! 
//! A `Command` is one fully classified line of VM code. Segment names and
//! arithmetic operators are closed enums so every consumer is forced to
//! handle each variant explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stack arithmetic and logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl ArithmeticOp {
    pub const ALL: [ArithmeticOp; 9] = [
        ArithmeticOp::Add,
        ArithmeticOp::Sub,
        ArithmeticOp::Neg,
        ArithmeticOp::Eq,
        ArithmeticOp::Gt,
        ArithmeticOp::Lt,
        ArithmeticOp::And,
        ArithmeticOp::Or,
        ArithmeticOp::Not,
    ];

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "add" => Some(ArithmeticOp::Add),
            "sub" => Some(ArithmeticOp::Sub),
            "neg" => Some(ArithmeticOp::Neg),
            "eq" => Some(ArithmeticOp::Eq),
            "gt" => Some(ArithmeticOp::Gt),
            "lt" => Some(ArithmeticOp::Lt),
            "and" => Some(ArithmeticOp::And),
            "or" => Some(ArithmeticOp::Or),
            "not" => Some(ArithmeticOp::Not),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Sub => "sub",
            ArithmeticOp::Neg => "neg",
            ArithmeticOp::Eq => "eq",
            ArithmeticOp::Gt => "gt",
            ArithmeticOp::Lt => "lt",
            ArithmeticOp::And => "and",
            ArithmeticOp::Or => "or",
            ArithmeticOp::Not => "not",
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Logical memory segments addressable by push/pop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
}

impl Segment {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "constant" => Some(Segment::Constant),
            "local" => Some(Segment::Local),
            "argument" => Some(Segment::Argument),
            "this" => Some(Segment::This),
            "that" => Some(Segment::That),
            "temp" => Some(Segment::Temp),
            "pointer" => Some(Segment::Pointer),
            "static" => Some(Segment::Static),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Local => "local",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Temp => "temp",
            Segment::Pointer => "pointer",
            Segment::Static => "static",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Command categories, mirroring the classifier's view of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Arithmetic,
    Push,
    Pop,
    Label,
    Goto,
    If,
    Function,
    Return,
    Call,
}

/// A single VM command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Arithmetic(ArithmeticOp),
    Push { segment: Segment, index: u16 },
    Pop { segment: Segment, index: u16 },
    Label(String),
    Goto(String),
    IfGoto(String),
    Function { name: String, n_locals: u16 },
    Call { name: String, n_args: u16 },
    Return,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Arithmetic(_) => CommandKind::Arithmetic,
            Command::Push { .. } => CommandKind::Push,
            Command::Pop { .. } => CommandKind::Pop,
            Command::Label(_) => CommandKind::Label,
            Command::Goto(_) => CommandKind::Goto,
            Command::IfGoto(_) => CommandKind::If,
            Command::Function { .. } => CommandKind::Function,
            Command::Return => CommandKind::Return,
            Command::Call { .. } => CommandKind::Call,
        }
    }

    /// First argument; arithmetic commands report their own name.
    /// `return` has none.
    pub fn arg1(&self) -> Option<&str> {
        match self {
            Command::Arithmetic(op) => Some(op.name()),
            Command::Push { segment, .. } | Command::Pop { segment, .. } => Some(segment.name()),
            Command::Label(label) | Command::Goto(label) | Command::IfGoto(label) => Some(label),
            Command::Function { name, .. } | Command::Call { name, .. } => Some(name),
            Command::Return => None,
        }
    }

    pub fn arg2(&self) -> Option<u16> {
        match self {
            Command::Push { index, .. } | Command::Pop { index, .. } => Some(*index),
            Command::Function { n_locals, .. } => Some(*n_locals),
            Command::Call { n_args, .. } => Some(*n_args),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Arithmetic(op) => write!(f, "{}", op),
            Command::Push { segment, index } => write!(f, "push {} {}", segment, index),
            Command::Pop { segment, index } => write!(f, "pop {} {}", segment, index),
            Command::Label(label) => write!(f, "label {}", label),
            Command::Goto(label) => write!(f, "goto {}", label),
            Command::IfGoto(label) => write!(f, "if-goto {}", label),
            Command::Function { name, n_locals } => write!(f, "function {} {}", name, n_locals),
            Command::Call { name, n_args } => write!(f, "call {} {}", name, n_args),
            Command::Return => write!(f, "return"),
        }
    }
}
