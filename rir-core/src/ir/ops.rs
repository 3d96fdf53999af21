//! IR Opcodes
//!
//! Defines the operations an instruction can perform.

use rir_common::IrError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Instruction opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    Nop,

    // Arithmetic
    Add, Sub, Mul, Div, Rem,

    // Control flow
    Ret, Call, Br, Goto,

    // Memory
    Alloc, Load, Store,

    // Comparison
    Equ, Neq, Gt, Lt, Gte, Lte,

    // Unary: logical not, negation, bitwise inversion
    Not, Neg, Inv,
}

impl Opcode {
    pub const ALL: [Opcode; 22] = [
        Opcode::Nop,
        Opcode::Add, Opcode::Sub, Opcode::Mul, Opcode::Div, Opcode::Rem,
        Opcode::Ret, Opcode::Call,
        Opcode::Alloc, Opcode::Load, Opcode::Store,
        Opcode::Br, Opcode::Goto,
        Opcode::Equ, Opcode::Neq, Opcode::Gt, Opcode::Lt, Opcode::Gte, Opcode::Lte,
        Opcode::Not, Opcode::Neg, Opcode::Inv,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "nop",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Rem => "rem",
            Opcode::Ret => "ret",
            Opcode::Call => "call",
            Opcode::Alloc => "alloc",
            Opcode::Load => "load",
            Opcode::Store => "store",
            Opcode::Br => "br",
            Opcode::Goto => "goto",
            Opcode::Equ => "equ",
            Opcode::Neq => "neq",
            Opcode::Gt => "gt",
            Opcode::Lt => "lt",
            Opcode::Gte => "gte",
            Opcode::Lte => "lte",
            Opcode::Not => "not",
            Opcode::Neg => "neg",
            Opcode::Inv => "inv",
        }
    }

    /// Ends a basic block
    pub fn is_terminator(self) -> bool {
        matches!(self, Opcode::Ret | Opcode::Br | Opcode::Goto)
    }

    /// Transfers control to a block label
    pub fn is_branch(self) -> bool {
        matches!(self, Opcode::Br | Opcode::Goto)
    }

    pub fn is_binary(self) -> bool {
        matches!(self, Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Rem) || self.is_comparison()
    }

    pub fn is_unary(self) -> bool {
        matches!(self, Opcode::Not | Opcode::Neg | Opcode::Inv)
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, Opcode::Equ | Opcode::Neq | Opcode::Gt | Opcode::Lt | Opcode::Gte | Opcode::Lte)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

impl FromStr for Opcode {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Opcode::ALL
            .into_iter()
            .find(|op| op.mnemonic() == s)
            .ok_or_else(|| IrError::not_found("opcode", s))
    }
}
