//! Opcodes and their static operand tables.
//!
//! Each opcode carries a fixed operand signature (the kinds its operands must
//! have), a flow table (which operands are read, written or immediate), and the
//! functional-unit class that executes it.

use std::fmt;
use std::str::FromStr;

use super::operand::{OperandFlow, OperandKind};
use crate::common::SimError;

use super::operand::OperandFlow::{Dest, Imm, Src};
use super::operand::OperandKind::{Immediate, Memory, Register};

/// Signature of three-register arithmetic (`add rd, rs1, rs2`).
const RRR: &[OperandKind] = &[Register, Register, Register];
/// Signature of register-register-immediate forms (`addi`, `bne`).
const RRI: &[OperandKind] = &[Register, Register, Immediate];
/// Signature of memory accesses (`fld rd, off(base)`).
const RM: &[OperandKind] = &[Register, Memory];

/// Supported instruction mnemonics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    /// Integer add.
    Add,
    /// Integer add immediate.
    Addi,
    /// Set if less than.
    Slt,
    /// Floating-point load.
    Fld,
    /// Floating-point store.
    Fsd,
    /// Floating-point add.
    Fadd,
    /// Floating-point subtract.
    Fsub,
    /// Floating-point multiply.
    Fmul,
    /// Floating-point divide.
    Fdiv,
    /// Branch if not equal.
    Bne,
}

/// Functional-unit class an opcode is dispatched to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpClass {
    /// Integer ALU.
    IntAlu,
    /// Load unit.
    Load,
    /// Store unit.
    Store,
    /// Floating-point add/subtract unit.
    FpAdd,
    /// Floating-point multiplier.
    FpMul,
    /// Floating-point divider.
    FpDiv,
    /// Branch unit.
    Branch,
}

impl Opcode {
    /// Every opcode, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Add,
        Self::Addi,
        Self::Slt,
        Self::Fld,
        Self::Fsd,
        Self::Fadd,
        Self::Fsub,
        Self::Fmul,
        Self::Fdiv,
        Self::Bne,
    ];

    /// Assembly mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Addi => "addi",
            Self::Slt => "slt",
            Self::Fld => "fld",
            Self::Fsd => "fsd",
            Self::Fadd => "fadd",
            Self::Fsub => "fsub",
            Self::Fmul => "fmul",
            Self::Fdiv => "fdiv",
            Self::Bne => "bne",
        }
    }

    /// Functional-unit class that executes this opcode.
    pub const fn class(self) -> OpClass {
        match self {
            Self::Add | Self::Addi | Self::Slt => OpClass::IntAlu,
            Self::Fld => OpClass::Load,
            Self::Fsd => OpClass::Store,
            Self::Fadd | Self::Fsub => OpClass::FpAdd,
            Self::Fmul => OpClass::FpMul,
            Self::Fdiv => OpClass::FpDiv,
            Self::Bne => OpClass::Branch,
        }
    }

    /// Operand kinds the opcode requires, in order.
    pub const fn signature(self) -> &'static [OperandKind] {
        match self {
            Self::Add | Self::Slt | Self::Fadd | Self::Fsub | Self::Fmul | Self::Fdiv => RRR,
            Self::Addi | Self::Bne => RRI,
            Self::Fld | Self::Fsd => RM,
        }
    }

    /// Data flow of each operand, in order.
    ///
    /// A store's memory operand is its destination; the load's memory operand
    /// is a source whose base register is read.
    pub const fn flows(self) -> &'static [OperandFlow] {
        match self {
            Self::Add | Self::Slt | Self::Fadd | Self::Fsub | Self::Fmul | Self::Fdiv => {
                &[Dest, Src, Src]
            }
            Self::Addi => &[Dest, Src, Imm],
            Self::Bne => &[Src, Src, Imm],
            Self::Fld => &[Dest, Src],
            Self::Fsd => &[Src, Dest],
        }
    }

    /// Returns `true` for control-flow instructions.
    pub const fn is_branch(self) -> bool {
        matches!(self, Self::Bne)
    }
}

impl FromStr for Opcode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.mnemonic() == s)
            .ok_or_else(|| SimError::UnknownOpcode(s.to_owned()))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
