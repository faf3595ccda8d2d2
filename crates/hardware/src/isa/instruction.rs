//! Instruction descriptors and per-instance stage timestamps.
//!
//! An [`Instruction`] is built once from its opcode and operand tokens. Building
//! checks the operand signature, applies the opcode's flow table, and resolves
//! the source and destination register sets; nothing downstream re-inspects
//! operand text.

use std::fmt;

use serde::Serialize;

use super::opcode::Opcode;
use super::operand::{Operand, OperandFlow, OperandKind};
use crate::common::{Reg, SimError, Stage};

/// A decoded instruction at a fixed program counter.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    /// Byte address of the instruction (4 × stream index).
    pub pc: u64,
    /// Operation.
    pub opcode: Opcode,
    /// Operands in source order.
    pub operands: Vec<Operand>,
    src_regs: Vec<Reg>,
    dest_regs: Vec<Reg>,
}

impl Instruction {
    /// Builds an instruction from already-classified operands.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OperandMismatch`] if the operand count or kinds do
    /// not match the opcode's signature.
    pub fn new(pc: u64, opcode: Opcode, operands: Vec<Operand>) -> Result<Self, SimError> {
        let found: Vec<OperandKind> = operands.iter().map(Operand::kind).collect();
        if found != opcode.signature() {
            return Err(SimError::OperandMismatch {
                opcode,
                expected: opcode.signature(),
                found,
            });
        }

        let mut src_regs = Vec::new();
        let mut dest_regs = Vec::new();
        for (operand, flow) in operands.iter().zip(opcode.flows()) {
            match flow {
                OperandFlow::Src => src_regs.extend(operand.source_reg().cloned()),
                OperandFlow::Dest => dest_regs.extend(operand.dest_reg().cloned()),
                OperandFlow::Imm => {}
            }
        }
        debug_assert!(dest_regs.len() <= 1);

        Ok(Self {
            pc,
            opcode,
            operands,
            src_regs,
            dest_regs,
        })
    }

    /// Parses `mnemonic op, op, op` text into an instruction.
    ///
    /// Branch targets must already be numeric; label resolution is done by the
    /// program loader.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownOpcode`], [`SimError::InvalidImmediate`] or
    /// [`SimError::OperandMismatch`].
    pub fn parse(pc: u64, text: &str) -> Result<Self, SimError> {
        let text = text.trim();
        let (mnemonic, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
        let opcode: Opcode = mnemonic.parse()?;
        let operands = rest
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Operand::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(pc, opcode, operands)
    }

    /// Registers read by this instruction.
    pub fn src_regs(&self) -> &[Reg] {
        &self.src_regs
    }

    /// Registers written by this instruction (zero or one).
    pub fn dest_regs(&self) -> &[Reg] {
        &self.dest_regs
    }

    /// Number of register operands that need a rename slot.
    pub fn renamed_operands(&self) -> usize {
        self.src_regs.len() + self.dest_regs.len()
    }

    /// Address of the next sequential instruction.
    pub const fn fall_through(&self) -> u64 {
        self.pc + 4
    }

    /// Encoded branch target, for branches.
    pub fn branch_target(&self) -> Option<u64> {
        if !self.opcode.is_branch() {
            return None;
        }
        match self.operands.last() {
            Some(Operand::Immediate(target)) => u64::try_from(*target).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for (i, op) in self.operands.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{op}")?;
        }
        Ok(())
    }
}

/// Cycle stamps of one dynamic instruction instance.
///
/// Stages are recorded in pipeline order and each stamp must be strictly
/// greater than the one before it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StageTimes {
    /// Cycle the instruction was delivered by the instruction cache.
    pub fetch: Option<u64>,
    /// Cycle decode completed.
    pub decode: Option<u64>,
    /// Cycle execution (and memory access) completed.
    pub execute: Option<u64>,
    /// Cycle the instruction retired.
    pub retire: Option<u64>,
}

impl StageTimes {
    /// Records the cycle of `stage` for the instruction at `pc`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::StageOrder`] if `cycle` is not strictly after the
    /// most recent recorded stage.
    pub fn record(&mut self, pc: u64, stage: Stage, cycle: u64) -> Result<(), SimError> {
        if let Some(previous) = self.latest() {
            if cycle <= previous {
                return Err(SimError::StageOrder {
                    pc,
                    stage,
                    cycle,
                    previous,
                });
            }
        }
        let slot = match stage {
            Stage::Fetch => &mut self.fetch,
            Stage::Decode => &mut self.decode,
            Stage::Execute => &mut self.execute,
            Stage::Retire => &mut self.retire,
        };
        *slot = Some(cycle);
        Ok(())
    }

    /// Most recently recorded stamp.
    pub fn latest(&self) -> Option<u64> {
        self.retire.or(self.execute).or(self.decode).or(self.fetch)
    }
}
