//! Functional executor.
//!
//! Runs a program architecturally, with no notion of time, to discover the
//! ground-truth outcome of every dynamic branch. The resulting
//! [`BranchRecord`] is what the timing engine later replays.
//!
//! Registers and memory are sparse. Unwritten registers read as zero; loads
//! from uninitialized addresses read as zero and are reported with a warning.
//! Division by zero follows IEEE 754 (`inf` or `NaN`) and is also warned about.

use std::collections::BTreeMap;

use crate::common::{Reg, RegisterFile, SimError};
use crate::core::pipeline::BranchRecord;
use crate::core::units::bru::BranchOutcome;
use crate::isa::{Instruction, Opcode, Operand, OperandKind};

use super::loader::Program;

/// Architectural interpreter for a [`Program`].
#[derive(Clone, Debug)]
pub struct FunctionalExecutor<'a> {
    program: &'a Program,
    regs: RegisterFile,
    memory: BTreeMap<i64, f64>,
    max_instructions: Option<u64>,
    executed: u64,
}

impl<'a> FunctionalExecutor<'a> {
    /// Creates an executor over `program` with its initial memory image.
    pub fn new(program: &'a Program, max_instructions: Option<u64>) -> Self {
        Self {
            program,
            regs: RegisterFile::new(),
            memory: program.memory.clone(),
            max_instructions,
            executed: 0,
        }
    }

    /// Executes from pc 0 until the pc leaves the program, returning every
    /// branch outcome in program order.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InstructionLimit`] if the configured ceiling is
    /// reached, or [`SimError::InvalidImmediate`] for a negative branch target.
    pub fn run(&mut self) -> Result<BranchRecord, SimError> {
        let mut record = BranchRecord::new();
        let mut pc = 0u64;
        while let Some(instr) = self.program.instructions.get((pc / 4) as usize) {
            if let Some(limit) = self.max_instructions {
                if self.executed >= limit {
                    return Err(SimError::InstructionLimit(limit));
                }
            }
            self.executed += 1;

            let outcome = self.step(instr)?;
            pc = match outcome {
                Some(outcome) => {
                    record.push(outcome);
                    outcome.target
                }
                None => instr.fall_through(),
            };
        }
        tracing::info!(
            executed = self.executed,
            branches = record.outcomes().len(),
            "functional run finished"
        );
        Ok(record)
    }

    /// Executes one instruction. Returns the branch outcome for branches.
    fn step(&mut self, instr: &Instruction) -> Result<Option<BranchOutcome>, SimError> {
        use crate::isa::Operand::{Immediate as Imm, Memory as Mem, Register as R};

        match (instr.opcode, instr.operands.as_slice()) {
            (Opcode::Fld, [R(rd), Mem { offset, base }]) => {
                let value = self.load(self.address(*offset, base));
                self.regs.write(rd, value);
            }
            (Opcode::Fsd, [R(rs), Mem { offset, base }]) => {
                let addr = self.address(*offset, base);
                let _ = self.memory.insert(addr, self.regs.read(rs));
            }
            (Opcode::Add | Opcode::Fadd, [R(rd), R(a), R(b)]) => {
                self.regs.write(rd, self.regs.read(a) + self.regs.read(b));
            }
            (Opcode::Fsub, [R(rd), R(a), R(b)]) => {
                self.regs.write(rd, self.regs.read(a) - self.regs.read(b));
            }
            (Opcode::Fmul, [R(rd), R(a), R(b)]) => {
                self.regs.write(rd, self.regs.read(a) * self.regs.read(b));
            }
            (Opcode::Fdiv, [R(rd), R(a), R(b)]) => {
                let divisor = self.regs.read(b);
                if divisor == 0.0 {
                    tracing::warn!(
                        pc = instr.pc,
                        divisor = %b,
                        "fdiv by zero; result is not finite"
                    );
                }
                self.regs.write(rd, self.regs.read(a) / divisor);
            }
            (Opcode::Slt, [R(rd), R(a), R(b)]) => {
                let less = self.regs.read(a) < self.regs.read(b);
                self.regs.write(rd, if less { 1.0 } else { 0.0 });
            }
            (Opcode::Addi, [R(rd), R(a), Imm(imm)]) => {
                self.regs.write(rd, self.regs.read(a) + *imm as f64);
            }
            (Opcode::Bne, [R(a), R(b), Imm(target)]) => {
                let outcome = if self.regs.read(a) == self.regs.read(b) {
                    BranchOutcome::not_taken(instr.fall_through())
                } else {
                    let target = u64::try_from(*target)
                        .map_err(|_| SimError::InvalidImmediate(target.to_string()))?;
                    BranchOutcome::taken(target)
                };
                return Ok(Some(outcome));
            }
            (opcode, operands) => {
                return Err(SimError::OperandMismatch {
                    opcode,
                    expected: opcode.signature(),
                    found: operands.iter().map(Operand::kind).collect::<Vec<OperandKind>>(),
                });
            }
        }
        Ok(None)
    }

    fn address(&self, offset: i64, base: &Reg) -> i64 {
        (offset as f64 + self.regs.read(base)) as i64
    }

    fn load(&self, addr: i64) -> f64 {
        self.memory.get(&addr).copied().unwrap_or_else(|| {
            tracing::warn!(addr, "load from uninitialized memory; using 0");
            0.0
        })
    }

    /// Architectural register file.
    pub const fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Data memory.
    pub const fn memory(&self) -> &BTreeMap<i64, f64> {
        &self.memory
    }

    /// Dynamic instructions executed so far.
    pub const fn executed(&self) -> u64 {
        self.executed
    }
}
