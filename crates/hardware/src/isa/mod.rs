//! Instruction Set Definitions.
//!
//! Contains the opcode table, operand classification, and the decoded
//! instruction descriptor shared by the functional executor and the timing
//! model.
//!
//! # Instructions
//!
//! * Integer: `add`, `addi`, `slt`.
//! * Memory: `fld`, `fsd`.
//! * Floating point: `fadd`, `fsub`, `fmul`, `fdiv`.
//! * Control: `bne`.

/// Instruction descriptors and stage timestamps.
pub mod instruction;

/// Opcodes, operand signatures and flow tables.
pub mod opcode;

/// Operand classification.
pub mod operand;

pub use instruction::{Instruction, StageTimes};
pub use opcode::{OpClass, Opcode};
pub use operand::{Operand, OperandFlow, OperandKind};
