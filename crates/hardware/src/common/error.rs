//! Simulation error definitions.
//!
//! Every fallible operation in the simulator returns a [`SimError`]. It covers:
//! 1. **Program errors:** Malformed lines, unknown opcodes, operand signature mismatches, unresolved labels.
//! 2. **Configuration errors:** Invalid parameter values and JSON/IO failures while loading.
//! 3. **Timing invariants:** Resource station, scoreboard, predictor and stage-order violations,
//!    and cycle arithmetic leaving the `u64` range.
//! 4. **Run control:** Branch oracle exhaustion and the optional instruction ceiling.
//!
//! None of these are retried; a caller fixes its input and re-runs.

use thiserror::Error;

use crate::isa::{Opcode, OperandKind};

/// Pipeline stage at which a timestamp was recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Instruction enters the pipeline after the instruction-cache charge.
    Fetch,
    /// Decode station completion.
    Decode,
    /// Functional unit (plus cache, for memory ops) completion.
    Execute,
    /// Reorder buffer admission completion.
    Retire,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Decode => "decode",
            Self::Execute => "execute",
            Self::Retire => "retire",
        };
        f.write_str(name)
    }
}

/// Errors raised while parsing, configuring or simulating a program.
#[derive(Debug, Error)]
pub enum SimError {
    /// A program line matched none of the accepted forms.
    #[error("line {line}: unexpected input `{text}`")]
    MalformedLine {
        /// 1-based source line number.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },

    /// The mnemonic is not part of the instruction set.
    #[error("unknown opcode `{0}`")]
    UnknownOpcode(String),

    /// Operand count or kinds do not match the opcode's signature.
    #[error("`{opcode}` expects operands {expected:?}, found {found:?}")]
    OperandMismatch {
        /// Opcode being decoded.
        opcode: Opcode,
        /// Operand kinds required by the opcode.
        expected: &'static [OperandKind],
        /// Operand kinds actually supplied.
        found: Vec<OperandKind>,
    },

    /// A numeric operand could not be represented as an integer.
    #[error("invalid immediate `{0}`")]
    InvalidImmediate(String),

    /// A branch refers to a label that is never defined.
    #[error("unresolved branch label `{label}` at pc {pc}")]
    UnresolvedLabel {
        /// The label text.
        label: String,
        /// Program counter of the branch.
        pc: u64,
    },

    /// A configuration value is out of its legal range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading a configuration or program file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration document is not valid JSON for [`Config`](crate::config::Config).
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A branch needed an outcome but the oracle had none left.
    #[error("branch oracle exhausted at pc {pc} after {consumed} outcomes")]
    OracleExhausted {
        /// Program counter of the unresolved branch.
        pc: u64,
        /// Number of outcomes consumed before this branch.
        consumed: usize,
    },

    /// A resource station was configured with no slots.
    #[error("resource station `{0}` has no slots")]
    EmptyStation(&'static str),

    /// A resource station slot index fell outside its configured count.
    #[error("resource station `{station}` slot {slot} out of range (slots: {slots})")]
    StationSlot {
        /// Station name.
        station: &'static str,
        /// Requested slot index.
        slot: usize,
        /// Configured slot count.
        slots: usize,
    },

    /// Booking a station slot pushed its next free cycle past `u64::MAX`.
    #[error("resource station `{station}` cycle overflow")]
    StationOverflow {
        /// Station name.
        station: &'static str,
    },

    /// A front-end cycle, stage stamp or stall total exceeded `u64::MAX`.
    #[error("cycle count overflow at pc {pc}")]
    CycleOverflow {
        /// Program counter of the instruction being timed.
        pc: u64,
    },

    /// A scoreboard write named no register.
    #[error("scoreboard write with an empty register name")]
    EmptyRegister,

    /// A predictor table index fell outside the table.
    #[error("branch predictor index {index} out of range (entries: {entries})")]
    PredictorIndex {
        /// Computed index.
        index: usize,
        /// Table size.
        entries: usize,
    },

    /// A stage timestamp did not strictly follow the previous one.
    #[error("pc {pc}: {stage} cycle {cycle} does not follow previous stage cycle {previous}")]
    StageOrder {
        /// Program counter of the instruction.
        pc: u64,
        /// Stage being recorded.
        stage: Stage,
        /// Cycle being recorded.
        cycle: u64,
        /// Cycle of the previously recorded stage.
        previous: u64,
    },

    /// The configured dynamic instruction ceiling was reached.
    #[error("instruction limit of {0} reached")]
    InstructionLimit(u64),
}
