//! Instruction operands.
//!
//! Operand text is classified exactly once, when an instruction is built:
//! 1. **Immediate:** the token is an integer literal (`-8`, `1000`).
//! 2. **Memory:** the token has the form `offset(base)` (`200(R0)`).
//! 3. **Register:** anything else. Names that fail the register heuristic are
//!    accepted with a warning.

use std::fmt;

use crate::common::{Reg, SimError};

/// Kind of an operand, used for signature checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// A register name.
    Register,
    /// A base register plus constant offset.
    Memory,
    /// An integer literal.
    Immediate,
}

/// Direction of data through an operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandFlow {
    /// Read by the instruction.
    Src,
    /// Written by the instruction.
    Dest,
    /// Constant encoded in the instruction.
    Imm,
}

/// A decoded operand.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// A register.
    Register(Reg),
    /// Memory at `offset + base`.
    Memory {
        /// Constant byte offset.
        offset: i64,
        /// Base register.
        base: Reg,
    },
    /// An integer constant (for branches, an absolute target pc).
    Immediate(i64),
}

impl Operand {
    /// Classifies one operand token.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidImmediate`] for numeric literals that are
    /// not integers (`1.5`).
    pub fn parse(token: &str) -> Result<Self, SimError> {
        let token = token.trim();
        if let Ok(value) = token.parse::<i64>() {
            return Ok(Self::Immediate(value));
        }
        if looks_numeric(token) && token.parse::<f64>().is_ok() {
            return Err(SimError::InvalidImmediate(token.to_owned()));
        }
        if let Some((offset, base)) = split_memory(token) {
            let base = Reg::new(base);
            warn_if_not_register(&base, token);
            return Ok(Self::Memory { offset, base });
        }
        let reg = Reg::new(token);
        warn_if_not_register(&reg, token);
        Ok(Self::Register(reg))
    }

    /// Kind of this operand.
    pub const fn kind(&self) -> OperandKind {
        match self {
            Self::Register(_) => OperandKind::Register,
            Self::Memory { .. } => OperandKind::Memory,
            Self::Immediate(_) => OperandKind::Immediate,
        }
    }

    /// Register read when this operand is a source: the register itself, or
    /// the base of a memory operand.
    pub fn source_reg(&self) -> Option<&Reg> {
        match self {
            Self::Register(r) | Self::Memory { base: r, .. } => Some(r),
            Self::Immediate(_) => None,
        }
    }

    /// Register written when this operand is a destination. Memory
    /// destinations write no register.
    pub fn dest_reg(&self) -> Option<&Reg> {
        match self {
            Self::Register(r) => Some(r),
            Self::Memory { .. } | Self::Immediate(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register(r) => write!(f, "{r}"),
            Self::Memory { offset, base } => write!(f, "{offset}({base})"),
            Self::Immediate(v) => write!(f, "{v}"),
        }
    }
}

fn looks_numeric(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
}

/// Splits `offset(base)` into its parts. The offset must be an integer and
/// the base non-empty.
fn split_memory(token: &str) -> Option<(i64, &str)> {
    let inner = token.strip_suffix(')')?;
    let (offset, base) = inner.split_once('(')?;
    let offset = offset.trim().parse::<i64>().ok()?;
    let base = base.trim();
    if base.is_empty() {
        return None;
    }
    Some((offset, base))
}

fn warn_if_not_register(reg: &Reg, operand: &str) {
    if !reg.looks_like_register() {
        tracing::warn!(%reg, operand, "token does not appear to be a register");
    }
}
