//! Program loader.
//!
//! Reads the line-oriented assembly format into a [`Program`]. It performs:
//! 1. **Filtering:** Blank lines and lines starting with `%` are skipped.
//! 2. **Memory image:** `addr, value` lines seed data memory.
//! 3. **Labels:** `name:` binds `name` to the pc of the next instruction; an
//!    instruction may follow the colon on the same line.
//! 4. **Resolution:** Branch labels are replaced by their absolute pc (`4 × index`)
//!    before the instructions are decoded.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::common::SimError;
use crate::isa::{Instruction, Opcode};

/// A decoded program and its initial data memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    /// Instructions in stream order; the instruction at index `i` has pc `4 * i`.
    pub instructions: Vec<Instruction>,
    /// Initial data memory, by address.
    pub memory: BTreeMap<i64, f64>,
    /// Label definitions, resolved to pcs.
    pub labels: BTreeMap<String, u64>,
}

/// An instruction line waiting for label resolution.
struct PendingLine<'a> {
    line: usize,
    pc: u64,
    text: &'a str,
}

impl Program {
    /// Parses program source text.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MalformedLine`] for a line matching no accepted form,
    /// [`SimError::UnresolvedLabel`] for a branch to an undefined label, or any
    /// instruction decode error.
    pub fn parse(source: &str) -> Result<Self, SimError> {
        let mut memory = BTreeMap::new();
        let mut labels = BTreeMap::new();
        let mut pending = Vec::new();

        for (idx, raw) in source.lines().enumerate() {
            let line = idx + 1;
            let mut text = raw.trim();
            if text.is_empty() || text.starts_with('%') {
                continue;
            }

            if let Some((addr, value)) = parse_memory_line(text) {
                if memory.insert(addr, value).is_some() {
                    tracing::warn!(line, addr, "memory address initialized twice");
                }
                continue;
            }

            if let Some((label, rest)) = split_label(text) {
                let pc = 4 * pending.len() as u64;
                if labels.insert(label.to_owned(), pc).is_some() {
                    tracing::warn!(line, label, "label redefined");
                }
                text = rest;
                if text.is_empty() {
                    continue;
                }
            }

            if !looks_like_instruction(text) {
                return Err(SimError::MalformedLine {
                    line,
                    text: text.to_owned(),
                });
            }
            pending.push(PendingLine {
                line,
                pc: 4 * pending.len() as u64,
                text,
            });
        }

        let instructions = pending
            .iter()
            .map(|p| {
                let resolved = resolve_branch_label(p, &labels)?;
                Instruction::parse(p.pc, &resolved)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            instructions = instructions.len(),
            memory = memory.len(),
            labels = labels.len(),
            "program parsed"
        );
        Ok(Self {
            instructions,
            memory,
            labels,
        })
    }

    /// Reads and parses a program file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read, or any parse error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let source = fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Number of static instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl FromStr for Program {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_memory_line(text: &str) -> Option<(i64, f64)> {
    let (addr, value) = text.split_once(',')?;
    let addr = addr.trim().parse().ok()?;
    let value = value.trim().parse().ok()?;
    Some((addr, value))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn split_label(text: &str) -> Option<(&str, &str)> {
    let (label, rest) = text.split_once(':')?;
    let label = label.trim();
    is_identifier(label).then(|| (label, rest.trim()))
}

/// `mnemonic operand, ...`: an alphabetic word, whitespace, then operands.
fn looks_like_instruction(text: &str) -> bool {
    text.split_once(char::is_whitespace)
        .is_some_and(|(m, rest)| m.chars().all(|c| c.is_ascii_alphabetic()) && rest.contains(','))
}

fn resolve_branch_label(
    pending: &PendingLine<'_>,
    labels: &BTreeMap<String, u64>,
) -> Result<String, SimError> {
    let text = pending.text;
    let mnemonic = text.split_whitespace().next().unwrap_or_default();
    let is_branch = Opcode::from_str(mnemonic).is_ok_and(Opcode::is_branch);
    let Some((head, target)) = text.rsplit_once(',').filter(|_| is_branch) else {
        return Ok(text.to_owned());
    };

    let target = target.trim();
    if !is_identifier(target) {
        return Ok(text.to_owned());
    }
    match labels.get(target) {
        Some(pc) => Ok(format!("{head}, {pc}")),
        None => {
            tracing::warn!(line = pending.line, label = target, "unresolved branch label");
            Err(SimError::UnresolvedLabel {
                label: target.to_owned(),
                pc: pending.pc,
            })
        }
    }
}
