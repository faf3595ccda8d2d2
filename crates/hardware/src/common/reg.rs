//! Register names and the architectural register file.
//!
//! Registers are identified by their textual name (`R1`, `F4`, `$0`). This module provides:
//! 1. **Naming:** The [`Reg`] type used as a key by the scoreboard and register file.
//! 2. **Heuristics:** A register-name check whose failure is only a warning.
//! 3. **Storage:** A sparse register file where unwritten registers read as zero.

use std::collections::HashMap;
use std::fmt;

/// Name of an architectural register.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reg(String);

impl Reg {
    /// Creates a register name from its textual form.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the register name as written in the program.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the name is one of the prefixes `R`, `F` or `$`
    /// followed by a decimal index.
    pub fn looks_like_register(&self) -> bool {
        let mut chars = self.0.chars();
        matches!(chars.next(), Some('R' | 'F' | '$'))
            && !chars.as_str().is_empty()
            && chars.all(|c| c.is_ascii_digit())
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Reg {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Architectural register file used by the functional executor.
///
/// Integer and floating-point registers share one namespace keyed by name;
/// all values are held as `f64`.
#[derive(Clone, Debug, Default)]
pub struct RegisterFile {
    regs: HashMap<Reg, f64>,
}

impl RegisterFile {
    /// Creates an empty register file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register; registers never written read as zero.
    pub fn read(&self, reg: &Reg) -> f64 {
        self.regs.get(reg).copied().unwrap_or(0.0)
    }

    /// Writes a register.
    pub fn write(&mut self, reg: &Reg, val: f64) {
        let _ = self.regs.insert(reg.clone(), val);
    }

    /// Returns all written registers sorted by name.
    pub fn dump(&self) -> Vec<(Reg, f64)> {
        let mut regs: Vec<_> = self.regs.iter().map(|(r, v)| (r.clone(), *v)).collect();
        regs.sort_by(|a, b| a.0.cmp(&b.0));
        regs
    }
}
