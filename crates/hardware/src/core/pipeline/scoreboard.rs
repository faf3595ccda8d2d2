//! Cycle-based scoreboard for register dependency tracking.
//!
//! Maps each register to the cycle at which its most recent write becomes
//! visible. A register with no entry is ready at any queried cycle. When several
//! in-flight writers target the same register, the latest completion wins.

use std::collections::HashMap;

use crate::common::{Reg, SimError};

/// Ready-cycle scoreboard.
#[derive(Clone, Debug, Default)]
pub struct Scoreboard {
    ready: HashMap<Reg, u64>,
}

impl Scoreboard {
    /// Create a new scoreboard with no pending writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `reg` is written and visible from `ready_cycle`.
    ///
    /// The stored value only ever grows; an earlier ready cycle than the one
    /// already recorded is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::EmptyRegister`] for an empty register name.
    pub fn record_write(&mut self, reg: &Reg, ready_cycle: u64) -> Result<(), SimError> {
        if reg.as_str().is_empty() {
            return Err(SimError::EmptyRegister);
        }
        let slot = self.ready.entry(reg.clone()).or_insert(ready_cycle);
        *slot = (*slot).max(ready_cycle);
        Ok(())
    }

    /// Cycles a reader of `reg` at `at_cycle` must stall.
    pub fn wait_cycles(&self, reg: &Reg, at_cycle: u64) -> u64 {
        self.ready
            .get(reg)
            .map_or(0, |ready| ready.saturating_sub(at_cycle))
    }

    /// Stored ready cycle of `reg`, if it has ever been written.
    pub fn ready_cycle(&self, reg: &Reg) -> Option<u64> {
        self.ready.get(reg).copied()
    }

    /// Number of tracked registers.
    pub fn len(&self) -> usize {
        self.ready.len()
    }

    /// Returns `true` if no register has been written.
    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }
}
