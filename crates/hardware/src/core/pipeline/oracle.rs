//! Branch outcome oracle.
//!
//! The functional executor runs first and records the ground-truth outcome of
//! every dynamic branch. The timing engine replays those outcomes, strictly in
//! program order, through the narrow [`BranchOracle`] interface.

use serde::Serialize;

use crate::common::SimError;
use crate::core::units::bru::BranchOutcome;

/// Source of resolved branch outcomes, consumed in program order.
pub trait BranchOracle {
    /// Returns the outcome of the next dynamic branch, located at `pc`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OracleExhausted`] once every outcome has been consumed.
    fn next_outcome(&mut self, pc: u64) -> Result<BranchOutcome, SimError>;
}

/// Ordered list of recorded branch outcomes with a replay cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BranchRecord {
    outcomes: Vec<BranchOutcome>,
    #[serde(skip)]
    cursor: usize,
}

impl BranchRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the outcome of the next dynamic branch.
    pub fn push(&mut self, outcome: BranchOutcome) {
        self.outcomes.push(outcome);
    }

    /// Every recorded outcome, in program order.
    pub fn outcomes(&self) -> &[BranchOutcome] {
        &self.outcomes
    }

    /// Number of outcomes handed out so far.
    pub const fn consumed(&self) -> usize {
        self.cursor
    }

    /// Number of outcomes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.outcomes.len() - self.cursor
    }

    /// Rewinds the replay cursor to the first outcome.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl From<Vec<BranchOutcome>> for BranchRecord {
    fn from(outcomes: Vec<BranchOutcome>) -> Self {
        Self {
            outcomes,
            cursor: 0,
        }
    }
}

impl BranchOracle for BranchRecord {
    fn next_outcome(&mut self, pc: u64) -> Result<BranchOutcome, SimError> {
        let outcome = self
            .outcomes
            .get(self.cursor)
            .copied()
            .ok_or(SimError::OracleExhausted {
                pc,
                consumed: self.cursor,
            })?;
        self.cursor += 1;
        Ok(outcome)
    }
}
