//! Branch Predictor Interface.
//!
//! This module defines the `BranchPredictor` trait the timing engine queries
//! before a branch resolves and trains afterwards, together with the prediction
//! and outcome values exchanged across it.

use serde::Serialize;

use crate::common::SimError;

/// Ground-truth outcome of one dynamic branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BranchOutcome {
    /// Whether the branch was taken.
    pub taken: bool,
    /// Resolved next pc: the branch target if taken, otherwise the fall-through.
    pub target: u64,
}

impl BranchOutcome {
    /// A taken branch to `target`.
    pub const fn taken(target: u64) -> Self {
        Self {
            taken: true,
            target,
        }
    }

    /// A not-taken branch falling through to `next_pc`.
    pub const fn not_taken(next_pc: u64) -> Self {
        Self {
            taken: false,
            target: next_pc,
        }
    }
}

/// Direction and target predicted for a branch before it resolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Prediction {
    /// Predicted direction.
    pub taken: bool,
    /// Predicted target; only present when `taken`.
    pub target: Option<u64>,
}

impl Prediction {
    /// Returns `true` if this prediction disagrees with the resolved outcome:
    /// the directions differ, or both are taken but to different targets.
    pub fn mispredicts(&self, outcome: &BranchOutcome) -> bool {
        if self.taken != outcome.taken {
            return true;
        }
        self.taken && self.target != Some(outcome.target)
    }
}

/// Trait for branch prediction algorithms.
pub trait BranchPredictor {
    /// Predicts the direction and target of the branch at `pc`.
    fn predict_branch(&self, pc: u64) -> Prediction;

    /// Trains the predictor with a resolved outcome. Called once per dynamic
    /// branch, after its prediction has been read.
    ///
    /// # Errors
    ///
    /// Returns an error if the predictor's internal state is inconsistent.
    fn update_branch(&mut self, pc: u64, outcome: &BranchOutcome) -> Result<(), SimError>;
}
