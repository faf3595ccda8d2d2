//! Branch Target Buffer (BTB).
//!
//! The BTB is a direct-mapped table that predicts both the direction and the
//! target of a branch. Each entry pairs a tag and target with a 2-bit saturating
//! counter; counters of 2 or 3 predict taken.
//!
//! Entries are trained only by resolved outcomes:
//! 1. **Hit:** taken increments the counter and refreshes the target; not-taken decrements it.
//! 2. **Miss, taken:** the slot is replaced by a fresh entry with a weakly-taken counter.
//! 3. **Miss, not taken:** nothing is allocated.
//!
//! # Performance
//!
//! - **Time Complexity:** `predict_branch()` and `update_branch()` are O(1)
//! - **Space Complexity:** O(N) for N entries

use serde::Serialize;

use super::branch_predictor::{BranchOutcome, BranchPredictor, Prediction};
use crate::common::SimError;

/// Saturation limit of the 2-bit counter.
const COUNTER_MAX: u8 = 3;
/// Counter value at and above which an entry predicts taken.
const TAKEN_THRESHOLD: u8 = 2;
/// Counter value of a freshly inserted entry (weakly taken).
const INSERT_COUNTER: u8 = 2;
/// Low pc bits dropped before indexing.
const INDEX_SHIFT: u32 = 4;

/// An entry in the Branch Target Buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BtbEntry {
    /// Indicates if this entry contains valid data.
    pub valid: bool,
    /// Full program counter of the branch that owns the entry.
    pub tag: u64,
    /// The predicted target address.
    pub target: u64,
    /// 2-bit saturating direction counter.
    pub counter: u8,
}

impl BtbEntry {
    const fn matches(&self, pc: u64) -> bool {
        self.valid && self.tag == pc
    }
}

/// Branch Target Buffer structure.
#[derive(Clone, Debug)]
pub struct Btb {
    /// The table of BTB entries.
    table: Vec<BtbEntry>,
}

impl Btb {
    /// Creates an empty Branch Target Buffer.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if `size` is zero.
    pub fn new(size: usize) -> Result<Self, SimError> {
        if size == 0 {
            return Err(SimError::InvalidConfig(
                "btb_entries must be at least 1".to_owned(),
            ));
        }
        Ok(Self {
            table: vec![BtbEntry::default(); size],
        })
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.table.len()
    }

    /// Calculates the table index for a program counter: `(pc >> 4) mod N`.
    pub fn index(&self, pc: u64) -> usize {
        ((pc >> INDEX_SHIFT) % self.table.len() as u64) as usize
    }

    /// The entry at `index`, valid or not.
    pub fn entry(&self, index: usize) -> Option<&BtbEntry> {
        self.table.get(index)
    }

    /// The entry currently owned by `pc`, if any.
    pub fn lookup(&self, pc: u64) -> Option<&BtbEntry> {
        self.entry(self.index(pc)).filter(|e| e.matches(pc))
    }

    /// All entries, in index order.
    pub fn entries(&self) -> &[BtbEntry] {
        &self.table
    }

    /// True iff `pc` owns a valid entry whose counter predicts taken.
    pub fn predict_taken(&self, pc: u64) -> bool {
        self.lookup(pc).is_some_and(|e| e.counter >= TAKEN_THRESHOLD)
    }

    /// Stored target for `pc`; only meaningful when [`Btb::predict_taken`] holds.
    pub fn predicted_target(&self, pc: u64) -> Option<u64> {
        self.lookup(pc)
            .filter(|e| e.counter >= TAKEN_THRESHOLD)
            .map(|e| e.target)
    }

    /// Trains the entry for `pc` with a resolved outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::PredictorIndex`] if the computed index falls outside
    /// the table.
    pub fn train(&mut self, pc: u64, taken: bool, target: u64) -> Result<(), SimError> {
        let index = self.index(pc);
        let entries = self.table.len();
        let entry = self
            .table
            .get_mut(index)
            .ok_or(SimError::PredictorIndex { index, entries })?;

        if entry.matches(pc) {
            if taken {
                entry.counter = (entry.counter + 1).min(COUNTER_MAX);
                entry.target = target;
            } else {
                entry.counter = entry.counter.saturating_sub(1);
            }
        } else if taken {
            if entry.valid {
                tracing::debug!(index, evicted = entry.tag, pc, "btb alias replaced");
            }
            *entry = BtbEntry {
                valid: true,
                tag: pc,
                target,
                counter: INSERT_COUNTER,
            };
        }
        Ok(())
    }
}

impl BranchPredictor for Btb {
    fn predict_branch(&self, pc: u64) -> Prediction {
        let taken = self.predict_taken(pc);
        Prediction {
            taken,
            target: if taken { self.predicted_target(pc) } else { None },
        }
    }

    fn update_branch(&mut self, pc: u64, outcome: &BranchOutcome) -> Result<(), SimError> {
        self.train(pc, outcome.taken, outcome.target)
    }
}
