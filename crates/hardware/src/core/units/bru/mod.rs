//! Branch prediction unit (BRU).
//!
//! This module contains the predictor interface and the direct-mapped branch
//! target buffer with 2-bit saturating counters that implements it.

pub use self::branch_predictor::{BranchOutcome, BranchPredictor, Prediction};
pub use self::btb::{Btb, BtbEntry};

/// Branch predictor trait and prediction/outcome values.
pub mod branch_predictor;

/// Branch Target Buffer with direction counters.
pub mod btb;
