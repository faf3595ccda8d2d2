//! Core timing model.
//!
//! This module contains the timing pipeline and the units it books: resource
//! stations for every functional unit and the branch prediction unit.

/// Timing pipeline (engine, branch oracle, scoreboard).
pub mod pipeline;

/// Execution units (resource stations, branch predictor).
pub mod units;

pub use self::pipeline::TimingEngine;
