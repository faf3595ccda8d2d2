//! Execution units and functional components.
//!
//! This module contains the resource station used to model every functional
//! unit (integer ALU, load/store, FP add/multiply/divide, branch unit, decode,
//! rename and reorder buffer) and the branch prediction unit.

/// Branch Resolution Unit: predictor interface and BTB.
pub mod bru;

/// Latency/slot resource stations.
pub mod station;

pub use self::station::{ResourceStation, StationStats};
