//! Timing pipeline.
//!
//! This module contains the cycle-level timing model. It includes the following components:
//! 1. **Engine:** Fetch-group loop that times every dynamic instruction through decode, execute and retire.
//! 2. **Oracle:** Ordered source of resolved branch outcomes.
//! 3. **Scoreboard:** Register ready cycles for RAW dependency stalls.

/// Fetch-group timing engine and per-instruction timing records.
pub mod engine;

/// Branch outcome oracle.
pub mod oracle;

/// Register ready-cycle scoreboard.
pub mod scoreboard;

pub use self::engine::{BranchEvent, InstructionTiming, MachineState, TimingEngine};
pub use self::oracle::{BranchOracle, BranchRecord};
pub use self::scoreboard::Scoreboard;
