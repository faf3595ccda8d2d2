//! Cycle-level pipeline timing estimator.
//!
//! This crate estimates the cycle count of a small RISC-like program on a
//! configurable superscalar core. It provides:
//! 1. **ISA:** Opcodes, operand classification and decoded instructions.
//! 2. **Core:** Resource stations, the register scoreboard, the BTB and the fetch-group timing engine.
//! 3. **Simulation:** Program loader, functional executor (branch oracle) and the two-pass simulator.
//! 4. **Configuration and statistics:** Flat JSON configuration and run statistics.

/// Common types (errors, register names, register file).
pub mod common;
/// Timing-model configuration (defaults, unit parameters, JSON loading).
pub mod config;
/// Timing core (pipeline engine, oracle, scoreboard, stations, branch predictor).
pub mod core;
/// Instruction set (opcodes, operands, instructions, stage timestamps).
pub mod isa;
/// Program loader, functional executor and simulator.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Error type returned by every fallible operation.
pub use crate::common::SimError;
/// Root configuration type; use `Config::default()` or load it from JSON.
pub use crate::config::Config;
/// Timing engine; drive it directly with a custom branch oracle.
pub use crate::core::TimingEngine;
/// Two-pass simulator and its result.
pub use crate::sim::{Program, SimReport, Simulator};
