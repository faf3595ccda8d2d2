//! Program loading and simulation drivers.
//!
//! Provides the text program loader, the functional executor that records
//! branch outcomes, and the [`Simulator`] that ties both to the timing engine.

/// Architectural interpreter producing the branch record.
pub mod functional;

/// Assembly text loader.
pub mod loader;

/// Two-pass simulator façade.
pub mod simulator;

pub use self::functional::FunctionalExecutor;
pub use self::loader::Program;
pub use self::simulator::{SimReport, Simulator};
