//! # Unit Components
//!
//! Fine-grained tests for each part of the timing model, organized the way
//! the library is: configuration, core (stations, scoreboard, BTB, engine),
//! ISA, simulation drivers and statistics.




/// Program loader, functional executor and simulator façade.
pub mod sim;

/// Statistics counters and report rendering.
pub mod stats;
