//! Functional unit tests.

/// Branch unit.
pub mod bru;

/// Resource station allocation.
pub mod station;
