//! Branch unit tests.

/// Branch target buffer counter and replacement behaviour.
pub mod btb;
