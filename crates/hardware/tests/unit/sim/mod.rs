//! Simulation driver tests.


/// Program text loader.
pub mod loader;
