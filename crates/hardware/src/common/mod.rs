//! Common types used throughout the simulator.
//!
//! This module provides the building blocks shared by the parser, the functional
//! executor and the timing model. It includes:
//! 1. **Error Handling:** The [`SimError`] enum returned by every fallible operation.
//! 2. **Register Names:** The [`Reg`] name type and the architectural [`RegisterFile`].

/// Error types and pipeline stage identifiers.
pub mod error;

/// Register names and the architectural register file.
pub mod reg;

pub use error::{SimError, Stage};
pub use reg::{Reg, RegisterFile};
