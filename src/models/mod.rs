//! Compartmental epidemic models.
//!
//! The SIRD solver is a small set of pure functions so the pipeline, the
//! synthetic sample generator and the tests can share it.

pub mod sird;

pub use sird::*;
