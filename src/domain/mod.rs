//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - method/compartment enums (`InterpolationMethod`, `EulerMethod`, `Compartment`)
//! - the observed series (`TimeSeries`) and solver output (`SimulationTrace`)
//! - estimated parameters, indicators and the serializable run summary
//! - run configuration (`RunConfig`, `SampleConfig`)

pub mod float_repr;
pub mod types;

pub use types::*;
