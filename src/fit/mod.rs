//! Model calibration and derived indicators.
//!
//! - `rates`: recovery / mortality / transmission rates from finite differences
//! - `indicators`: R0, herd-immunity threshold, saturation day, vaccine doses,
//!   and cumulative totals by quadrature

pub mod indicators;
pub mod rates;

pub use indicators::*;
pub use rates::*;
