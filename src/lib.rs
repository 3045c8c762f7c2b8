//! `sird-analysis` library crate.
//!
//! The binary (`sird`) is a thin wrapper around this library so that:
//!
//! - the numeric core is testable without spawning processes
//! - modules are reusable (notebooks, other front-ends)
//! - code stays easy to navigate as the project grows
//!
//! Layering, bottom-up: `math` (interpolation, quadrature, bisection) ->
//! `domain` -> `models` (Euler solvers) and `fit` (rates, indicators) ->
//! `io`, `report`, `plot` -> `app`.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
