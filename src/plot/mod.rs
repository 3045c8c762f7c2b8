//! Plotting: ASCII plots for the terminal and SVG charts for the graphs
//! directory.

pub mod ascii;
pub mod charts;

pub use ascii::*;
pub use charts::*;
