//! Numerical methods: interpolation, quadrature and bisection root finding.

pub mod error;
pub mod interpolation;
pub mod quadrature;
pub mod roots;
pub mod search;

pub use error::*;
pub use interpolation::*;
pub use quadrature::*;
pub use roots::*;
pub use search::*;

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n as f64 - 1.0);
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
