//! Error taxonomy for the numeric core.
//!
//! Extrapolation outside the sampled domain is not an error: spline lookups
//! clamp to the boundary segment and Lagrange evaluates the polynomial anywhere.

use thiserror::Error;

/// Errors returned by the interpolation, quadrature, root-finding and
/// validation routines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    /// Malformed input: duplicate or unordered abscissas, mismatched lengths,
    /// indices outside the sample, non-positive tolerances.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A computation hit a zero denominator or an otherwise undefined value.
    #[error("numeric degeneracy: {0}")]
    NumericDegeneracy(String),
}

impl NumericError {
    pub fn invalid(message: impl Into<String>) -> Self {
        NumericError::InvalidInput(message.into())
    }

    pub fn degenerate(message: impl Into<String>) -> Self {
        NumericError::NumericDegeneracy(message.into())
    }
}
