//! Composite quadrature over sampled rate series.
//!
//! Both rules accumulate onto an initial value:
//!
//! ```text
//! total = initial + Σ contributions over samples[start..=end]
//! ```
//!
//! Simpson's rule needs an even number of subintervals. When `end - start` is
//! odd the last subinterval is dropped (`end -= 1`) and the result is the same
//! as integrating the shortened range.

use super::NumericError;

fn check_range(values: &[f64], start: usize, end: usize, step: f64) -> Result<(), NumericError> {
    if !step.is_finite() {
        return Err(NumericError::invalid("integration step must be finite"));
    }
    if start < end && end >= values.len() {
        return Err(NumericError::invalid(format!(
            "end index {end} is outside a series of length {}",
            values.len()
        )));
    }
    Ok(())
}

/// Composite trapezoidal rule: adds `(f_i + f_{i+1}) / 2 · step` for every
/// `i` in `start..end`. An empty range returns `initial` unchanged.
pub fn trapezoidal(values: &[f64], initial: f64, start: usize, end: usize, step: f64) -> Result<f64, NumericError> {
    check_range(values, start, end, step)?;

    let mut total = initial;
    for i in start..end {
        total += (values[i] + values[i + 1]) / 2.0 * step;
    }
    Ok(total)
}

/// Composite Simpson rule: adds `step / 3 · (f_i + 4 f_{i+1} + f_{i+2})` for
/// every `i` in `start..end` stepping by two.
pub fn simpson(values: &[f64], initial: f64, start: usize, end: usize, step: f64) -> Result<f64, NumericError> {
    check_range(values, start, end, step)?;

    let mut end = end;
    if end > start && (end - start) % 2 != 0 {
        end -= 1;
    }

    let mut total = initial;
    for i in (start..end).step_by(2) {
        total += step / 3.0 * (values[i] + 4.0 * values[i + 1] + values[i + 2]);
    }
    Ok(total)
}
