//! Bisection root finding against a target level.

use super::NumericError;

/// Find `x` in `[low, high]` where `f(x)` crosses `target`.
///
/// Classic bisection: each iteration evaluates the midpoint and keeps the half
/// whose endpoints straddle the target (`(f(low) - target) · (f(mid) - target) < 0`
/// moves `high`, anything else moves `low`). The loop runs while
/// `|high - low| > tol` and the midpoint of the last iteration is returned.
///
/// The bracket is not checked for a sign change up front. When `f` never
/// crosses `target` inside it, the search drifts to the `high` endpoint and
/// returns a value within `tol` of it; callers that care should test the
/// bracket with [`brackets_root`] first.
///
/// If the bracket is already narrower than `tol`, its midpoint is returned.
pub fn bisection<F>(f: F, target: f64, low: f64, high: f64, tol: f64) -> Result<f64, NumericError>
where
    F: Fn(f64) -> f64,
{
    if !(tol.is_finite() && tol > 0.0) {
        return Err(NumericError::invalid(format!("bisection tolerance must be finite and > 0, got {tol}")));
    }
    if !(low.is_finite() && high.is_finite()) {
        return Err(NumericError::invalid("bisection bracket must be finite"));
    }

    let mut low = low;
    let mut high = high;
    let mut mid = (low + high) / 2.0;

    while (high - low).abs() > tol {
        mid = (low + high) / 2.0;
        let val = f(mid) - target;

        if (f(low) - target) * val < 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    Ok(mid)
}

/// Whether `f - target` changes sign (or touches zero) between `low` and `high`.
pub fn brackets_root<F>(f: F, target: f64, low: f64, high: f64) -> bool
where
    F: Fn(f64) -> f64,
{
    (f(low) - target) * (f(high) - target) <= 0.0
}
