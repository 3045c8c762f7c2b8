//! Sorted-abscissa validation and segment lookup shared by the spline
//! evaluators.

use super::NumericError;

/// Validate a set of interpolation nodes.
///
/// Requires matching lengths, at least two nodes, finite abscissas and a
/// strictly increasing `x`.
pub fn validate_nodes(x: &[f64], y: &[f64]) -> Result<(), NumericError> {
    if x.len() != y.len() {
        return Err(NumericError::invalid(format!(
            "x_pts and y_pts must have the same length (got {} and {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(NumericError::invalid("at least two interpolation nodes are required"));
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(NumericError::invalid("x_pts must be finite"));
    }
    if let Some(pos) = x.windows(2).position(|w| w[1] <= w[0]) {
        return Err(NumericError::invalid(format!(
            "x_pts must be strictly increasing (x[{}]={} then x[{}]={})",
            pos,
            x[pos],
            pos + 1,
            x[pos + 1]
        )));
    }
    Ok(())
}

/// Index of the segment used to evaluate a spline at `xq`.
///
/// This is the left insertion point of `xq` in `x` minus one, clamped to
/// `[0, x.len() - 2]`. A query equal to an interior knot `x[k]` therefore
/// resolves to segment `k - 1`, and queries outside `[x[0], x[n-1]]` reuse
/// the nearest boundary segment.
///
/// `x` must hold at least two sorted values.
pub fn segment_index(x: &[f64], xq: f64) -> usize {
    let insertion = x.partition_point(|v| *v < xq);
    insertion.saturating_sub(1).min(x.len() - 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_index_clamps_both_ends() {
        let x = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(segment_index(&x, -5.0), 0);
        assert_eq!(segment_index(&x, 0.0), 0);
        assert_eq!(segment_index(&x, 5.0), 0);
        assert_eq!(segment_index(&x, 10.0), 0);
        assert_eq!(segment_index(&x, 10.5), 1);
        assert_eq!(segment_index(&x, 30.0), 2);
        assert_eq!(segment_index(&x, 750.0), 2);
    }

    #[test]
    fn validate_rejects_malformed_nodes() {
        assert!(validate_nodes(&[0.0, 1.0], &[1.0]).is_err());
        assert!(validate_nodes(&[0.0], &[1.0]).is_err());
        assert!(validate_nodes(&[0.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(validate_nodes(&[0.0, 2.0, 1.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(validate_nodes(&[0.0, f64::NAN], &[1.0, 2.0]).is_err());
        assert!(validate_nodes(&[0.0, 10.0, 20.0], &[1.0, 2.0, 3.0]).is_ok());
    }
}
