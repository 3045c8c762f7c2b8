//! Interpolation of sparse `(x, y)` samples.
//!
//! Three schemes are provided:
//!
//! - **Lagrange**: the unique degree `n - 1` polynomial through all `n` nodes,
//!   evaluated directly from the basis-polynomial formula (O(n²) per query).
//!   High-degree fits oscillate near the domain boundaries (Runge's
//!   phenomenon); the charts show this on purpose, so nothing damps it.
//! - **Linear spline**: one `y = A·x + B` segment per interval.
//! - **Quadratic spline**: one `y = A·x² + B·x + C` segment per interval, with
//!   `A_0 = 0` on the first segment and value + first-derivative continuity
//!   at every interior knot.
//!
//! Both splines locate a query with [`segment_index`], so queries outside the
//! sampled range extrapolate the nearest boundary segment.

use crate::domain::InterpolationMethod;

use super::NumericError;
use super::search::{segment_index, validate_nodes};

/// Evaluate the Lagrange polynomial through `(x_pts, y_pts)` at `x`.
///
/// No validation is done here; use [`Interpolant::new`] for checked input.
pub fn lagrange(x: f64, x_pts: &[f64], y_pts: &[f64]) -> f64 {
    let mut result = 0.0;
    for (i, (&xi, &yi)) in x_pts.iter().zip(y_pts).enumerate() {
        let mut term = yi;
        for (j, &xj) in x_pts.iter().enumerate() {
            if j != i {
                term *= (x - xj) / (xi - xj);
            }
        }
        result += term;
    }
    result
}

/// Coefficients of one linear spline segment: `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSegment {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearSegment {
    pub fn value(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Coefficients of one quadratic spline segment: `y = a·x² + b·x + c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticSegment {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl QuadraticSegment {
    pub fn value(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x + self.c
    }

    pub fn derivative(&self, x: f64) -> f64 {
        2.0 * self.a * x + self.b
    }
}

/// Piecewise-linear interpolant.
#[derive(Debug, Clone)]
pub struct LinearSpline {
    x: Vec<f64>,
    segments: Vec<LinearSegment>,
}

impl LinearSpline {
    pub fn new(x_pts: &[f64], y_pts: &[f64]) -> Result<Self, NumericError> {
        validate_nodes(x_pts, y_pts)?;

        let segments = x_pts
            .windows(2)
            .zip(y_pts.windows(2))
            .map(|(xs, ys)| {
                let slope = (ys[1] - ys[0]) / (xs[1] - xs[0]);
                LinearSegment {
                    slope,
                    intercept: ys[0] - slope * xs[0],
                }
            })
            .collect();

        Ok(Self {
            x: x_pts.to_vec(),
            segments,
        })
    }

    pub fn segments(&self) -> &[LinearSegment] {
        &self.segments
    }

    pub fn value(&self, x: f64) -> f64 {
        self.segments[segment_index(&self.x, x)].value(x)
    }
}

/// Piecewise-quadratic interpolant with C¹ continuity at interior knots.
#[derive(Debug, Clone)]
pub struct QuadraticSpline {
    x: Vec<f64>,
    segments: Vec<QuadraticSegment>,
}

impl QuadraticSpline {
    pub fn new(x_pts: &[f64], y_pts: &[f64]) -> Result<Self, NumericError> {
        validate_nodes(x_pts, y_pts)?;

        let n = x_pts.len();
        let mut segments = Vec::with_capacity(n - 1);

        // First segment degenerates to the line through the first two nodes.
        let b0 = (y_pts[1] - y_pts[0]) / (x_pts[1] - x_pts[0]);
        segments.push(QuadraticSegment {
            a: 0.0,
            b: b0,
            // Intercept at x = 0, so the segment passes through node 0 for any x_0.
            c: y_pts[0] - b0 * x_pts[0],
        });

        for k in 1..n - 1 {
            let prev = segments[k - 1];
            let xk = x_pts[k];
            let dx = x_pts[k + 1] - xk;
            let dy = y_pts[k + 1] - y_pts[k];

            // Slope of the previous segment at the shared knot.
            let knot_slope = 2.0 * prev.a * xk + prev.b;

            let a = dy / (dx * dx) - knot_slope / dx;
            let b = knot_slope - 2.0 * a * xk;
            let c = y_pts[k] - a * xk * xk - b * xk;
            segments.push(QuadraticSegment { a, b, c });
        }

        Ok(Self {
            x: x_pts.to_vec(),
            segments,
        })
    }

    pub fn segments(&self) -> &[QuadraticSegment] {
        &self.segments
    }

    pub fn value(&self, x: f64) -> f64 {
        self.segments[segment_index(&self.x, x)].value(x)
    }
}

#[derive(Debug, Clone)]
enum Scheme {
    Lagrange,
    Linear(LinearSpline),
    Quadratic(QuadraticSpline),
}

/// A validated interpolant: nodes plus a method tag.
///
/// Built fresh for each column being analyzed; spline coefficients are
/// computed once in [`Interpolant::new`].
#[derive(Debug, Clone)]
pub struct Interpolant {
    method: InterpolationMethod,
    x: Vec<f64>,
    y: Vec<f64>,
    scheme: Scheme,
}

impl Interpolant {
    pub fn new(method: InterpolationMethod, x_pts: &[f64], y_pts: &[f64]) -> Result<Self, NumericError> {
        validate_nodes(x_pts, y_pts)?;

        let scheme = match method {
            InterpolationMethod::Lagrange => Scheme::Lagrange,
            InterpolationMethod::LinearSpline => Scheme::Linear(LinearSpline::new(x_pts, y_pts)?),
            InterpolationMethod::QuadraticSpline => Scheme::Quadratic(QuadraticSpline::new(x_pts, y_pts)?),
        };

        Ok(Self {
            method,
            x: x_pts.to_vec(),
            y: y_pts.to_vec(),
            scheme,
        })
    }

    pub fn method(&self) -> InterpolationMethod {
        self.method
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Closed range covered by the nodes; queries outside it extrapolate.
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    pub fn value(&self, x: f64) -> f64 {
        match &self.scheme {
            Scheme::Lagrange => lagrange(x, &self.x, &self.y),
            Scheme::Linear(spline) => spline.value(x),
            Scheme::Quadratic(spline) => spline.value(x),
        }
    }

    pub fn values(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.value(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL: [InterpolationMethod; 3] = [
        InterpolationMethod::Lagrange,
        InterpolationMethod::LinearSpline,
        InterpolationMethod::QuadraticSpline,
    ];

    #[test]
    fn every_method_passes_through_the_nodes() {
        let x = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0];
        let y = [120.0, 450.0, 1300.0, 2100.0, 2600.0, 2400.0];
        for method in ALL {
            let interp = Interpolant::new(method, &x, &y).unwrap();
            for (&xi, &yi) in x.iter().zip(&y) {
                assert_abs_diff_eq!(interp.value(xi), yi, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn lagrange_reproduces_quadratic_everywhere() {
        let x = [-1.0, 0.5, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        for q in [-3.0, -0.25, 1.0, 2.5, 7.0] {
            assert_abs_diff_eq!(lagrange(q, &x, &y), q * q, epsilon = 1e-9);
        }
    }

    #[test]
    fn lagrange_oscillates_near_the_boundary() {
        // Runge's function on 11 equispaced nodes.
        let x: Vec<f64> = (0..11).map(|i| -1.0 + 0.2 * i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 1.0 / (1.0 + 25.0 * v * v)).collect();
        let interp = Interpolant::new(InterpolationMethod::Lagrange, &x, &y).unwrap();
        let near_edge = interp.value(0.9);
        let truth = 1.0 / (1.0 + 25.0 * 0.9 * 0.9);
        assert!((near_edge - truth).abs() > 0.5, "expected Runge overshoot, got {near_edge}");
    }

    #[test]
    fn linear_spline_is_continuous_but_kinked() {
        let x = [0.0, 10.0, 20.0];
        let y = [0.0, 10.0, 40.0];
        let spline = LinearSpline::new(&x, &y).unwrap();
        let segs = spline.segments();

        assert_abs_diff_eq!(segs[0].value(10.0), segs[1].value(10.0), epsilon = 1e-12);
        assert!((segs[0].slope - segs[1].slope).abs() > 1.0);
    }

    #[test]
    fn quadratic_spline_is_c1_at_interior_knots() {
        let x = [0.0, 10.0, 20.0, 30.0, 40.0];
        let y = [5.0, 12.0, 30.0, 28.0, 10.0];
        let spline = QuadraticSpline::new(&x, &y).unwrap();
        let segs = spline.segments();

        assert_eq!(segs[0].a, 0.0);
        for k in 1..segs.len() {
            let xk = x[k];
            assert_abs_diff_eq!(segs[k - 1].value(xk), segs[k].value(xk), epsilon = 1e-9);
            assert_abs_diff_eq!(segs[k - 1].derivative(xk), segs[k].derivative(xk), epsilon = 1e-9);
        }
    }

    #[test]
    fn quadratic_first_segment_handles_nonzero_origin() {
        let x = [100.0, 110.0, 120.0];
        let y = [3.0, 5.0, 4.0];
        let spline = QuadraticSpline::new(&x, &y).unwrap();
        assert_abs_diff_eq!(spline.value(100.0), 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(spline.value(105.0), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn splines_extrapolate_with_boundary_segments() {
        let x = [0.0, 10.0, 20.0];
        let y = [0.0, 10.0, 40.0];
        let interp = Interpolant::new(InterpolationMethod::LinearSpline, &x, &y).unwrap();
        assert_abs_diff_eq!(interp.value(-10.0), -10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(interp.value(30.0), 70.0, epsilon = 1e-12);
        assert_eq!(interp.domain(), (0.0, 20.0));
    }

    #[test]
    fn duplicate_abscissas_are_rejected() {
        let x = [0.0, 10.0, 10.0];
        let y = [1.0, 2.0, 3.0];
        for method in ALL {
            let err = Interpolant::new(method, &x, &y).unwrap_err();
            assert!(matches!(err, NumericError::InvalidInput(_)));
        }
    }

    #[test]
    fn values_evaluates_every_query() {
        let interp = Interpolant::new(InterpolationMethod::LinearSpline, &[0.0, 1.0], &[0.0, 2.0]).unwrap();
        assert_eq!(interp.values(&[0.0, 0.5, 1.0]), vec![0.0, 1.0, 2.0]);
    }
}
