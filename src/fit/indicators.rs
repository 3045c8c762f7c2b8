//! Public-health indicators and cumulative totals.

use log::{info, warn};

use crate::domain::{
    CumulativeTotals, Indicators, InterpolationMethod, RateParameters, RunParameters, TimeSeries,
};
use crate::math::{Interpolant, NumericError, bisection, brackets_root, simpson, trapezoidal};

/// Herd-immunity threshold in people: `(1 - (a + b) / (r · N)) · N`.
pub fn herd_immunity_threshold(rates: &RateParameters, population: f64) -> f64 {
    (1.0 - (rates.recovery + rates.mortality) / (rates.transmission * population)) * population
}

/// Doses needed to bring `coverage · N` people to immunity, net of the
/// already recovered.
pub fn vaccine_doses(population: f64, coverage: f64, doses_per_person: f64, recovered: f64) -> f64 {
    (population * coverage - recovered) * doses_per_person
}

/// Day on which the linearly interpolated infected curve reaches `i_max`.
///
/// The bracket is the full observed day range. Returns the bisection result and
/// whether the bracket actually contains a crossing; without one the result is
/// the endpoint the search converged to.
pub fn saturation_day(series: &TimeSeries, i_max: f64, tol: f64) -> Result<(f64, bool), NumericError> {
    let infected = Interpolant::new(InterpolationMethod::LinearSpline, series.day(), series.infected())?;
    let (low, high) = infected.domain();

    let bracketed = brackets_root(|t| infected.value(t), i_max, low, high);
    if !bracketed {
        warn!("infected count never crosses hospital capacity {i_max} in days [{low}, {high}]; saturation day is an endpoint");
    }

    let day = bisection(|t| infected.value(t), i_max, low, high, tol)?;
    Ok((day, bracketed))
}

/// Compute R0, HIT, the saturation day and the vaccine-dose estimate.
pub fn compute_indicators(
    series: &TimeSeries,
    rates: &RateParameters,
    params: &RunParameters,
    vaccine_coverage: f64,
    doses_per_person: f64,
) -> Result<Indicators, NumericError> {
    let (saturation_day, saturation_bracketed) = saturation_day(series, params.i_max, params.tolerance)?;
    let indicators = Indicators {
        r0: rates.r0(),
        herd_immunity_threshold: herd_immunity_threshold(rates, params.population),
        saturation_day,
        saturation_bracketed,
        vaccine_doses: vaccine_doses(
            params.population,
            vaccine_coverage,
            doses_per_person,
            series.final_state().recovered,
        ),
    };
    info!(
        "R0={:.4e} HIT={:.0} tc={:.2}d",
        indicators.r0, indicators.herd_immunity_threshold, indicators.saturation_day
    );
    Ok(indicators)
}

/// Integrate new infections `r·S·I` (starting from `I_0`) and recoveries
/// `a·I` (starting from 0) over the whole series, with both quadrature rules.
pub fn cumulative_totals(series: &TimeSeries, rates: &RateParameters, dt: f64) -> Result<CumulativeTotals, NumericError> {
    let end = series.len() - 1;

    let new_infections: Vec<f64> = series
        .susceptible()
        .iter()
        .zip(series.infected())
        .map(|(s, i)| rates.transmission * s * i)
        .collect();
    let recoveries: Vec<f64> = series.infected().iter().map(|i| rates.recovery * i).collect();

    let initial_infected = series.initial_state().infected;

    Ok(CumulativeTotals {
        infections_trapezoidal: trapezoidal(&new_infections, initial_infected, 0, end, dt)?,
        infections_simpson: simpson(&new_infections, initial_infected, 0, end, dt)?,
        recoveries_trapezoidal: trapezoidal(&recoveries, 0.0, 0, end, dt)?,
        recoveries_simpson: simpson(&recoveries, 0.0, 0, end, dt)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series() -> TimeSeries {
        TimeSeries::from_counts(
            vec![0.0, 10.0, 20.0],
            vec![10.0, 15.0, 18.0],
            vec![0.0, 4.0, 9.0],
            vec![0.0, 1.0, 2.0],
            110.0,
        )
        .unwrap()
    }

    #[test]
    fn hit_matches_formula() {
        let rates = RateParameters {
            recovery: 0.04,
            mortality: 0.01,
            transmission: 1e-3,
        };
        // (a+b)/(r·N) = 0.05 / 0.1 = 0.5
        assert_relative_eq!(herd_immunity_threshold(&rates, 100.0), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn vaccine_doses_nets_out_recovered() {
        assert_relative_eq!(vaccine_doses(1000.0, 0.7, 2.0, 100.0), 1200.0, epsilon = 1e-9);
    }

    #[test]
    fn saturation_day_on_linear_infected_curve() {
        // Linear segment 10->20 goes 15 -> 18; 17 is reached at 10 + 20/3.
        let (tc, bracketed) = saturation_day(&series(), 17.0, 1e-6).unwrap();
        assert!(bracketed);
        assert!((tc - (10.0 + 20.0 / 3.0)).abs() <= 1e-6, "tc={tc}");
    }

    #[test]
    fn saturation_day_without_crossing_is_flagged() {
        let (tc, bracketed) = saturation_day(&series(), 1_000.0, 1.0).unwrap();
        assert!(!bracketed);
        assert!(tc > 18.0 && tc <= 20.0, "tc={tc}");
    }

    #[test]
    fn totals_integrate_rate_series() {
        let rates = RateParameters {
            recovery: 0.1,
            mortality: 0.0,
            transmission: 0.0,
        };
        let totals = cumulative_totals(&series(), &rates, 10.0).unwrap();
        // a·I = [1.0, 1.5, 1.8]
        assert_relative_eq!(totals.recoveries_trapezoidal, (1.0 + 1.5) / 2.0 * 10.0 + (1.5 + 1.8) / 2.0 * 10.0, epsilon = 1e-9);
        assert_relative_eq!(totals.recoveries_simpson, 10.0 / 3.0 * (1.0 + 4.0 * 1.5 + 1.8), epsilon = 1e-9);
        // r = 0 -> no new infections beyond I_0
        assert_eq!(totals.infections_trapezoidal, 10.0);
        assert_eq!(totals.infections_simpson, 10.0);
    }
}
