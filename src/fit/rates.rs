//! Rate-constant estimation from finite differences of the observed series.
//!
//! With `ΔX_t = (X_t - X_{t-1}) / Δt` for `t ≥ 1`:
//!
//! - recovery    `a =  mean(ΔR_t / I_t)`
//! - mortality   `b =  mean(ΔD_t / I_t)`
//! - transmission `r = -mean(ΔS_t / (S_t · I_t))`
//!
//! Means skip undefined ratios (`NaN`: the first sample, `0 / 0`) but keep
//! infinities, so a sample with `I_t = 0` and a non-zero difference drives the
//! estimate to ±∞ instead of being silently dropped.

use log::{debug, warn};

use crate::domain::{DerivativeMeans, RateParameters, TimeSeries};
use crate::math::NumericError;

/// Estimated rate constants plus the mean observed derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateEstimate {
    pub rates: RateParameters,
    pub derivatives: DerivativeMeans,
}

/// Backward differences divided by `dt`; the first entry is `NaN`.
pub fn finite_difference(values: &[f64], dt: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(f64::NAN);
    out.extend(values.windows(2).map(|w| (w[1] - w[0]) / dt));
    out
}

/// Mean of the non-`NaN` values; `NaN` when none remain.
pub fn nan_mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { f64::NAN } else { sum / count as f64 }
}

/// Estimate `a`, `b` and `r` from an observed series sampled every `dt` days.
pub fn estimate_rates(series: &TimeSeries, dt: f64) -> Result<RateEstimate, NumericError> {
    if !(dt.is_finite() && dt != 0.0) {
        return Err(NumericError::invalid(format!("time step must be finite and non-zero, got {dt}")));
    }

    let ds = finite_difference(series.susceptible(), dt);
    let di = finite_difference(series.infected(), dt);
    let dr = finite_difference(series.recovered(), dt);
    let dd = finite_difference(series.deceased(), dt);

    let s = series.susceptible();
    let i = series.infected();

    let zero_infected = i.iter().skip(1).filter(|&&v| v == 0.0).count();
    if zero_infected > 0 {
        warn!("{zero_infected} sample(s) with zero infected; rate ratios at those samples are undefined");
    }

    let recovery = nan_mean(dr.iter().zip(i).map(|(d, i)| d / i));
    let mortality = nan_mean(dd.iter().zip(i).map(|(d, i)| d / i));
    let transmission = -nan_mean(ds.iter().zip(s.iter().zip(i)).map(|(d, (s, i))| d / (s * i)));

    let rates = RateParameters {
        recovery,
        mortality,
        transmission,
    };
    debug!("estimated rates: a={recovery:.6e} b={mortality:.6e} r={transmission:.6e}");

    if !(recovery.is_finite() && mortality.is_finite() && transmission.is_finite()) {
        warn!("rate estimates are not all finite (a={recovery}, b={mortality}, r={transmission})");
    }

    Ok(RateEstimate {
        rates,
        derivatives: DerivativeMeans {
            susceptible: nan_mean(ds),
            infected: nan_mean(di),
            recovered: nan_mean(dr),
            deceased: nan_mean(dd),
        },
    })
}
