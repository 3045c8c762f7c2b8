//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - passed between the numeric core and the pipeline
//! - exported to JSON/CSV
//! - reloaded later to regenerate reports

use std::path::PathBuf;

use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::float_repr;
use crate::math::NumericError;

/// Interpolation scheme used to build a curve through sampled points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InterpolationMethod {
    Lagrange,
    LinearSpline,
    QuadraticSpline,
}

impl InterpolationMethod {
    pub const ALL: [InterpolationMethod; 3] = [
        InterpolationMethod::Lagrange,
        InterpolationMethod::LinearSpline,
        InterpolationMethod::QuadraticSpline,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            InterpolationMethod::Lagrange => "Lagrange",
            InterpolationMethod::LinearSpline => "Linear spline",
            InterpolationMethod::QuadraticSpline => "Quadratic spline",
        }
    }
}

/// Time-stepping scheme for the SIRD system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EulerMethod {
    Explicit,
    /// Partially implicit: the infected update uses the freshly computed `S_t`.
    Implicit,
}

impl EulerMethod {
    pub fn display_name(self) -> &'static str {
        match self {
            EulerMethod::Explicit => "Explicit Euler",
            EulerMethod::Implicit => "Implicit Euler",
        }
    }
}

/// One of the four SIRD compartments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Compartment {
    Susceptible,
    Infected,
    Recovered,
    Deceased,
}

impl Compartment {
    pub const ALL: [Compartment; 4] = [
        Compartment::Susceptible,
        Compartment::Infected,
        Compartment::Recovered,
        Compartment::Deceased,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Compartment::Susceptible => "Susceptible",
            Compartment::Infected => "Infected",
            Compartment::Recovered => "Recovered",
            Compartment::Deceased => "Deceased",
        }
    }

    /// Lowercase key used in CSV headers and output file names.
    pub fn key(self) -> &'static str {
        match self {
            Compartment::Susceptible => "susceptible",
            Compartment::Infected => "infected",
            Compartment::Recovered => "recovered",
            Compartment::Deceased => "deceased",
        }
    }
}

/// Compartment counts at a single point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SirdState {
    pub susceptible: f64,
    pub infected: f64,
    pub recovered: f64,
    pub deceased: f64,
}

impl SirdState {
    pub fn total(&self) -> f64 {
        self.susceptible + self.infected + self.recovered + self.deceased
    }
}

/// An observed epidemic time series, stored column-wise.
///
/// Days are strictly increasing and every column has one value per day.
/// The series is read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    day: Vec<f64>,
    susceptible: Vec<f64>,
    infected: Vec<f64>,
    recovered: Vec<f64>,
    deceased: Vec<f64>,
}

impl TimeSeries {
    pub fn new(
        day: Vec<f64>,
        susceptible: Vec<f64>,
        infected: Vec<f64>,
        recovered: Vec<f64>,
        deceased: Vec<f64>,
    ) -> Result<Self, NumericError> {
        let n = day.len();
        if [susceptible.len(), infected.len(), recovered.len(), deceased.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err(NumericError::invalid("all time-series columns must have the same length"));
        }
        if n < 2 {
            return Err(NumericError::invalid("a time series needs at least two samples"));
        }
        if day.iter().any(|d| !d.is_finite()) {
            return Err(NumericError::invalid("days must be finite"));
        }
        if day.windows(2).any(|w| w[1] <= w[0]) {
            return Err(NumericError::invalid("days must be strictly increasing"));
        }

        Ok(Self {
            day,
            susceptible,
            infected,
            recovered,
            deceased,
        })
    }

    /// Build a series from observed I/R/D counts, deriving
    /// `S = population - (I + R + D)`.
    pub fn from_counts(
        day: Vec<f64>,
        infected: Vec<f64>,
        recovered: Vec<f64>,
        deceased: Vec<f64>,
        population: f64,
    ) -> Result<Self, NumericError> {
        if infected.len() != recovered.len() || infected.len() != deceased.len() {
            return Err(NumericError::invalid("all time-series columns must have the same length"));
        }
        let susceptible = infected
            .iter()
            .zip(&recovered)
            .zip(&deceased)
            .map(|((i, r), d)| population - (i + r + d))
            .collect();
        Self::new(day, susceptible, infected, recovered, deceased)
    }

    pub fn len(&self) -> usize {
        self.day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.day.is_empty()
    }

    pub fn day(&self) -> &[f64] {
        &self.day
    }

    pub fn susceptible(&self) -> &[f64] {
        &self.susceptible
    }

    pub fn infected(&self) -> &[f64] {
        &self.infected
    }

    pub fn recovered(&self) -> &[f64] {
        &self.recovered
    }

    pub fn deceased(&self) -> &[f64] {
        &self.deceased
    }

    pub fn column(&self, compartment: Compartment) -> &[f64] {
        match compartment {
            Compartment::Susceptible => &self.susceptible,
            Compartment::Infected => &self.infected,
            Compartment::Recovered => &self.recovered,
            Compartment::Deceased => &self.deceased,
        }
    }

    pub fn state(&self, idx: usize) -> SirdState {
        SirdState {
            susceptible: self.susceptible[idx],
            infected: self.infected[idx],
            recovered: self.recovered[idx],
            deceased: self.deceased[idx],
        }
    }

    pub fn initial_state(&self) -> SirdState {
        self.state(0)
    }

    pub fn final_state(&self) -> SirdState {
        self.state(self.len() - 1)
    }
}

/// Output of one SIRD solver run: one state per input day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationTrace {
    pub method: EulerMethod,
    pub day: Vec<f64>,
    pub susceptible: Vec<f64>,
    pub infected: Vec<f64>,
    pub recovered: Vec<f64>,
    pub deceased: Vec<f64>,
}

impl SimulationTrace {
    pub fn len(&self) -> usize {
        self.day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.day.is_empty()
    }

    pub fn column(&self, compartment: Compartment) -> &[f64] {
        match compartment {
            Compartment::Susceptible => &self.susceptible,
            Compartment::Infected => &self.infected,
            Compartment::Recovered => &self.recovered,
            Compartment::Deceased => &self.deceased,
        }
    }

    pub fn state(&self, idx: usize) -> SirdState {
        SirdState {
            susceptible: self.susceptible[idx],
            infected: self.infected[idx],
            recovered: self.recovered[idx],
            deceased: self.deceased[idx],
        }
    }

    /// First index whose state contains a non-finite value.
    pub fn first_non_finite(&self) -> Option<usize> {
        (0..self.len()).find(|&t| {
            let s = self.state(t);
            !(s.susceptible.is_finite() && s.infected.is_finite() && s.recovered.is_finite() && s.deceased.is_finite())
        })
    }
}

/// Rate constants of the SIRD model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateParameters {
    /// Recovery rate `a` (per day).
    #[serde(with = "float_repr")]
    pub recovery: f64,
    /// Mortality rate `b` (per day).
    #[serde(with = "float_repr")]
    pub mortality: f64,
    /// Transmission rate `r` (per person per day).
    #[serde(with = "float_repr")]
    pub transmission: f64,
}

impl RateParameters {
    /// Basic reproduction number `R0 = r / (a + b)`.
    pub fn r0(&self) -> f64 {
        self.transmission / (self.recovery + self.mortality)
    }
}

/// Mean observed rate of change per compartment (people/day).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivativeMeans {
    #[serde(with = "float_repr")]
    pub susceptible: f64,
    #[serde(with = "float_repr")]
    pub infected: f64,
    #[serde(with = "float_repr")]
    pub recovered: f64,
    #[serde(with = "float_repr")]
    pub deceased: f64,
}

/// Public-health indicators derived from the rates and the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    #[serde(with = "float_repr")]
    pub r0: f64,
    /// Herd-immunity threshold, in people.
    #[serde(with = "float_repr")]
    pub herd_immunity_threshold: f64,
    /// Day on which the infected curve reaches hospital capacity.
    #[serde(with = "float_repr")]
    pub saturation_day: f64,
    /// Whether the observed range actually crosses hospital capacity.
    ///
    /// When `false`, `saturation_day` is the endpoint the bisection drifted to.
    pub saturation_bracketed: bool,
    #[serde(with = "float_repr")]
    pub vaccine_doses: f64,
}

/// Cumulative quantities integrated from rate series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativeTotals {
    #[serde(with = "float_repr")]
    pub infections_trapezoidal: f64,
    #[serde(with = "float_repr")]
    pub infections_simpson: f64,
    #[serde(with = "float_repr")]
    pub recoveries_trapezoidal: f64,
    #[serde(with = "float_repr")]
    pub recoveries_simpson: f64,
}

/// Summary stats about the loaded series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_samples: usize,
    pub first_day: f64,
    pub last_day: f64,
    pub final_infected: f64,
    pub final_recovered: f64,
    pub final_deceased: f64,
}

/// Constants fixed for a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    pub population: f64,
    pub i_max: f64,
    pub dt: f64,
    pub tolerance: f64,
}

/// Everything the report writer needs, in a serializable form.
///
/// This is the schema of the summary JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub tool: String,
    pub generated_at: DateTime<Local>,
    pub region: String,
    pub compare_region: Option<String>,
    pub parameters: RunParameters,
    pub stats: DatasetStats,
    pub derivatives: DerivativeMeans,
    pub rates: RateParameters,
    pub indicators: Indicators,
    pub totals: CumulativeTotals,
}

/// A full analysis run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus environment and defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_path: PathBuf,
    pub region: String,
    pub compare_region: Option<String>,

    pub population: f64,
    pub i_max: f64,
    pub dt: f64,
    pub tolerance: f64,

    /// Fraction of the population the vaccine-dose estimate targets.
    pub vaccine_coverage: f64,
    pub doses_per_person: f64,

    /// Interpolation grid (days).
    pub eval_min: f64,
    pub eval_max: f64,
    pub eval_points: usize,

    pub out_dir: PathBuf,
    pub graphs: bool,

    pub plot: bool,
    pub plot_compartment: Compartment,
    pub plot_method: InterpolationMethod,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_json: Option<PathBuf>,
    pub export_traces: Option<PathBuf>,
}

impl RunConfig {
    pub fn run_parameters(&self) -> RunParameters {
        RunParameters {
            population: self.population,
            i_max: self.i_max,
            dt: self.dt,
            tolerance: self.tolerance,
        }
    }
}

/// Configuration for synthetic dataset generation.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub output: PathBuf,
    pub population: f64,
    pub samples: usize,
    pub dt: f64,
    pub initial_infected: f64,
    pub rates: RateParameters,
    /// Log-normal observation noise (standard deviation of the log).
    pub noise: f64,
    pub seed: u64,
    pub region: String,
    pub compare_region: String,
    /// Transmission multiplier applied to the comparison region.
    pub compare_scale: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_counts_derives_susceptible() {
        let ts = TimeSeries::from_counts(
            vec![0.0, 10.0],
            vec![10.0, 15.0],
            vec![0.0, 4.0],
            vec![0.0, 1.0],
            110.0,
        )
        .unwrap();
        assert_eq!(ts.susceptible(), &[100.0, 90.0]);
        assert_eq!(ts.initial_state().total(), 110.0);
        assert_eq!(ts.final_state().total(), 110.0);
    }

    #[test]
    fn series_rejects_bad_shapes() {
        let ok = vec![0.0, 10.0];
        assert!(TimeSeries::new(ok.clone(), ok.clone(), ok.clone(), ok.clone(), vec![0.0]).is_err());
        assert!(TimeSeries::new(vec![0.0], vec![1.0], vec![1.0], vec![1.0], vec![1.0]).is_err());
        assert!(TimeSeries::new(vec![10.0, 0.0], ok.clone(), ok.clone(), ok.clone(), ok.clone()).is_err());
    }

    #[test]
    fn r0_is_transmission_over_removal() {
        let rates = RateParameters {
            recovery: 0.08,
            mortality: 0.02,
            transmission: 0.3,
        };
        assert!((rates.r0() - 3.0).abs() < 1e-12);
    }
}
