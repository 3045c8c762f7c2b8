//! Shared analysis pipeline used by the `analyze` and `simulate` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> rate estimation -> indicators + totals -> interpolation grid
//! -> Euler traces -> summary
//!
//! The command handlers can then focus on presentation (printing, charts,
//! report files).

use chrono::Local;
use log::{info, warn};

use crate::domain::{
    AnalysisSummary, Compartment, CumulativeTotals, EulerMethod, Indicators, InterpolationMethod, RunConfig,
    SimulationTrace,
};
use crate::error::AppError;
use crate::fit::{RateEstimate, compute_indicators, cumulative_totals, estimate_rates};
use crate::io::ingest::{IngestedData, load_time_series};
use crate::math::{Interpolant, linspace};
use crate::models::simulate;

/// One compartment interpolated with one method on the evaluation grid.
#[derive(Debug, Clone)]
pub struct InterpolatedCurve {
    pub compartment: Compartment,
    pub method: InterpolationMethod,
    pub values: Vec<f64>,
}

/// Estimated rates and both Euler traces for a dataset.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub ingest: IngestedData,
    pub estimate: RateEstimate,
    pub traces: Vec<SimulationTrace>,
}

/// All computed outputs of a single `sird analyze` run.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub simulation: SimulationRun,
    pub indicators: Indicators,
    pub totals: CumulativeTotals,
    pub grid: Vec<f64>,
    pub curves: Vec<InterpolatedCurve>,
    pub summary: AnalysisSummary,
}

impl AnalysisRun {
    pub fn ingest(&self) -> &IngestedData {
        &self.simulation.ingest
    }

    pub fn curve(&self, compartment: Compartment, method: InterpolationMethod) -> Option<&InterpolatedCurve> {
        self.curves
            .iter()
            .find(|c| c.compartment == compartment && c.method == method)
    }

    pub fn trace(&self, method: EulerMethod) -> Option<&SimulationTrace> {
        self.simulation.traces.iter().find(|t| t.method == method)
    }
}

/// Load the configured CSV and execute the full analysis.
pub fn run_analysis(config: &RunConfig) -> Result<AnalysisRun, AppError> {
    let ingest = load_time_series(
        &config.data_path,
        &config.region,
        config.compare_region.as_deref(),
        config.population,
        config.dt,
    )?;
    analyze(ingest, config)
}

/// Execute the analysis on already ingested data.
pub fn analyze(ingest: IngestedData, config: &RunConfig) -> Result<AnalysisRun, AppError> {
    validate_config(config)?;

    let simulation = simulate_dataset(ingest, config.dt)?;
    let series = &simulation.ingest.series;
    let rates = simulation.estimate.rates;
    let params = config.run_parameters();

    let indicators = compute_indicators(series, &rates, &params, config.vaccine_coverage, config.doses_per_person)?;
    let totals = cumulative_totals(series, &rates, config.dt)?;

    let grid = linspace(config.eval_min, config.eval_max, config.eval_points);
    let (first, last) = (series.day()[0], series.day()[series.len() - 1]);
    if config.eval_min < first || config.eval_max > last {
        warn!(
            "interpolation grid [{}, {}] extends beyond observed days [{first}, {last}]; values there are extrapolated",
            config.eval_min, config.eval_max
        );
    }

    let mut curves = Vec::with_capacity(Compartment::ALL.len() * InterpolationMethod::ALL.len());
    for compartment in Compartment::ALL {
        for method in InterpolationMethod::ALL {
            let interpolant = Interpolant::new(method, series.day(), series.column(compartment))?;
            curves.push(InterpolatedCurve {
                compartment,
                method,
                values: interpolant.values(&grid),
            });
        }
    }

    let summary = AnalysisSummary {
        tool: "sird".to_string(),
        generated_at: Local::now(),
        region: simulation.ingest.region.clone(),
        compare_region: simulation.ingest.comparison.as_ref().map(|c| c.region.clone()),
        parameters: params,
        stats: simulation.ingest.stats.clone(),
        derivatives: simulation.estimate.derivatives,
        rates,
        indicators,
        totals,
    };

    info!("analysis complete for region {}", summary.region);

    Ok(AnalysisRun {
        simulation,
        indicators,
        totals,
        grid,
        curves,
        summary,
    })
}

/// Estimate rates and run both Euler schemes from the first sample.
pub fn simulate_dataset(ingest: IngestedData, dt: f64) -> Result<SimulationRun, AppError> {
    let estimate = estimate_rates(&ingest.series, dt)?;
    let traces = [EulerMethod::Explicit, EulerMethod::Implicit]
        .into_iter()
        .map(|method| simulate(&ingest.series, &estimate.rates, dt, method))
        .collect();

    Ok(SimulationRun {
        ingest,
        estimate,
        traces,
    })
}

fn validate_config(config: &RunConfig) -> Result<(), AppError> {
    if !(config.population.is_finite() && config.population > 0.0) {
        return Err(AppError::new(2, "Population must be > 0."));
    }
    if !config.i_max.is_finite() {
        return Err(AppError::new(2, "Hospital capacity must be finite."));
    }
    if config.eval_points < 2 || !(config.eval_min < config.eval_max) {
        return Err(AppError::new(2, "Interpolation grid needs at least 2 points and eval_min < eval_max."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::io::ingest::read_time_series;

    const CSV: &str = "day,infected_can,recovered_can,deceased_can,infected_usa\n\
                       0,10,0,0,20\n\
                       10,15,4,1,35\n\
                       20,18,9,2,50\n";

    fn config() -> RunConfig {
        RunConfig {
            data_path: PathBuf::from("unused.csv"),
            region: "can".to_string(),
            compare_region: Some("usa".to_string()),
            population: 110.0,
            i_max: 17.0,
            dt: 10.0,
            tolerance: 1e-6,
            vaccine_coverage: 0.7,
            doses_per_person: 2.0,
            eval_min: 0.0,
            eval_max: 20.0,
            eval_points: 21,
            out_dir: PathBuf::from("."),
            graphs: false,
            plot: false,
            plot_compartment: Compartment::Infected,
            plot_method: InterpolationMethod::QuadraticSpline,
            plot_width: 40,
            plot_height: 10,
            export_json: None,
            export_traces: None,
        }
    }

    fn ingest() -> IngestedData {
        read_time_series(CSV.as_bytes(), "can", Some("usa"), 110.0).unwrap()
    }

    #[test]
    fn analysis_fills_every_curve_and_trace() {
        let run = analyze(ingest(), &config()).unwrap();

        assert_eq!(run.grid.len(), 21);
        assert_eq!(run.curves.len(), 12);
        for curve in &run.curves {
            assert_eq!(curve.values.len(), 21);
        }
        // Every interpolant reproduces the samples at days 0, 10, 20.
        let infected = run.curve(Compartment::Infected, InterpolationMethod::Lagrange).unwrap();
        assert!((infected.values[10] - 15.0).abs() < 1e-9);

        assert_eq!(run.simulation.traces.len(), 2);
        assert_eq!(run.trace(EulerMethod::Implicit).unwrap().len(), 3);

        assert!(run.indicators.saturation_bracketed);
        assert_eq!(run.summary.compare_region.as_deref(), Some("usa"));
        assert_eq!(run.summary.parameters.population, 110.0);
    }

    #[test]
    fn bad_grid_is_rejected() {
        let mut cfg = config();
        cfg.eval_points = 1;
        assert_eq!(analyze(ingest(), &cfg).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn non_positive_tolerance_is_a_numeric_error() {
        let mut cfg = config();
        cfg.tolerance = 0.0;
        assert_eq!(analyze(ingest(), &cfg).unwrap_err().exit_code(), 4);
    }
}
