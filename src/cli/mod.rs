//! Command-line parsing for the SIRD epidemic analysis tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the numeric code.
//!
//! Model constants can also come from the environment (`SIRD_POPULATION`,
//! `SIRD_I_MAX`, `SIRD_DT`, `SIRD_DATA`); a `.env` file is loaded at startup.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Compartment, InterpolationMethod};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sird", version, about = "SIRD epidemic analysis: interpolation, quadrature, Euler solvers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate rates and indicators, draw charts and write the markdown report.
    Analyze(AnalyzeArgs),
    /// Estimate rates and print both Euler solver traces.
    Simulate(SimulateArgs),
    /// Re-render the markdown report from a saved summary JSON.
    Report(ReportArgs),
    /// Write a deterministic synthetic two-region dataset.
    Sample(SampleArgs),
}

/// Input data and model constants shared by `analyze` and `simulate`.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Counts CSV (`day,infected_<region>,recovered_<region>,deceased_<region>,...`).
    #[arg(long, env = "SIRD_DATA", default_value = "data/populations.csv")]
    pub data: PathBuf,

    /// Region suffix of the analyzed columns.
    #[arg(long, default_value = "can")]
    pub region: String,

    /// Total population N.
    #[arg(long, env = "SIRD_POPULATION", default_value_t = 38_940_000.0)]
    pub population: f64,

    /// Sampling interval in days.
    #[arg(long, env = "SIRD_DT", default_value_t = 10.0)]
    pub dt: f64,
}

/// Options for a full analysis run.
#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Region whose infected curve is compared against the primary region.
    #[arg(long = "compare", value_name = "REGION", default_value = "usa")]
    pub compare: Option<String>,

    /// Analyze the primary region alone (no `infected_<compare>` column needed).
    #[arg(long, conflicts_with = "compare")]
    pub no_compare: bool,

    /// Hospital capacity (infected count) used for the saturation day.
    #[arg(long = "i-max", env = "SIRD_I_MAX", default_value_t = 62_000.0)]
    pub i_max: f64,

    /// Bisection tolerance (days).
    #[arg(long, default_value_t = 1.0)]
    pub tol: f64,

    /// Fraction of the population targeted by the vaccine-dose estimate.
    #[arg(long, default_value_t = 0.7)]
    pub vaccine_coverage: f64,

    /// Doses per vaccinated person.
    #[arg(long, default_value_t = 2.0)]
    pub doses_per_person: f64,

    /// First day of the interpolation grid.
    #[arg(long, default_value_t = 0.0)]
    pub eval_min: f64,

    /// Last day of the interpolation grid.
    #[arg(long, default_value_t = 750.0)]
    pub eval_max: f64,

    /// Number of interpolation grid points.
    #[arg(long, default_value_t = 1000)]
    pub eval_points: usize,

    /// Directory receiving `results.md` and the `graphs/` charts.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Skip SVG chart generation.
    #[arg(long)]
    pub no_graphs: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Compartment shown in the terminal plot.
    #[arg(long, value_enum, default_value_t = Compartment::Infected)]
    pub plot_compartment: Compartment,

    /// Interpolation method shown in the terminal plot.
    #[arg(long, value_enum, default_value_t = InterpolationMethod::QuadraticSpline)]
    pub plot_method: InterpolationMethod,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the run summary to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Export explicit and implicit solver traces to CSV.
    #[arg(long = "export-traces", value_name = "CSV")]
    pub export_traces: Option<PathBuf>,
}

/// Options for printing solver traces.
#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Compartment printed in the trace table.
    #[arg(long, value_enum, default_value_t = Compartment::Infected)]
    pub compartment: Compartment,

    /// Export both traces to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

/// Options for re-rendering a report.
#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Summary JSON produced by `sird analyze --export-json`.
    #[arg(long, value_name = "JSON")]
    pub summary: PathBuf,

    /// Markdown output path.
    #[arg(long, default_value = "results.md")]
    pub output: PathBuf,
}

/// Options for synthetic dataset generation.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(long)]
    pub output: PathBuf,

    /// Random seed for the observation noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Total population per region.
    #[arg(long, env = "SIRD_POPULATION", default_value_t = 38_940_000.0)]
    pub population: f64,

    /// Number of samples.
    #[arg(short = 'n', long, default_value_t = 76)]
    pub samples: usize,

    /// Days between samples.
    #[arg(long, env = "SIRD_DT", default_value_t = 10.0)]
    pub dt: f64,

    /// Infected count on day 0.
    #[arg(long, default_value_t = 1_000.0)]
    pub initial_infected: f64,

    /// Recovery rate a (per day).
    #[arg(long, default_value_t = 0.07)]
    pub recovery: f64,

    /// Mortality rate b (per day).
    #[arg(long, default_value_t = 0.0015)]
    pub mortality: f64,

    /// Transmission rate r (per person per day).
    #[arg(long, default_value_t = 3.0e-9)]
    pub transmission: f64,

    /// Standard deviation of the log-normal observation noise.
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Primary region suffix.
    #[arg(long, default_value = "can")]
    pub region: String,

    /// Comparison region suffix.
    #[arg(long = "compare", default_value = "usa")]
    pub compare: String,

    /// Transmission multiplier for the comparison region.
    #[arg(long, default_value_t = 1.2)]
    pub compare_scale: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_defaults() {
        let cli = Cli::parse_from(["sird", "analyze", "--data", "x.csv"]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.data.data, PathBuf::from("x.csv"));
        assert_eq!(args.data.region, "can");
        assert_eq!(args.compare.as_deref(), Some("usa"));
        assert!(!args.no_compare);
        assert_eq!(args.tol, 1.0);
        assert_eq!(args.eval_points, 1000);
        assert_eq!(args.plot_method, InterpolationMethod::QuadraticSpline);
    }

    #[test]
    fn comparison_can_be_switched_off() {
        let cli = Cli::parse_from(["sird", "analyze", "--no-compare"]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert!(crate::app::run_config_from_args(&args).compare_region.is_none());

        let cli = Cli::parse_from(["sird", "analyze", "--compare", "mex"]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(crate::app::run_config_from_args(&args).compare_region.as_deref(), Some("mex"));

        assert!(Cli::try_parse_from(["sird", "analyze", "--compare", "mex", "--no-compare"]).is_err());
    }

    #[test]
    fn value_enums_use_kebab_case() {
        let cli = Cli::parse_from([
            "sird",
            "analyze",
            "--data",
            "x.csv",
            "--plot-method",
            "linear-spline",
            "--plot-compartment",
            "recovered",
        ]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.plot_method, InterpolationMethod::LinearSpline);
        assert_eq!(args.plot_compartment, Compartment::Recovered);
    }
}
