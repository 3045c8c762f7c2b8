//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the analysis pipeline
//! - prints summaries/plots
//! - writes charts, the markdown report and optional exports

use std::fs;
use std::path::Path;

use clap::Parser;
use log::info;

use crate::cli::{AnalyzeArgs, Command, ReportArgs, SampleArgs, SimulateArgs};
use crate::domain::{Compartment, EulerMethod, InterpolationMethod, RateParameters, RunConfig, SampleConfig};
use crate::error::AppError;
use crate::fit::finite_difference;
use crate::io::ingest::load_time_series;
use crate::plot::{ChartSeries, LineChart};

pub mod pipeline;

use pipeline::AnalysisRun;

/// Entry point for the `sird` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Simulate(args) => handle_simulate(args),
        Command::Report(args) => handle_report(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;

    println!("{}", crate::report::format_run_summary(&run.summary, run.ingest()));

    if config.plot {
        let plot = terminal_plot(&run, &config);
        println!("{plot}");
    }

    fs::create_dir_all(&config.out_dir).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create output directory '{}': {e}", config.out_dir.display()),
        )
    })?;

    if config.graphs {
        write_charts(&config.out_dir.join("graphs"), &run, &config)?;
    }

    let report_path = config.out_dir.join("results.md");
    crate::report::write_markdown_report(&report_path, &run.summary)?;
    info!("wrote report to {}", report_path.display());

    // Optional exports.
    if let Some(path) = &config.export_json {
        crate::io::summary::write_summary_json(path, &run.summary)?;
    }
    if let Some(path) = &config.export_traces {
        crate::io::export::write_traces_csv(path, &run.simulation.traces)?;
    }

    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let data = &args.data;
    let ingest = load_time_series(&data.data, &data.region, None, data.population, data.dt)?;
    let sim = pipeline::simulate_dataset(ingest, data.dt)?;

    let rates = &sim.estimate.rates;
    println!(
        "Rates: r={:.4e} a={:.6} b={:.6} | R0={:.4e}\n",
        rates.transmission,
        rates.recovery,
        rates.mortality,
        rates.r0()
    );
    println!("{}", crate::report::format_trace_table(&sim.traces, args.compartment));

    if let Some(path) = &args.export {
        crate::io::export::write_traces_csv(path, &sim.traces)?;
    }

    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let summary = crate::io::summary::read_summary_json(&args.summary)?;
    crate::report::write_markdown_report(&args.output, &summary)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = sample_config_from_args(&args);
    let sample = crate::data::generate_sample(&config)?;
    crate::data::write_sample_csv(&config.output, &sample)?;
    println!(
        "Wrote {} samples ({} + {}) to {}",
        sample.day.len(),
        sample.primary.region,
        sample.comparison.region,
        config.output.display()
    );
    Ok(())
}

pub fn run_config_from_args(args: &AnalyzeArgs) -> RunConfig {
    RunConfig {
        data_path: args.data.data.clone(),
        region: args.data.region.clone(),
        compare_region: if args.no_compare { None } else { args.compare.clone() },
        population: args.data.population,
        i_max: args.i_max,
        dt: args.data.dt,
        tolerance: args.tol,
        vaccine_coverage: args.vaccine_coverage,
        doses_per_person: args.doses_per_person,
        eval_min: args.eval_min,
        eval_max: args.eval_max,
        eval_points: args.eval_points,
        out_dir: args.out_dir.clone(),
        graphs: !args.no_graphs,
        plot: !args.no_plot,
        plot_compartment: args.plot_compartment,
        plot_method: args.plot_method,
        plot_width: args.width,
        plot_height: args.height,
        export_json: args.export_json.clone(),
        export_traces: args.export_traces.clone(),
    }
}

pub fn sample_config_from_args(args: &SampleArgs) -> SampleConfig {
    SampleConfig {
        output: args.output.clone(),
        population: args.population,
        samples: args.samples,
        dt: args.dt,
        initial_infected: args.initial_infected,
        rates: RateParameters {
            recovery: args.recovery,
            mortality: args.mortality,
            transmission: args.transmission,
        },
        noise: args.noise,
        seed: args.seed,
        region: args.region.clone(),
        compare_region: args.compare.clone(),
        compare_scale: args.compare_scale,
    }
}

fn terminal_plot(run: &AnalysisRun, config: &RunConfig) -> String {
    let series = &run.ingest().series;
    let observed = zip_points(series.day(), series.column(config.plot_compartment));
    let curve = run
        .curve(config.plot_compartment, config.plot_method)
        .map(|c| zip_points(&run.grid, &c.values))
        .unwrap_or_default();

    let label = format!(
        "{} ({})",
        config.plot_compartment.key(),
        config.plot_method.display_name().to_lowercase()
    );
    crate::plot::render_ascii_plot(&observed, &curve, &label, config.plot_width, config.plot_height)
}

/// Write all SVG charts into `dir`.
pub fn write_charts(dir: &Path, run: &AnalysisRun, config: &RunConfig) -> Result<(), AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create graphs directory '{}': {e}", dir.display())))?;

    let ingest = run.ingest();
    let series = &ingest.series;
    let region = ingest.region.to_uppercase();

    for compartment in Compartment::ALL {
        let mut chart = LineChart::new(
            format!("{} ({region}): data and interpolations", compartment.display_name()),
            "Day",
            "People",
        )
        .with_series(ChartSeries::markers(
            "Data",
            zip_points(series.day(), series.column(compartment)),
        ));

        for method in [InterpolationMethod::LinearSpline, InterpolationMethod::QuadraticSpline, InterpolationMethod::Lagrange] {
            if let Some(curve) = run.curve(compartment, method) {
                let s = ChartSeries::line(method.display_name(), zip_points(&run.grid, &curve.values));
                // High-degree Lagrange swings are clipped to the data range.
                let s = if method == InterpolationMethod::Lagrange { s.clamped() } else { s };
                chart = chart.with_series(s);
            }
        }

        chart.render_svg(&dir.join(format!("{}_analysis.svg", compartment.key())))?;
    }

    let d_infected = finite_difference(series.infected(), config.dt);
    let mut regional = LineChart::new("Regional comparison: dI/dt", "Day", "People/day")
        .with_series(ChartSeries::line(format!("dI/dt {region}"), zip_points(series.day(), &d_infected)));
    if let Some(cmp) = &ingest.comparison {
        let d_cmp = finite_difference(&cmp.infected, config.dt);
        regional = regional.with_series(ChartSeries::line(
            format!("dI/dt {}", cmp.region.to_uppercase()),
            zip_points(&cmp.day, &d_cmp),
        ));
    }
    regional.render_svg(&dir.join("regional_comparison.svg"))?;

    let d_susceptible = finite_difference(series.susceptible(), config.dt);
    LineChart::new(format!("Rate of change ({region})"), "Day", "People/day")
        .with_series(ChartSeries::line("dS/dt", zip_points(series.day(), &d_susceptible)))
        .with_series(ChartSeries::line("dI/dt", zip_points(series.day(), &d_infected)))
        .render_svg(&dir.join("rate_of_change.svg"))?;

    let mut sird = LineChart::new(format!("SIRD model vs data: infected ({region})"), "Day", "People")
        .with_series(ChartSeries::markers("Data", zip_points(series.day(), series.infected())));
    for method in [EulerMethod::Explicit, EulerMethod::Implicit] {
        if let Some(trace) = run.trace(method) {
            sird = sird.with_series(ChartSeries::line(
                method.display_name(),
                zip_points(&trace.day, &trace.infected),
            ));
        }
    }
    sird.render_svg(&dir.join("sird_comparison.svg"))?;

    info!("wrote charts to {}", dir.display());
    Ok(())
}

fn zip_points(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter().copied().zip(y.iter().copied()).collect()
}
