//! Export solver traces to CSV.
//!
//! One row per (method, day), in long format, so both Euler schemes land in a
//! single file that is easy to pivot in a spreadsheet.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{EulerMethod, SimulationTrace};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct TraceRow {
    method: EulerMethod,
    day: f64,
    susceptible: f64,
    infected: f64,
    recovered: f64,
    deceased: f64,
}

/// Write one or more traces to a CSV file.
pub fn write_traces_csv(path: &Path, traces: &[SimulationTrace]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create trace CSV '{}': {e}", path.display())))?;
    write_traces(file, traces)
}

/// Write traces to any writer.
pub fn write_traces<W: Write>(writer: W, traces: &[SimulationTrace]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);

    for trace in traces {
        for t in 0..trace.len() {
            let s = trace.state(t);
            wtr.serialize(TraceRow {
                method: trace.method,
                day: trace.day[t],
                susceptible: s.susceptible,
                infected: s.infected,
                recovered: s.recovered,
                deceased: s.deceased,
            })
            .map_err(|e| AppError::new(2, format!("Failed to write trace CSV row: {e}")))?;
        }
    }

    wtr.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush trace CSV: {e}")))?;
    Ok(())
}
