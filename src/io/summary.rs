//! Read/write analysis summary JSON files.
//!
//! The summary is the portable record of a run: parameters, dataset stats,
//! estimated rates, indicators and totals. `sird report` regenerates the
//! markdown report from it without re-reading the CSV.
//!
//! The schema is defined by `domain::AnalysisSummary`.

use std::fs::File;
use std::path::Path;

use crate::domain::AnalysisSummary;
use crate::error::AppError;

/// Write a summary JSON file.
pub fn write_summary_json(path: &Path, summary: &AnalysisSummary) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create summary JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::new(2, format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}

/// Read a summary JSON file.
pub fn read_summary_json(path: &Path) -> Result<AnalysisSummary, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open summary JSON '{}': {e}", path.display())))?;
    let summary: AnalysisSummary =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid summary JSON: {e}")))?;
    Ok(summary)
}
