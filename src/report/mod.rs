//! Reporting: terminal summaries and the markdown results report.

use std::fs;
use std::path::Path;

use crate::domain::AnalysisSummary;
use crate::error::AppError;

pub mod format;

pub use format::*;

/// Render the markdown report for `summary` and write it to `path`.
pub fn write_markdown_report(path: &Path, summary: &AnalysisSummary) -> Result<(), AppError> {
    fs::write(path, format_markdown_report(summary))
        .map_err(|e| AppError::new(2, format!("Failed to write report '{}': {e}", path.display())))
}
