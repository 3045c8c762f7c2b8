//! CSV ingest and normalization.
//!
//! This module turns an epidemic counts CSV into a validated [`TimeSeries`]
//! for the primary region, plus the infected column of an optional comparison
//! region.
//!
//! Expected schema (header names are case-insensitive):
//!
//! ```text
//! day,infected_<region>,recovered_<region>,deceased_<region>[,infected_<compare>,...]
//! ```
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **No silent gaps**: the estimators assume one row every `dt` days, so an
//!   invalid primary-region row fails the whole load (every bad line is listed)
//! - **Comparison is best-effort**: a missing or invalid comparison value
//!   becomes `NaN` and is reported, but never removes a primary row
//! - **Separation of concerns**: no estimation logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::{info, warn};

use crate::domain::{DatasetStats, TimeSeries};
use crate::error::AppError;

/// The infected column of the comparison region, aligned with the primary
/// series' days. Unusable cells are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSeries {
    pub region: String,
    pub day: Vec<f64>,
    pub infected: Vec<f64>,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: validated series + optional comparison + stats.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub region: String,
    pub series: TimeSeries,
    pub comparison: Option<ComparisonSeries>,
    pub stats: DatasetStats,
    /// Rows whose comparison value was replaced by `NaN`.
    pub comparison_gaps: Vec<RowError>,
    pub rows_used: usize,
}

/// Columns resolved for one run.
struct Columns {
    day: usize,
    infected: usize,
    recovered: usize,
    deceased: usize,
    compare_infected: Option<usize>,
}

/// Load a counts CSV from disk and build the primary series.
///
/// A comparison region, when given, must have an `infected_<region>` column.
pub fn load_time_series(
    path: &Path,
    region: &str,
    compare_region: Option<&str>,
    population: f64,
    dt: f64,
) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let data = read_time_series(file, region, compare_region, population)?;

    info!("loaded {} rows from {}", data.rows_used, path.display());
    check_step(data.series.day(), dt);

    Ok(data)
}

/// Parse a counts CSV from any reader.
///
/// Susceptible counts are derived as `population - (I + R + D)`.
///
/// Any unreadable or invalid primary-region row is an input error (exit
/// code 2) listing the offending lines.
pub fn read_time_series<R: Read>(
    reader: R,
    region: &str,
    compare_region: Option<&str>,
    population: f64,
) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let columns = resolve_columns(&header_map, region, compare_region)?;

    let mut day = Vec::new();
    let mut infected = Vec::new();
    let mut recovered = Vec::new();
    let mut deceased = Vec::new();
    let mut compare_infected = Vec::new();

    let mut row_errors = Vec::new();
    let mut comparison_gaps = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // +2: header line, then 1-based numbering.
        let line = idx + 2;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &columns, &headers) {
            Ok(row) => {
                day.push(row.day);
                infected.push(row.infected);
                recovered.push(row.recovered);
                deceased.push(row.deceased);
            }
            Err(message) => {
                row_errors.push(RowError { line, message });
                continue;
            }
        }

        if let Some(col) = columns.compare_infected {
            match parse_count(&record, col, &headers) {
                Ok(v) => compare_infected.push(v),
                Err(message) => {
                    compare_infected.push(f64::NAN);
                    comparison_gaps.push(RowError { line, message });
                }
            }
        }
    }

    if !row_errors.is_empty() {
        return Err(AppError::new(2, invalid_rows_message(&row_errors)));
    }

    for gap in &comparison_gaps {
        warn!("comparison value on CSV line {} treated as missing: {}", gap.line, gap.message);
    }

    let rows_used = day.len();
    if rows_used < 2 {
        return Err(AppError::new(
            3,
            format!("Need at least two valid rows, found {rows_used}."),
        ));
    }

    let comparison = compare_region.map(|name| ComparisonSeries {
        region: name.to_string(),
        day: day.clone(),
        infected: compare_infected,
    });

    let series = TimeSeries::from_counts(day, infected, recovered, deceased, population)
        .map_err(|e| AppError::new(2, format!("Invalid time series: {e}")))?;

    let stats = compute_stats(&series);

    Ok(IngestedData {
        region: region.to_string(),
        series,
        comparison,
        stats,
        comparison_gaps,
        rows_used,
    })
}

struct ParsedRow {
    day: f64,
    infected: f64,
    recovered: f64,
    deceased: f64,
}

fn parse_row(record: &StringRecord, columns: &Columns, headers: &StringRecord) -> Result<ParsedRow, String> {
    Ok(ParsedRow {
        day: parse_field(record, columns.day, headers)?,
        infected: parse_count(record, columns.infected, headers)?,
        recovered: parse_count(record, columns.recovered, headers)?,
        deceased: parse_count(record, columns.deceased, headers)?,
    })
}

fn parse_field(record: &StringRecord, idx: usize, headers: &StringRecord) -> Result<f64, String> {
    let name = headers.get(idx).unwrap_or("?");
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing value for `{name}`."))?;
    parse_f64(raw).ok_or_else(|| format!("Invalid number '{raw}' for `{name}`."))
}

fn parse_count(record: &StringRecord, idx: usize, headers: &StringRecord) -> Result<f64, String> {
    let v = parse_field(record, idx, headers)?;
    if v < 0.0 {
        let name = headers.get(idx).unwrap_or("?");
        return Err(format!("Negative count {v} for `{name}`."));
    }
    Ok(v)
}

fn invalid_rows_message(errors: &[RowError]) -> String {
    const SHOWN: usize = 5;
    let mut msg = format!("{} invalid row(s) in CSV; the series must not have gaps:", errors.len());
    for err in errors.iter().take(SHOWN) {
        msg.push_str(&format!("\n  line {}: {}", err.line, err.message));
    }
    if errors.len() > SHOWN {
        msg.push_str(&format!("\n  ... and {} more", errors.len() - SHOWN));
    }
    msg
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_columns(
    header_map: &HashMap<String, usize>,
    region: &str,
    compare_region: Option<&str>,
) -> Result<Columns, AppError> {
    let require = |name: String| -> Result<usize, AppError> {
        header_map
            .get(&name)
            .copied()
            .ok_or_else(|| AppError::new(2, format!("Missing required column: `{name}`")))
    };

    let region = region.to_ascii_lowercase();
    let compare_infected = match compare_region {
        Some(other) => Some(require(format!("infected_{}", other.to_ascii_lowercase()))?),
        None => None,
    };

    Ok(Columns {
        day: require("day".to_string())?,
        infected: require(format!("infected_{region}"))?,
        recovered: require(format!("recovered_{region}"))?,
        deceased: require(format!("deceased_{region}"))?,
        compare_infected,
    })
}

fn parse_f64(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Warn when the observed day spacing disagrees with the configured step.
fn check_step(day: &[f64], dt: f64) {
    if let Some(w) = day.windows(2).find(|w| ((w[1] - w[0]) - dt).abs() > 1e-9) {
        warn!(
            "day spacing {} (between day {} and {}) differs from the configured step {dt}",
            w[1] - w[0],
            w[0],
            w[1]
        );
    }
}

fn compute_stats(series: &TimeSeries) -> DatasetStats {
    let last = series.final_state();
    DatasetStats {
        n_samples: series.len(),
        first_day: series.day()[0],
        last_day: series.day()[series.len() - 1],
        final_infected: last.infected,
        final_recovered: last.recovered,
        final_deceased: last.deceased,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\u{feff}Day,infected_can,recovered_can,deceased_can,infected_usa\n\
                       0,10,0,0,20\n\
                       10,15,4,1,35\n\
                       20,18,9,2,50\n";

    #[test]
    fn reads_primary_and_comparison_columns() {
        let data = read_time_series(CSV.as_bytes(), "can", Some("usa"), 110.0).unwrap();
        assert_eq!(data.rows_used, 3);
        assert!(data.comparison_gaps.is_empty());
        assert_eq!(data.series.day(), &[0.0, 10.0, 20.0]);
        assert_eq!(data.series.susceptible(), &[100.0, 90.0, 81.0]);

        let cmp = data.comparison.unwrap();
        assert_eq!(cmp.region, "usa");
        assert_eq!(cmp.infected, vec![20.0, 35.0, 50.0]);

        assert_eq!(data.stats.last_day, 20.0);
        assert_eq!(data.stats.final_recovered, 9.0);
    }

    #[test]
    fn region_names_are_case_insensitive() {
        let data = read_time_series(CSV.as_bytes(), "CAN", None, 110.0).unwrap();
        assert!(data.comparison.is_none());
        assert_eq!(data.series.len(), 3);
    }

    #[test]
    fn missing_region_column_is_a_schema_error() {
        let err = read_time_series(CSV.as_bytes(), "mex", None, 110.0).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("infected_mex"));
    }

    #[test]
    fn invalid_primary_rows_fail_with_every_line_listed() {
        let csv = "day,infected_can,recovered_can,deceased_can\n\
                   0,10,0,0\n\
                   10,abc,4,1\n\
                   20,18,9,2\n\
                   30,-1,9,2\n";
        let err = read_time_series(csv.as_bytes(), "can", None, 110.0).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let msg = err.to_string();
        assert!(msg.contains("2 invalid row(s)"), "{msg}");
        assert!(msg.contains("line 3: Invalid number 'abc'"), "{msg}");
        assert!(msg.contains("line 5: Negative count"), "{msg}");
    }

    #[test]
    fn blank_primary_cell_does_not_leave_a_gap() {
        // Dropping day 10 would make the first difference span 20 days.
        let csv = "day,infected_can,recovered_can,deceased_can\n\
                   0,10,0,0\n\
                   10,,4,1\n\
                   20,18,9,2\n";
        let err = read_time_series(csv.as_bytes(), "can", None, 110.0).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Missing value for `infected_can`"));
    }

    #[test]
    fn missing_comparison_value_keeps_the_primary_row() {
        let csv = "day,infected_can,recovered_can,deceased_can,infected_usa\n\
                   0,10,0,0,20\n\
                   10,15,4,1,\n\
                   20,18,9,2,50\n\
                   30,20,15,3,x\n";
        let alone = read_time_series(csv.as_bytes(), "can", None, 110.0).unwrap();
        let compared = read_time_series(csv.as_bytes(), "can", Some("usa"), 110.0).unwrap();

        assert_eq!(compared.series.day(), &[0.0, 10.0, 20.0, 30.0]);
        assert_eq!(compared.series, alone.series);
        assert_eq!(compared.stats, alone.stats);

        let cmp = compared.comparison.unwrap();
        assert_eq!(cmp.day, vec![0.0, 10.0, 20.0, 30.0]);
        assert_eq!(cmp.infected[0], 20.0);
        assert!(cmp.infected[1].is_nan());
        assert_eq!(cmp.infected[2], 50.0);
        assert!(cmp.infected[3].is_nan());

        let lines: Vec<usize> = compared.comparison_gaps.iter().map(|g| g.line).collect();
        assert_eq!(lines, vec![3, 5]);
        assert!(alone.comparison_gaps.is_empty());
    }

    #[test]
    fn primary_rates_do_not_depend_on_the_comparison_column() {
        let csv = "day,infected_can,recovered_can,deceased_can,infected_usa\n\
                   0,10,0,0,20\n\
                   10,15,4,1,\n\
                   20,18,9,2,50\n\
                   30,20,15,3,60\n";
        let alone = read_time_series(csv.as_bytes(), "can", None, 110.0).unwrap();
        let compared = read_time_series(csv.as_bytes(), "can", Some("usa"), 110.0).unwrap();

        let a = crate::fit::estimate_rates(&alone.series, 10.0).unwrap();
        let b = crate::fit::estimate_rates(&compared.series, 10.0).unwrap();
        assert_eq!(a.rates, b.rates);
    }

    #[test]
    fn unordered_days_are_rejected() {
        let csv = "day,infected_can,recovered_can,deceased_can\n\
                   10,10,0,0\n\
                   0,15,4,1\n";
        let err = read_time_series(csv.as_bytes(), "can", None, 110.0).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn too_few_rows_is_a_data_error() {
        let csv = "day,infected_can,recovered_can,deceased_can\n0,10,0,0\n";
        let err = read_time_series(csv.as_bytes(), "can", None, 110.0).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
