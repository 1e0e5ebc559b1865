//! CSV ingest and validation.
//!
//! This module is responsible for turning a delimited file with `x1`, `x2`, `z`
//! columns into a clean observation set.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::warn;

use crate::domain::{DatasetStats, Observation};
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 3] = ["x1", "x2", "z"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: observations + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub observations: Vec<Observation>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load observations from a CSV file.
pub fn load_observations(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_observations(file)
}

/// Load observations from any CSV source.
pub fn read_observations<R: Read>(source: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(AppError::new(2, format!("Missing required column: `{name}`")));
        }
    }

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

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

        match parse_row(&record, &header_map) {
            Ok(o) => observations.push(o),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for e in &row_errors {
        warn!("skipping CSV line {}: {}", e.line, e.message);
    }

    let rows_used = observations.len();
    let stats = DatasetStats::from_observations(&observations)
        .ok_or_else(|| AppError::new(3, "No valid rows remain after validation."))?;

    Ok(IngestedData {
        observations,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
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

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Observation, String> {
    let x1 = get_f64(record, header_map, "x1")?;
    let x2 = get_f64(record, header_map, "x2")?;
    let z = get_f64(record, header_map, "z")?;
    Ok(Observation::new(x1, x2, z))
}

fn get_f64(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<f64, String> {
    let raw = header_map
        .get(name)
        .and_then(|&idx| record.get(idx))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing `{name}` value."))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("Invalid `{name}` value: '{raw}'."))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("Non-finite `{name}` value."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_columns_in_any_order_and_case() {
        let csv = "\u{feff}Z, X2 ,x1,comment\n3.5,2,1,a\n-1,0.5,4,b\n";
        let data = read_observations(csv.as_bytes()).unwrap();
        assert_eq!(data.rows_read, 2);
        assert_eq!(data.rows_used, 2);
        assert!(data.row_errors.is_empty());
        assert_eq!(data.observations[0], Observation::new(1.0, 2.0, 3.5));
        assert_eq!(data.observations[1], Observation::new(4.0, 0.5, -1.0));
        assert_eq!(data.stats.z_min, -1.0);
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let csv = "x1,x2,z\n1,2,3\n1,,3\nfoo,2,3\n1,2,NaN\n4,5,6\n";
        let data = read_observations(csv.as_bytes()).unwrap();
        assert_eq!(data.rows_read, 5);
        assert_eq!(data.rows_used, 2);
        let lines: Vec<usize> = data.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(data.row_errors[0].message.contains("`x2`"));
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let err = read_observations("x1,z\n1,2\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`x2`"));
    }

    #[test]
    fn no_usable_rows_is_a_data_error() {
        let err = read_observations("x1,x2,z\n,,\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
