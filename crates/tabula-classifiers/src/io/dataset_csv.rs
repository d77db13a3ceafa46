//! Delimited dataset reader (`.csv` or `.tsv`).
use std::path::Path;

use csv::StringRecord;

use crate::config::{FEATURE_COLUMNS, TARGET_COLUMN};
use crate::data_handling::Dataset;
use crate::error::DataError;
use crate::math::Array2;

/// Tokens read as a missing value, compared case-insensitively.
const MISSING_TOKENS: [&str; 5] = ["", "na", "nan", "null", "none"];

/// Read a dataset with header columns `x_1..x_4` and `target`.
///
/// The delimiter is a tab for `.tsv` files and a comma otherwise. Columns may
/// appear in any order; extra columns are ignored.
pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset, DataError> {
    let path = path.as_ref();
    let is_tsv = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("tsv"))
        .unwrap_or(false);
    let delimiter = if is_tsv { b'\t' } else { b',' };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| DataError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader
        .headers()
        .map_err(|source| DataError::Row { row: 0, source })?
        .clone();

    let feature_indices = FEATURE_COLUMNS
        .iter()
        .map(|name| {
            find_column(&headers, name).ok_or_else(|| DataError::MissingColumn(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let target_idx = find_column(&headers, TARGET_COLUMN)
        .ok_or_else(|| DataError::MissingColumn(TARGET_COLUMN.to_string()))?;

    let mut features = Vec::new();
    let mut targets = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result.map_err(|source| DataError::Row { row, source })?;

        for (&idx, name) in feature_indices.iter().zip(FEATURE_COLUMNS) {
            features.push(parse_feature(record.get(idx).unwrap_or(""), name, row)?);
        }
        targets.push(parse_target(record.get(target_idx).unwrap_or(""), row)?);
    }

    let x = Array2::from_shape_vec((targets.len(), FEATURE_COLUMNS.len()), features)?;
    let dataset = Dataset::new(x, targets)?;

    log::debug!("Read {} rows from {}", dataset.len(), path.display());
    Ok(dataset)
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

fn is_missing(value: &str) -> bool {
    MISSING_TOKENS
        .iter()
        .any(|token| value.eq_ignore_ascii_case(token))
}

fn parse_feature(value: &str, column: &str, row: usize) -> Result<f64, DataError> {
    if is_missing(value) {
        return Ok(f64::NAN);
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DataError::InvalidValue {
            column: column.to_string(),
            row,
            value: value.to_string(),
        }),
    }
}

fn parse_target(value: &str, row: usize) -> Result<Option<u8>, DataError> {
    if is_missing(value) {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(v) if v == 0.0 => Ok(Some(0)),
        Ok(v) if v == 1.0 => Ok(Some(1)),
        _ => Err(DataError::InvalidValue {
            column: TARGET_COLUMN.to_string(),
            row,
            value: value.to_string(),
        }),
    }
}
