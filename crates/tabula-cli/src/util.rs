use anyhow::{Context, Result};
use serde_json::Value;
use std::path::PathBuf;

/// Check that `path` names an existing `.csv` or `.tsv` file.
pub fn validate_tsv_or_csv_file(path: &str) -> Result<()> {
    let pb = PathBuf::from(path);

    let ext = pb
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("tsv") | Some("csv") => {}
        _ => anyhow::bail!("File must have a .tsv or .csv extension: {}", path),
    }

    if !pb.is_file() {
        anyhow::bail!("File does not exist: {}", path);
    }

    Ok(())
}

/// Value parser for dataset arguments, so a bad path is a usage error.
pub fn dataset_path(path: &str) -> std::result::Result<PathBuf, String> {
    validate_tsv_or_csv_file(path)
        .map(|_| PathBuf::from(path))
        .map_err(|e| e.to_string())
}

/// Parse an inline JSON record.
pub fn parse_record(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("record is not valid JSON: {}", raw))
}
