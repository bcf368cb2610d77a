#![deny(unsafe_code)]

//! CSV ingestion for raw code tables.

use std::path::Path;

use codelink_model::CodeRecord;
use tracing::debug;

use crate::error::CatalogError;

fn header_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn get_string(row: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| row.get(i))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Parses a headered catalog export with `code`, `display`, and `system`
/// columns. Header order does not matter and header names are matched
/// case-insensitively.
///
/// Rows without a `code` value are skipped; rows without a `display` are
/// kept as-is — the resolver filters incomplete rows at scoring time.
pub fn load_catalog_csv(path: &Path) -> Result<Vec<CodeRecord>, CatalogError> {
    let bytes = std::fs::read(path).map_err(|e| CatalogError::io("read", path, e))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice());
    let headers = reader
        .headers()
        .map_err(|e| CatalogError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .clone();

    let idx_code = header_index(&headers, "code");
    if idx_code.is_none() {
        return Err(CatalogError::Csv {
            path: path.to_path_buf(),
            message: "missing required column: code".to_string(),
        });
    }
    let idx_display = header_index(&headers, "display");
    let idx_system = header_index(&headers, "system");

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let row = row.map_err(|e| CatalogError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let Some(code) = get_string(&row, idx_code) else {
            skipped += 1;
            continue;
        };
        let display = get_string(&row, idx_display).unwrap_or_default();
        let system = get_string(&row, idx_system).unwrap_or_default();
        records.push(CodeRecord {
            code,
            display,
            system,
        });
    }

    debug!(
        path = %path.display(),
        rows = records.len(),
        skipped,
        "parsed catalog CSV"
    );
    Ok(records)
}
