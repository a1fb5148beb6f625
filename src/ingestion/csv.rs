//! CSV loading.

use std::path::Path;

use crate::error::{IngestionError, Result};
use crate::types::{DataSet, Schema, Value};

/// Load a CSV file into an all-text [`DataSet`].
///
/// Rules:
///
/// - CSV must have a header row; header names are kept verbatim (the transforms trim them).
/// - Cells are trimmed; empty cells become [`Value::Null`].
/// - Short rows are padded with nulls, extra trailing cells are ignored.
pub fn read_csv_from_path(path: impl AsRef<Path>) -> Result<DataSet> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    read_csv_from_reader(&mut rdr).map_err(|e| match e {
        IngestionError::UnreadableFile { reason, .. } => IngestionError::UnreadableFile {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })
}

/// Load CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> Result<DataSet> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestionError::UnreadableFile {
            path: Default::default(),
            reason: "no header row".to_string(),
        });
    }

    let width = headers.len();
    let schema = Schema::utf8_from_headers(headers.iter());

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row = (0..width)
            .map(|idx| text_value(record.get(idx).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    Ok(DataSet::new(schema, rows))
}

pub(crate) fn text_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::Utf8(trimmed.to_owned())
    }
}
