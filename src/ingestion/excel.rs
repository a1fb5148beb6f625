#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};

use crate::error::{IngestionError, Result};
use crate::types::{DataSet, Schema, Value};

/// Load one sheet of a spreadsheet (`.xlsx`, `.xls`, `.ods`, etc.) into an all-text `DataSet`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Converts every following cell to text; empty cells become [`Value::Null`]
pub fn read_excel_from_path(path: impl AsRef<Path>, sheet_name: Option<&str>) -> Result<DataSet> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IngestionError::UnreadableFile {
                path: path.to_path_buf(),
                reason: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    read_sheet_range(&range).map_err(|reason| IngestionError::UnreadableFile {
        path: path.to_path_buf(),
        reason: format!("sheet '{sheet}': {reason}"),
    })
}

fn read_sheet_range(range: &Range<Data>) -> std::result::Result<DataSet, String> {
    let mut rows_iter = range
        .rows()
        .skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));

    let header_cells: Vec<String> = rows_iter
        .next()
        .ok_or_else(|| "sheet has no non-empty rows (no header row found)".to_string())?
        .iter()
        .map(cell_to_string)
        .collect();

    let width = header_cells.len();
    let schema = Schema::utf8_from_headers(header_cells);

    let rows = rows_iter
        .map(|row| {
            (0..width)
                .map(|idx| match row.get(idx).unwrap_or(&Data::Empty) {
                    Data::Empty => Value::Null,
                    cell => super::csv::text_value(&cell_to_string(cell)),
                })
                .collect()
        })
        .collect();

    Ok(DataSet::new(schema, rows))
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(f) => f.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}
