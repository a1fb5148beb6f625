//! Unified loading entrypoint.
//!
//! Most callers should use [`load_table`], which picks a loader from the file extension (or
//! [`LoadOptions::format`]) and returns an all-text [`crate::types::DataSet`].

use std::path::Path;

use crate::error::{IngestionError, Result};
use crate::types::DataSet;

use super::csv;

/// Supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl TableFormat {
    /// Extensions recognized by [`TableFormat::from_extension`].
    pub const EXTENSIONS: &'static [&'static str] = &["csv", "xlsx", "xls", "xlsm", "xlsb", "ods"];

    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format of `path` from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}

/// How to choose the sheet when loading a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcelSheetSelection {
    /// Load the first sheet (default).
    #[default]
    First,
    /// Load a single named sheet.
    Sheet(String),
}

/// Options controlling [`load_table`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<TableFormat>,
    /// Sheet to read from spreadsheet sources.
    pub excel_sheet_selection: ExcelSheetSelection,
}

/// Load a raw table from `path`.
///
/// # Examples
///
/// ```no_run
/// use trade_ingest::ingestion::{load_table, LoadOptions};
///
/// # fn main() -> Result<(), trade_ingest::IngestionError> {
/// let ds = load_table("raw/world/exports.csv", &LoadOptions::default())?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn load_table(path: impl AsRef<Path>, options: &LoadOptions) -> Result<DataSet> {
    let path = path.as_ref();
    let format = match options.format {
        Some(f) => f,
        None => TableFormat::from_path(path).ok_or_else(|| IngestionError::UnreadableFile {
            path: path.to_path_buf(),
            reason: "unsupported file extension".to_string(),
        })?,
    };

    match format {
        TableFormat::Csv => csv::read_csv_from_path(path),
        TableFormat::Excel => load_excel_dispatch(path, &options.excel_sheet_selection),
    }
}

fn load_excel_dispatch(path: &Path, sel: &ExcelSheetSelection) -> Result<DataSet> {
    #[cfg(feature = "excel")]
    {
        use super::excel;

        match sel {
            ExcelSheetSelection::First => excel::read_excel_from_path(path, None),
            ExcelSheetSelection::Sheet(name) => excel::read_excel_from_path(path, Some(name.as_str())),
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = sel;
        Err(IngestionError::UnreadableFile {
            path: path.to_path_buf(),
            reason: "excel loading not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
