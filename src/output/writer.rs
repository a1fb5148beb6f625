//! Atomic CSV output.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{IngestionError, Result};
use crate::types::DataSet;

/// Write `dataset` as CSV to `dest`, replacing any previous file atomically.
///
/// The table is written to a temp file in `dest`'s directory and renamed over `dest` once
/// complete. On error the temp file is dropped and `dest` is left untouched.
///
/// Output is comma-delimited with a header row and `\n` line endings. Cells are rendered with
/// [`crate::types::Value`]'s `Display`, so the same table always produces the same bytes.
pub fn write_csv_atomic(dataset: &DataSet, dest: &Path) -> Result<()> {
    let failure = |source: io::Error| IngestionError::WriteFailure {
        path: dest.to_path_buf(),
        source,
    };

    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(failure)?;
    write_csv(dataset, tmp.as_file_mut()).map_err(failure)?;
    tmp.as_file().sync_all().map_err(failure)?;
    tmp.persist(dest).map_err(|e| failure(e.error))?;
    Ok(())
}

/// Serialize `dataset` as CSV into `out`.
pub fn write_csv<W: Write>(dataset: &DataSet, out: W) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    wtr.write_record(dataset.column_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Move `source` to `dest`, creating `dest`'s directory. Falls back to copy + remove when a
/// plain rename is not possible (e.g. across filesystems).
pub fn move_file(source: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if !source.is_file() {
                return Err(rename_err);
            }
            fs::copy(source, dest)?;
            fs::remove_file(source)
        }
    }
}
