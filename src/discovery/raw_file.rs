use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::cleaning::{DatasetKind, classify};
use crate::ingestion::TableFormat;

/// Category used when a file sits directly at the filesystem root.
pub const UNCATEGORIZED: &str = "uncategorized";

/// A raw file awaiting ingestion.
///
/// Identity is the absolute source path. Classification starts out empty and is filled in
/// once by [`RawFile::classified`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    path: PathBuf,
    format: Option<TableFormat>,
    discovered_at: DateTime<Utc>,
    category: String,
    kind: Option<DatasetKind>,
}

impl RawFile {
    /// Describe the file at `path`, discovered now.
    ///
    /// Relative paths are made absolute against the current directory when possible. The
    /// format comes from the extension (`None` when unsupported); the category is the name of
    /// the parent directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let path = std::path::absolute(&path).unwrap_or(path);
        let format = TableFormat::from_path(&path);
        let category = path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());

        Self {
            path,
            format,
            discovered_at: Utc::now(),
            category,
            kind: None,
        }
    }

    /// Return this file with its kind filled in. A file that is already classified is returned
    /// unchanged.
    pub fn classified(self) -> Self {
        if self.kind.is_some() {
            return self;
        }
        let kind = classify(&self.path);
        Self {
            kind: Some(kind),
            ..self
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, lossily converted.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn format(&self) -> Option<TableFormat> {
        self.format
    }

    pub fn discovered_at(&self) -> DateTime<Utc> {
        self.discovered_at
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// `None` until [`RawFile::classified`] has run.
    pub fn kind(&self) -> Option<DatasetKind> {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::RawFile;
    use crate::cleaning::DatasetKind;
    use crate::ingestion::TableFormat;

    #[test]
    fn derives_format_category_and_absolute_path() {
        let file = RawFile::new("raw/world/raw_data_exports.csv");
        assert!(file.path().is_absolute());
        assert!(file.path().ends_with(Path::new("raw/world/raw_data_exports.csv")));
        assert_eq!(file.format(), Some(TableFormat::Csv));
        assert_eq!(file.category(), "world");
        assert_eq!(file.file_name(), "raw_data_exports.csv");
        assert_eq!(file.kind(), None);
    }

    #[test]
    fn unsupported_extension_has_no_format() {
        assert_eq!(RawFile::new("/data/raw/notes.txt").format(), None);
    }

    #[test]
    fn classification_happens_once() {
        let file = RawFile::new("/data/raw/new_york/Top Products 2024.csv").classified();
        assert_eq!(file.kind(), Some(DatasetKind::Product));

        let again = file.clone().classified();
        assert_eq!(again, file);
    }
}
