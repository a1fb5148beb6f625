use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::DiscoveryError;
use crate::ingestion::TableFormat;

use super::raw_file::RawFile;

/// Options controlling [`Scanner::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Accepted extensions, compared case-insensitively and without the leading dot.
    pub extensions: Vec<String>,
    /// How deep to descend below the scanned directory. `1` lists only its direct children;
    /// `2` also looks one level into subdirectories (e.g. `raw/<category>/`).
    pub max_depth: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: TableFormat::EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_depth: 1,
        }
    }
}

impl ScanOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SkipReason {
    NotAFile,
    LockFile,
    Extension,
}

impl SkipReason {
    fn as_str(self) -> &'static str {
        match self {
            SkipReason::NotAFile => "not a regular file",
            SkipReason::LockFile => "editor lock file",
            SkipReason::Extension => "unsupported extension",
        }
    }
}

/// One-shot directory enumeration.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// List the ingestible files under `dir`, sorted by path.
    ///
    /// Safe to call repeatedly; nothing is recorded between calls. Unreadable subdirectories
    /// are logged and skipped; only a missing or unreadable `dir` is an error.
    pub fn scan(&self, dir: impl AsRef<Path>) -> Result<Vec<RawFile>, DiscoveryError> {
        Ok(self
            .scan_paths(dir.as_ref())?
            .into_iter()
            .map(RawFile::new)
            .collect())
    }

    pub(crate) fn scan_paths(&self, dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
        if !dir.is_dir() {
            return Err(DiscoveryError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(self.options.max_depth.max(1));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() > 0 => {
                    warn!(dir = %dir.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
                Err(source) => {
                    return Err(DiscoveryError::DirectoryRead {
                        path: dir.to_path_buf(),
                        source,
                    });
                }
            };

            let path = entry.path();
            match self.check(path, entry.file_type().is_file()) {
                Ok(()) => files.push(path.to_path_buf()),
                Err(reason) => {
                    debug!(path = %path.display(), reason = reason.as_str(), "skipping");
                }
            }
        }

        files.sort();
        Ok(files)
    }

    pub(crate) fn check(&self, path: &Path, is_file: bool) -> Result<(), SkipReason> {
        if !is_file {
            return Err(SkipReason::NotAFile);
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if name.starts_with("~$") || name.starts_with(".~lock") {
            return Err(SkipReason::LockFile);
        }

        let accepted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.options
                    .extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
            });
        if accepted {
            Ok(())
        } else {
            Err(SkipReason::Extension)
        }
    }
}
