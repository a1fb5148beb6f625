//! Canonical locations under the data root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::cleaning::DatasetKind;

/// Suffix appended to the stem of every cleaned artifact.
pub const CLEANED_SUFFIX: &str = "_cleaned";

const RAW_PREFIXES: &[&str] = &["raw_data_", "raw_data ", "raw_", "raw "];
const RAW_SUFFIXES: &[&str] = &["_raw", " raw"];

/// Directory layout of a data root.
///
/// ```text
/// <root>/raw/<category>/*        input
/// <root>/cleaned/<kind>/*        cleaned output
/// <root>/archive/<category>/*    ingested sources (when archiving is on)
/// <root>/manifests/*.json        run manifests
/// <root>/cache/*.json            fetch cache
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("raw")
    }

    pub fn cleaned_dir(&self) -> PathBuf {
        self.root.join("cleaned")
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.root.join("archive")
    }

    pub fn manifests_dir(&self) -> PathBuf {
        self.root.join("manifests")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    /// Where an ingested source is moved when archiving is enabled.
    pub fn archive_path(&self, category: &str, file_name: &str) -> PathBuf {
        self.archive_dir().join(category).join(file_name)
    }

    pub fn resolver(&self) -> PathResolver {
        PathResolver::new(self.cleaned_dir())
    }
}

/// Computes the destination of a cleaned artifact from its kind and original file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    cleaned_root: PathBuf,
}

impl PathResolver {
    pub fn new(cleaned_root: impl Into<PathBuf>) -> Self {
        Self {
            cleaned_root: cleaned_root.into(),
        }
    }

    /// `<cleaned_root>/<kind slug>/<cleaned file name>`. Pure; touches nothing on disk.
    pub fn resolve(&self, kind: DatasetKind, original_filename: &str) -> PathBuf {
        self.cleaned_root
            .join(kind.slug())
            .join(cleaned_file_name(original_filename))
    }

    /// Like [`Self::resolve`], and also creates the kind directory if it does not exist yet.
    pub fn prepare(&self, kind: DatasetKind, original_filename: &str) -> io::Result<PathBuf> {
        let dest = self.resolve(kind, original_filename);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(dest)
    }
}

/// Cleaned file name for a raw file name.
///
/// Raw markers (`raw_data_`, `raw_`, `Raw `, `_raw`, ...) are removed case-insensitively, the
/// extension is dropped and `_cleaned.csv` is appended once.
pub fn cleaned_file_name(original_filename: &str) -> String {
    let original = Path::new(original_filename);
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut base = strip_prefix_ignore_case(&stem, RAW_PREFIXES);
    base = strip_suffix_ignore_case(base, RAW_SUFFIXES);
    let base = match base.trim() {
        "" => stem.trim(),
        trimmed => trimmed,
    };
    let base = if base.is_empty() { "dataset" } else { base };

    if base.ends_with(CLEANED_SUFFIX) {
        format!("{base}.csv")
    } else {
        format!("{base}{CLEANED_SUFFIX}.csv")
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefixes: &[&str]) -> &'a str {
    for p in prefixes {
        if s.get(..p.len()).is_some_and(|head| head.eq_ignore_ascii_case(p)) {
            return &s[p.len()..];
        }
    }
    s
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffixes: &[&str]) -> &'a str {
    for p in suffixes {
        if s.len() >= p.len() {
            let cut = s.len() - p.len();
            if s.get(cut..).is_some_and(|tail| tail.eq_ignore_ascii_case(p)) {
                return &s[..cut];
            }
        }
    }
    s
}
