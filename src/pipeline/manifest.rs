//! Per-run record of what happened to every file.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::cleaning::DatasetKind;
use crate::discovery::RawFile;

use super::result::{IngestionResult, Stage};

/// Numbered names tried by [`RunManifest::write_to`] before giving up.
const MAX_NAME_ATTEMPTS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Skipped,
    Failed,
}

/// One file's line in a [`RunManifest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub source: PathBuf,
    pub category: String,
    pub kind: Option<DatasetKind>,
    pub destination: Option<PathBuf>,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    /// Skip reason or error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ManifestEntry {
    pub fn new(file: &RawFile, result: &IngestionResult) -> Self {
        let mut entry = Self {
            source: file.path().to_path_buf(),
            category: file.category().to_string(),
            kind: file.kind(),
            destination: None,
            outcome: Outcome::Skipped,
            stage: None,
            rows: None,
            detail: None,
        };
        match result {
            IngestionResult::Success {
                kind,
                destination,
                rows,
            } => {
                entry.kind = Some(*kind);
                entry.destination = Some(destination.clone());
                entry.outcome = Outcome::Success;
                entry.rows = Some(*rows);
            }
            IngestionResult::Skipped { reason } => {
                entry.detail = Some(reason.clone());
            }
            IngestionResult::Failed { kind, stage, error } => {
                entry.kind = Some(*kind);
                entry.outcome = Outcome::Failed;
                entry.stage = Some(*stage);
                entry.detail = Some(error.to_string());
            }
        }
        entry
    }
}

/// JSON record of one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub root: PathBuf,
    pub entries: Vec<ManifestEntry>,
}

impl RunManifest {
    pub fn begin(root: impl Into<PathBuf>) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            root: root.into(),
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, file: &RawFile, result: &IngestionResult) {
        self.entries.push(ManifestEntry::new(file, result));
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    /// `run-<started_at>.json`, sortable and safe on every filesystem.
    ///
    /// [`RunManifest::write_to`] appends `-1`, `-2`, ... to the stem when this name is taken.
    pub fn file_name(&self) -> String {
        format!("run-{}.json", self.file_stem())
    }

    fn file_stem(&self) -> String {
        self.started_at.format("%Y%m%dT%H%M%S%.3fZ").to_string()
    }

    /// Write the manifest as pretty JSON into `dir`, atomically. Returns the written path.
    ///
    /// Never replaces an existing manifest: a run that started in the same millisecond as an
    /// earlier one gets a numbered name instead.
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut out = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut out, self)?;
            out.write_all(b"\n")?;
            out.flush()?;
        }

        let stem = self.file_stem();
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let dest = match attempt {
                0 => dir.join(self.file_name()),
                n => dir.join(format!("run-{stem}-{n}.json")),
            };
            match tmp.persist_noclobber(&dest) {
                Ok(_) => return Ok(dest),
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => tmp = err.file,
                Err(err) => return Err(err.error),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free manifest name for run-{stem} in {}", dir.display()),
        ))
    }

    pub fn read_from(path: &Path) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        Ok(serde_json::from_reader(io::BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{Outcome, RunManifest};
    use crate::cleaning::DatasetKind;
    use crate::discovery::RawFile;
    use crate::error::{CleaningError, IngestionError};
    use crate::pipeline::{IngestionResult, Stage};

    #[test]
    fn manifests_started_in_the_same_millisecond_do_not_overwrite_each_other() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("manifests");
        let first = RunManifest::begin(tmp.path());
        let mut second = RunManifest::begin(tmp.path());
        second.started_at = first.started_at;
        second.record(
            &RawFile::new("/data/raw/misc/notes.csv").classified(),
            &IngestionResult::Skipped {
                reason: "unclassified".to_string(),
            },
        );

        let a = first.write_to(&dir).unwrap();
        let b = second.write_to(&dir).unwrap();
        let c = first.write_to(&dir).unwrap();

        assert_eq!(a.file_name().unwrap().to_string_lossy(), first.file_name());
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 3);
        assert_eq!(RunManifest::read_from(&a).unwrap(), first);
        assert_eq!(RunManifest::read_from(&b).unwrap(), second);
    }

    #[test]
    fn records_each_outcome_and_round_trips_through_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let mut manifest = RunManifest::begin(tmp.path());

        let ok = RawFile::new("/data/raw/world/exports.csv").classified();
        manifest.record(
            &ok,
            &IngestionResult::Success {
                kind: DatasetKind::WorldTrade,
                destination: PathBuf::from("/data/cleaned/world_trade/exports_cleaned.csv"),
                rows: 10,
            },
        );
        let skipped = RawFile::new("/data/raw/misc/notes.csv").classified();
        manifest.record(
            &skipped,
            &IngestionResult::Skipped {
                reason: "unclassified".to_string(),
            },
        );
        let failed = RawFile::new("/data/raw/world/broken.csv").classified();
        manifest.record(
            &failed,
            &IngestionResult::Failed {
                kind: DatasetKind::WorldTrade,
                stage: Stage::Transform,
                error: IngestionError::Cleaning(CleaningError::MissingColumns {
                    missing: vec!["Trade Value (2024)".to_string()],
                }),
            },
        );
        manifest.finish();

        assert_eq!(manifest.count(Outcome::Success), 1);
        assert_eq!(manifest.count(Outcome::Skipped), 1);
        assert_eq!(manifest.count(Outcome::Failed), 1);
        assert_eq!(manifest.entries[2].stage, Some(Stage::Transform));
        assert!(manifest.entries[2]
            .detail
            .as_deref()
            .unwrap()
            .contains("Trade Value (2024)"));

        let path = manifest.write_to(&tmp.path().join("manifests")).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("run-"));
        assert_eq!(RunManifest::read_from(&path).unwrap(), manifest);
    }
}
