use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cleaning::DatasetKind;
use crate::error::IngestionError;

/// Pipeline step at which a file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Load,
    Transform,
    Persist,
    Archive,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Load => "load",
            Stage::Transform => "transform",
            Stage::Persist => "persist",
            Stage::Archive => "archive",
        })
    }
}

/// Outcome of ingesting one raw file.
#[derive(Debug)]
pub enum IngestionResult {
    /// The cleaned artifact was written to `destination`.
    Success {
        kind: DatasetKind,
        destination: PathBuf,
        rows: usize,
    },
    /// Nothing was done, e.g. the file did not match any dataset kind.
    Skipped { reason: String },
    /// The file failed at `stage`; nothing was written to the canonical path unless the
    /// failure happened while archiving.
    Failed {
        kind: DatasetKind,
        stage: Stage,
        error: IngestionError,
    },
}

impl IngestionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, IngestionResult::Success { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, IngestionResult::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, IngestionResult::Failed { .. })
    }

    pub fn destination(&self) -> Option<&PathBuf> {
        match self {
            IngestionResult::Success { destination, .. } => Some(destination),
            _ => None,
        }
    }
}
