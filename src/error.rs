use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type Result<T, E = IngestionError> = std::result::Result<T, E>;

/// Convenience result type for cleaning transforms.
pub type CleaningResult<T> = std::result::Result<T, CleaningError>;

/// Error returned by a cleaning transform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CleaningError {
    /// One or more required columns were not found in the (trimmed) input headers.
    #[error("missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
}

/// Error type returned while ingesting a single raw file.
///
/// Every variant is caught at the pipeline boundary and recorded in the file's
/// [`crate::pipeline::IngestionResult`]; none of them abort a batch.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error while reading a source (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Spreadsheet read error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV read error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The file has an unsupported format or no usable header row.
    #[error("unreadable file {}: {reason}", .path.display())]
    UnreadableFile { path: PathBuf, reason: String },

    /// The transform rejected the table.
    #[error("cleaning failed: {0}")]
    Cleaning(#[from] CleaningError),

    /// The cleaned artifact could not be written to its destination.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source could not be moved into the archive after a successful write.
    #[error("failed to archive source into {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error returned by directory scanning and watching.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("directory not found: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to read directory {}: {source}", .path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Error returned by the cached Census fetch collaborator.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("cache i/o failed for {}: {source}", .path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected payload shape: {0}")]
    Payload(String),

    #[error("failed to stage fetched table: {0}")]
    Stage(#[source] IngestionError),
}

/// Error returned by the version-control sync collaborator.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to run `git {step}`: {source}")]
    Spawn {
        step: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`git {step}` exited with {status}: {stderr}")]
    Failed {
        step: String,
        status: String,
        stderr: String,
    },
}

/// Startup-level configuration error. These are the only faults that end a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("root directory does not exist: {}", .path.display())]
    RootMissing { path: PathBuf },

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
