use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::cleaning::{CleaningReport, DatasetKind};
use crate::error::IngestionError;
use crate::ingestion::TableFormat;

use super::result::Stage;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (the file was rejected for its content).
    Warning,
    /// Error-level event (the file could not be read).
    Error,
    /// Critical error (I/O on the destination or archive side).
    Critical,
}

/// Severity of a per-file failure.
///
/// Content problems are warnings, unreadable inputs are errors and failures to write or move
/// files are critical, since they usually affect every file in the run.
pub fn severity_for_error(error: &IngestionError) -> IngestionSeverity {
    match error {
        IngestionError::Cleaning(_) => IngestionSeverity::Warning,
        IngestionError::Csv(_) | IngestionError::UnreadableFile { .. } => IngestionSeverity::Error,
        #[cfg(feature = "excel")]
        IngestionError::Excel(_) => IngestionSeverity::Error,
        IngestionError::Io(_) | IngestionError::WriteFailure { .. } | IngestionError::Archive { .. } => {
            IngestionSeverity::Critical
        }
    }
}

/// Context about one ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// Source path.
    pub path: PathBuf,
    /// Format inferred from the extension, if supported.
    pub format: Option<TableFormat>,
    /// Classification of the source.
    pub kind: DatasetKind,
}

/// Stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Rows read from the source.
    pub rows_in: usize,
    /// Rows written to the destination.
    pub rows_out: usize,
    /// Cells that failed numeric coercion.
    pub coercion_failures: usize,
}

impl From<&CleaningReport> for IngestionStats {
    fn from(report: &CleaningReport) -> Self {
        Self {
            rows_in: report.rows_in,
            rows_out: report.rows_out,
            coercion_failures: report.coercion_failures.len(),
        }
    }
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait IngestionObserver: Send + Sync {
    /// Called when a file has been cleaned and written.
    fn on_success(&self, _ctx: &IngestionContext, _destination: &Path, _stats: IngestionStats) {}

    /// Called when a file is skipped (no transform for its kind).
    fn on_skip(&self, _ctx: &IngestionContext, _reason: &str) {}

    /// Called when ingestion fails.
    fn on_failure(&self, _ctx: &IngestionContext, _stage: Stage, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when an ingestion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, stage: Stage, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, stage, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, destination: &Path, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, destination, stats);
        }
    }

    fn on_skip(&self, ctx: &IngestionContext, reason: &str) {
        for o in &self.observers {
            o.on_skip(ctx, reason);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, stage: Stage, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(ctx, stage, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, stage: Stage, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_alert(ctx, stage, severity, error);
        }
    }
}

/// Emits ingestion events as `tracing` events.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestionContext, destination: &Path, stats: IngestionStats) {
        info!(
            kind = %ctx.kind,
            source = %ctx.path.display(),
            destination = %destination.display(),
            rows_in = stats.rows_in,
            rows_out = stats.rows_out,
            coercion_failures = stats.coercion_failures,
            "ingested"
        );
    }

    fn on_skip(&self, ctx: &IngestionContext, reason: &str) {
        info!(source = %ctx.path.display(), reason, "skipped");
    }

    fn on_failure(&self, ctx: &IngestionContext, stage: Stage, severity: IngestionSeverity, error: &IngestionError) {
        warn!(
            kind = %ctx.kind,
            source = %ctx.path.display(),
            %stage,
            ?severity,
            %error,
            "ingestion failed"
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, stage: Stage, severity: IngestionSeverity, error: &IngestionError) {
        error!(
            kind = %ctx.kind,
            source = %ctx.path.display(),
            %stage,
            ?severity,
            %error,
            "ingestion alert"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;

    use super::{IngestionSeverity, severity_for_error};
    use crate::error::{CleaningError, IngestionError};

    #[test]
    fn severities_rank_destination_failures_highest() {
        let cleaning = IngestionError::Cleaning(CleaningError::MissingColumns { missing: vec![] });
        let unreadable = IngestionError::UnreadableFile {
            path: PathBuf::from("a.csv"),
            reason: "empty".to_string(),
        };
        let write = IngestionError::WriteFailure {
            path: PathBuf::from("out.csv"),
            source: io::Error::other("disk full"),
        };

        assert_eq!(severity_for_error(&cleaning), IngestionSeverity::Warning);
        assert_eq!(severity_for_error(&unreadable), IngestionSeverity::Error);
        assert_eq!(severity_for_error(&write), IngestionSeverity::Critical);
        assert!(IngestionSeverity::Critical > IngestionSeverity::Warning);
    }
}
