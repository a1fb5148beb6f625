//! One raw file in, one cleaned artifact out.
//!
//! [`Pipeline::ingest`] runs classify → select transform → load → clean → resolve → atomic
//! write → (optional) archive for a single file and turns every failure into an
//! [`IngestionResult`]. [`Pipeline::ingest_all`] does the same for a batch and collects a
//! [`RunManifest`].
//!
//! ```no_run
//! use trade_ingest::discovery::{ScanOptions, Scanner};
//! use trade_ingest::output::Layout;
//! use trade_ingest::pipeline::Pipeline;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let layout = Layout::new("data");
//! let files = Scanner::new(ScanOptions::default().with_max_depth(2)).scan(layout.raw_dir())?;
//! let manifest = Pipeline::new(layout.clone()).ingest_all(files);
//! manifest.write_to(&layout.manifests_dir())?;
//! # Ok(())
//! # }
//! ```

pub mod manifest;
pub mod observability;
pub mod result;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cleaning::{CleaningReport, DatasetKind, Transform, TransformRegistry};
use crate::discovery::RawFile;
use crate::error::IngestionError;
use crate::ingestion::{LoadOptions, load_table};
use crate::output::{Layout, PathResolver, move_file, write_csv_atomic};

pub use manifest::{ManifestEntry, Outcome, RunManifest};
pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver, severity_for_error,
};
pub use result::{IngestionResult, Stage};

/// Reason recorded for files whose kind has no transform.
pub const UNCLASSIFIED: &str = "unclassified";

/// Options controlling a [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// How sources are loaded. `format` overrides the extension when set.
    pub load: LoadOptions,
    /// Move each successfully ingested source to `archive/<category>/`.
    pub archive: bool,
    /// Failures at or above this severity are reported through
    /// [`IngestionObserver::on_alert`] instead of `on_failure`.
    pub alert_threshold: IngestionSeverity,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            load: LoadOptions::default(),
            archive: false,
            alert_threshold: IngestionSeverity::Critical,
        }
    }
}

/// The ingestion pipeline. Holds only read-only state, so one instance serves a whole run.
#[derive(Clone)]
pub struct Pipeline {
    layout: Layout,
    resolver: PathResolver,
    registry: TransformRegistry,
    options: PipelineOptions,
    observer: Arc<dyn IngestionObserver>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("layout", &self.layout)
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Pipeline over `layout` with the standard transforms, default options and a
    /// [`TracingObserver`].
    pub fn new(layout: Layout) -> Self {
        Self {
            resolver: layout.resolver(),
            layout,
            registry: TransformRegistry::standard(),
            options: PipelineOptions::default(),
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_registry(mut self, registry: TransformRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn IngestionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Ingest the file at `path`.
    pub fn ingest(&self, path: impl AsRef<Path>) -> IngestionResult {
        self.ingest_file(&RawFile::new(path.as_ref()))
    }

    /// Ingest one discovered file. Never panics and never returns early for a sibling: every
    /// failure ends up in the returned [`IngestionResult`].
    pub fn ingest_file(&self, file: &RawFile) -> IngestionResult {
        let file = file.clone().classified();
        let kind = file.kind().unwrap_or(DatasetKind::Unknown);
        let ctx = IngestionContext {
            path: file.path().to_path_buf(),
            format: file.format(),
            kind,
        };

        let Some(transform) = self.registry.get(kind) else {
            let reason = if kind == DatasetKind::Unknown {
                UNCLASSIFIED.to_string()
            } else {
                format!("no transform registered for {kind}")
            };
            self.observer.on_skip(&ctx, &reason);
            return IngestionResult::Skipped { reason };
        };

        match self.run(&file, transform) {
            Ok((destination, report)) => {
                self.observer
                    .on_success(&ctx, &destination, IngestionStats::from(&report));
                IngestionResult::Success {
                    kind,
                    destination,
                    rows: report.rows_out,
                }
            }
            Err((stage, error)) => {
                let severity = severity_for_error(&error);
                if severity >= self.options.alert_threshold {
                    self.observer.on_alert(&ctx, stage, severity, &error);
                } else {
                    self.observer.on_failure(&ctx, stage, severity, &error);
                }
                IngestionResult::Failed { kind, stage, error }
            }
        }
    }

    /// Ingest `files` in order and collect the outcomes. One file's failure never affects
    /// the others.
    pub fn ingest_all<I>(&self, files: I) -> RunManifest
    where
        I: IntoIterator<Item = RawFile>,
    {
        let mut manifest = RunManifest::begin(self.layout.root());
        let mut written: HashMap<PathBuf, PathBuf> = HashMap::new();
        for file in files {
            let file = file.classified();
            let result = self.ingest_file(&file);
            manifest.record(&file, &result);

            let Some(destination) = result.destination() else {
                continue;
            };
            let previous = written.insert(destination.clone(), file.path().to_path_buf());
            if let Some(previous) = previous {
                warn!(
                    destination = %destination.display(),
                    previous = %previous.display(),
                    source = %file.path().display(),
                    "cleaned output written twice in one batch; the later source wins"
                );
                if let Some(entry) = manifest.entries.last_mut() {
                    entry.detail = Some(format!("replaced output of {}", previous.display()));
                }
            }
        }
        manifest.finish();
        manifest
    }

    fn run(
        &self,
        file: &RawFile,
        transform: &Transform,
    ) -> Result<(PathBuf, CleaningReport), (Stage, IngestionError)> {
        let load = LoadOptions {
            format: self.options.load.format.or(file.format()),
            excel_sheet_selection: self.options.load.excel_sheet_selection.clone(),
        };
        let table = load_table(file.path(), &load).map_err(|e| (Stage::Load, e))?;
        debug!(source = %file.path().display(), rows = table.row_count(), "loaded");

        let (cleaned, report) = transform
            .apply_with_report(&table)
            .map_err(|e| (Stage::Transform, IngestionError::from(e)))?;

        let kind = transform.kind();
        let name = file.file_name();
        let destination = self.resolver.prepare(kind, &name).map_err(|source| {
            (
                Stage::Persist,
                IngestionError::WriteFailure {
                    path: self.resolver.resolve(kind, &name),
                    source,
                },
            )
        })?;
        write_csv_atomic(&cleaned, &destination).map_err(|e| (Stage::Persist, e))?;

        if self.options.archive {
            let target = self.layout.archive_path(file.category(), &name);
            move_file(file.path(), &target).map_err(|source| {
                (
                    Stage::Archive,
                    IngestionError::Archive {
                        path: target.clone(),
                        source,
                    },
                )
            })?;
            debug!(source = %file.path().display(), archive = %target.display(), "archived");
        }

        Ok((destination, report))
    }
}
