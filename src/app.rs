//! Batch and watch runs over a data root.
//!
//! A run is: optional `git pull`, staging of configured fetch sources, scan of `raw/`,
//! ingestion, manifest, optional publish. Nothing after startup is fatal; failures are logged
//! and recorded in the manifest.

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::{Config, RunMode};
use crate::discovery::{RawFile, Scanner, Watcher};
use crate::fetch;
use crate::output::Layout;
use crate::pipeline::{Outcome, Pipeline, RunManifest};
use crate::sync::GitSync;

/// Runner for one data root.
#[derive(Debug)]
pub struct App {
    layout: Layout,
    config: Config,
    pipeline: Pipeline,
    git: Option<GitSync>,
}

impl App {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        let layout = Layout::new(root);
        let pipeline = Pipeline::new(layout.clone()).with_options(config.pipeline_options());
        let git = config.git_sync(layout.root());
        Self {
            layout,
            config,
            pipeline,
            git,
        }
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Run in the configured mode. In watch mode this never returns.
    pub fn run(&self) {
        match self.config.mode {
            RunMode::Batch => {
                self.run_batch();
            }
            RunMode::Watch => self.watch().for_each(drop),
        }
    }

    /// One pass over everything currently under `raw/`.
    pub fn run_batch(&self) -> RunManifest {
        if let Some(git) = &self.git {
            if let Err(err) = git.pull() {
                warn!(error = %err, "git pull failed; continuing with local state");
            }
        }
        self.stage_sources();

        let manifest = self.pipeline.ingest_all(self.scan_raw());
        self.finish(&manifest);
        manifest
    }

    /// Run a batch, then yield one manifest per file that appears afterwards.
    pub fn watch(&self) -> impl Iterator<Item = RunManifest> + '_ {
        let initial = self.run_batch();

        let mut watcher = Watcher::new(
            self.layout.raw_dir(),
            Scanner::new(self.config.scan_options()),
            self.config.watch_options(),
        );
        for entry in &initial.entries {
            if self.config.archive && entry.outcome == Outcome::Success {
                continue;
            }
            watcher.mark_delivered(&entry.source);
        }
        info!(dir = %watcher.dir().display(), "watching for new files");

        std::iter::from_fn(move || {
            let file = watcher.next()?;
            let manifest = self.pipeline.ingest_all([file]);
            if self.config.archive {
                // An archived source leaves its path free; a new file dropped there is new work.
                for entry in &manifest.entries {
                    if entry.outcome == Outcome::Success {
                        watcher.forget(&entry.source);
                    }
                }
            }
            self.finish(&manifest);
            Some(manifest)
        })
    }

    fn stage_sources(&self) {
        if self.config.sources.is_empty() {
            return;
        }
        let client = match fetch::client() {
            Ok(client) => client,
            Err(err) => {
                warn!(error = %err, "could not build http client; skipping fetch sources");
                return;
            }
        };
        for source in &self.config.sources {
            if let Err(err) = fetch::fetch_source(&client, &self.layout, source) {
                warn!(source = %source.name, error = %err, "fetch failed");
            }
        }
    }

    fn scan_raw(&self) -> Vec<RawFile> {
        let raw = self.layout.raw_dir();
        if let Err(err) = fs::create_dir_all(&raw) {
            warn!(dir = %raw.display(), error = %err, "could not create raw directory");
        }
        match Scanner::new(self.config.scan_options()).scan(&raw) {
            Ok(files) => files,
            Err(err) => {
                warn!(error = %err, "scan failed");
                Vec::new()
            }
        }
    }

    fn finish(&self, manifest: &RunManifest) {
        info!(
            files = manifest.entries.len(),
            succeeded = manifest.count(Outcome::Success),
            skipped = manifest.count(Outcome::Skipped),
            failed = manifest.count(Outcome::Failed),
            "run finished"
        );
        if manifest.entries.is_empty() {
            return;
        }
        match manifest.write_to(&self.layout.manifests_dir()) {
            Ok(path) => info!(path = %path.display(), "wrote manifest"),
            Err(err) => warn!(error = %err, "could not write manifest"),
        }
        if let Some(git) = &self.git {
            if let Err(err) = git.publish() {
                warn!(error = %err, "git publish failed");
            }
        }
    }
}
