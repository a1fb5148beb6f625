use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use tracing::{debug, warn};

use crate::error::DiscoveryError;

use super::raw_file::RawFile;
use super::scanner::Scanner;

/// Timing for [`Watcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Pause between directory polls when nothing is ready.
    pub poll_interval: Duration,
    /// How long a file's size and mtime must stay unchanged before it is yielded.
    pub settle_delay: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            settle_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    len: u64,
    modified: Option<SystemTime>,
}

#[derive(Debug)]
struct Pending {
    snapshot: Snapshot,
    stable_since: Instant,
}

/// Polling directory watcher.
///
/// Each file is yielded exactly once, after it has stopped changing for
/// [`WatchOptions::settle_delay`]. Iterating blocks forever; use [`Watcher::poll`] for a single
/// non-blocking round.
#[derive(Debug)]
pub struct Watcher {
    dir: PathBuf,
    scanner: Scanner,
    options: WatchOptions,
    pending: BTreeMap<PathBuf, Pending>,
    delivered: HashSet<PathBuf>,
    ready: VecDeque<RawFile>,
}

impl Watcher {
    pub fn new(dir: impl Into<PathBuf>, scanner: Scanner, options: WatchOptions) -> Self {
        let dir = dir.into();
        Self {
            dir: std::path::absolute(&dir).unwrap_or(dir),
            scanner,
            options,
            pending: BTreeMap::new(),
            delivered: HashSet::new(),
            ready: VecDeque::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Treat `path` as already delivered so it is never yielded by this watcher.
    ///
    /// Used when a batch scan has already ingested the directory's existing files.
    pub fn mark_delivered(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        self.pending.remove(&path);
        self.delivered.insert(path);
    }

    /// Allow `path` to be yielded again once a file reappears there.
    ///
    /// Delivered paths are otherwise remembered for the watcher's lifetime, even when the file
    /// is briefly missing from a poll (renamed away and back, saved through a temp file).
    pub fn forget(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        self.delivered.remove(&path);
    }

    /// One polling round. Returns the files that settled during this round, sorted by path.
    pub fn poll(&mut self) -> Result<Vec<RawFile>, DiscoveryError> {
        self.poll_at(Instant::now())
    }

    fn poll_at(&mut self, now: Instant) -> Result<Vec<RawFile>, DiscoveryError> {
        let present: HashSet<PathBuf> = self.scanner.scan_paths(&self.dir)?.into_iter().collect();

        // Pending files removed mid-copy are dropped; delivered paths stay until `forget`.
        self.pending.retain(|path, _| {
            let keep = present.contains(path);
            if !keep {
                debug!(path = %path.display(), "pending file disappeared");
            }
            keep
        });

        let mut settled = Vec::new();
        let mut sorted: Vec<&PathBuf> = present.iter().collect();
        sorted.sort();
        for path in sorted {
            if self.delivered.contains(path) {
                continue;
            }
            let Some(snapshot) = read_snapshot(path) else {
                self.pending.remove(path);
                continue;
            };

            let pending = self.pending.entry(path.clone()).or_insert_with(|| {
                debug!(path = %path.display(), "new file observed");
                Pending {
                    snapshot,
                    stable_since: now,
                }
            });
            if pending.snapshot != snapshot {
                pending.snapshot = snapshot;
                pending.stable_since = now;
                continue;
            }
            if now.saturating_duration_since(pending.stable_since) >= self.options.settle_delay {
                settled.push(path.clone());
            }
        }

        Ok(settled
            .into_iter()
            .map(|path| {
                self.pending.remove(&path);
                self.delivered.insert(path.clone());
                RawFile::new(path)
            })
            .collect())
    }
}

fn read_snapshot(path: &Path) -> Option<Snapshot> {
    let meta = fs::metadata(path).ok()?;
    Some(Snapshot {
        len: meta.len(),
        modified: meta.modified().ok(),
    })
}

impl Iterator for Watcher {
    type Item = RawFile;

    fn next(&mut self) -> Option<RawFile> {
        loop {
            if let Some(file) = self.ready.pop_front() {
                return Some(file);
            }
            match self.poll() {
                Ok(files) => self.ready.extend(files),
                Err(err) => warn!(dir = %self.dir.display(), error = %err, "watch poll failed"),
            }
            if self.ready.is_empty() {
                thread::sleep(self.options.poll_interval);
            }
        }
    }
}
