//! Version-control automation around a run: pull before, publish after.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::SyncError;

/// Commit message used when none is configured.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Automated data processing and script update";

/// Runs `git` in a working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSync {
    repo_dir: PathBuf,
    message: String,
}

impl GitSync {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            message: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// `git pull`.
    pub fn pull(&self) -> Result<(), SyncError> {
        self.git(&["pull"])?;
        Ok(())
    }

    /// Commit and push local changes, if there are any. Returns whether a commit was made.
    pub fn publish(&self) -> Result<bool, SyncError> {
        let status = self.git(&["status", "--porcelain"])?;
        if !has_changes(&status) {
            info!(repo = %self.repo_dir.display(), "no changes to publish");
            return Ok(false);
        }
        self.git(&["add", "."])?;
        self.git(&["commit", "-m", &self.message])?;
        self.git(&["push"])?;
        info!(repo = %self.repo_dir.display(), "published changes");
        Ok(true)
    }

    /// Pull, then publish.
    pub fn sync(&self) -> Result<bool, SyncError> {
        self.pull()?;
        self.publish()
    }

    fn git(&self, args: &[&str]) -> Result<String, SyncError> {
        let step = args.join(" ");
        debug!(repo = %self.repo_dir.display(), step = %step, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .map_err(|source| SyncError::Spawn {
                step: step.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SyncError::Failed {
                step,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Whether `git status --porcelain` output lists anything.
pub fn has_changes(porcelain: &str) -> bool {
    porcelain.lines().any(|line| !line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::process::Command;

    use super::{DEFAULT_COMMIT_MESSAGE, GitSync, has_changes};

    fn git(dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git").args(args).current_dir(dir).output().unwrap();
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// A working clone of a bare repository with one pushed commit.
    fn clone_with_remote(root: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let remote = root.join("remote.git");
        let work = root.join("work");
        fs::create_dir_all(&remote).unwrap();
        git(&remote, &["init", "--bare", "--quiet"]);
        git(root, &["clone", "--quiet", "remote.git", "work"]);
        git(&work, &["config", "user.name", "Ingest Bot"]);
        git(&work, &["config", "user.email", "ingest@example.com"]);
        git(&work, &["config", "commit.gpgsign", "false"]);
        fs::write(work.join("README"), "data\n").unwrap();
        git(&work, &["add", "."]);
        git(&work, &["commit", "--quiet", "-m", "init"]);
        git(&work, &["push", "--quiet", "-u", "origin", "HEAD"]);
        (remote, work)
    }

    #[test]
    fn porcelain_output_detection() {
        assert!(!has_changes(""));
        assert!(!has_changes("\n"));
        assert!(has_changes(" M cleaned/world_trade/exports_cleaned.csv\n"));
        assert!(has_changes("?? manifests/run-20240101T000000.000Z.json\n"));
    }

    #[test]
    fn default_message_and_override() {
        let sync = GitSync::new("/data");
        assert_eq!(sync.message, DEFAULT_COMMIT_MESSAGE);
        assert_eq!(sync.with_message("nightly").message, "nightly");
    }

    #[test]
    fn sync_commits_and_pushes_new_outputs_once() {
        let tmp = tempfile::tempdir().unwrap();
        let (remote, work) = clone_with_remote(tmp.path());
        fs::create_dir_all(work.join("cleaned/revenue")).unwrap();
        fs::write(work.join("cleaned/revenue/gov_finance_2021_cleaned.csv"), "State\n").unwrap();
        let sync = GitSync::new(&work).with_message("nightly ingest");

        assert!(sync.sync().unwrap());
        assert!(!sync.sync().unwrap(), "clean tree has nothing to publish");

        let log = git(&remote, &["log", "--format=%s"]);
        assert_eq!(log.lines().collect::<Vec<_>>(), vec!["nightly ingest", "init"]);
    }

    #[test]
    fn pull_outside_a_repository_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("not-here");
        assert!(GitSync::new(missing).pull().is_err());
    }
}
