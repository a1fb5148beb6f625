//! Optional `ingest.toml` at the data root.
//!
//! ```toml
//! mode = "watch"            # or "batch" (default)
//! archive = true            # move ingested sources to archive/<category>/
//! sheet = "Data"            # workbook sheet to read; first sheet when unset
//! log_format = "compact"    # pretty | compact | json
//!
//! [watch]
//! poll_interval_ms = 1000
//! settle_delay_ms = 2000
//!
//! [sync]
//! enabled = true
//! message = "Automated data processing and script update"
//!
//! [[sources]]
//! name = "gov_finance"
//! url = "https://api.census.gov/data/2021/gov/finance"
//! category = "finance"
//! key_env = "CENSUS_API_KEY"
//! params = { get = "NAME,REVENUE,EXPENDITURE", for = "state:*" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::discovery::{ScanOptions, WatchOptions};
use crate::error::ConfigError;
use crate::fetch::FetchSource;
use crate::ingestion::{ExcelSheetSelection, LoadOptions, TableFormat};
use crate::logging::LogFormat;
use crate::pipeline::PipelineOptions;
use crate::sync::{DEFAULT_COMMIT_MESSAGE, GitSync};

/// File name looked up at the data root.
pub const CONFIG_FILE_NAME: &str = "ingest.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Scan `raw/` once, ingest, exit.
    #[default]
    Batch,
    /// Ingest what is already there, then keep watching for new files.
    Watch,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    pub poll_interval_ms: u64,
    pub settle_delay_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        let defaults = WatchOptions::default();
        Self {
            poll_interval_ms: defaults.poll_interval.as_millis() as u64,
            settle_delay_ms: defaults.settle_delay.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    pub enabled: bool,
    pub message: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            message: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }
}

/// Run configuration. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub mode: RunMode,
    pub archive: bool,
    pub sheet: Option<String>,
    pub extensions: Vec<String>,
    /// Depth below `raw/`; 2 covers `raw/<category>/<file>`.
    pub scan_depth: usize,
    pub log_format: LogFormat,
    pub watch: WatchConfig,
    pub sync: SyncConfig,
    pub sources: Vec<FetchSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: RunMode::default(),
            archive: false,
            sheet: None,
            extensions: TableFormat::EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            scan_depth: 2,
            log_format: LogFormat::default(),
            watch: WatchConfig::default(),
            sync: SyncConfig::default(),
            sources: Vec::new(),
        }
    }
}

impl Config {
    /// Load `<root>/ingest.toml`, or the defaults when the file does not exist.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        if !root.is_dir() {
            return Err(ConfigError::RootMissing {
                path: root.to_path_buf(),
            });
        }
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&text, &path)
    }

    /// Parse config text; `path` is only used for error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            extensions: self.extensions.clone(),
            max_depth: self.scan_depth,
        }
    }

    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            poll_interval: Duration::from_millis(self.watch.poll_interval_ms),
            settle_delay: Duration::from_millis(self.watch.settle_delay_ms),
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        let excel_sheet_selection = match &self.sheet {
            Some(name) => ExcelSheetSelection::Sheet(name.clone()),
            None => ExcelSheetSelection::First,
        };
        PipelineOptions {
            load: LoadOptions {
                format: None,
                excel_sheet_selection,
            },
            archive: self.archive,
            ..PipelineOptions::default()
        }
    }

    /// Git automation for `root`, if enabled.
    pub fn git_sync(&self, root: impl Into<PathBuf>) -> Option<GitSync> {
        self.sync
            .enabled
            .then(|| GitSync::new(root).with_message(self.sync.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    use super::{CONFIG_FILE_NAME, Config, RunMode};
    use crate::error::ConfigError;
    use crate::ingestion::ExcelSheetSelection;
    use crate::logging::LogFormat;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.mode, RunMode::Batch);
        assert!(config.git_sync(tmp.path()).is_none());
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::load(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::RootMissing { .. }));
    }

    #[test]
    fn full_file_parses() {
        let text = r#"
            mode = "watch"
            archive = true
            sheet = "Data"
            log_format = "json"

            [watch]
            settle_delay_ms = 500

            [sync]
            enabled = true

            [[sources]]
            name = "gov_finance"
            url = "https://api.census.gov/data/2021/gov/finance"
            category = "finance"
            key_env = "CENSUS_API_KEY"
            params = { get = "NAME,REVENUE,EXPENDITURE", for = "state:*" }
        "#;
        let config = Config::parse(text, Path::new(CONFIG_FILE_NAME)).unwrap();

        assert_eq!(config.mode, RunMode::Watch);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.watch_options().settle_delay, Duration::from_millis(500));
        assert_eq!(config.watch_options().poll_interval, Duration::from_secs(1));
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].params["for"], "state:*");

        let options = config.pipeline_options();
        assert!(options.archive);
        assert_eq!(
            options.load.excel_sheet_selection,
            ExcelSheetSelection::Sheet("Data".to_string())
        );
        assert!(config.git_sync("/data").is_some());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "archiv = true\n").unwrap();
        let err = Config::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
