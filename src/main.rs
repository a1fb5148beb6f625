//! `trade-ingest` binary.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use trade_ingest::app::App;
use trade_ingest::config::Config;
use trade_ingest::logging::{LogConfig, init_logging};

/// Clean raw trade and economic tables under a data root.
///
/// Reads `<ROOT>/raw/<category>/*`, writes `<ROOT>/cleaned/<kind>/*_cleaned.csv` and a run
/// manifest under `<ROOT>/manifests/`. Mode, archiving, fetch sources and git sync are set in
/// `<ROOT>/ingest.toml`.
#[derive(Debug, Parser)]
#[command(name = "trade-ingest", version, about)]
struct Cli {
    /// Data root directory.
    #[arg(env = "TRADE_INGEST_ROOT", default_value = ".")]
    root: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(&cli.root).with_context(|| "failed to load configuration") {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = LogConfig::default()
        .with_format(config.log_format)
        .with_ansi(io::stderr().is_terminal());
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    App::new(cli.root, config).run();
    ExitCode::SUCCESS
}
