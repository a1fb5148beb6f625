//! `trade-ingest` turns a folder of raw government trade and economic tables into cleaned,
//! canonical CSV files.
//!
//! Raw files are dropped under `<root>/raw/<category>/`. Each file is classified into a
//! [`cleaning::DatasetKind`] from its name, cleaned by that kind's [`cleaning::Transform`] and
//! written atomically to `<root>/cleaned/<kind>/<name>_cleaned.csv`. A run manifest records
//! what happened to every file.
//!
//! ## What you can ingest
//!
//! - **CSV**: `.csv`
//! - **Excel/workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`, `.xlsm`,
//!   `.xlsb`, `.ods`
//! - **Census API payloads** via [`fetch`], staged as CSV under `raw/`
//!
//! ## Dataset kinds
//!
//! | Kind | Output columns | Dropped rows | Order |
//! |---|---|---|---|
//! | `world_trade` | `Country`, `Trade Value` | `World` | top 10 by value |
//! | `product` | `Product`, `Trade Value` | `Total`, `All Commodities` | top 10 by value |
//! | `sales` | `Category`, `Sales` | `Total` | by sales |
//! | `revenue` | `State`, `Revenue`, `Expenditure` | `United States` | by revenue |
//!
//! Files that match no kind are skipped and stay where they are.
//!
//! ## Quick example: clean one file
//!
//! ```no_run
//! use trade_ingest::output::Layout;
//! use trade_ingest::pipeline::{IngestionResult, Pipeline};
//!
//! let pipeline = Pipeline::new(Layout::new("data"));
//! match pipeline.ingest("data/raw/world/raw_data_exports.csv") {
//!     IngestionResult::Success { destination, rows, .. } => {
//!         println!("wrote {rows} rows to {}", destination.display())
//!     }
//!     IngestionResult::Skipped { reason } => println!("skipped: {reason}"),
//!     IngestionResult::Failed { stage, error, .. } => println!("failed at {stage}: {error}"),
//! }
//! ```
//!
//! ## Cleaning a table in memory
//!
//! ```rust
//! use trade_ingest::cleaning::{DatasetKind, get_transform};
//! use trade_ingest::types::{DataSet, Schema, Value};
//!
//! let raw = DataSet::new(
//!     Schema::utf8_from_headers([" Country ", "2024"]),
//!     vec![
//!         vec![Value::Utf8("USA".into()), Value::Utf8("100".into())],
//!         vec![Value::Utf8("World".into()), Value::Utf8("900".into())],
//!         vec![Value::Utf8("Canada".into()), Value::Null],
//!     ],
//! );
//!
//! let transform = get_transform(DatasetKind::WorldTrade).unwrap();
//! let cleaned = transform.apply(&raw).unwrap();
//! assert_eq!(cleaned.column_names(), vec!["Country", "Trade Value"]);
//! assert_eq!(cleaned.rows, vec![vec![Value::Utf8("USA".into()), Value::Float64(100.0)]]);
//! ```
//!
//! ## Modules
//!
//! - [`types`]: schema and in-memory table types
//! - [`ingestion`]: CSV and spreadsheet loaders
//! - [`processing`]: row-level helpers (filter/map/sort/truncate)
//! - [`cleaning`]: dataset kinds, cleaning rules, transforms
//! - [`output`]: path resolution and atomic CSV output
//! - [`pipeline`]: per-file ingestion, observers, run manifests
//! - [`discovery`]: directory scanner and polling watcher
//! - [`fetch`], [`sync`]: Census API and git collaborators
//! - [`config`], [`logging`], [`app`]: the runner behind the `trade-ingest` binary
//! - [`error`]: error types

pub mod app;
pub mod cleaning;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fetch;
pub mod ingestion;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod sync;
pub mod types;

pub use error::{
    CleaningError, ConfigError, DiscoveryError, FetchError, IngestionError, Result, SyncError,
};
