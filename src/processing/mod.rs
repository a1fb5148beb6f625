//! In-memory row operations used by the cleaning transforms.
//!
//! Every function borrows its input [`crate::types::DataSet`] and returns a new one, so callers
//! can keep reusing the original table.
//!
//! - [`filter()`]: row filtering by predicate
//! - [`map()`]: row mapping into a new schema
//! - [`sort_by_column()`] / [`truncate()`]: ordering and top-N
//!
//! ## Example: filter → sort → truncate
//!
//! ```rust
//! use trade_ingest::processing::{filter, sort_by_column, truncate};
//! use trade_ingest::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("Country", DataType::Utf8),
//!     Field::new("Trade Value", DataType::Float64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("World".into()), Value::Float64(300.0)],
//!         vec![Value::Utf8("Canada".into()), Value::Float64(20.0)],
//!         vec![Value::Utf8("Mexico".into()), Value::Float64(80.0)],
//!     ],
//! );
//!
//! let without_world = filter(&ds, |row| row[0].as_str() != Some("World"));
//! let sorted = sort_by_column(&without_world, "Trade Value", true).unwrap();
//! let top = truncate(&sorted, 1);
//! assert_eq!(top.rows[0][0], Value::Utf8("Mexico".into()));
//! ```

pub mod filter;
pub mod map;
pub mod sort;

pub use filter::filter;
pub use map::map;
pub use sort::{sort_by_column, truncate};
