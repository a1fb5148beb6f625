//! Loading raw tables from disk.
//!
//! Most callers should use [`load_table`] (from [`unified`]) which picks a loader by file
//! extension. Format-specific functions are also available under [`csv`] and (with the `excel`
//! feature) `excel`.

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod unified;

pub use unified::{ExcelSheetSelection, LoadOptions, TableFormat, load_table};
