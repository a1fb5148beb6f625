//! Where cleaned artifacts go and how they are written.

pub mod paths;
pub mod writer;

pub use paths::{CLEANED_SUFFIX, Layout, PathResolver, cleaned_file_name};
pub use writer::{move_file, write_csv, write_csv_atomic};
