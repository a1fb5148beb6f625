//! Finding raw files: a one-shot [`Scanner`] and a polling [`Watcher`].

pub mod raw_file;
pub mod scanner;
pub mod watcher;

pub use raw_file::{RawFile, UNCATEGORIZED};
pub use scanner::{ScanOptions, Scanner};
pub use watcher::{WatchOptions, Watcher};
