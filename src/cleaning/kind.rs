//! Dataset kinds and the file-name classifier.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Closed set of raw dataset categories. The kind selects the cleaning transform and the
/// output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Goods traded between a reporter and its partner countries.
    WorldTrade,
    /// Trade broken down by product or commodity.
    Product,
    /// Retail/wholesale sales by category.
    Sales,
    /// Government revenue and expenditure by state.
    Revenue,
    /// Nothing recognizable in the name.
    Unknown,
}

impl DatasetKind {
    /// All kinds, in declaration order.
    pub const ALL: [DatasetKind; 5] = [
        DatasetKind::WorldTrade,
        DatasetKind::Product,
        DatasetKind::Sales,
        DatasetKind::Revenue,
        DatasetKind::Unknown,
    ];

    /// Directory name used for this kind under `cleaned/`.
    pub fn slug(self) -> &'static str {
        match self {
            DatasetKind::WorldTrade => "world_trade",
            DatasetKind::Product => "product",
            DatasetKind::Sales => "sales",
            DatasetKind::Revenue => "revenue",
            DatasetKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Keyword table driving [`classify`]. Checked top to bottom; the first kind with a keyword
/// contained in the (lowercased) name wins.
///
/// More specific kinds come first: "Top Products Exported to World" is a product table even
/// though it also mentions the world.
pub const KIND_KEYWORDS: &[(DatasetKind, &[&str])] = &[
    (DatasetKind::Revenue, &["revenue", "finance", "expenditure"]),
    (DatasetKind::Sales, &["sales", "retail"]),
    (DatasetKind::Product, &["product", "commodit"]),
    (DatasetKind::WorldTrade, &["world", "trade", "export", "import"]),
];

/// Classify a raw file by its name.
///
/// The file name is matched first; if it contains no keyword, the parent directory name
/// (the raw-data category, e.g. `raw/world/`) is tried. Never fails: anything unmatched,
/// including the empty path, is [`DatasetKind::Unknown`].
pub fn classify(path: impl AsRef<Path>) -> DatasetKind {
    let path = path.as_ref();
    let by_name = path
        .file_name()
        .map(|n| classify_name(&n.to_string_lossy()))
        .unwrap_or(DatasetKind::Unknown);
    if by_name != DatasetKind::Unknown {
        return by_name;
    }

    path.parent()
        .and_then(Path::file_name)
        .map(|n| classify_name(&n.to_string_lossy()))
        .unwrap_or(DatasetKind::Unknown)
}

/// Classify a bare name against [`KIND_KEYWORDS`].
pub fn classify_name(name: &str) -> DatasetKind {
    let lowered = name.to_lowercase();
    KIND_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(kind, _)| *kind)
        .unwrap_or(DatasetKind::Unknown)
}
