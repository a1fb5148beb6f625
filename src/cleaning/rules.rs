//! Declarative cleaning rules, one [`CleaningSpec`] per [`DatasetKind`].
//!
//! These statics are the single source of truth for what a cleaned table of each kind looks
//! like. They are read-only and shared by every pipeline in the process.

use crate::types::{DataType, Field, Schema};

use super::kind::DatasetKind;

/// One output column and the input headers it may come from.
#[derive(Debug, PartialEq, Eq)]
pub struct ColumnRule {
    /// Output column name.
    pub output: &'static str,
    /// Accepted input headers, in priority order. Headers are compared after trimming.
    pub sources: &'static [&'static str],
    /// `Float64` columns are numerically coerced; `Utf8` columns are copied as text.
    pub data_type: DataType,
}

impl ColumnRule {
    pub const fn text(output: &'static str, sources: &'static [&'static str]) -> Self {
        Self {
            output,
            sources,
            data_type: DataType::Utf8,
        }
    }

    pub const fn number(output: &'static str, sources: &'static [&'static str]) -> Self {
        Self {
            output,
            sources,
            data_type: DataType::Float64,
        }
    }

    /// Human-readable name for error messages, e.g. `Country (Country|Partner)`.
    pub fn describe(&self) -> String {
        if self.sources.len() == 1 && self.sources[0] == self.output {
            self.output.to_string()
        } else {
            format!("{} ({})", self.output, self.sources.join("|"))
        }
    }
}

/// A value in an output column that marks an aggregate row to drop (e.g. a "World" total).
#[derive(Debug, PartialEq, Eq)]
pub struct Sentinel {
    pub column: &'static str,
    pub value: &'static str,
}

/// Optional final ordering with an optional top-N cut.
#[derive(Debug, PartialEq, Eq)]
pub struct SortRule {
    pub column: &'static str,
    pub descending: bool,
    pub limit: Option<usize>,
}

/// Cleaning configuration for one dataset kind.
#[derive(Debug, PartialEq, Eq)]
pub struct CleaningSpec {
    pub kind: DatasetKind,
    /// Output columns in order; every rule is required.
    pub columns: &'static [ColumnRule],
    pub sentinels: &'static [Sentinel],
    /// Output columns in which a null (missing or failed coercion) drops the row.
    pub required_non_null: &'static [&'static str],
    pub order: Option<SortRule>,
}

impl CleaningSpec {
    /// Schema of the cleaned table.
    pub fn output_schema(&self) -> Schema {
        Schema::new(
            self.columns
                .iter()
                .map(|rule| Field::new(rule.output, rule.data_type))
                .collect(),
        )
    }

    /// Names of the cleaned table's columns, in order.
    pub fn output_columns(&self) -> Vec<&'static str> {
        self.columns.iter().map(|rule| rule.output).collect()
    }
}

pub static WORLD_TRADE: CleaningSpec = CleaningSpec {
    kind: DatasetKind::WorldTrade,
    columns: &[
        ColumnRule::text("Country", &["Country", "Partner"]),
        ColumnRule::number("Trade Value", &["2024"]),
    ],
    sentinels: &[Sentinel {
        column: "Country",
        value: "World",
    }],
    required_non_null: &["Trade Value"],
    order: Some(SortRule {
        column: "Trade Value",
        descending: true,
        limit: Some(10),
    }),
};

pub static PRODUCT: CleaningSpec = CleaningSpec {
    kind: DatasetKind::Product,
    columns: &[
        ColumnRule::text("Product", &["Product", "Commodity", "Description"]),
        ColumnRule::number("Trade Value", &["2024"]),
    ],
    sentinels: &[
        Sentinel {
            column: "Product",
            value: "Total",
        },
        Sentinel {
            column: "Product",
            value: "All Commodities",
        },
    ],
    required_non_null: &["Trade Value"],
    order: Some(SortRule {
        column: "Trade Value",
        descending: true,
        limit: Some(10),
    }),
};

pub static SALES: CleaningSpec = CleaningSpec {
    kind: DatasetKind::Sales,
    columns: &[
        ColumnRule::text("Category", &["Kind of Business", "Category", "NAME"]),
        ColumnRule::number("Sales", &["Sales", "2024"]),
    ],
    sentinels: &[Sentinel {
        column: "Category",
        value: "Total",
    }],
    required_non_null: &["Sales"],
    order: Some(SortRule {
        column: "Sales",
        descending: true,
        limit: None,
    }),
};

pub static REVENUE: CleaningSpec = CleaningSpec {
    kind: DatasetKind::Revenue,
    columns: &[
        ColumnRule::text("State", &["NAME", "State"]),
        ColumnRule::number("Revenue", &["REVENUE", "Revenue"]),
        ColumnRule::number("Expenditure", &["EXPENDITURE", "Expenditure"]),
    ],
    sentinels: &[Sentinel {
        column: "State",
        value: "United States",
    }],
    required_non_null: &["Revenue", "Expenditure"],
    order: Some(SortRule {
        column: "Revenue",
        descending: true,
        limit: None,
    }),
};

/// Every kind with a transform. [`DatasetKind::Unknown`] is deliberately absent.
pub static STANDARD_SPECS: [&CleaningSpec; 4] = [&WORLD_TRADE, &PRODUCT, &SALES, &REVENUE];
