//! Classification and cleaning of raw tables.
//!
//! - [`kind`]: the [`DatasetKind`] enum and the keyword [`classify`]er
//! - [`rules`]: the static per-kind [`CleaningSpec`]s
//! - [`transform`]: applies a spec to a table ([`Transform`])
//! - [`registry`]: kind → transform lookup ([`TransformRegistry`], [`get_transform`])

pub mod kind;
pub mod registry;
pub mod rules;
pub mod transform;

pub use kind::{DatasetKind, KIND_KEYWORDS, classify, classify_name};
pub use registry::{TransformRegistry, get_transform};
pub use rules::{CleaningSpec, ColumnRule, Sentinel, SortRule};
pub use transform::{CleaningReport, CoercionFailure, Transform, parse_number};
