//! Applying a [`CleaningSpec`] to a raw table.

use serde::Serialize;
use tracing::debug;

use crate::error::{CleaningError, CleaningResult};
use crate::processing::{filter, map, sort_by_column, truncate};
use crate::types::{DataSet, DataType, Schema, Value};

use super::kind::DatasetKind;
use super::rules::CleaningSpec;

/// A value that could not be coerced to a number. Recorded, never fatal: the cell becomes
/// null and the row is then subject to the non-null filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoercionFailure {
    pub column: String,
    pub raw: String,
}

/// Row accounting for one transform run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub rows_in: usize,
    pub dropped_sentinel: usize,
    pub dropped_missing: usize,
    pub truncated: usize,
    pub rows_out: usize,
    pub coercion_failures: Vec<CoercionFailure>,
}

/// A cleaning transform: a pure function from a raw table to a cleaned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transform {
    spec: &'static CleaningSpec,
}

impl Transform {
    pub fn new(spec: &'static CleaningSpec) -> Self {
        Self { spec }
    }

    pub fn kind(&self) -> DatasetKind {
        self.spec.kind
    }

    pub fn spec(&self) -> &'static CleaningSpec {
        self.spec
    }

    /// Clean `table`. The input is only borrowed; callers can reuse it afterwards.
    pub fn apply(&self, table: &DataSet) -> CleaningResult<DataSet> {
        self.apply_with_report(table).map(|(ds, _)| ds)
    }

    /// Clean `table` and also return what each step removed.
    ///
    /// Steps, in order:
    ///
    /// 1. resolve every column rule against the trimmed headers (missing → [`CleaningError::MissingColumns`])
    /// 2. project and rename to the output columns
    /// 3. drop sentinel rows
    /// 4. coerce numeric columns (failures become nulls)
    /// 5. drop rows with nulls in non-null columns
    /// 6. sort and cut to the configured limit
    pub fn apply_with_report(&self, table: &DataSet) -> CleaningResult<(DataSet, CleaningReport)> {
        let spec = self.spec;
        let mut report = CleaningReport {
            rows_in: table.row_count(),
            ..CleaningReport::default()
        };

        let source_idxs = resolve_sources(spec, &table.schema)?;

        let projected_schema = Schema::utf8_from_headers(spec.output_columns());
        let projected = map(table, projected_schema, |row| {
            source_idxs
                .iter()
                .map(|&idx| row.get(idx).cloned().unwrap_or(Value::Null))
                .collect()
        });

        let sentinel_idxs: Vec<(usize, &str)> = spec
            .sentinels
            .iter()
            .filter_map(|s| projected.schema.index_of(s.column).map(|idx| (idx, s.value)))
            .collect();
        let kept = filter(&projected, |row| {
            !sentinel_idxs
                .iter()
                .any(|&(idx, value)| is_sentinel(&row[idx], value))
        });
        report.dropped_sentinel = projected.row_count() - kept.row_count();

        let mut failures = Vec::new();
        let coerced = map(&kept, spec.output_schema(), |row| {
            spec.columns
                .iter()
                .zip(row)
                .map(|(rule, value)| match (rule.data_type, value) {
                    (DataType::Float64, Value::Utf8(raw)) => match parse_number(raw) {
                        Some(n) => Value::Float64(n),
                        None => {
                            failures.push(CoercionFailure {
                                column: rule.output.to_string(),
                                raw: raw.clone(),
                            });
                            Value::Null
                        }
                    },
                    (_, other) => other.clone(),
                })
                .collect()
        });
        report.coercion_failures = failures;

        let non_null_idxs: Vec<usize> = spec
            .required_non_null
            .iter()
            .filter_map(|c| coerced.schema.index_of(c))
            .collect();
        let complete = filter(&coerced, |row| non_null_idxs.iter().all(|&idx| !row[idx].is_null()));
        report.dropped_missing = coerced.row_count() - complete.row_count();

        let cleaned = match &spec.order {
            Some(order) => {
                let sorted = sort_by_column(&complete, order.column, order.descending)
                    .unwrap_or_else(|| complete.clone());
                match order.limit {
                    Some(limit) => truncate(&sorted, limit),
                    None => sorted,
                }
            }
            None => complete.clone(),
        };
        report.truncated = complete.row_count() - cleaned.row_count();
        report.rows_out = cleaned.row_count();

        debug!(
            kind = %spec.kind,
            rows_in = report.rows_in,
            dropped_sentinel = report.dropped_sentinel,
            coercion_failures = report.coercion_failures.len(),
            dropped_missing = report.dropped_missing,
            truncated = report.truncated,
            rows_out = report.rows_out,
            "cleaned table"
        );

        Ok((cleaned, report))
    }
}

fn resolve_sources(spec: &CleaningSpec, schema: &Schema) -> CleaningResult<Vec<usize>> {
    let mut idxs = Vec::with_capacity(spec.columns.len());
    let mut missing = Vec::new();
    for rule in spec.columns {
        match rule.sources.iter().find_map(|s| schema.index_of_trimmed(s)) {
            Some(idx) => idxs.push(idx),
            None => missing.push(rule.describe()),
        }
    }
    if missing.is_empty() {
        Ok(idxs)
    } else {
        Err(CleaningError::MissingColumns { missing })
    }
}

fn is_sentinel(value: &Value, sentinel: &str) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.trim().eq_ignore_ascii_case(sentinel))
}

/// Lenient numeric parse: ignores surrounding whitespace, thousands separators, `$` and a
/// trailing `%`. Returns `None` for anything else (Census markers like `(D)`, `N/A`, `-`).
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed);
    let cleaned: String = trimmed
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
