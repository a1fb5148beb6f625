//! Ordering and truncation for [`crate::types::DataSet`].

use std::cmp::Ordering;

use crate::types::{DataSet, NULL, Value};

/// Returns a new [`DataSet`] sorted by `column`, or `None` if the column does not exist.
///
/// The sort is stable, so rows with equal keys keep their input order. Nulls always sort
/// last regardless of direction. Numbers compare numerically, strings lexically, and numbers
/// sort before strings.
pub fn sort_by_column(dataset: &DataSet, column: &str, descending: bool) -> Option<DataSet> {
    let idx = dataset.schema.index_of(column)?;
    let mut rows = dataset.rows.clone();
    rows.sort_by(|a, b| {
        compare_values(
            a.get(idx).unwrap_or(&NULL),
            b.get(idx).unwrap_or(&NULL),
            descending,
        )
    });
    Some(DataSet::new(dataset.schema.clone(), rows))
}

/// Returns a new [`DataSet`] holding at most the first `limit` rows.
pub fn truncate(dataset: &DataSet, limit: usize) -> DataSet {
    let rows = dataset.rows.iter().take(limit).cloned().collect();
    DataSet::new(dataset.schema.clone(), rows)
}

fn compare_values(a: &Value, b: &Value, descending: bool) -> Ordering {
    let ord = match (a, b) {
        (Value::Null, Value::Null) => return Ordering::Equal,
        (Value::Null, _) => return Ordering::Greater,
        (_, Value::Null) => return Ordering::Less,
        (Value::Float64(x), Value::Float64(y)) => x.total_cmp(y),
        (Value::Utf8(x), Value::Utf8(y)) => x.cmp(y),
        (Value::Float64(_), Value::Utf8(_)) => Ordering::Less,
        (Value::Utf8(_), Value::Float64(_)) => Ordering::Greater,
    };
    if descending { ord.reverse() } else { ord }
}

#[cfg(test)]
mod tests {
    use super::{sort_by_column, truncate};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8),
            Field::new("value", DataType::Float64),
        ]);
        DataSet::new(
            schema,
            vec![
                vec![Value::Utf8("a".to_string()), Value::Float64(5.0)],
                vec![Value::Utf8("b".to_string()), Value::Null],
                vec![Value::Utf8("c".to_string()), Value::Float64(50.0)],
                vec![Value::Utf8("d".to_string()), Value::Float64(5.0)],
            ],
        )
    }

    fn names(ds: &DataSet) -> Vec<&str> {
        ds.rows.iter().map(|r| r[0].as_str().unwrap()).collect()
    }

    #[test]
    fn sorts_descending_with_nulls_last_and_stable_ties() {
        let ds = sample_dataset();
        let out = sort_by_column(&ds, "value", true).unwrap();
        assert_eq!(names(&out), vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn sorts_ascending_with_nulls_last() {
        let ds = sample_dataset();
        let out = sort_by_column(&ds, "value", false).unwrap();
        assert_eq!(names(&out), vec!["a", "d", "c", "b"]);
    }

    #[test]
    fn unknown_column_returns_none() {
        assert!(sort_by_column(&sample_dataset(), "missing", true).is_none());
    }

    #[test]
    fn truncate_keeps_prefix() {
        let ds = sample_dataset();
        assert_eq!(truncate(&ds, 2).row_count(), 2);
        assert_eq!(truncate(&ds, 10).row_count(), 4);
        assert_eq!(truncate(&ds, 0).row_count(), 0);
    }
}
