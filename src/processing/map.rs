//! Row mapping for [`crate::types::DataSet`].

use crate::types::{DataSet, Schema, Value};

/// Returns a new [`DataSet`] with `schema` by applying `mapper` to every row.
///
/// This is a convenience wrapper around [`DataSet::map_rows`]. It is how the cleaning
/// transforms project, rename and re-type columns in one pass.
///
/// # Panics
///
/// Panics if `mapper` returns rows with a different length than `schema`'s field count.
pub fn map<F>(dataset: &DataSet, schema: Schema, mapper: F) -> DataSet
where
    F: FnMut(&[Value]) -> Vec<Value>,
{
    dataset.map_rows(schema, mapper)
}

#[cfg(test)]
mod tests {
    use super::map;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn sample_dataset() -> DataSet {
        let schema = Schema::utf8_from_headers(["Country", "2023", "2024"]);

        let rows = vec![
            vec![
                Value::Utf8("Canada".to_string()),
                Value::Utf8("10".to_string()),
                Value::Utf8("12".to_string()),
            ],
            vec![
                Value::Utf8("Mexico".to_string()),
                Value::Utf8("7".to_string()),
                Value::Null,
            ],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn map_projects_and_renames_into_new_schema() {
        let ds = sample_dataset();
        let out_schema = Schema::new(vec![
            Field::new("Country", DataType::Utf8),
            Field::new("Trade Value", DataType::Utf8),
        ]);

        let out = map(&ds, out_schema.clone(), |row| vec![row[0].clone(), row[2].clone()]);

        assert_eq!(out.schema, out_schema);
        assert_eq!(
            out.rows,
            vec![
                vec![Value::Utf8("Canada".to_string()), Value::Utf8("12".to_string())],
                vec![Value::Utf8("Mexico".to_string()), Value::Null],
            ]
        );

        // Original unchanged
        assert_eq!(ds.schema.fields.len(), 3);
        assert_eq!(ds.rows[0][1], Value::Utf8("10".to_string()));
    }

    #[test]
    #[should_panic(expected = "mapped row length")]
    fn map_panics_if_mapper_returns_wrong_arity() {
        let ds = sample_dataset();
        let schema = ds.schema.clone();
        let _ = map(&ds, schema, |_row| vec![Value::Null]);
    }
}
