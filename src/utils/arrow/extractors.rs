//! Column extraction utilities for Arrow record batches
//!
//! Typed access to whole columns of a loaded table, with errors that name the
//! table and column involved.

use arrow::array::{ArrayRef, Date32Array, StringArray};
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};
use crate::schema::coerce::string_values;

/// Get a column by name
///
/// # Errors
/// Returns `Error::ColumnNotFound` if the batch has no such column
pub fn get_column<'a>(batch: &'a RecordBatch, table: &str, column_name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(column_name)
        .ok_or_else(|| Error::column_not_found(table, column_name))
}

/// Get a plain or dictionary-encoded text column as a `StringArray`
pub fn string_column(batch: &RecordBatch, table: &str, column_name: &str) -> Result<StringArray> {
    string_values(get_column(batch, table, column_name)?)
}

/// Get a `Date32` column
pub fn date_column(batch: &RecordBatch, table: &str, column_name: &str) -> Result<Date32Array> {
    get_column(batch, table, column_name)?
        .as_any()
        .downcast_ref::<Date32Array>()
        .cloned()
        .ok_or_else(|| {
            Error::filter_error(format!("Column '{column_name}' in {table} is not a Date32 array"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn batch() -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8, true),
            Field::new("day", DataType::Date32, true),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(vec![Some("a"), None])),
                Arc::new(Date32Array::from(vec![Some(0), Some(1)])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_extract_columns() {
        let batch = batch();
        let names = string_column(&batch, "t", "name").unwrap();
        assert_eq!(names.value(0), "a");
        assert!(names.is_null(1));
        let days = date_column(&batch, "t", "day").unwrap();
        assert_eq!(days.value(1), 1);
    }

    #[test]
    fn test_missing_and_mistyped_columns() {
        let batch = batch();
        assert!(matches!(
            get_column(&batch, "t", "nope"),
            Err(Error::ColumnNotFound { .. })
        ));
        assert!(date_column(&batch, "t", "name").is_err());
    }
}
