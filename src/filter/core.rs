//! Core filtering functionality
//!
//! Common trait and mask application for filtering Arrow record batches.

use arrow::array::BooleanArray;
use arrow::compute::filter_record_batch as arrow_filter_record_batch;
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};

/// Filter a record batch based on a boolean mask
///
/// # Returns
/// A new record batch with only rows where mask is true
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(Error::filter_error(format!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        )));
    }

    Ok(arrow_filter_record_batch(batch, mask)?)
}

/// Trait for objects that can filter record batches
pub trait BatchFilter: std::fmt::Debug {
    /// Filter a record batch
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Int32Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    #[test]
    fn test_mask_length_must_match() {
        let schema = Schema::new(vec![Field::new("n", DataType::Int32, false)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(Int32Array::from(vec![1, 2, 3]))],
        )
        .unwrap();

        let short = BooleanArray::from(vec![true]);
        assert!(filter_record_batch(&batch, &short).is_err());

        let mask = BooleanArray::from(vec![true, false, true]);
        let filtered = filter_record_batch(&batch, &mask).unwrap();
        assert_eq!(filtered.num_rows(), 2);
        assert_eq!(filtered.column(0).len(), 2);
    }
}
