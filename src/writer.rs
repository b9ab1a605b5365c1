//! Report serialization
//!
//! The grid is written with the Arrow CSV writer: header row
//! `municipio,mes,quantidade`, comma separated, UTF-8, no index column.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arrow::array::{Int64Array, StringArray};
use arrow::csv::WriterBuilder;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::error::util::ensure_parent_dir;
use crate::error::{Error, Result};
use crate::models::ReportRow;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Output column holding the municipality name
pub const MUNICIPALITY_COLUMN: &str = "municipio";
/// Output column holding the period label
pub const PERIOD_COLUMN: &str = "mes";
/// Output column holding the case count
pub const QUANTITY_COLUMN: &str = "quantidade";

/// Arrow schema of the report
#[must_use]
pub fn report_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(MUNICIPALITY_COLUMN, DataType::Utf8, false),
        Field::new(PERIOD_COLUMN, DataType::Utf8, false),
        Field::new(QUANTITY_COLUMN, DataType::Int64, false),
    ]))
}

/// Convert report rows to a record batch
pub fn rows_to_batch(rows: &[ReportRow]) -> Result<RecordBatch> {
    let municipalities: StringArray = rows.iter().map(|r| Some(r.municipality.as_str())).collect();
    let periods: StringArray = rows.iter().map(|r| Some(r.period.as_str())).collect();
    let quantities: Int64Array = rows
        .iter()
        .map(|r| Some(i64::try_from(r.quantity).unwrap_or(i64::MAX)))
        .collect();

    Ok(RecordBatch::try_new(
        report_schema(),
        vec![
            Arc::new(municipalities),
            Arc::new(periods),
            Arc::new(quantities),
        ],
    )?)
}

/// Write report rows to `path`
///
/// The file is written next to its destination and renamed into place, so a
/// failure never leaves a partial report behind.
pub fn write_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
    log_operation_start("Writing report to", path);
    let start = Instant::now();

    let batch = rows_to_batch(rows)?;
    ensure_parent_dir(path)?;

    let tmp_path = temporary_path(path);
    let result = write_batch(&tmp_path, &batch);
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    fs::rename(&tmp_path, path).map_err(|e| Error::io(path, e))?;

    log_operation_complete("wrote", path, rows.len(), Some(start.elapsed()));
    Ok(())
}

fn write_batch(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = WriterBuilder::new()
        .with_header(true)
        .with_delimiter(b',')
        .build(file);
    writer.write(batch)?;
    let file = writer.into_inner();
    file.sync_all().map_err(|e| Error::io(path, e))
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
