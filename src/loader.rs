//! CSV table loading
//!
//! Reads an input file with the Arrow CSV reader using an all-text schema
//! taken from the header line, keeps only the declared columns and coerces
//! each to its semantic type.

use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::{debug, warn};

use crate::error::util::safe_open_file;
use crate::error::{Error, Result};
use crate::models::{CalendarRow, MunicipalityRow};
use crate::schema::coerce::coerce_column;
use crate::schema::{TableSchema, calendar_schema, case_extract_schema, municipality_schema};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// A table loaded into memory with its declared types
#[derive(Debug, Clone)]
pub struct LoadedTable {
    /// All rows, declared columns only
    pub batch: RecordBatch,
    /// Date values that failed to parse and were nulled
    pub date_failures: usize,
}

impl LoadedTable {
    /// Number of loaded rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }
}

/// Load a CSV file according to a table schema
///
/// # Errors
/// Fails if the file is missing, a declared column is absent from the header,
/// or the CSV is malformed. Unparseable dates are not errors.
pub fn load_table(path: &Path, schema: &TableSchema, batch_size: usize) -> Result<LoadedTable> {
    log_operation_start(&format!("Loading {}", schema.name), path);
    let start = Instant::now();

    let mut file = safe_open_file(path, schema.name)?;

    let (header_schema, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, Some(0))?;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| Error::io(path, e))?;

    // Every column is read as text; coercion happens after projection
    let header: Vec<String> = header_schema
        .fields()
        .iter()
        .map(|f| f.name().trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let text_schema = Arc::new(Schema::new(
        header
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let projection = schema
        .column_names()
        .map(|name| {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::column_not_found(schema.name, name))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(
        "{}: keeping {} of {} columns",
        schema.name,
        projection.len(),
        header.len()
    );

    let projected_schema = Arc::new(text_schema.project(&projection)?);
    let reader = ReaderBuilder::new(text_schema)
        .with_header(true)
        .with_batch_size(batch_size)
        .with_projection(projection)
        .with_truncated_rows(true)
        .build(file)?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    let raw = concat_batches(&projected_schema, &batches)?;

    let raw = if schema.skip_leading_rows > 0 {
        let skip = schema.skip_leading_rows.min(raw.num_rows());
        raw.slice(skip, raw.num_rows() - skip)
    } else {
        raw
    };

    let mut columns = Vec::with_capacity(schema.columns.len());
    let mut date_failures = 0;
    for (idx, column) in schema.columns.iter().enumerate() {
        let coerced = coerce_column(raw.column(idx), column.semantic, schema.date_format)?;
        if coerced.failures > 0 {
            warn!(
                "{}: {} values in '{}' could not be parsed as dates and were set to null",
                schema.name, coerced.failures, column.name
            );
        }
        date_failures += coerced.failures;
        columns.push(coerced.array);
    }

    let batch = RecordBatch::try_new(schema.arrow_schema(), columns)?;
    log_operation_complete("loaded", path, batch.num_rows(), Some(start.elapsed()));

    Ok(LoadedTable {
        batch,
        date_failures,
    })
}

/// Load the raw notification extract
pub fn load_case_extract(path: &Path, batch_size: usize) -> Result<LoadedTable> {
    load_table(path, &case_extract_schema(), batch_size)
}

/// Load the municipality dimension, dropping its leading sentinel row
///
/// # Errors
/// Fails if any code is not integer-coercible.
pub fn load_municipalities(path: &Path, batch_size: usize) -> Result<Vec<MunicipalityRow>> {
    let schema = municipality_schema();
    let table = load_table(path, &schema, batch_size)?;
    let rows = MunicipalityRow::from_batch(&table.batch)?;
    if rows.is_empty() {
        warn!("{} has no rows after the sentinel row; the report will be empty", schema.name);
    }
    Ok(rows)
}

/// Load the calendar dimension
pub fn load_calendar(path: &Path, batch_size: usize) -> Result<Vec<CalendarRow>> {
    let table = load_table(path, &calendar_schema(), batch_size)?;
    CalendarRow::from_batch(&table.batch)
}
