//! Dimension table rows and their constructors from loaded batches

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use log::warn;

use crate::error::{Error, Result};
use crate::schema::coerce::{days_to_date, format_day_month_year, parse_integer};
use crate::schema::tables::{
    CALENDAR_DATE, CALENDAR_MONTH, CALENDAR_YEAR, MUNICIPALITY_CODE, MUNICIPALITY_NAME,
    MUNICIPALITY_STATE,
};
use crate::utils::arrow::{date_column, string_column};

const MUNICIPALITY_TABLE: &str = "municipality table";
const CALENDAR_TABLE: &str = "calendar table";

/// A row of the municipality dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MunicipalityRow {
    /// IBGE municipality code, the join key
    pub code: i64,
    /// State name
    pub state_name: String,
    /// Municipality name
    pub name: String,
}

impl MunicipalityRow {
    /// Create a municipality row
    pub fn new(code: i64, state_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code,
            state_name: state_name.into(),
            name: name.into(),
        }
    }

    /// Build rows from a loaded municipality batch
    ///
    /// Every code must be integer-coercible; anything else is fatal.
    pub fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let codes = string_column(batch, MUNICIPALITY_TABLE, MUNICIPALITY_CODE)?;
        let states = string_column(batch, MUNICIPALITY_TABLE, MUNICIPALITY_STATE)?;
        let names = string_column(batch, MUNICIPALITY_TABLE, MUNICIPALITY_NAME)?;

        let mut rows = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let raw = if codes.is_null(row) { "" } else { codes.value(row) };
            let code = parse_integer(raw).ok_or_else(|| Error::InvalidValue {
                table: MUNICIPALITY_TABLE.to_string(),
                column: MUNICIPALITY_CODE.to_string(),
                row,
                value: raw.to_string(),
            })?;
            let state_name = if states.is_null(row) { "" } else { states.value(row) };
            let name = if names.is_null(row) { "" } else { names.value(row) };
            rows.push(Self::new(code, state_name, name));
        }
        Ok(rows)
    }
}

/// A row of the calendar dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRow {
    /// Month name as stored in the table
    pub month_name: String,
    /// The calendar day
    pub date: NaiveDate,
    /// The day rendered `dd/mm/yyyy`, the join key
    pub date_label: String,
    /// Four-digit year as text
    pub year: String,
}

impl CalendarRow {
    /// Create a calendar row for a date
    pub fn new(month_name: impl Into<String>, date: NaiveDate, year: impl Into<String>) -> Self {
        Self {
            month_name: month_name.into(),
            date,
            date_label: format_day_month_year(date),
            year: year.into(),
        }
    }

    /// Build rows from a loaded calendar batch
    ///
    /// Rows with a missing month name, date or year are skipped with a warning.
    pub fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        let months = string_column(batch, CALENDAR_TABLE, CALENDAR_MONTH)?;
        let dates = date_column(batch, CALENDAR_TABLE, CALENDAR_DATE)?;
        let years = string_column(batch, CALENDAR_TABLE, CALENDAR_YEAR)?;

        let mut rows = Vec::with_capacity(batch.num_rows());
        let mut skipped = 0usize;
        for row in 0..batch.num_rows() {
            let date = if dates.is_null(row) { None } else { days_to_date(dates.value(row)) };
            let year = if years.is_null(row) { None } else { parse_integer(years.value(row)) };
            match (months.is_null(row), date, year) {
                (false, Some(date), Some(year)) => {
                    rows.push(Self::new(months.value(row).trim(), date, year.to_string()));
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!("Skipped {skipped} calendar rows with a missing month, date or year");
        }
        Ok(rows)
    }
}
