//! Coercion of raw CSV text into the declared semantic types.
//!
//! Date and integer coercion are lenient: a value that cannot be parsed
//! becomes null and is counted, it never aborts the load.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Date32Array, StringArray};
use arrow::compute::kernels::cast;
use arrow::datatypes::DataType;
use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};
use crate::schema::SemanticType;

/// Days between 0001-01-01 (CE day 1) and the Unix epoch
const UNIX_EPOCH_FROM_CE: i32 = 719_163;

/// Format used for diagnosis dates and calendar join keys
pub const DAY_MONTH_YEAR: &str = "%d/%m/%Y";

/// Parse a date with the given `chrono` format; blank input is missing
#[must_use]
pub fn parse_date(s: &str, format: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, format).ok()
}

/// Convert a date to Arrow `Date32` days since the epoch
#[must_use]
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_FROM_CE
}

/// Convert Arrow `Date32` days since the epoch back to a date
#[must_use]
pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_FROM_CE)?)
}

/// Render a date as zero-padded `dd/mm/yyyy`
#[must_use]
pub fn format_day_month_year(date: NaiveDate) -> String {
    date.format(DAY_MONTH_YEAR).to_string()
}

/// Parse an integer key, accepting float renderings with no fractional part
///
/// Dimension exports sometimes carry integer codes as `5208707.0`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(value) = s.parse::<i64>() {
        return Some(value);
    }
    let value = s.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// View any string-like column (plain or dictionary-encoded) as a `StringArray`
pub fn string_values(array: &ArrayRef) -> Result<StringArray> {
    let utf8 = if array.data_type() == &DataType::Utf8 {
        array.clone()
    } else {
        cast::cast(array, &DataType::Utf8)?
    };
    utf8.as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| Error::filter_error("Failed to downcast to StringArray"))
}

/// Result of coercing one raw text column
#[derive(Debug)]
pub struct CoercedColumn {
    /// The column in its semantic type
    pub array: ArrayRef,
    /// Values that were present but could not be parsed and became null
    pub failures: usize,
}

/// Coerce a raw text column into its semantic type
///
/// Blank strings become null for every type.
pub fn coerce_column(
    raw: &ArrayRef,
    semantic: SemanticType,
    date_format: &str,
) -> Result<CoercedColumn> {
    let text = blank_to_null(&string_values(raw)?);

    match semantic {
        SemanticType::Text => Ok(CoercedColumn {
            array: Arc::new(text),
            failures: 0,
        }),
        SemanticType::Categorical => {
            let array: ArrayRef = Arc::new(text);
            Ok(CoercedColumn {
                array: cast::cast(&array, &semantic.data_type())?,
                failures: 0,
            })
        }
        SemanticType::Date => {
            let mut builder = Date32Array::builder(text.len());
            let mut failures = 0;
            for value in &text {
                match value {
                    None => builder.append_null(),
                    Some(s) => match parse_date(s, date_format) {
                        Some(date) => builder.append_value(date_to_days(date)),
                        None => {
                            failures += 1;
                            builder.append_null();
                        }
                    },
                }
            }
            Ok(CoercedColumn {
                array: Arc::new(builder.finish()),
                failures,
            })
        }
    }
}

fn blank_to_null(array: &StringArray) -> StringArray {
    array
        .iter()
        .map(|v| v.map(str::trim).filter(|s| !s.is_empty()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(
            parse_date("2021-03-07", "%Y-%m-%d"),
            NaiveDate::from_ymd_opt(2021, 3, 7)
        );
        assert_eq!(
            parse_date("7/3/2021", DAY_MONTH_YEAR),
            NaiveDate::from_ymd_opt(2021, 3, 7)
        );
        assert_eq!(parse_date("2021-02-30", "%Y-%m-%d"), None);
        assert_eq!(parse_date("   ", "%Y-%m-%d"), None);
    }

    #[test]
    fn test_date32_round_trip_at_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_days(epoch), 0);
        let d = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(days_to_date(date_to_days(d)), Some(d));
    }

    #[test]
    fn test_format_is_zero_padded() {
        let d = NaiveDate::from_ymd_opt(2022, 2, 5).unwrap();
        assert_eq!(format_day_month_year(d), "05/02/2022");
    }

    #[test]
    fn test_parse_integer_accepts_float_rendering() {
        assert_eq!(parse_integer("5208707"), Some(5_208_707));
        assert_eq!(parse_integer(" 5208707.0 "), Some(5_208_707));
        assert_eq!(parse_integer("5208707.5"), None);
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(parse_integer(""), None);
    }

    #[test]
    fn test_coerce_date_column_counts_failures() {
        let raw: ArrayRef = Arc::new(StringArray::from(vec![
            Some("2021-01-01"),
            Some("not a date"),
            None,
            Some(""),
        ]));
        let coerced = coerce_column(&raw, SemanticType::Date, "%Y-%m-%d").unwrap();
        assert_eq!(coerced.failures, 1);
        let dates = coerced.array.as_any().downcast_ref::<Date32Array>().unwrap();
        assert!(dates.is_valid(0));
        assert!(dates.is_null(1));
        assert!(dates.is_null(2));
        assert!(dates.is_null(3));
    }

    #[test]
    fn test_coerce_categorical_round_trips_through_strings() {
        let raw: ArrayRef = Arc::new(StringArray::from(vec![Some("1"), Some(" 3 "), Some("")]));
        let coerced = coerce_column(&raw, SemanticType::Categorical, "%Y-%m-%d").unwrap();
        assert!(matches!(coerced.array.data_type(), DataType::Dictionary(_, _)));
        let back = string_values(&coerced.array).unwrap();
        assert_eq!(back.value(0), "1");
        assert_eq!(back.value(1), "3");
        assert!(back.is_null(2));
    }
}
