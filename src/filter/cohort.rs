//! Cohort selection of new pulmonary tuberculosis cases
//!
//! A record is kept when its entry type is not excluded, its clinical form is
//! pulmonary (alone or with extrapulmonary), its closure status is not a
//! regimen change, it has a residence municipality, and its diagnosis date
//! falls in or after the minimum year.

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use log::{info, warn};

use crate::config::CohortDefinition;
use crate::error::{Error, Result};
use crate::filter::core::BatchFilter;
use crate::filter::expr::{Expr, ExpressionFilter, LiteralValue, in_codes, not_in_codes};
use crate::models::FilteredCase;
use crate::schema::coerce::{date_to_days, days_to_date, format_day_month_year, parse_integer};
use crate::schema::tables::{
    BIRTH_DATE, CLINICAL_FORM, CLOSURE_STATUS, CUSTODY_STATUS, DIAGNOSIS_DATE, ENTRY_TYPE,
    HOMELESS_STATUS, RESIDENCE_MUNICIPALITY, RESIDENCE_STATE,
};
use crate::utils::arrow::{date_column, string_column};

const TABLE: &str = "case extract";

/// Build the cohort predicate as a filter expression
///
/// # Errors
/// Fails if the minimum diagnosis year has no January 1st in `chrono`'s range.
pub fn cohort_expression(cohort: &CohortDefinition) -> Result<Expr> {
    let first_day = NaiveDate::from_ymd_opt(cohort.min_diagnosis_year, 1, 1).ok_or_else(|| {
        Error::Config(format!(
            "invalid minimum diagnosis year {}",
            cohort.min_diagnosis_year
        ))
    })?;

    Ok(Expr::And(vec![
        not_in_codes(ENTRY_TYPE, &cohort.excluded_entry_types),
        in_codes(CLINICAL_FORM, &cohort.clinical_forms),
        Expr::NotEq(
            CLOSURE_STATUS.to_string(),
            LiteralValue::String(cohort.excluded_closure_status.clone()),
        ),
        Expr::IsNotNull(RESIDENCE_MUNICIPALITY.to_string()),
        Expr::GtEq(
            DIAGNOSIS_DATE.to_string(),
            LiteralValue::Date(date_to_days(first_day)),
        ),
    ]))
}

/// Cases kept by the cohort filter
#[derive(Debug, Clone, Default)]
pub struct CohortSelection {
    /// Records satisfying the predicate
    pub cases: Vec<FilteredCase>,
    /// Records dropped because their municipality code is not an integer
    pub invalid_municipality_codes: usize,
}

/// Applies the cohort definition to the loaded extract
#[derive(Debug, Clone)]
pub struct CohortFilter {
    cohort: CohortDefinition,
    filter: ExpressionFilter,
}

impl CohortFilter {
    /// Create a cohort filter
    pub fn new(cohort: CohortDefinition) -> Result<Self> {
        let filter = ExpressionFilter::new(cohort_expression(&cohort)?);
        Ok(Self { cohort, filter })
    }

    /// Filter the loaded extract and convert surviving rows to typed cases
    pub fn apply(&self, batch: &RecordBatch) -> Result<CohortSelection> {
        let kept = self.filter.filter(batch)?;
        info!(
            "Cohort predicate kept {} of {} records",
            kept.num_rows(),
            batch.num_rows()
        );
        let selection = extract_cases(&kept)?;
        if selection.invalid_municipality_codes > 0 {
            warn!(
                "Dropped {} records whose '{}' is not an integer code",
                selection.invalid_municipality_codes, RESIDENCE_MUNICIPALITY
            );
        }
        Ok(selection)
    }

    /// Whether a typed case satisfies the predicate
    ///
    /// Uses the same missing-value semantics as the batch expression.
    #[must_use]
    pub fn matches(&self, case: &FilteredCase) -> bool {
        let entry_ok = case
            .entry_type
            .as_ref()
            .is_none_or(|e| !self.cohort.excluded_entry_types.contains(e));
        let form_ok = case
            .clinical_form
            .as_ref()
            .is_some_and(|f| self.cohort.clinical_forms.contains(f));
        let closure_ok =
            case.closure_status.as_deref() != Some(self.cohort.excluded_closure_status.as_str());
        let year_ok = case.diagnosis_date.year() >= self.cohort.min_diagnosis_year;

        entry_ok && form_ok && closure_ok && year_ok
    }
}

fn extract_cases(batch: &RecordBatch) -> Result<CohortSelection> {
    let entry = string_column(batch, TABLE, ENTRY_TYPE)?;
    let custody = string_column(batch, TABLE, CUSTODY_STATUS)?;
    let homeless = string_column(batch, TABLE, HOMELESS_STATUS)?;
    let form = string_column(batch, TABLE, CLINICAL_FORM)?;
    let closure = string_column(batch, TABLE, CLOSURE_STATUS)?;
    let state = string_column(batch, TABLE, RESIDENCE_STATE)?;
    let municipality = string_column(batch, TABLE, RESIDENCE_MUNICIPALITY)?;
    let birth = date_column(batch, TABLE, BIRTH_DATE)?;
    let diagnosis = date_column(batch, TABLE, DIAGNOSIS_DATE)?;

    let text = |array: &arrow::array::StringArray, row: usize| {
        (!array.is_null(row)).then(|| array.value(row).to_string())
    };
    let date = |array: &arrow::array::Date32Array, row: usize| {
        if array.is_null(row) {
            None
        } else {
            days_to_date(array.value(row))
        }
    };

    let mut selection = CohortSelection::default();
    for row in 0..batch.num_rows() {
        let Some(municipality_code) = text(&municipality, row).as_deref().and_then(parse_integer)
        else {
            selection.invalid_municipality_codes += 1;
            continue;
        };
        let Some(diagnosis_date) = date(&diagnosis, row) else {
            continue;
        };

        selection.cases.push(FilteredCase {
            entry_type: text(&entry, row),
            custody_status: text(&custody, row),
            homeless_status: text(&homeless, row),
            clinical_form: text(&form, row),
            closure_status: text(&closure, row),
            residence_state: text(&state, row),
            municipality_code,
            birth_date: date(&birth, row),
            diagnosis_date,
            diagnosis_label: format_day_month_year(diagnosis_date),
        });
    }
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::case_extract_schema;
    use crate::schema::coerce::coerce_column;
    use arrow::array::{ArrayRef, StringArray};
    use std::sync::Arc;

    /// entry, form, closure, municipality, diagnosis date
    type Row<'a> = [&'a str; 5];

    fn extract(rows: &[Row<'_>]) -> RecordBatch {
        let schema = case_extract_schema();
        let pick = |i: usize| -> ArrayRef {
            Arc::new(StringArray::from(
                rows.iter().map(|r| Some(r[i])).collect::<Vec<_>>(),
            ))
        };
        let blank = || -> ArrayRef { Arc::new(StringArray::from(vec![None::<&str>; rows.len()])) };
        let raw: Vec<ArrayRef> = vec![
            pick(0),
            blank(),
            blank(),
            pick(1),
            pick(2),
            blank(),
            pick(3),
            blank(),
            pick(4),
        ];
        let columns = schema
            .columns
            .iter()
            .zip(raw.iter())
            .map(|(c, a)| coerce_column(a, c.semantic, schema.date_format).unwrap().array)
            .collect();
        RecordBatch::try_new(schema.arrow_schema(), columns).unwrap()
    }

    fn filter() -> CohortFilter {
        CohortFilter::new(CohortDefinition::default()).unwrap()
    }

    #[test]
    fn test_new_and_post_mortem_cases_pass() {
        let batch = extract(&[
            ["1", "1", "1", "520870", "2022-03-10"],
            ["6", "3", "", "520870", "2022-03-10"],
        ]);
        let selection = filter().apply(&batch).unwrap();
        assert_eq!(selection.cases.len(), 2);
        assert_eq!(selection.cases[0].municipality_code, 520_870);
        assert_eq!(selection.cases[0].diagnosis_label, "10/03/2022");
        assert_eq!(selection.cases[1].closure_status, None);
    }

    #[test]
    fn test_excluded_entry_types_never_pass() {
        let batch = extract(&[
            ["2", "1", "1", "520870", "2022-03-10"],
            ["3", "1", "1", "520870", "2022-03-10"],
            ["4", "1", "1", "520870", "2022-03-10"],
            ["5", "1", "1", "520870", "2022-03-10"],
        ]);
        assert!(filter().apply(&batch).unwrap().cases.is_empty());
    }

    #[test]
    fn test_form_closure_and_municipality_rules() {
        let batch = extract(&[
            ["1", "2", "1", "520870", "2022-03-10"],
            ["1", "", "1", "520870", "2022-03-10"],
            ["1", "1", "8", "520870", "2022-03-10"],
            ["1", "1", "1", "", "2022-03-10"],
            ["1", "1", "1", "52x", "2022-03-10"],
        ]);
        let selection = filter().apply(&batch).unwrap();
        assert!(selection.cases.is_empty());
        assert_eq!(selection.invalid_municipality_codes, 1);
    }

    #[test]
    fn test_year_boundary() {
        let batch = extract(&[
            ["1", "1", "1", "520870", "2020-12-31"],
            ["1", "1", "1", "520870", "2021-01-01"],
            ["1", "1", "1", "520870", "not-a-date"],
        ]);
        let selection = filter().apply(&batch).unwrap();
        assert_eq!(selection.cases.len(), 1);
        assert_eq!(selection.cases[0].diagnosis_label, "01/01/2021");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let batch = extract(&[
            ["1", "1", "1", "520870", "2022-03-10"],
            ["2", "1", "1", "520870", "2022-03-10"],
            ["6", "3", "", "520110", "2023-07-01"],
        ]);
        let filter = filter();
        let selection = filter.apply(&batch).unwrap();
        assert!(selection.cases.iter().all(|c| filter.matches(c)));

        let kept = filter.filter.filter(&batch).unwrap();
        let again = filter.filter.filter(&kept).unwrap();
        assert_eq!(kept, again);
    }
}
