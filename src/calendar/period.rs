//! Monthly periods and the period universe of a report

use chrono::{Datelike, NaiveDate};

use crate::calendar::{localize_label, period_label};

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthPeriod {
    /// Year
    pub year: i32,
    /// Month, 1-12
    pub month: u32,
}

impl MonthPeriod {
    /// The month containing a date
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month
    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// The following month
    #[must_use]
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Label with the English month name, e.g. `January de 2021`
    #[must_use]
    pub fn english_label(&self) -> String {
        let month = self
            .start_date()
            .map(|d| d.format("%B").to_string())
            .unwrap_or_default();
        period_label(&month, &self.year.to_string())
    }
}

/// Every reporting month of a run, with its Portuguese label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodUniverse {
    /// Label of each month in chronological order
    pub labels: Vec<String>,
    /// English labels that could not be translated
    pub untranslated: Vec<String>,
}

impl PeriodUniverse {
    /// Number of periods
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no periods
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Every month whose first day lies in `[anchor, run_date]`
///
/// An anchor that is not a first-of-month starts the universe at the next month.
#[must_use]
pub fn period_universe(anchor: NaiveDate, run_date: NaiveDate) -> PeriodUniverse {
    let mut universe = PeriodUniverse::default();

    let mut current = MonthPeriod::containing(anchor);
    if anchor.day() != 1 {
        current = current.next();
    }

    while let Some(start) = current.start_date() {
        if start > run_date {
            break;
        }
        let label = localize_label(&current.english_label(), &mut universe.untranslated);
        universe.labels.push(label);
        current = current.next();
    }

    universe
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_arithmetic() {
        let december = MonthPeriod::containing(date(2021, 12, 31));
        assert_eq!(december.next(), MonthPeriod { year: 2022, month: 1 });
        assert_eq!(MonthPeriod::containing(date(2022, 2, 28)).month, 2);
    }

    #[test]
    fn test_english_label() {
        assert_eq!(MonthPeriod::containing(date(2021, 3, 9)).english_label(), "March de 2021");
    }

    #[test]
    fn test_universe_is_inclusive_of_run_month() {
        let universe = period_universe(date(2021, 1, 1), date(2021, 3, 1));
        assert_eq!(
            universe.labels,
            vec!["Janeiro de 2021", "Fevereiro de 2021", "Março de 2021"]
        );
        assert!(universe.untranslated.is_empty());

        let universe = period_universe(date(2021, 1, 1), date(2021, 2, 28));
        assert_eq!(universe.len(), 2);
    }

    #[test]
    fn test_universe_crosses_year_boundary() {
        let universe = period_universe(date(2021, 11, 1), date(2022, 1, 15));
        assert_eq!(
            universe.labels,
            vec!["Novembro de 2021", "Dezembro de 2021", "Janeiro de 2022"]
        );
    }

    #[test]
    fn test_mid_month_anchor_starts_next_month() {
        let universe = period_universe(date(2021, 1, 15), date(2021, 3, 1));
        assert_eq!(universe.labels, vec!["Fevereiro de 2021", "Março de 2021"]);
    }

    #[test]
    fn test_empty_when_anchor_after_run_date() {
        assert!(period_universe(date(2022, 1, 1), date(2021, 1, 1)).is_empty());
    }
}
