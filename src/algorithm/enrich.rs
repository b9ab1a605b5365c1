//! Dimensional enrichment of cohort cases
//!
//! Both joins are inner joins: a case whose municipality code is unknown or
//! outside the target region, or whose diagnosis date is absent from the
//! calendar table, is dropped. That narrowing is intentional.

use log::debug;
use rustc_hash::FxHashMap;

use crate::calendar::{localize_label, period_label};
use crate::models::{CalendarRow, EnrichedCase, FilteredCase, LocatedCase, MunicipalityRow};

/// Cases that survived the geography join
#[derive(Debug, Clone, Default)]
pub struct GeographyJoin {
    /// Cases located in the target region
    pub cases: Vec<LocatedCase>,
    /// Cases whose municipality code has no reference row
    pub unmatched: usize,
    /// Cases whose municipality belongs to another state
    pub outside_region: usize,
}

/// Join cases to the municipality table and keep the target region
#[must_use]
pub fn enrich_geography(
    cases: Vec<FilteredCase>,
    municipalities: &[MunicipalityRow],
    region: &str,
) -> GeographyJoin {
    let mut by_code: FxHashMap<i64, Vec<&MunicipalityRow>> = FxHashMap::default();
    for municipality in municipalities {
        by_code.entry(municipality.code).or_default().push(municipality);
    }

    let mut join = GeographyJoin::default();
    for case in cases {
        let Some(matches) = by_code.get(&case.municipality_code) else {
            join.unmatched += 1;
            continue;
        };

        let mut located = matches.iter().filter(|m| m.state_name == region).peekable();
        if located.peek().is_none() {
            join.outside_region += 1;
            continue;
        }
        for municipality in located {
            join.cases.push(LocatedCase {
                case: case.clone(),
                municipality: municipality.name.clone(),
                state_name: municipality.state_name.clone(),
            });
        }
    }

    debug!(
        "Geography join: {} located, {} without reference, {} outside {region}",
        join.cases.len(),
        join.unmatched,
        join.outside_region
    );
    join
}

/// Cases that survived the calendar join
#[derive(Debug, Clone, Default)]
pub struct CalendarJoin {
    /// Cases with a period label
    pub cases: Vec<EnrichedCase>,
    /// Cases whose diagnosis date is not in the calendar table
    pub unmatched: usize,
    /// Calendar labels that could not be translated
    pub untranslated: Vec<String>,
}

/// Join cases to the calendar table on the `dd/mm/yyyy` diagnosis date
///
/// The period label is `<month> de <year>` with the month translated to
/// Portuguese; an untranslatable month keeps its raw label.
#[must_use]
pub fn enrich_calendar(cases: Vec<LocatedCase>, calendar: &[CalendarRow]) -> CalendarJoin {
    let mut join = CalendarJoin::default();

    let mut by_date: FxHashMap<&str, Vec<String>> = FxHashMap::default();
    for row in calendar {
        let raw = period_label(&row.month_name, &row.year);
        let label = localize_label(&raw, &mut join.untranslated);
        by_date.entry(row.date_label.as_str()).or_default().push(label);
    }

    for located in cases {
        let Some(labels) = by_date.get(located.case.diagnosis_label.as_str()) else {
            join.unmatched += 1;
            continue;
        };
        for label in labels {
            join.cases.push(EnrichedCase::new(located.clone(), label.clone()));
        }
    }

    debug!(
        "Calendar join: {} labelled, {} without calendar date",
        join.cases.len(),
        join.unmatched
    );
    join
}
