//! Completion of the municipality × month grid
//!
//! The report has exactly one row per (municipality, period) of the two
//! universes. Combinations without observed cases get a zero quantity.

use std::collections::BTreeSet;

use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::RowOrdering;
use crate::models::{AggregatedCount, MunicipalityRow, ReportRow};

/// Every municipality that gets rows in the report
///
/// Observed municipalities come first in aggregation order, followed by the
/// region's reference municipalities without observed cases in reference
/// order. Duplicates and denylisted labels are removed.
#[must_use]
pub fn municipality_universe(
    aggregated: &[AggregatedCount],
    municipalities: &[MunicipalityRow],
    region: &str,
    denylist: &BTreeSet<String>,
) -> Vec<String> {
    let observed = aggregated.iter().map(|a| a.municipality.as_str());
    let zero_case = municipalities
        .iter()
        .filter(|m| m.state_name == region)
        .map(|m| m.name.as_str());

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    observed
        .chain(zero_case)
        .filter(|name| !denylist.contains(*name))
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Build the full grid and fill observed counts
///
/// Aggregated rows whose municipality or period is outside the universes do
/// not appear in the result.
#[must_use]
pub fn densify(
    aggregated: &[AggregatedCount],
    municipalities: &[String],
    periods: &[String],
    ordering: RowOrdering,
) -> Vec<ReportRow> {
    let observed: FxHashMap<(&str, &str), u64> = aggregated
        .iter()
        .map(|a| ((a.municipality.as_str(), a.period.as_str()), a.count))
        .collect();

    let mut municipalities: Vec<&String> = municipalities.iter().collect();
    if ordering == RowOrdering::MunicipalityName {
        municipalities.sort();
    }

    municipalities
        .into_iter()
        .cartesian_product(periods.iter())
        .map(|(municipality, period)| {
            let quantity = observed
                .get(&(municipality.as_str(), period.as_str()))
                .copied()
                .unwrap_or(0);
            ReportRow::new(municipality.as_str(), period.as_str(), quantity)
        })
        .collect()
}
