//! Case counts per municipality and month

use rustc_hash::{FxHashMap, FxHashSet};

use crate::models::{AggregatedCount, EnrichedCase};

/// Count enriched cases per (municipality, period)
#[must_use]
pub fn count_by_key(cases: &[EnrichedCase]) -> FxHashMap<(&str, &str), u64> {
    let mut counts: FxHashMap<(&str, &str), u64> = FxHashMap::default();
    for case in cases {
        *counts
            .entry((case.municipality.as_str(), case.period.as_str()))
            .or_default() += 1;
    }
    counts
}

/// Aggregate enriched cases into distinct (municipality, period, count) rows
///
/// Every case is widened with its group's count, the widened rows are ordered
/// by diagnosis date and then deduplicated keeping the first occurrence. The
/// result is therefore ordered by each group's earliest diagnosis.
#[must_use]
pub fn aggregate(cases: &[EnrichedCase]) -> Vec<AggregatedCount> {
    let counts = count_by_key(cases);

    let mut widened: Vec<(&EnrichedCase, u64)> = cases
        .iter()
        .map(|case| {
            let count = counts
                .get(&(case.municipality.as_str(), case.period.as_str()))
                .copied()
                .unwrap_or_default();
            (case, count)
        })
        .collect();
    widened.sort_by_key(|(case, _)| case.case.diagnosis_date);

    let mut seen: FxHashSet<(&str, &str, u64)> = FxHashSet::default();
    widened
        .into_iter()
        .filter(|&(case, count)| {
            seen.insert((case.municipality.as_str(), case.period.as_str(), count))
        })
        .map(|(case, count)| AggregatedCount {
            municipality: case.municipality.clone(),
            period: case.period.clone(),
            count,
        })
        .collect()
}
