//! Report pipeline
//!
//! Runs load → cohort filter → geography join → calendar join → aggregation
//! → densification → write. Every stage is all-or-nothing: the artifact is
//! only written once all previous stages succeeded.

use std::fmt;
use std::time::Instant;

use arrow::array::Array;
use log::info;

use crate::algorithm::{
    aggregate, densify, enrich_calendar, enrich_geography, municipality_universe,
};
use crate::calendar::period_universe;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::filter::CohortFilter;
use crate::loader::{load_calendar, load_case_extract, load_municipalities};
use crate::models::ReportRow;
use crate::schema::tables::DIAGNOSIS_DATE;
use crate::utils::arrow::date_column;
use crate::utils::logging::{log_stage, log_warning};
use crate::writer::write_report;

/// A pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Reading the three inputs
    Load,
    /// Applying the cohort predicate
    CohortFilter,
    /// Joining the municipality table
    Geography,
    /// Joining the calendar table
    Calendar,
    /// Counting cases per key
    Aggregate,
    /// Completing the grid
    Densify,
    /// Writing the artifact
    Write,
}

impl Stage {
    /// Every stage in execution order
    pub const ALL: [Stage; 7] = [
        Stage::Load,
        Stage::CohortFilter,
        Stage::Geography,
        Stage::Calendar,
        Stage::Aggregate,
        Stage::Densify,
        Stage::Write,
    ];

    /// Human readable stage name
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Stage::Load => "Load",
            Stage::CohortFilter => "Cohort filter",
            Stage::Geography => "Geography join",
            Stage::Calendar => "Calendar join",
            Stage::Aggregate => "Aggregation",
            Stage::Densify => "Densification",
            Stage::Write => "Write",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Receives stage notifications during a run
pub trait StageObserver {
    /// A stage is about to start
    fn stage_started(&self, _stage: Stage) {}

    /// A stage finished, producing `rows` rows
    fn stage_finished(&self, _stage: Stage, _rows: usize) {}
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {}

/// Row counts and warnings gathered during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Records in the raw extract
    pub rows_loaded: usize,
    /// Cases kept by the cohort predicate
    pub after_cohort: usize,
    /// Cases located in the target region
    pub after_geography: usize,
    /// Cases whose municipality code has no reference row
    pub unmatched_geography: usize,
    /// Cases whose municipality belongs to another region
    pub outside_region: usize,
    /// Cases with a period label
    pub after_calendar: usize,
    /// Cases whose diagnosis date is not in the calendar table
    pub unmatched_calendar: usize,
    /// Distinct (municipality, period) keys with cases
    pub aggregated_keys: usize,
    /// Municipalities in the grid
    pub municipality_universe: usize,
    /// Periods in the grid
    pub period_universe: usize,
    /// Rows in the final report
    pub output_rows: usize,
    /// Extract records without a usable diagnosis date
    pub null_dates: usize,
    /// Cohort records dropped for a non-integer municipality code
    pub invalid_municipality_codes: usize,
    /// Period labels that could not be translated
    pub untranslated_labels: Vec<String>,
}

/// Build the report without writing it
pub fn build_report(config: &ReportConfig) -> Result<(Vec<ReportRow>, ReportSummary)> {
    build_report_with_observer(config, &NoopObserver)
}

/// Build the report, notifying `observer` around each stage
pub fn build_report_with_observer(
    config: &ReportConfig,
    observer: &dyn StageObserver,
) -> Result<(Vec<ReportRow>, ReportSummary)> {
    config.validate()?;
    let mut summary = ReportSummary::default();
    let paths = &config.paths;

    observer.stage_started(Stage::Load);
    let extract = load_case_extract(&paths.cases, config.batch_size)?;
    let municipalities = load_municipalities(&paths.municipalities, config.batch_size)?;
    let calendar = load_calendar(&paths.calendar, config.batch_size)?;
    summary.rows_loaded = extract.num_rows();
    summary.null_dates = date_column(&extract.batch, "case extract", DIAGNOSIS_DATE)?.null_count();
    observer.stage_finished(Stage::Load, summary.rows_loaded);

    observer.stage_started(Stage::CohortFilter);
    let filter = CohortFilter::new(config.cohort.clone())?;
    let selection = filter.apply(&extract.batch)?;
    summary.invalid_municipality_codes = selection.invalid_municipality_codes;
    summary.after_cohort = selection.cases.len();
    log_stage(Stage::CohortFilter.label(), summary.rows_loaded, summary.after_cohort);
    observer.stage_finished(Stage::CohortFilter, summary.after_cohort);

    observer.stage_started(Stage::Geography);
    let located = enrich_geography(selection.cases, &municipalities, &config.region);
    summary.after_geography = located.cases.len();
    summary.unmatched_geography = located.unmatched;
    summary.outside_region = located.outside_region;
    log_stage(Stage::Geography.label(), summary.after_cohort, summary.after_geography);
    observer.stage_finished(Stage::Geography, summary.after_geography);

    observer.stage_started(Stage::Calendar);
    let labelled = enrich_calendar(located.cases, &calendar);
    summary.after_calendar = labelled.cases.len();
    summary.unmatched_calendar = labelled.unmatched;
    log_stage(Stage::Calendar.label(), summary.after_geography, summary.after_calendar);
    observer.stage_finished(Stage::Calendar, summary.after_calendar);

    observer.stage_started(Stage::Aggregate);
    let aggregated = aggregate(&labelled.cases);
    summary.aggregated_keys = aggregated.len();
    log_stage(Stage::Aggregate.label(), summary.after_calendar, summary.aggregated_keys);
    observer.stage_finished(Stage::Aggregate, summary.aggregated_keys);

    observer.stage_started(Stage::Densify);
    let universe = period_universe(config.anchor, config.effective_run_date());
    let grid_municipalities = municipality_universe(
        &aggregated,
        &municipalities,
        &config.region,
        &config.municipality_denylist,
    );
    let rows = densify(
        &aggregated,
        &grid_municipalities,
        &universe.labels,
        config.ordering,
    );
    summary.municipality_universe = grid_municipalities.len();
    summary.period_universe = universe.len();
    summary.output_rows = rows.len();
    log_stage(Stage::Densify.label(), summary.aggregated_keys, summary.output_rows);
    observer.stage_finished(Stage::Densify, summary.output_rows);

    let mut untranslated = labelled.untranslated;
    for label in universe.untranslated {
        if !untranslated.contains(&label) {
            untranslated.push(label);
        }
    }
    summary.untranslated_labels = untranslated;

    if summary.output_rows == 0 {
        log_warning("Report is empty", Some(&paths.output));
    }

    Ok((rows, summary))
}

/// Build the report and write it to the configured output path
pub fn run_report(config: &ReportConfig) -> Result<ReportSummary> {
    run_report_with_observer(config, &NoopObserver)
}

/// Build and write the report, notifying `observer` around each stage
pub fn run_report_with_observer(
    config: &ReportConfig,
    observer: &dyn StageObserver,
) -> Result<ReportSummary> {
    let start = Instant::now();
    let (rows, summary) = build_report_with_observer(config, observer)?;

    observer.stage_started(Stage::Write);
    write_report(&config.paths.output, &rows)?;
    observer.stage_finished(Stage::Write, rows.len());

    info!(
        "Report complete: {} municipalities × {} periods in {:?}",
        summary.municipality_universe,
        summary.period_universe,
        start.elapsed()
    );
    Ok(summary)
}
