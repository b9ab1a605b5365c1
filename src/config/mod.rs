//! Configuration for a report run.
//!
//! The production values are fixed constants exposed through `Default`; the
//! `with_*` methods exist so callers (and tests) can vary the region, cohort
//! or calendar window without touching pipeline code.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use crate::error::{Error, Result};

/// Default batch size for the CSV reader
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Codes that define which notifications count as a new pulmonary case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortDefinition {
    /// `tp_entrada` codes that exclude a record (recidivism, re-entry after
    /// default, unknown, transferred-in)
    pub excluded_entry_types: BTreeSet<String>,
    /// `tp_forma` codes that keep a record (pulmonary, pulmonary + extrapulmonary)
    pub clinical_forms: BTreeSet<String>,
    /// `tp_situacao_encerramento` code that excludes a record (regimen change)
    pub excluded_closure_status: String,
    /// Earliest diagnosis year kept
    pub min_diagnosis_year: i32,
}

impl Default for CohortDefinition {
    fn default() -> Self {
        Self {
            excluded_entry_types: codes(&["2", "3", "4", "5"]),
            clinical_forms: codes(&["1", "3"]),
            excluded_closure_status: "8".to_string(),
            min_diagnosis_year: 2021,
        }
    }
}

/// Locations of the three inputs and the output artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    /// Raw notification extract
    pub cases: PathBuf,
    /// Municipality dimension table
    pub municipalities: PathBuf,
    /// Calendar dimension table
    pub calendar: PathBuf,
    /// Report written at the end of the run
    pub output: PathBuf,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            cases: PathBuf::from("origem.csv"),
            municipalities: PathBuf::from("dimensoes/d_municipio.csv"),
            calendar: PathBuf::from("dimensoes/d_tempo.csv"),
            output: PathBuf::from("saida.csv"),
        }
    }
}

impl InputPaths {
    /// Resolve the default file names under a base directory
    #[must_use]
    pub fn under(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        let defaults = Self::default();
        Self {
            cases: base.join(defaults.cases),
            municipalities: base.join(defaults.municipalities),
            calendar: base.join(defaults.calendar),
            output: base.join(defaults.output),
        }
    }
}

/// Row order of the final grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrdering {
    /// Municipality-major in universe order (observed municipalities by first
    /// diagnosis, then zero-case municipalities in reference order), periods
    /// chronological
    #[default]
    Universe,
    /// Municipality name ascending, periods chronological
    MunicipalityName,
}

/// Configuration for a report run
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// State name (`dmun_uf_nome`) of the target region
    pub region: String,
    /// Cohort selection codes
    pub cohort: CohortDefinition,
    /// First month of the period universe
    pub anchor: NaiveDate,
    /// Last day covered by the period universe; `None` means today
    pub run_date: Option<NaiveDate>,
    /// Municipality labels never emitted in the report
    pub municipality_denylist: BTreeSet<String>,
    /// Final row order
    pub ordering: RowOrdering,
    /// Input and output locations
    pub paths: InputPaths,
    /// Rows per batch when reading CSV inputs
    pub batch_size: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            region: "Goiás".to_string(),
            cohort: CohortDefinition::default(),
            anchor: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default(),
            run_date: None,
            municipality_denylist: codes(&["Município ignorado - GO"]),
            ordering: RowOrdering::default(),
            paths: InputPaths::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ReportConfig {
    /// Set the target region
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the cohort definition
    #[must_use]
    pub fn with_cohort(mut self, cohort: CohortDefinition) -> Self {
        self.cohort = cohort;
        self
    }

    /// Set the first month of the period universe
    #[must_use]
    pub fn with_anchor(mut self, anchor: NaiveDate) -> Self {
        self.anchor = anchor;
        self
    }

    /// Pin the run date instead of reading the clock
    #[must_use]
    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = Some(run_date);
        self
    }

    /// Replace the municipality denylist
    #[must_use]
    pub fn with_denylist<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.municipality_denylist = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Set the final row order
    #[must_use]
    pub fn with_ordering(mut self, ordering: RowOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Set input and output paths
    #[must_use]
    pub fn with_paths(mut self, paths: InputPaths) -> Self {
        self.paths = paths;
        self
    }

    /// The run date, falling back to the local clock
    #[must_use]
    pub fn effective_run_date(&self) -> NaiveDate {
        self.run_date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Check that the configuration can produce a report
    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(Error::Config("region must not be empty".to_string()));
        }
        if self.cohort.clinical_forms.is_empty() {
            return Err(Error::Config(
                "cohort needs at least one clinical form".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch size must be positive".to_string()));
        }
        let run_date = self.effective_run_date();
        if self.anchor > run_date {
            return Err(Error::Config(format!(
                "anchor {} is after run date {run_date}",
                self.anchor
            )));
        }
        Ok(())
    }
}

fn codes(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}
