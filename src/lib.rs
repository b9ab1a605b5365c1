//! Monthly report of new pulmonary tuberculosis cases per municipality.
//!
//! Reads a raw notification extract plus municipality and calendar dimension
//! tables, selects the new-case cohort, and writes a dense
//! municipality × month count grid.

pub mod algorithm;
pub mod calendar;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod report;
pub mod schema;
pub mod utils;
pub mod writer;

// Core types
pub use config::{CohortDefinition, InputPaths, ReportConfig, RowOrdering};
pub use error::{Error, Result};
pub use models::{AggregatedCount, ReportRow};

// Pipeline
pub use report::{
    ReportSummary, Stage, StageObserver, build_report, build_report_with_observer, run_report,
    run_report_with_observer,
};

// Arrow types
pub use arrow::record_batch::RecordBatch;
