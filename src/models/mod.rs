//! Typed rows flowing through the report pipeline.
//!
//! The raw extract stays an Arrow `RecordBatch` until the cohort filter; from
//! there on each stage consumes and produces plain Rust rows.

pub mod case;
pub mod dimension;
pub mod report;

pub use case::{EnrichedCase, FilteredCase, LocatedCase};
pub use dimension::{CalendarRow, MunicipalityRow};
pub use report::{AggregatedCount, ReportRow};
