//! Report-building stages after cohort selection
//!
//! Enrichment against the two dimension tables, aggregation of case counts,
//! and densification of the municipality × month grid.

pub mod aggregate;
pub mod densify;
pub mod enrich;

pub use aggregate::{aggregate, count_by_key};
pub use densify::{densify, municipality_universe};
pub use enrich::{CalendarJoin, GeographyJoin, enrich_calendar, enrich_geography};
