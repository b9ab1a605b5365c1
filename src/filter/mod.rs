//! Filtering of the notification extract
//!
//! A small expression language evaluated over Arrow batches, and the cohort
//! definition of a "new pulmonary case" expressed in it.

pub mod cohort;
pub mod core;
pub mod expr;

pub use cohort::{CohortFilter, CohortSelection, cohort_expression};
pub use self::core::{BatchFilter, filter_record_batch};
pub use expr::{Expr, ExpressionFilter, LiteralValue, evaluate_expr};
