//! Utilities for working with Arrow record batches.

pub mod extractors;

pub use extractors::{date_column, get_column, string_column};
