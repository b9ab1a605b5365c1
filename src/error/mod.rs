//! Error handling for the report pipeline.
//!
//! Only fatal conditions are represented here. Per-record problems (bad dates,
//! non-numeric municipality codes, untranslatable month names) are recoverable
//! and surface as nulls, warnings and counters in the run summary instead.

pub mod util;

use std::path::PathBuf;

use arrow::error::ArrowError;

/// Errors that abort a report run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error opening, reading or writing a file
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// File the operation was working on
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Error raised by the Arrow CSV reader/writer or compute kernels
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// A required input file does not exist
    #[error("Missing input file {} (needed for: {purpose})", path.display())]
    MissingFile {
        /// Path that was expected
        path: PathBuf,
        /// What the file is used for
        purpose: String,
    },

    /// A declared column is absent from an input table
    #[error("Column '{column}' not found in {table}")]
    ColumnNotFound {
        /// Table being loaded
        table: String,
        /// Missing column
        column: String,
    },

    /// A value that must be coercible is not
    #[error("Invalid value '{value}' in {table}.{column} at row {row}")]
    InvalidValue {
        /// Table being loaded
        table: String,
        /// Column holding the value
        column: String,
        /// Zero-based data row
        row: usize,
        /// Offending raw value
        value: String,
    },

    /// Invalid report configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error while evaluating a filter expression
    #[error("Filter error: {0}")]
    Filter(String),
}

impl Error {
    /// Wrap an IO error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a column-not-found error
    pub fn column_not_found(table: &str, column: &str) -> Self {
        Self::ColumnNotFound {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    /// Create a filter error
    pub fn filter_error(message: impl Into<String>) -> Self {
        Self::Filter(message.into())
    }
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, Error>;
