//! Declared column contracts for the three input tables.
//!
//! Each input is described by a [`TableSchema`]: the columns that must be
//! present and the semantic type each is coerced to once loaded. Columns not
//! listed are dropped before any conversion.

pub mod coerce;
pub mod tables;

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

pub use tables::{calendar_schema, case_extract_schema, municipality_schema};

/// Semantic type of a declared column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    /// Small closed set of codes, stored dictionary-encoded
    Categorical,
    /// Free-form identifier or label
    Text,
    /// Calendar date, parsed with the table's date format
    Date,
}

impl SemanticType {
    /// Arrow type the column has after coercion
    #[must_use]
    pub fn data_type(self) -> DataType {
        match self {
            Self::Categorical => {
                DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8))
            }
            Self::Text => DataType::Utf8,
            Self::Date => DataType::Date32,
        }
    }
}

/// One declared column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name as it appears in the header
    pub name: &'static str,
    /// Semantic type after loading
    pub semantic: SemanticType,
}

impl ColumnDef {
    /// Create a column definition
    #[must_use]
    pub const fn new(name: &'static str, semantic: SemanticType) -> Self {
        Self { name, semantic }
    }
}

/// Column contract of one input table
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Human-readable table name used in logs and errors
    pub name: &'static str,
    /// Declared columns, in output order
    pub columns: Vec<ColumnDef>,
    /// `chrono` format of the table's date columns
    pub date_format: &'static str,
    /// Number of leading data rows that are structural artifacts
    pub skip_leading_rows: usize,
}

impl TableSchema {
    /// Names of the declared columns
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    /// Arrow schema of the table after semantic coercion
    #[must_use]
    pub fn arrow_schema(&self) -> SchemaRef {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|c| Field::new(c.name, c.semantic.data_type(), true))
            .collect();
        Arc::new(Schema::new(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_schema_uses_semantic_types() {
        let schema = case_extract_schema().arrow_schema();
        assert_eq!(schema.fields().len(), 9);
        assert!(matches!(
            schema.field_with_name("tp_entrada").unwrap().data_type(),
            DataType::Dictionary(_, _)
        ));
        assert_eq!(
            schema.field_with_name("dt_diagnostico_sintoma").unwrap().data_type(),
            &DataType::Date32
        );
        assert_eq!(
            schema.field_with_name("co_municipio_residencia_atual").unwrap().data_type(),
            &DataType::Utf8
        );
    }

    #[test]
    fn test_municipality_schema_skips_sentinel_row() {
        assert_eq!(municipality_schema().skip_leading_rows, 1);
        assert_eq!(calendar_schema().skip_leading_rows, 0);
    }
}
