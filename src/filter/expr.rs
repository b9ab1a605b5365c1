//! Expression-based filtering of record batches
//!
//! Expressions are evaluated column-wise into a boolean mask. Missing values
//! never satisfy a positive test (`In`, `GtEq`) and always
//! satisfy a negative one (`NotEq`, `NotIn`), so a mask never contains nulls.

use std::cmp::Ordering;
use std::collections::HashSet;

use arrow::array::{Array, ArrayRef, BooleanArray, Date32Array};
use arrow::compute::kernels::boolean;
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};
use crate::filter::core::{BatchFilter, filter_record_batch};
use crate::schema::coerce::string_values;

/// Represents a filter expression over the columns of a batch
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column not equals a literal value
    NotEq(String, LiteralValue),

    /// Column is greater than or equal to a literal value
    GtEq(String, LiteralValue),

    /// Column is in a set of values
    In(String, Vec<LiteralValue>),

    /// Column is not in a set of values
    NotIn(String, Vec<LiteralValue>),

    /// Column is not null
    IsNotNull(String),

    /// Logical AND of expressions
    And(Vec<Expr>),
}

/// Represents a literal value that can be used in filter expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralValue {
    /// String value, compared against text and categorical columns
    String(String),

    /// Date value (days since epoch)
    Date(i32),
}

impl Expr {
    /// Returns a set of all column names required by this expression
    #[must_use]
    pub fn required_columns(&self) -> HashSet<String> {
        let mut columns = HashSet::new();
        self.collect_required_columns(&mut columns);
        columns
    }

    fn collect_required_columns(&self, columns: &mut HashSet<String>) {
        match self {
            Self::NotEq(col, _)
            | Self::GtEq(col, _)
            | Self::In(col, _)
            | Self::NotIn(col, _)
            | Self::IsNotNull(col) => {
                columns.insert(col.clone());
            }
            Self::And(exprs) => {
                for expr in exprs {
                    expr.collect_required_columns(columns);
                }
            }
        }
    }
}

/// Evaluates a filter expression against a record batch
///
/// # Returns
/// A boolean array without nulls indicating which rows match
pub fn evaluate_expr(batch: &RecordBatch, expr: &Expr) -> Result<BooleanArray> {
    match expr {
        Expr::And(exprs) => {
            let mut result = BooleanArray::from(vec![true; batch.num_rows()]);
            for expr in exprs {
                result = boolean::and(&result, &evaluate_expr(batch, expr)?)?;
            }
            Ok(result)
        }
        Expr::NotEq(col, value) => negate(compare(batch, col, value, |o| o == Ordering::Equal)?),
        Expr::GtEq(col, value) => compare(batch, col, value, |o| o != Ordering::Less),
        Expr::In(col, values) => in_set(batch, col, values),
        Expr::NotIn(col, values) => negate(in_set(batch, col, values)?),
        Expr::IsNotNull(col) => {
            let column = column(batch, col)?;
            Ok((0..column.len()).map(|i| Some(column.is_valid(i))).collect())
        }
    }
}

fn negate(mask: BooleanArray) -> Result<BooleanArray> {
    Ok(boolean::not(&mask)?)
}

fn column<'a>(batch: &'a RecordBatch, col_name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(col_name)
        .ok_or_else(|| Error::filter_error(format!("Column '{col_name}' not found in batch")))
}

fn in_set(batch: &RecordBatch, col_name: &str, values: &[LiteralValue]) -> Result<BooleanArray> {
    let mut result = BooleanArray::from(vec![false; batch.num_rows()]);
    for value in values {
        let mask = compare(batch, col_name, value, |o| o == Ordering::Equal)?;
        result = boolean::or(&result, &mask)?;
    }
    Ok(result)
}

/// Compare every row of a column with a literal; null rows never match
fn compare(
    batch: &RecordBatch,
    col_name: &str,
    literal: &LiteralValue,
    accept: impl Fn(Ordering) -> bool,
) -> Result<BooleanArray> {
    let column = column(batch, col_name)?;
    let orderings = row_orderings(column, col_name, literal)?;
    Ok(orderings
        .into_iter()
        .map(|o| Some(o.is_some_and(&accept)))
        .collect())
}

fn row_orderings(
    column: &ArrayRef,
    col_name: &str,
    literal: &LiteralValue,
) -> Result<Vec<Option<Ordering>>> {
    match literal {
        LiteralValue::String(s) => {
            let values = string_values(column)?;
            Ok(values.iter().map(|v| v.map(|v| v.cmp(s.as_str()))).collect())
        }
        LiteralValue::Date(days) => {
            let dates = column
                .as_any()
                .downcast_ref::<Date32Array>()
                .ok_or_else(|| Error::filter_error(format!("Column {col_name} is not a Date32 array")))?;
            Ok(dates.iter().map(|v| v.map(|v| v.cmp(days))).collect())
        }
    }
}

/// A batch filter driven by an expression
#[derive(Debug, Clone)]
pub struct ExpressionFilter {
    expr: Expr,
}

impl ExpressionFilter {
    /// Create a new expression filter
    #[must_use]
    pub fn new(expr: Expr) -> Self {
        Self { expr }
    }
}

impl BatchFilter for ExpressionFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let required = self.expr.required_columns();
        if let Some(missing) = required
            .iter()
            .find(|c| batch.column_by_name(c).is_none())
        {
            return Err(Error::filter_error(format!(
                "Column '{missing}' required by filter not found"
            )));
        }
        let mask = evaluate_expr(batch, &self.expr)?;
        filter_record_batch(batch, &mask)
    }
}

/// Create an "in set" expression over string codes
pub fn in_codes<'a>(column: &str, codes: impl IntoIterator<Item = &'a String>) -> Expr {
    Expr::In(
        column.to_string(),
        codes.into_iter().map(|c| LiteralValue::String(c.clone())).collect(),
    )
}

/// Create a "not in set" expression over string codes
pub fn not_in_codes<'a>(column: &str, codes: impl IntoIterator<Item = &'a String>) -> Expr {
    Expr::NotIn(
        column.to_string(),
        codes.into_iter().map(|c| LiteralValue::String(c.clone())).collect(),
    )
}
