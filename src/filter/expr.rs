//! Expression-based filtering
//!
//! Expressions are evaluated column-wise with Arrow's comparison kernels and
//! turned into a boolean mask. Comparisons against null values yield null,
//! which drops the row.

use std::collections::HashSet;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Datum, Float64Array, Int64Array, Scalar, StringArray,
};
use arrow::compute::kernels::cmp;
use arrow::compute::{and, cast, is_not_null, is_null, not, or};
use arrow::record_batch::RecordBatch;
use arrow_schema::DataType;

use crate::error::{PanelError, Result};
use crate::filter::core::{BatchFilter, filter_record_batch};
use crate::schema::columns;

/// Represents a filter expression over the columns of a batch
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column equals a literal value
    Eq(String, LiteralValue),

    /// Column not equals a literal value
    NotEq(String, LiteralValue),

    /// Column is greater than a literal value
    Gt(String, LiteralValue),

    /// Column is greater than or equal to a literal value
    GtEq(String, LiteralValue),

    /// Column is less than a literal value
    Lt(String, LiteralValue),

    /// Column is less than or equal to a literal value
    LtEq(String, LiteralValue),

    /// Column is in a set of values
    In(String, Vec<LiteralValue>),

    /// Column is not in a set of values
    NotIn(String, Vec<LiteralValue>),

    /// Column is null
    IsNull(String),

    /// Column is not null
    IsNotNull(String),

    /// Logical AND of expressions
    And(Vec<Expr>),

    /// Logical OR of expressions
    Or(Vec<Expr>),

    /// Logical NOT of an expression
    Not(Box<Expr>),

    /// Always evaluates to true
    AlwaysTrue,

    /// Always evaluates to false
    AlwaysFalse,
}

/// Represents a literal value that can be used in filter expressions
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Boolean value
    Boolean(bool),

    /// Integer value
    Int(i64),

    /// Floating point value
    Float(f64),

    /// String value
    String(String),

    /// Null value
    Null,
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

#[derive(Debug, Clone, Copy)]
enum CmpOp {
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
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
            Self::Eq(col, _)
            | Self::NotEq(col, _)
            | Self::Gt(col, _)
            | Self::GtEq(col, _)
            | Self::Lt(col, _)
            | Self::LtEq(col, _)
            | Self::In(col, _)
            | Self::NotIn(col, _)
            | Self::IsNull(col)
            | Self::IsNotNull(col) => {
                columns.insert(col.clone());
            }
            Self::And(exprs) | Self::Or(exprs) => {
                for expr in exprs {
                    expr.collect_required_columns(columns);
                }
            }
            Self::Not(expr) => expr.collect_required_columns(columns),
            Self::AlwaysTrue | Self::AlwaysFalse => {}
        }
    }

    /// Combine expressions with AND, dropping `AlwaysTrue` terms
    #[must_use]
    pub fn all(exprs: impl IntoIterator<Item = Expr>) -> Self {
        let mut terms: Vec<Expr> = exprs
            .into_iter()
            .filter(|e| *e != Self::AlwaysTrue)
            .collect();
        match terms.len() {
            0 => Self::AlwaysTrue,
            1 => terms.remove(0),
            _ => Self::And(terms),
        }
    }
}

/// Evaluates a filter expression against a record batch
///
/// # Errors
/// Returns an error if a column is missing or has a type the literal cannot be compared with
pub fn evaluate_expr(batch: &RecordBatch, expr: &Expr) -> Result<BooleanArray> {
    match expr {
        Expr::AlwaysTrue => Ok(BooleanArray::from(vec![true; batch.num_rows()])),
        Expr::AlwaysFalse => Ok(BooleanArray::from(vec![false; batch.num_rows()])),

        Expr::And(exprs) => {
            let mut result = BooleanArray::from(vec![true; batch.num_rows()]);
            for expr in exprs {
                let mask = evaluate_expr(batch, expr)?;
                result = and(&result, &mask)?;
            }
            Ok(result)
        }

        Expr::Or(exprs) => {
            let mut result = BooleanArray::from(vec![false; batch.num_rows()]);
            for expr in exprs {
                let mask = evaluate_expr(batch, expr)?;
                result = or(&result, &mask)?;
            }
            Ok(result)
        }

        Expr::Not(expr) => Ok(not(&evaluate_expr(batch, expr)?)?),

        Expr::Eq(col, value) => compare(batch, col, value, CmpOp::Eq),
        Expr::NotEq(col, value) => compare(batch, col, value, CmpOp::NotEq),
        Expr::Gt(col, value) => compare(batch, col, value, CmpOp::Gt),
        Expr::GtEq(col, value) => compare(batch, col, value, CmpOp::GtEq),
        Expr::Lt(col, value) => compare(batch, col, value, CmpOp::Lt),
        Expr::LtEq(col, value) => compare(batch, col, value, CmpOp::LtEq),

        Expr::In(col, values) => {
            let alternatives = values
                .iter()
                .map(|v| Expr::Eq(col.clone(), v.clone()))
                .collect();
            evaluate_expr(batch, &Expr::Or(alternatives))
        }

        Expr::NotIn(col, values) => {
            let inside = evaluate_expr(batch, &Expr::In(col.clone(), values.clone()))?;
            Ok(not(&inside)?)
        }

        Expr::IsNull(col) => Ok(is_null(column(batch, col)?.as_ref())?),
        Expr::IsNotNull(col) => Ok(is_not_null(column(batch, col)?.as_ref())?),
    }
}

fn column<'a>(batch: &'a RecordBatch, col_name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(col_name)
        .ok_or_else(|| PanelError::filter(format!("Column '{col_name}' not found in batch")))
}

fn apply(op: CmpOp, lhs: &dyn Datum, rhs: &dyn Datum) -> Result<BooleanArray> {
    let mask = match op {
        CmpOp::Eq => cmp::eq(lhs, rhs),
        CmpOp::NotEq => cmp::neq(lhs, rhs),
        CmpOp::Gt => cmp::gt(lhs, rhs),
        CmpOp::GtEq => cmp::gt_eq(lhs, rhs),
        CmpOp::Lt => cmp::lt(lhs, rhs),
        CmpOp::LtEq => cmp::lt_eq(lhs, rhs),
    }?;
    Ok(mask)
}

fn downcast<'a, T: Array + 'static>(array: &'a ArrayRef, col_name: &str) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        PanelError::filter(format!(
            "Column '{col_name}' has unexpected type {}",
            array.data_type()
        ))
    })
}

/// Compares a column against a literal using a vectorized kernel
fn compare(
    batch: &RecordBatch,
    col_name: &str,
    literal_value: &LiteralValue,
    op: CmpOp,
) -> Result<BooleanArray> {
    let array = column(batch, col_name)?;

    match (array.data_type(), literal_value) {
        (_, LiteralValue::Null) => Ok(BooleanArray::new_null(array.len())),

        (DataType::Utf8, LiteralValue::String(s)) => {
            let values = downcast::<StringArray>(array, col_name)?;
            apply(op, values, &Scalar::new(StringArray::from(vec![s.as_str()])))
        }

        (DataType::Int64, LiteralValue::Int(n)) => {
            let values = downcast::<Int64Array>(array, col_name)?;
            apply(op, values, &Scalar::new(Int64Array::from(vec![*n])))
        }

        (DataType::Float64, LiteralValue::Float(_) | LiteralValue::Int(_)) => {
            let values = downcast::<Float64Array>(array, col_name)?;
            let literal = match literal_value {
                LiteralValue::Float(f) => *f,
                LiteralValue::Int(n) => *n as f64,
                _ => unreachable!("matched above"),
            };
            apply(op, values, &Scalar::new(Float64Array::from(vec![literal])))
        }

        (DataType::Int64, LiteralValue::Float(f)) => {
            let widened = cast(array, &DataType::Float64)?;
            let values = downcast::<Float64Array>(&widened, col_name)?;
            apply(op, values, &Scalar::new(Float64Array::from(vec![*f])))
        }

        (DataType::Boolean, LiteralValue::Boolean(b)) => {
            let values = downcast::<BooleanArray>(array, col_name)?;
            apply(op, values, &Scalar::new(BooleanArray::from(vec![*b])))
        }

        (data_type, literal) => Err(PanelError::filter(format!(
            "Cannot compare column '{col_name}' of type {data_type} with {literal:?}"
        ))),
    }
}

/// A filter that evaluates an expression against a record batch
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

    /// The wrapped expression
    #[must_use]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl From<Expr> for ExpressionFilter {
    fn from(expr: Expr) -> Self {
        Self::new(expr)
    }
}

impl BatchFilter for ExpressionFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mask = evaluate_expr(batch, &self.expr)?;
        filter_record_batch(batch, &mask)
    }

    fn required_columns(&self) -> HashSet<String> {
        self.expr.required_columns()
    }
}

/// Helper function to create equality filter for a column
#[must_use]
pub fn eq_filter(column: &str, value: impl Into<LiteralValue>) -> Expr {
    Expr::Eq(column.to_string(), value.into())
}

/// Helper function to create IN filter for a column
#[must_use]
pub fn in_filter(column: &str, values: Vec<LiteralValue>) -> Expr {
    Expr::In(column.to_string(), values)
}

/// Records of one state
#[must_use]
pub fn state_filter(state: &str) -> Expr {
    eq_filter(columns::STATE, state)
}

/// Records of one year
#[must_use]
pub fn year_filter(year: i32) -> Expr {
    eq_filter(columns::YEAR, year)
}

/// Records whose year lies in `first..=last`
#[must_use]
pub fn year_range_filter(first: i32, last: i32) -> Expr {
    Expr::And(vec![
        Expr::GtEq(columns::YEAR.to_string(), first.into()),
        Expr::LtEq(columns::YEAR.to_string(), last.into()),
    ])
}

/// Records of one state in one year
#[must_use]
pub fn state_year_filter(state: &str, year: i32) -> Expr {
    Expr::all([state_filter(state), year_filter(year)])
}

/// Records in any of `states`; an empty selection keeps every record with a state
#[must_use]
pub fn states_filter(states: &[String]) -> Expr {
    if states.is_empty() {
        Expr::IsNotNull(columns::STATE.to_string())
    } else {
        in_filter(
            columns::STATE,
            states.iter().map(|s| LiteralValue::String(s.clone())).collect(),
        )
    }
}

/// Records in any of `years`; an empty selection keeps everything
#[must_use]
pub fn years_filter(years: &[i32]) -> Expr {
    if years.is_empty() {
        Expr::AlwaysTrue
    } else {
        in_filter(columns::YEAR, years.iter().map(|&y| y.into()).collect())
    }
}
