//! Filtering capabilities for the loaded dataset
//!
//! Pages select their population (a state, a year, a range of years, a set
//! of states) with expressions evaluated on the Arrow batches before any
//! record is decoded.

pub mod core;
pub mod expr;

pub use core::{AndFilter, BatchFilter, filter_record_batch};
pub use expr::{
    Expr, ExpressionFilter, LiteralValue, eq_filter, evaluate_expr, in_filter, state_filter,
    state_year_filter, states_filter, year_filter, year_range_filter, years_filter,
};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::record_batch::RecordBatch;
    use arrow_schema::{DataType, Field, Schema};

    use super::*;
    use crate::schema::columns;

    fn batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new(columns::STATE, DataType::Utf8, true),
            Field::new(columns::YEAR, DataType::Int64, true),
            Field::new(columns::NET_EQUITY, DataType::Float64, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![
                    Some("DF"),
                    Some("DF"),
                    Some("SP"),
                    None,
                    Some("DF"),
                ])),
                Arc::new(Int64Array::from(vec![
                    Some(2023),
                    Some(2021),
                    Some(2023),
                    Some(2023),
                    None,
                ])),
                Arc::new(Float64Array::from(vec![
                    Some(10.0),
                    Some(-5.0),
                    None,
                    Some(1.0),
                    Some(3.0),
                ])),
            ],
        )
        .unwrap()
    }

    fn rows(expr: Expr) -> usize {
        ExpressionFilter::new(expr).filter(&batch()).unwrap().num_rows()
    }

    #[test]
    fn state_and_year_select_one_row() {
        assert_eq!(rows(state_year_filter("DF", 2023)), 1);
        assert_eq!(rows(state_filter("DF")), 3);
    }

    #[test]
    fn null_values_never_match() {
        // the row without a year is dropped by the range, the row without a state by the set
        assert_eq!(rows(year_range_filter(2020, 2023)), 4);
        assert_eq!(rows(states_filter(&[])), 4);
        assert_eq!(rows(Expr::Gt(columns::NET_EQUITY.into(), LiteralValue::Int(0))), 3);
    }

    #[test]
    fn set_membership_and_negation() {
        let states = vec!["SP".to_string(), "RJ".to_string()];
        assert_eq!(rows(states_filter(&states)), 1);
        assert_eq!(rows(years_filter(&[2021, 2022])), 1);
        assert_eq!(rows(years_filter(&[])), 5);
        assert_eq!(
            rows(Expr::NotIn(columns::STATE.into(), vec!["DF".into()])),
            1
        );
        assert_eq!(rows(Expr::Not(Box::new(Expr::AlwaysTrue))), 0);
    }

    #[test]
    fn float_literal_against_integer_column() {
        assert_eq!(rows(Expr::Lt(columns::YEAR.into(), LiteralValue::Float(2022.5))), 1);
    }

    #[test]
    fn missing_column_is_an_error() {
        let filter = ExpressionFilter::new(eq_filter("setor", "Energia"));
        assert!(filter.filter(&batch()).is_err());
    }

    #[test]
    fn all_collapses_trivial_terms() {
        assert_eq!(Expr::all([]), Expr::AlwaysTrue);
        assert_eq!(
            Expr::all([Expr::AlwaysTrue, state_filter("DF")]),
            state_filter("DF")
        );
        let required = Expr::all([state_filter("DF"), year_filter(2023)]).required_columns();
        assert!(required.contains(columns::STATE) && required.contains(columns::YEAR));
    }

    #[test]
    fn and_filter_chains() {
        let filter = AndFilter::new(vec![
            Arc::new(ExpressionFilter::new(state_filter("DF"))),
            Arc::new(ExpressionFilter::new(year_filter(2021))),
        ]);
        assert_eq!(filter.filter(&batch()).unwrap().num_rows(), 1);
        assert_eq!(filter.required_columns().len(), 2);
    }
}
