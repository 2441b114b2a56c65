mod utils;

use std::sync::Arc;

use estatais_panel::filter::{
    AndFilter, BatchFilter, ExpressionFilter, eq_filter, state_filter, states_filter,
    year_range_filter, years_filter,
};
use estatais_panel::schema::columns;
use estatais_panel::{Expr, LiteralValue};
use utils::load_sample;

#[test]
fn state_and_year_selection() {
    let dataset = load_sample();

    assert_eq!(utils::state_year(&dataset, "DF", 2023).len(), 7);
    assert_eq!(utils::state_year(&dataset, "DF", 2022).len(), 3);
    assert_eq!(utils::state_year(&dataset, "DF", 2020).len(), 0);
    assert_eq!(dataset.select_where(state_filter("SP")).unwrap().len(), 3);
}

#[test]
fn year_range_and_sets() {
    let dataset = load_sample();

    let period = dataset
        .select_where(Expr::all([state_filter("DF"), year_range_filter(2022, 2023)]))
        .unwrap();
    assert_eq!(period.len(), 10);

    let selected = dataset
        .select_where(Expr::all([
            years_filter(&[2022]),
            states_filter(&["DF".to_string(), "SP".to_string()]),
        ]))
        .unwrap();
    assert_eq!(selected.len(), 4);

    let everything = dataset
        .select_where(Expr::all([years_filter(&[]), states_filter(&[])]))
        .unwrap();
    assert_eq!(everything.len(), utils::SAMPLE_ROWS);
}

#[test]
fn numeric_comparison_on_adapted_columns() {
    let dataset = load_sample();
    let positive_equity = dataset
        .select_where(Expr::Gt(columns::NET_EQUITY.to_string(), LiteralValue::Int(0)))
        .unwrap();

    // EMATER twice, SAB and Instituto BRB are left out
    assert_eq!(positive_equity.len(), 10);
    assert!(positive_equity.iter().all(|r| r.net_equity.unwrap_or(0.0) > 0.0));
}

#[test]
fn combined_batch_filters() {
    let dataset = load_sample();
    let filter = AndFilter::new(vec![
        Arc::new(ExpressionFilter::new(eq_filter(columns::SECTOR, "Saneamento"))),
        Arc::new(ExpressionFilter::new(Expr::Not(Box::new(state_filter("SP"))))),
    ]);

    let records = dataset.select(&filter).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.company == "CAESB"));
    assert!(filter.required_columns().contains(columns::SECTOR));
}

#[test]
fn unknown_column_fails_the_selection() {
    let dataset = load_sample();
    assert!(dataset.select_where(eq_filter("cnpj", "00")).is_err());
}
