mod utils;

use estatais_panel::algorithm::comparison::{
    best_and_worst, company_counts_by_sector, dependency_pivot, results_by_state_year,
    state_statistics,
};
use estatais_panel::algorithm::shareholder::{
    Trend, accumulate_by_company, accumulate_by_dependency, accumulate_by_sector, period_summary,
    results_by_year, year_results,
};
use estatais_panel::filter::state_filter;
use estatais_panel::Dependency;
use utils::{assert_close, assert_close_opt, load_sample};

#[test]
fn focus_year_results() {
    let records = utils::state_year(&load_sample(), "DF", 2023);
    let results = year_results(&records);

    assert_eq!(results.companies.len(), 6);
    assert_close(results.total, 190.0);
    assert_eq!((results.positive_count, results.negative_count), (3, 3));
    assert_close_opt(results.positive_share, 50.0);
    assert_eq!(results.best.map(|c| c.company), Some("BRB".to_string()));
    assert_eq!(results.worst.map(|c| c.company), Some("CEB Geração".to_string()));
}

#[test]
fn accumulated_over_the_period() {
    let records = load_sample().select_where(state_filter("DF")).unwrap();

    let companies = accumulate_by_company(&records);
    let totals: Vec<(&str, f64)> = companies
        .iter()
        .map(|c| (c.company.as_str(), c.total))
        .collect();
    assert_eq!(
        totals,
        vec![
            ("CEB Geração", -40.0),
            ("CODHAB", -20.0),
            ("SAB", -10.0),
            ("EMATER", 40.0),
            ("CAESB", 65.0),
            ("BRB", 250.0),
        ]
    );
    assert_eq!(companies[5].years, 3);

    let sectors = accumulate_by_sector(&records);
    assert_eq!(sectors.first().map(|s| s.sector.as_str()), Some("Energia"));
    assert_eq!(sectors.last().map(|s| s.sector.as_str()), Some("Financeiro"));

    let dependency = accumulate_by_dependency(&records);
    let total_of = |class| {
        dependency
            .iter()
            .find(|d| d.dependency == Some(class))
            .map(|d| d.total)
    };
    assert_close_opt(total_of(Dependency::Dependent), 10.0);
    assert_close_opt(total_of(Dependency::NonDependent), 275.0);
}

#[test]
fn unknown_dependency_forms_its_own_group() {
    let records = load_sample().select_where(state_filter("SP")).unwrap();
    let dependency = accumulate_by_dependency(&records);

    assert_eq!(dependency[0].dependency, None);
    assert_eq!(dependency[0].label(), "Não Informado");
    assert_close(dependency[0].total, -12.0);
}

#[test]
fn yearly_series_and_trend() {
    let records = load_sample().select_where(state_filter("DF")).unwrap();
    let years = results_by_year(&records);

    let totals: Vec<(i32, f64)> = years.iter().map(|y| (y.year, y.total)).collect();
    assert_eq!(totals, vec![(2021, 50.0), (2022, 45.0), (2023, 190.0)]);
    assert_eq!(years[0].change, None);
    assert_close_opt(years[1].change, -5.0);
    assert_close_opt(years[1].change_percentage, -10.0);

    let summary = period_summary(&years);
    assert_close_opt(summary.mean_annual, 95.0);
    assert_eq!(summary.best_year.map(|y| y.year), Some(2023));
    assert_eq!(summary.worst_year.map(|y| y.year), Some(2022));
    assert_eq!(summary.trend, Some(Trend::Improving));
    assert_close_opt(summary.difference, 140.0);
}

#[test]
fn single_year_has_no_trend() {
    let records = utils::state_year(&load_sample(), "DF", 2023);
    let summary = period_summary(&results_by_year(&records));
    assert_eq!(summary.trend, None);
    assert_eq!(summary.difference, None);
}

#[test]
fn states_compared_per_year() {
    let records = load_sample().records().unwrap();
    let totals = results_by_state_year(&records);

    let labels: Vec<(String, f64)> = totals.iter().map(|t| (t.key.label(), t.total)).collect();
    assert_eq!(
        labels,
        vec![
            ("DF, 2021".to_string(), 50.0),
            ("DF, 2022".to_string(), 45.0),
            ("DF, 2023".to_string(), 190.0),
            ("SP, 2022".to_string(), 250.0),
            ("SP, 2023".to_string(), 288.0),
        ]
    );

    let (best, worst) = best_and_worst(&totals).unwrap();
    assert_eq!(best.key.label(), "SP, 2023");
    assert_eq!(worst.key.label(), "DF, 2022");

    let stats = state_statistics(&totals);
    assert_eq!(stats[0].state, "SP");
    assert_close(stats[0].total, 538.0);
    assert_eq!(stats[1].years, 3);
    assert_close(stats[1].min, 45.0);
}

#[test]
fn stacked_counts_and_dependency_pivot() {
    let records = load_sample().records().unwrap();

    let counts = company_counts_by_sector(&records);
    assert_eq!(counts.rows.len(), 5);
    assert_eq!(counts.series("Saneamento"), Some(vec![0, 1, 1, 1, 1]));
    assert_eq!(counts.series("Inexistente"), None);

    let pivot = dependency_pivot(&records);
    assert_eq!(pivot.classes, vec!["Dependente", "Não Dependente", "Não Informado"]);
    assert_eq!(pivot.rows[0].state, "SP");
    assert_close(pivot.rows[0].total, 538.0);
    assert_close(pivot.rows[1].values[0], 10.0);
}
