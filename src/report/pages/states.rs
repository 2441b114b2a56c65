//! "Comparativo com outros estados"

use std::sync::Arc;

use crate::algorithm::comparison::{
    CategoryStatistics, StackedTable, best_and_worst, company_counts_by_sector,
    dependency_pivot, dependency_statistics, results_by_dependency, results_by_sector,
    results_by_state_year, sector_statistics, state_statistics, top_and_bottom,
};
use crate::config::PanelConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::filter::{AndFilter, ExpressionFilter, states_filter, years_filter};
use crate::models::CompanyRecord;
use crate::report::format::format_currency;
use crate::report::model::{
    Block, Cell, Chart, ChartKind, DataPoint, Metric, Section, Series, Table,
};
use crate::report::pages::PageContext;
use crate::schema::columns;

/// Records kept by the comparison selection (empty selections keep everything)
///
/// # Errors
/// Returns an error if the dataset cannot be filtered
pub fn comparison_records(dataset: &Dataset, config: &PanelConfig) -> Result<Vec<CompanyRecord>> {
    let selection = AndFilter::new(vec![
        Arc::new(ExpressionFilter::new(years_filter(&config.comparison_years))),
        Arc::new(ExpressionFilter::new(states_filter(&config.comparison_states))),
    ]);
    dataset.select(&selection)
}

pub(super) fn build(ctx: &PageContext<'_>) -> Result<Vec<Section>> {
    let records = comparison_records(ctx.dataset, ctx.config)?;
    let selection = selection_section(ctx.config);
    if records.is_empty() {
        return Ok(vec![
            selection,
            ctx.no_data("Comparativo", "os filtros selecionados"),
        ]);
    }

    Ok(vec![
        selection,
        counts_section(ctx, &records),
        totals_section(ctx, &records),
        sector_results_section(ctx, &records),
        dependency_section(ctx, &records),
    ])
}

fn selection_section(config: &PanelConfig) -> Section {
    let describe = |items: Vec<String>| {
        if items.is_empty() {
            "todos".to_string()
        } else {
            items.join(", ")
        }
    };
    Section::new("Filtros").with(Block::metrics(vec![
        Metric::new(
            "Anos",
            Cell::text(describe(
                config.comparison_years.iter().map(ToString::to_string).collect(),
            )),
        ),
        Metric::new("Estados", Cell::text(describe(config.comparison_states.clone()))),
    ]))
}

fn stacked_chart<T: Copy>(
    title: &str,
    y_label: &str,
    table: &StackedTable<T>,
    value: impl Fn(T) -> f64,
) -> Chart {
    let mut chart = Chart::new(ChartKind::StackedBar, title).axes("Estado, Ano", y_label);
    for (idx, category) in table.categories.iter().enumerate() {
        let points = table
            .rows
            .iter()
            .map(|(key, values)| DataPoint::category(key.label(), value(values[idx])))
            .collect();
        chart = chart.with_series(Series::new(category, points));
    }
    chart
}

fn stacked_table<T: Copy>(table: &StackedTable<T>, cell: impl Fn(T) -> Cell) -> Table {
    let mut columns = vec!["Estado".to_string(), "Ano".to_string()];
    columns.extend(table.categories.iter().cloned());
    let mut out = Table::new(columns);
    for (key, values) in &table.rows {
        let mut row = vec![Cell::text(&key.state), Cell::Year(key.year)];
        row.extend(values.iter().map(|v| cell(*v)));
        out.push(row);
    }
    out
}

fn counts_section(ctx: &PageContext<'_>, records: &[CompanyRecord]) -> Section {
    let title = "Quantidade de empresas por estado, ano e setor";
    if let Some(section) = ctx.missing_columns(title, &[columns::SECTOR]) {
        return section;
    }
    let table = company_counts_by_sector(records);
    if table.rows.is_empty() {
        return ctx.no_data(title, "empresas com setor informado");
    }

    Section::new(title)
        .with(Block::Table(stacked_table(&table, Cell::Count)))
        .with(Block::Chart(stacked_chart(title, "Número de empresas", &table, |n: usize| n as f64)))
}

fn totals_section(ctx: &PageContext<'_>, records: &[CompanyRecord]) -> Section {
    let title = "Resultado para o estado acionista por estado e ano";
    if let Some(section) = ctx.missing_columns(title, &[columns::SHAREHOLDER_RESULT]) {
        return section;
    }
    let totals = results_by_state_year(records);
    let Some((best, worst)) = best_and_worst(&totals) else {
        return ctx.no_data(title, "os filtros selecionados");
    };

    let mut table = Table::new(["Estado", "Ano", "Resultado"]);
    for t in &totals {
        table.push(vec![
            Cell::text(&t.key.state),
            Cell::Year(t.key.year),
            Cell::Money(t.total),
        ]);
    }
    let chart = Chart::new(ChartKind::Bar, title)
        .axes("Estado, Ano", "Resultado (R$)")
        .with_series(Series::new(
            "Resultado",
            totals
                .iter()
                .map(|t| DataPoint::category(t.key.label(), t.total))
                .collect(),
        ));

    let mut stats = Table::new(["Estado", "Total", "Média", "Mínimo", "Máximo", "Anos com dados"]);
    for s in state_statistics(&totals) {
        stats.push(vec![
            Cell::text(s.state),
            Cell::Money(s.total),
            Cell::Money(s.mean),
            Cell::Money(s.min),
            Cell::Money(s.max),
            Cell::Count(s.years),
        ]);
    }

    Section::new(title)
        .with(Block::metrics(vec![
            Metric::new(
                "Melhor resultado",
                Cell::text(format!("{} ({})", best.key.label(), format_currency(best.total))),
            ),
            Metric::new(
                "Pior resultado",
                Cell::text(format!("{} ({})", worst.key.label(), format_currency(worst.total))),
            ),
        ]))
        .with(Block::Table(table))
        .with(Block::Chart(chart))
        .with(Block::narrative("Estatísticas por estado"))
        .with(Block::Table(stats))
}

fn statistics_table(first_column: &str, stats: &[CategoryStatistics]) -> Table {
    let mut table = Table::new([first_column, "Total", "Média", "Quantidade de registros"]);
    for s in stats {
        table.push(vec![
            Cell::text(&s.category),
            Cell::Money(s.total),
            Cell::Money(s.mean),
            Cell::Count(s.records),
        ]);
    }
    table
}

fn ranking(stats: &[&CategoryStatistics]) -> String {
    stats
        .iter()
        .map(|s| format!("{} ({})", s.category, format_currency(s.total)))
        .collect::<Vec<_>>()
        .join("; ")
}

fn sector_results_section(ctx: &PageContext<'_>, records: &[CompanyRecord]) -> Section {
    let title = "Resultado para o estado acionista por setor";
    if let Some(section) =
        ctx.missing_columns(title, &[columns::SECTOR, columns::SHAREHOLDER_RESULT])
    {
        return section;
    }
    let table = results_by_sector(records);
    if table.rows.is_empty() {
        return ctx.no_data(title, "os filtros selecionados");
    }

    let stats = sector_statistics(records);
    let (top, bottom) = top_and_bottom(&stats, 3);
    Section::new(title)
        .with(Block::Table(stacked_table(&table, Cell::Money)))
        .with(Block::Chart(stacked_chart(title, "Resultado (R$)", &table, |v: f64| v)))
        .with(Block::narrative("Análise por setor"))
        .with(Block::Table(statistics_table("Setor", &stats)))
        .with(Block::metrics(vec![
            Metric::new("Setores com melhores resultados", Cell::text(ranking(&top))),
            Metric::new("Setores com piores resultados", Cell::text(ranking(&bottom))),
        ]))
}

fn dependency_section(ctx: &PageContext<'_>, records: &[CompanyRecord]) -> Section {
    let title = "Resultado para o estado acionista por dependência";
    if let Some(section) =
        ctx.missing_columns(title, &[columns::DEPENDENCY, columns::SHAREHOLDER_RESULT])
    {
        return section;
    }
    let table = results_by_dependency(records);
    if table.rows.is_empty() {
        return ctx.no_data(title, "os filtros selecionados");
    }

    let pivot = dependency_pivot(records);
    let mut columns = vec!["Estado".to_string()];
    columns.extend(pivot.classes.iter().cloned());
    columns.push("Total".to_string());
    let mut pivot_table = Table::new(columns);
    for row in &pivot.rows {
        let mut cells = vec![Cell::text(&row.state)];
        cells.extend(row.values.iter().map(|&v| Cell::Money(v)));
        cells.push(Cell::Money(row.total));
        pivot_table.push(cells);
    }

    Section::new(title)
        .with(Block::Table(stacked_table(&table, Cell::Money)))
        .with(Block::Chart(stacked_chart(title, "Resultado (R$)", &table, |v: f64| v)))
        .with(Block::narrative("Análise por dependência"))
        .with(Block::Table(statistics_table(
            "Dependência",
            &dependency_statistics(records),
        )))
        .with(Block::narrative("Resultado por estado e dependência"))
        .with(Block::Table(pivot_table))
}
