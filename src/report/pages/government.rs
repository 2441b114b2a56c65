//! "Resultado financeiro para o governo"

use crate::algorithm::shareholder::{
    CompanyResult, Trend, YearResult, accumulate_by_company, accumulate_by_dependency,
    accumulate_by_sector, period_summary, results_by_year, year_results,
};
use crate::error::Result;
use crate::filter::{Expr, state_filter, state_year_filter, year_range_filter};
use crate::models::{CompanyRecord, Dependency};
use crate::report::format::format_currency;
use crate::report::model::{
    Block, Cell, Chart, ChartKind, DataPoint, Metric, Section, Series, Table,
};
use crate::report::pages::PageContext;
use crate::schema::columns;

const INTRODUCTION: &str = "Resultado para o estado acionista: dividendos e juros sobre \
    capital próprio recebidos, descontados os aportes de capital e as subvenções \
    transferidas às empresas. Valores positivos indicam ganho líquido para o tesouro.";

pub(super) fn build(ctx: &PageContext<'_>) -> Result<Vec<Section>> {
    if let Some(section) = ctx.missing_columns(
        "Resultado para o estado acionista",
        &[columns::SHAREHOLDER_RESULT],
    ) {
        return Ok(vec![section]);
    }

    let focus = ctx
        .dataset
        .select_where(state_year_filter(ctx.state(), ctx.config.focus_year))?;
    let period = ctx.dataset.select_where(Expr::all([
        state_filter(ctx.state()),
        year_range_filter(ctx.config.first_year, ctx.config.last_year),
    ]))?;

    let intro = Section::new("Resultado para o estado acionista").with(Block::narrative(INTRODUCTION));
    Ok(vec![
        intro,
        focus_year(ctx, &focus),
        by_company(ctx, &period),
        by_sector(ctx, &period),
        by_dependency(ctx, &period),
        by_year(ctx, &period),
    ])
}

fn period_label(ctx: &PageContext<'_>) -> String {
    format!("{}–{}", ctx.config.first_year, ctx.config.last_year)
}

fn focus_year(ctx: &PageContext<'_>, records: &[CompanyRecord]) -> Section {
    let year = ctx.config.focus_year;
    let title = format!("Resultado por empresa em {year}");
    let results = year_results(records);
    if results.companies.is_empty() {
        return ctx.no_data(&title, &format!("{} em {year}", ctx.state()));
    }

    let mut table = Table::new(["Empresa", "Setor", "Resultado"]);
    for c in &results.companies {
        table.push(vec![
            Cell::text(&c.company),
            Cell::opt_text(c.sector.as_deref()),
            Cell::Money(c.result),
        ]);
    }
    let chart = Chart::new(ChartKind::HorizontalBar, title.clone())
        .axes("Resultado (R$)", "Empresa")
        .with_series(Series::new(
            "Resultado",
            results
                .companies
                .iter()
                .map(|c| DataPoint::category(&c.company, c.result))
                .collect(),
        ));

    let named = |c: Option<&CompanyResult>| {
        c.map_or(Cell::Missing, |c| {
            Cell::text(format!("{} ({})", c.company, format_currency(c.result)))
        })
    };
    Section::new(title)
        .with(Block::metrics(vec![
            Metric::new("Resultado total", Cell::Money(results.total)),
            Metric::new("Empresas com resultado positivo", Cell::Count(results.positive_count)),
            Metric::new("Empresas com resultado negativo", Cell::Count(results.negative_count)),
            Metric::new("% positivas", Cell::percent(results.positive_share)),
            Metric::new("% negativas", Cell::percent(results.negative_share)),
            Metric::new("Melhor resultado", named(results.best.as_ref())),
            Metric::new("Pior resultado", named(results.worst.as_ref())),
        ]))
        .with(Block::Table(table))
        .with(Block::Chart(chart))
}

fn by_company(ctx: &PageContext<'_>, records: &[CompanyRecord]) -> Section {
    let title = format!("Resultado acumulado por empresa ({})", period_label(ctx));
    let companies = accumulate_by_company(records);
    if companies.is_empty() {
        return ctx.no_data(&title, ctx.state());
    }

    let mut table = Table::new(["Empresa", "Setor", "Dependência", "Anos", "Resultado acumulado"]);
    for c in &companies {
        table.push(vec![
            Cell::text(&c.company),
            Cell::opt_text(c.sector.as_deref()),
            Cell::text(Dependency::label_or_unknown(c.dependency)),
            Cell::Count(c.years),
            Cell::Money(c.total),
        ]);
    }
    let chart = Chart::new(ChartKind::HorizontalBar, title.clone())
        .axes("Resultado acumulado (R$)", "Empresa")
        .with_series(Series::new(
            "Resultado acumulado",
            companies
                .iter()
                .map(|c| DataPoint::category(&c.company, c.total))
                .collect(),
        ));

    Section::new(title)
        .with(Block::Table(table))
        .with(Block::Chart(chart))
}

fn by_sector(ctx: &PageContext<'_>, records: &[CompanyRecord]) -> Section {
    let title = format!("Resultado acumulado por setor ({})", period_label(ctx));
    if let Some(section) = ctx.missing_columns(&title, &[columns::SECTOR]) {
        return section;
    }
    let sectors = accumulate_by_sector(records);
    if sectors.is_empty() {
        return ctx.no_data(&title, ctx.state());
    }

    let mut table = Table::new(["Setor", "Empresas", "Lista de empresas", "Resultado acumulado"]);
    for s in &sectors {
        table.push(vec![
            Cell::text(&s.sector),
            Cell::Count(s.companies.len()),
            Cell::text(s.companies.join(", ")),
            Cell::Money(s.total),
        ]);
    }
    let mut section = Section::new(title).with(Block::Table(table));
    if let (Some(worst), Some(best)) = (sectors.first(), sectors.last()) {
        section.push(Block::metrics(vec![
            Metric::new(
                "Setor com melhor resultado",
                Cell::text(format!("{} ({})", best.sector, format_currency(best.total))),
            ),
            Metric::new(
                "Setor com pior resultado",
                Cell::text(format!("{} ({})", worst.sector, format_currency(worst.total))),
            ),
        ]));
    }
    section
}

fn by_dependency(ctx: &PageContext<'_>, records: &[CompanyRecord]) -> Section {
    let title = format!("Resultado acumulado por dependência ({})", period_label(ctx));
    if let Some(section) = ctx.missing_columns(&title, &[columns::DEPENDENCY]) {
        return section;
    }
    let groups = accumulate_by_dependency(records);
    if groups.is_empty() {
        return ctx.no_data(&title, ctx.state());
    }

    let mut table = Table::new(["Dependência", "Empresas", "Setores", "Resultado acumulado"]);
    for g in &groups {
        table.push(vec![
            Cell::text(g.label()),
            Cell::Count(g.companies.len()),
            Cell::text(g.sectors.join(", ")),
            Cell::Money(g.total),
        ]);
    }
    let chart = Chart::new(ChartKind::Bar, title.clone())
        .axes("Dependência", "Resultado acumulado (R$)")
        .with_series(Series::new(
            "Resultado acumulado",
            groups
                .iter()
                .map(|g| DataPoint::category(g.label(), g.total))
                .collect(),
        ));

    Section::new(title)
        .with(Block::Table(table))
        .with(Block::Chart(chart))
}

fn by_year(ctx: &PageContext<'_>, records: &[CompanyRecord]) -> Section {
    let title = "Resultado por ano";
    let years = results_by_year(records);
    if years.is_empty() {
        return ctx.no_data(title, ctx.state());
    }

    let mut table = Table::new(["Ano", "Resultado", "Variação (R$)", "Variação (%)"]);
    for y in &years {
        table.push(vec![
            Cell::Year(y.year),
            Cell::Money(y.total),
            Cell::money(y.change),
            Cell::percent(y.change_percentage),
        ]);
    }
    let chart = Chart::new(ChartKind::Line, "Evolução do resultado")
        .axes("Ano", "Resultado (R$)")
        .with_series(Series::new(
            "Resultado",
            years
                .iter()
                .map(|y| DataPoint::category(y.year.to_string(), y.total))
                .collect(),
        ));

    let summary = period_summary(&years);
    let year_cell = |y: Option<&YearResult>| {
        y.map_or(Cell::Missing, |y| {
            Cell::text(format!("{} ({})", y.year, format_currency(y.total)))
        })
    };
    let mut section = Section::new(title)
        .with(Block::metrics(vec![
            Metric::new("Média anual", Cell::money(summary.mean_annual)),
            Metric::new("Melhor ano", year_cell(summary.best_year.as_ref())),
            Metric::new("Pior ano", year_cell(summary.worst_year.as_ref())),
        ]))
        .with(Block::Table(table))
        .with(Block::Chart(chart));

    match (summary.trend, summary.difference, years.first(), years.last()) {
        (Some(trend), Some(difference), Some(first), Some(last)) => {
            let comparison = match trend {
                Trend::Improving => format!("{} superior ao", format_currency(difference.abs())),
                Trend::Deteriorating => format!("{} inferior ao", format_currency(difference.abs())),
                Trend::Stable => "igual ao".to_string(),
            };
            section.push(Block::narrative(format!(
                "{}: o resultado de {} foi {comparison} de {}.",
                trend.label(),
                last.year,
                first.year,
            )));
        }
        _ => section.push(Block::info("Dados insuficientes para analisar a tendência.")),
    }
    section
}
