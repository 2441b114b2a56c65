//! "Resultado financeiro das estatais"

use itertools::Itertools;

use crate::algorithm::profitability::{self, ProfitabilityStatus, sector_signs};
use crate::algorithm::results::{
    CompanyProfit, YearOutcome, equity_summary, equity_vs_result, evolution, outcomes_by_year,
};
use crate::error::Result;
use crate::filter::{Expr, state_filter, state_year_filter, year_range_filter};
use crate::models::CompanyRecord;
use crate::report::model::{
    Block, Cell, Chart, ChartKind, DataPoint, Metric, Section, Series, Table,
};
use crate::report::pages::{PROFITABILITY_COLUMNS, PageContext};
use crate::schema::columns;

pub(super) fn build(ctx: &PageContext<'_>) -> Result<Vec<Section>> {
    if let Some(section) = ctx.missing_columns("Lucros e prejuízos", &[columns::PROFIT]) {
        return Ok(vec![section]);
    }

    let period = ctx.dataset.select_where(Expr::all([
        state_filter(ctx.state()),
        year_range_filter(ctx.config.first_year, ctx.config.last_year),
    ]))?;

    let mut sections = Vec::new();
    for (year, outcome) in outcomes_by_year(&period, &ctx.config.years()) {
        let title = format!("Lucro e prejuízo em {year}");
        sections.push(match outcome {
            Some(outcome) => year_section(title, &outcome),
            None => ctx.no_data(&title, &format!("{} em {year}", ctx.state())),
        });
    }
    sections.push(evolution_section(ctx, &period));

    let focus = ctx
        .dataset
        .select_where(state_year_filter(ctx.state(), ctx.config.focus_year))?;
    sections.push(equity_section(ctx, &focus));
    sections.push(company_profitability(ctx, &focus));
    sections.push(sector_profitability(ctx, &focus));
    Ok(sections)
}

fn profit_table(companies: &[CompanyProfit]) -> Table {
    let mut table = Table::new(["Empresa", "Setor", "Resultado"]);
    for c in companies {
        table.push(vec![
            Cell::text(&c.company),
            Cell::opt_text(c.sector.as_deref()),
            Cell::Money(c.profit),
        ]);
    }
    table
}

fn year_section(title: String, outcome: &YearOutcome) -> Section {
    let mut section = Section::new(title).with(Block::metrics(vec![
        Metric::new("Empresas com lucro", Cell::Count(outcome.profitable.len())),
        Metric::new("Empresas com prejuízo", Cell::Count(outcome.loss_making.len())),
    ]));
    section.push(Block::narrative("Empresas com lucro"));
    section.push(Block::Table(profit_table(&outcome.profitable)));
    section.push(Block::narrative("Empresas com prejuízo"));
    section.push(Block::Table(profit_table(&outcome.loss_making)));

    let chart = Chart::new(ChartKind::Pie, format!("Lucro e prejuízo em {}", outcome.year))
        .with_series(Series::new(
            "Empresas",
            vec![
                DataPoint::category("Lucro", outcome.profitable.len() as f64),
                DataPoint::category("Prejuízo", outcome.loss_making.len() as f64),
            ],
        ));
    section.push(Block::Chart(chart));

    if !outcome.unreported.is_empty() {
        section.push(Block::info(format!(
            "Sem resultado informado: {}.",
            outcome.unreported.join(", ")
        )));
    }
    section
}

fn evolution_section(ctx: &PageContext<'_>, period: &[CompanyRecord]) -> Section {
    let title = "Evolução de lucros e prejuízos";
    let rows = evolution(period, &ctx.config.years());
    if rows.is_empty() {
        return ctx.no_data(title, ctx.state());
    }

    let mut table = Table::new(["Ano", "Lucro", "Prejuízo", "% Lucro", "% Prejuízo"]);
    let mut profit = Vec::new();
    let mut loss = Vec::new();
    for row in &rows {
        table.push(vec![
            Cell::Year(row.year),
            Cell::Count(row.profit_count),
            Cell::Count(row.loss_count),
            Cell::Percent(row.profit_percentage),
            Cell::Percent(row.loss_percentage),
        ]);
        profit.push(DataPoint::category(row.year.to_string(), row.profit_count as f64));
        loss.push(DataPoint::category(row.year.to_string(), row.loss_count as f64));
    }
    let chart = Chart::new(ChartKind::Line, title)
        .axes("Ano", "Número de empresas")
        .with_series(Series::new("Lucro", profit))
        .with_series(Series::new("Prejuízo", loss));

    Section::new(title)
        .with(Block::Table(table))
        .with(Block::Chart(chart))
}

fn equity_section(ctx: &PageContext<'_>, focus: &[CompanyRecord]) -> Section {
    let title = format!("Patrimônio líquido e resultado em {}", ctx.config.focus_year);
    if let Some(section) = ctx.missing_columns(&title, &PROFITABILITY_COLUMNS) {
        return section;
    }
    let points = equity_vs_result(focus);
    if points.is_empty() {
        return ctx.no_data(&title, &format!("{} em {}", ctx.state(), ctx.config.focus_year));
    }

    let summary = equity_summary(&points);
    let named = |entry: &Option<(String, f64)>| {
        entry
            .as_ref()
            .map_or(Cell::Missing, |(company, _)| Cell::text(company))
    };
    let metrics = vec![
        Metric::new("Patrimônio líquido médio", Cell::money(summary.mean_equity)),
        Metric::new("Maior patrimônio líquido", named(&summary.largest_equity)),
        Metric::new("Lucro médio", Cell::money(summary.mean_profit)),
        Metric::new("Maior lucro", named(&summary.largest_profit)),
    ];

    let chart = Chart::new(ChartKind::Scatter, title.clone())
        .axes("Patrimônio líquido (R$)", "Lucro/prejuízo (R$)")
        .with_series(Series::new(
            "Empresas",
            points
                .iter()
                .map(|p| DataPoint::xy(p.net_equity, p.profit, &p.company))
                .collect(),
        ));

    Section::new(title)
        .with(Block::metrics(metrics))
        .with(Block::Chart(chart))
}

fn company_profitability(ctx: &PageContext<'_>, focus: &[CompanyRecord]) -> Section {
    let title = format!("Rentabilidade por empresa em {}", ctx.config.focus_year);
    if let Some(section) = ctx.missing_columns(&title, &PROFITABILITY_COLUMNS) {
        return section;
    }
    let companies = profitability::by_company(focus);
    if companies.is_empty() {
        return ctx.no_data(&title, "empresas com patrimônio líquido positivo");
    }

    let mut table = Table::new(["Empresa", "Setor", "Rentabilidade", "Situação"]);
    for c in &companies {
        table.push(vec![
            Cell::text(&c.company),
            Cell::opt_text(c.sector.as_deref()),
            Cell::Percent(c.ratio),
            Cell::text(c.status.label()),
        ]);
    }
    let [positive, negative] = [ProfitabilityStatus::Positive, ProfitabilityStatus::Negative]
        .map(|status| {
            companies
                .iter()
                .filter(|c| c.status == status)
                .map(|c| DataPoint::category(&c.company, c.ratio))
                .collect_vec()
        });
    let chart = Chart::new(ChartKind::HorizontalBar, title.clone())
        .axes("Rentabilidade (%)", "Empresa")
        .with_series(Series::new(ProfitabilityStatus::Positive.label(), positive))
        .with_series(Series::new(ProfitabilityStatus::Negative.label(), negative));

    let summary = profitability::summary(focus);
    Section::new(title)
        .with(Block::metrics(vec![
            Metric::new("Rentabilidade média", Cell::percent(summary.mean)),
            Metric::new("Média das positivas", Cell::percent(summary.positive_mean)),
            Metric::new("Média das negativas", Cell::percent(summary.negative_mean)),
            Metric::new("Empresas desconsideradas", Cell::Count(summary.excluded)),
        ]))
        .with(Block::Table(table))
        .with(Block::Chart(chart))
}

fn sector_profitability(ctx: &PageContext<'_>, focus: &[CompanyRecord]) -> Section {
    let title = format!("Rentabilidade por setor em {}", ctx.config.focus_year);
    let mut required = PROFITABILITY_COLUMNS.to_vec();
    required.push(columns::SECTOR);
    if let Some(section) = ctx.missing_columns(&title, &required) {
        return section;
    }
    let sectors = profitability::by_sector(focus);
    if sectors.is_empty() {
        return ctx.no_data(&title, "setores com patrimônio líquido positivo");
    }

    let mut table = Table::new([
        "Setor",
        "Rentabilidade média",
        "Lucro total",
        "Patrimônio total",
        "Empresas",
    ]);
    for s in &sectors {
        table.push(vec![
            Cell::text(&s.sector),
            Cell::Percent(s.mean),
            Cell::Money(s.total_profit),
            Cell::Money(s.total_equity),
            Cell::text(s.companies.join(", ")),
        ]);
    }
    let (positive, negative) = sector_signs(&sectors);
    let chart = Chart::new(ChartKind::HorizontalBar, title.clone())
        .axes("Rentabilidade média (%)", "Setor")
        .with_series(Series::new(
            "Rentabilidade",
            sectors
                .iter()
                .map(|s| DataPoint::category(&s.sector, s.mean))
                .collect(),
        ));

    Section::new(title)
        .with(Block::metrics(vec![
            Metric::new("Setores com rentabilidade positiva", Cell::Count(positive)),
            Metric::new("Setores com rentabilidade negativa", Cell::Count(negative)),
        ]))
        .with(Block::Table(table))
        .with(Block::Chart(chart))
}
