//! "Governança das empresas"

use itertools::Itertools;

use crate::algorithm::governance::{
    combination_distribution, occupied_combinations, structure_by_dependency, structure_presence,
};
use crate::algorithm::profitability::{by_combination, partition};
use crate::error::Result;
use crate::filter::state_year_filter;
use crate::models::CompanyRecord;
use crate::report::format::count_with_share;
use crate::report::model::{
    Block, Cell, Chart, ChartKind, DataPoint, Metric, Section, Series, Table,
};
use crate::report::pages::{PROFITABILITY_COLUMNS, PageContext};
use crate::schema::columns;

const GOVERNANCE_COLUMNS: [&str; 3] = [
    columns::BOARD,
    columns::FISCAL_COUNCIL,
    columns::AUDIT_COMMITTEE,
];

pub(super) fn build(ctx: &PageContext<'_>) -> Result<Vec<Section>> {
    let year = ctx.config.focus_year;
    let records = ctx
        .dataset
        .select_where(state_year_filter(ctx.state(), year))?;
    if records.is_empty() {
        return Ok(vec![ctx.no_data(
            "Governança das empresas",
            &format!("{} em {year}", ctx.state()),
        )]);
    }

    Ok(vec![
        presence(ctx, &records),
        combinations(ctx, &records),
        by_dependency(ctx, &records),
        profitability(ctx, &records),
    ])
}

fn presence(ctx: &PageContext<'_>, records: &[CompanyRecord]) -> Section {
    let title = "Estruturas de governança";
    if let Some(section) = ctx.missing_columns(title, &GOVERNANCE_COLUMNS) {
        return section;
    }

    let presence = structure_presence(records);
    let mut table = Table::new(["Estrutura", "Empresas", "Percentual"]);
    let mut points = Vec::new();
    let mut metrics = vec![Metric::new("Total de empresas", Cell::Count(records.len()))];
    for p in &presence {
        table.push(vec![
            Cell::text(p.structure.name()),
            Cell::Count(p.count),
            Cell::percent(p.percentage),
        ]);
        points.push(DataPoint::category(p.structure.label(), p.count as f64));
        metrics.push(Metric::new(p.structure.label(), Cell::percent(p.percentage)));
    }

    let chart = Chart::new(ChartKind::Bar, "Empresas por estrutura de governança")
        .axes("Estrutura", "Número de empresas")
        .with_series(Series::new("Empresas", points));
    Section::new(title)
        .with(Block::metrics(metrics))
        .with(Block::Table(table))
        .with(Block::Chart(chart))
}

fn combinations(ctx: &PageContext<'_>, records: &[CompanyRecord]) -> Section {
    let title = "Combinações de estruturas";
    if let Some(section) = ctx.missing_columns(title, &GOVERNANCE_COLUMNS) {
        return section;
    }

    let distribution = combination_distribution(records);
    let mut table = Table::new(["Combinação", "Empresas", "Percentual", "Lista de empresas"]);
    for group in occupied_combinations(&distribution) {
        table.push(vec![
            Cell::text(group.combination.label()),
            Cell::Count(group.count),
            Cell::percent(group.percentage),
            Cell::text(group.companies.join(", ")),
        ]);
    }
    let points = distribution
        .iter()
        .map(|g| DataPoint::category(g.combination.label(), g.count as f64))
        .collect_vec();
    let chart = Chart::new(ChartKind::Pie, "Distribuição das combinações")
        .with_series(Series::new("Empresas", points));

    Section::new(title)
        .with(Block::narrative(
            "CA: Conselho de Administração; CF: Conselho Fiscal; COAUD: Comitê de Auditoria.",
        ))
        .with(Block::Table(table))
        .with(Block::Chart(chart))
}

fn by_dependency(ctx: &PageContext<'_>, records: &[CompanyRecord]) -> Section {
    let title = "Estruturas por dependência";
    let mut required = GOVERNANCE_COLUMNS.to_vec();
    required.push(columns::DEPENDENCY);
    if let Some(section) = ctx.missing_columns(title, &required) {
        return section;
    }

    let rows = structure_by_dependency(records);
    let mut table = Table::new(["Estrutura", "Dependentes", "Não Dependentes", "Total"]);
    let mut dependent = Vec::new();
    let mut non_dependent = Vec::new();
    for row in &rows {
        table.push(vec![
            Cell::text(row.structure.label()),
            Cell::text(count_with_share(row.dependent.count, row.dependent.percentage)),
            Cell::text(count_with_share(
                row.non_dependent.count,
                row.non_dependent.percentage,
            )),
            Cell::text(count_with_share(row.combined.count, row.combined.percentage)),
        ]);
        dependent.push(DataPoint::category(
            row.structure.label(),
            row.dependent.percentage.unwrap_or(0.0),
        ));
        non_dependent.push(DataPoint::category(
            row.structure.label(),
            row.non_dependent.percentage.unwrap_or(0.0),
        ));
    }

    let chart = Chart::new(ChartKind::Bar, "Presença das estruturas por dependência")
        .axes("Estrutura", "Percentual de empresas")
        .with_series(Series::new("Dependente", dependent))
        .with_series(Series::new("Não Dependente", non_dependent));

    let (dependent_total, non_dependent_total) = rows
        .first()
        .map_or((0, 0), |r| (r.dependent.total, r.non_dependent.total));
    Section::new(title)
        .with(Block::metrics(vec![
            Metric::new("Empresas dependentes", Cell::Count(dependent_total)),
            Metric::new("Empresas não dependentes", Cell::Count(non_dependent_total)),
            Metric::new(
                "Total geral",
                Cell::Count(dependent_total + non_dependent_total),
            ),
        ]))
        .with(Block::Table(table))
        .with(Block::Chart(chart))
}

fn profitability(ctx: &PageContext<'_>, records: &[CompanyRecord]) -> Section {
    let title = "Rentabilidade por combinação de governança";
    let mut required = GOVERNANCE_COLUMNS.to_vec();
    required.extend(PROFITABILITY_COLUMNS);
    if let Some(section) = ctx.missing_columns(title, &required) {
        return section;
    }

    let groups = by_combination(records);
    let mut table = Table::new(["Combinação", "Empresas consideradas", "Rentabilidade média"]);
    let mut points = Vec::new();
    for group in &groups {
        table.push(vec![
            Cell::text(group.combination.label()),
            Cell::Count(group.companies),
            Cell::percent(group.mean),
        ]);
        if let Some(mean) = group.mean {
            points.push(DataPoint::category(group.combination.label(), mean));
        }
    }
    let chart = Chart::new(ChartKind::Bar, title)
        .axes("Combinação", "Rentabilidade média (%)")
        .with_series(Series::new("Rentabilidade", points));

    let mut section = Section::new(title)
        .with(Block::narrative(
            "Rentabilidade = lucro ÷ patrimônio líquido × 100, apenas para empresas com patrimônio líquido positivo.",
        ))
        .with(Block::Table(table))
        .with(Block::Chart(chart));

    let excluded = partition(records).excluded;
    if !excluded.is_empty() {
        let list = excluded
            .iter()
            .map(|e| format!("{} ({})", e.company, e.reason.label()))
            .join("; ");
        section.push(Block::info(format!("Empresas desconsideradas: {list}.")));
    }
    section
}
