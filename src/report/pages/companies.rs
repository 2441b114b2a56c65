//! "Quais são as estatais": listing and composition over the years

use crate::algorithm::composition::{company_listing, dependency_by_year, sector_by_year};
use crate::error::Result;
use crate::filter::{Expr, state_filter, state_year_filter, year_range_filter};
use crate::models::{CompanyRecord, Dependency};
use crate::report::model::{Block, Cell, Chart, ChartKind, DataPoint, Section, Series, Table};
use crate::report::pages::PageContext;
use crate::schema::columns;

pub(super) fn build(ctx: &PageContext<'_>) -> Result<Vec<Section>> {
    Ok(vec![listing(ctx)?, by_dependency(ctx)?, by_sector(ctx)?])
}

fn listing(ctx: &PageContext<'_>) -> Result<Section> {
    let year = ctx.config.focus_year;
    let title = format!("Empresas estatais de {} em {year}", ctx.state());
    let records = ctx
        .dataset
        .select_where(state_year_filter(ctx.state(), year))?;
    if records.is_empty() {
        return Ok(ctx.no_data(&title, &format!("{} em {year}", ctx.state())));
    }

    let mut table = Table::new(["Empresa", "Situação", "Setor", "Natureza jurídica", "Dependência"]);
    let listing = company_listing(&records);
    for company in &listing {
        table.push(vec![
            Cell::text(&company.company),
            Cell::text(company.status.label()),
            Cell::opt_text(company.sector.as_deref()),
            Cell::opt_text(company.legal_nature.as_deref()),
            Cell::text(Dependency::label_or_unknown(company.dependency)),
        ]);
    }

    let mut section = Section::new(title).with(Block::narrative(format!(
        "{} empresas estatais registradas.",
        listing.len()
    )));
    section.push(Block::Table(table));
    for column in [columns::SECTOR, columns::LEGAL_NATURE, columns::DEPENDENCY] {
        if !ctx.dataset.availability().has(column) {
            section.push(Block::warning(format!(
                "Coluna '{column}' não encontrada nos dados."
            )));
        }
    }
    Ok(section)
}

fn period_records(ctx: &PageContext<'_>) -> Result<Vec<CompanyRecord>> {
    ctx.dataset.select_where(Expr::all([
        state_filter(ctx.state()),
        year_range_filter(ctx.config.first_year, ctx.config.last_year),
    ]))
}

fn by_dependency(ctx: &PageContext<'_>) -> Result<Section> {
    let title = "Empresas dependentes e não dependentes";
    if let Some(section) = ctx.missing_columns(title, &[columns::DEPENDENCY]) {
        return Ok(section);
    }
    let records = period_records(ctx)?;
    let counts = dependency_by_year(&records);
    if counts.is_empty() {
        return Ok(ctx.no_data(title, ctx.state()));
    }

    let mut table = Table::new(["Ano", "Dependência", "Empresas", "Percentual"]);
    let mut chart = Chart::new(ChartKind::StackedBar, title).axes("Ano", "Número de empresas");
    for dependency in Dependency::ALL {
        let mut points = Vec::new();
        for count in counts.iter().filter(|c| c.dependency == dependency) {
            table.push(vec![
                Cell::Year(count.year),
                Cell::text(dependency.label()),
                Cell::Count(count.count),
                Cell::percent(count.percentage),
            ]);
            points.push(DataPoint::category(count.year.to_string(), count.count as f64));
        }
        chart = chart.with_series(Series::new(dependency.label(), points));
    }

    Ok(Section::new(title)
        .with(Block::Table(table))
        .with(Block::Chart(chart)))
}

fn by_sector(ctx: &PageContext<'_>) -> Result<Section> {
    let title = "Empresas por setor";
    if let Some(section) = ctx.missing_columns(title, &[columns::SECTOR]) {
        return Ok(section);
    }
    let records = period_records(ctx)?;
    let grid = sector_by_year(&records);
    if grid.is_empty() {
        return Ok(ctx.no_data(title, ctx.state()));
    }

    let mut table = Table::new(["Ano", "Setor", "Empresas"]);
    for cell in &grid {
        table.push(vec![
            Cell::Year(cell.year),
            Cell::text(&cell.sector),
            Cell::Count(cell.count),
        ]);
    }

    let mut sectors: Vec<&str> = grid.iter().map(|c| c.sector.as_str()).collect();
    sectors.sort_unstable();
    sectors.dedup();
    let mut chart = Chart::new(ChartKind::StackedBar, title).axes("Ano", "Número de empresas");
    for sector in sectors {
        let points = grid
            .iter()
            .filter(|c| c.sector == sector)
            .map(|c| DataPoint::category(c.year.to_string(), c.count as f64))
            .collect();
        chart = chart.with_series(Series::new(sector, points));
    }

    Ok(Section::new(title)
        .with(Block::Table(table))
        .with(Block::Chart(chart)))
}
