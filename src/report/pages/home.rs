use crate::error::Result;
use crate::report::model::{Block, Cell, Metric, Section, Table};
use crate::report::pages::{Page, PageContext};

const INTRODUCTION: &str = "Este painel reúne informações das empresas estatais \
    estaduais entre 2020 e 2023: quem são, como são governadas, quais resultados \
    apresentam e quanto representam para o estado como acionista. Os dados cobrem \
    todas as unidades da federação e permitem comparar o estado em foco com os demais.";

pub(super) fn build(ctx: &PageContext<'_>) -> Result<Vec<Section>> {
    let mut overview = Section::new("Sobre o painel").with(Block::narrative(INTRODUCTION));

    let years = ctx.dataset.years()?;
    let states = ctx.dataset.states()?;
    let period = match (years.first(), years.last()) {
        (Some(first), Some(last)) => Cell::text(format!("{first}–{last}")),
        _ => Cell::Missing,
    };
    overview.push(Block::metrics(vec![
        Metric::new("Registros", Cell::Count(ctx.dataset.num_rows())),
        Metric::new("Estados", Cell::Count(states.len())),
        Metric::new("Período", period),
        Metric::new("Estado em foco", Cell::text(ctx.state())),
    ]));

    let mut pages = Table::new(["Página", "Comando", "Conteúdo"]);
    for page in Page::ALL.into_iter().skip(1) {
        pages.push(vec![
            Cell::text(page.title()),
            Cell::text(page.slug()),
            Cell::text(page.description()),
        ]);
    }
    let navigation = Section::new("Páginas disponíveis").with(Block::Table(pages));

    Ok(vec![overview, navigation])
}
