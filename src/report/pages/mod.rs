//! The six pages of the panel

mod companies;
mod governance;
mod government;
mod home;
mod results;
mod states;

use std::str::FromStr;

use serde::Serialize;

pub use states::comparison_records;

use crate::config::PanelConfig;
use crate::dataset::Dataset;
use crate::error::{PanelError, Result};
use crate::report::model::{PageReport, Section};
use crate::schema::columns;

/// A page of the panel, addressed by its slug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Companies,
    Governance,
    Results,
    Government,
    States,
}

impl Page {
    pub const ALL: [Self; 6] = [
        Self::Home,
        Self::Companies,
        Self::Governance,
        Self::Results,
        Self::Government,
        Self::States,
    ];

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Companies => "companies",
            Self::Governance => "governance",
            Self::Results => "results",
            Self::Government => "government",
            Self::States => "states",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Painel das Estatais",
            Self::Companies => "Quais são as estatais",
            Self::Governance => "Governança das empresas",
            Self::Results => "Resultado financeiro das estatais",
            Self::Government => "Resultado financeiro para o governo",
            Self::States => "Comparativo com outros estados",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Home => "Apresentação do painel e das páginas disponíveis.",
            Self::Companies => "Empresas, situação, setor e dependência ao longo dos anos.",
            Self::Governance => {
                "Conselho de Administração, Conselho Fiscal e Comitê de Auditoria, e a rentabilidade por combinação."
            }
            Self::Results => "Lucros, prejuízos, patrimônio líquido e rentabilidade.",
            Self::Government => "Resultado para o estado como acionista controlador.",
            Self::States => "Quantidade de empresas e resultados comparados entre estados.",
        }
    }
}

impl FromStr for Page {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.slug() == s)
            .ok_or_else(|| PanelError::config(format!("unknown page '{s}'")))
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Build one page from the dataset
///
/// # Errors
/// Returns an error only when the dataset itself cannot be read; missing
/// columns and empty selections become warning notices
pub fn build_page(page: Page, dataset: &Dataset, config: &PanelConfig) -> Result<PageReport> {
    log::debug!("Building page '{page}'");
    let ctx = PageContext { dataset, config };
    let sections = match page {
        Page::Home => home::build(&ctx)?,
        Page::Companies => companies::build(&ctx)?,
        Page::Governance => governance::build(&ctx)?,
        Page::Results => results::build(&ctx)?,
        Page::Government => government::build(&ctx)?,
        Page::States => states::build(&ctx)?,
    };
    Ok(PageReport {
        slug: page.slug().to_string(),
        title: page.title().to_string(),
        sections,
    })
}

/// Build every page in order
///
/// # Errors
/// Returns the first page error
pub fn build_all(dataset: &Dataset, config: &PanelConfig) -> Result<Vec<PageReport>> {
    Page::ALL
        .into_iter()
        .map(|page| build_page(page, dataset, config))
        .collect()
}

pub(crate) struct PageContext<'a> {
    pub dataset: &'a Dataset,
    pub config: &'a PanelConfig,
}

impl PageContext<'_> {
    /// A warning section when any of `required` is absent from the source
    pub fn missing_columns(&self, title: &str, required: &[&str]) -> Option<Section> {
        let missing = self.dataset.availability().first_missing(required)?;
        log::warn!("Section '{title}' skipped: column '{missing}' not found");
        Some(Section::warning(
            title,
            format!("Coluna '{missing}' não encontrada nos dados."),
        ))
    }

    /// A warning section for an empty selection
    pub fn no_data(&self, title: &str, detail: &str) -> Section {
        log::warn!("Section '{title}' has no data: {detail}");
        Section::warning(title, format!("Nenhum dado disponível para {detail}."))
    }

    pub fn state(&self) -> &str {
        &self.config.state
    }
}

/// Columns every profitability section needs
pub(crate) const PROFITABILITY_COLUMNS: [&str; 2] = [columns::NET_EQUITY, columns::PROFIT];
