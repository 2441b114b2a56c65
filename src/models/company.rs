//! The company-year record and its decoding from Arrow batches

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::governance::GovernanceFlags;
use crate::utils::log_warning;

/// Label used wherever a dependency class is missing
pub const UNKNOWN_DEPENDENCY: &str = "Não Informado";

/// Operating status of a company
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum CompanyStatus {
    Active,
    InLiquidation,
    Other(String),
    Unknown,
}

impl CompanyStatus {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
            return Self::Unknown;
        };
        let lower = text.to_lowercase();
        if lower.contains("liquida") {
            Self::InLiquidation
        } else if lower.starts_with("ativ") {
            Self::Active
        } else {
            Self::Other(text.to_string())
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Active => "Ativa",
            Self::InLiquidation => "Em liquidação",
            Self::Other(text) => text,
            Self::Unknown => "Não Informado",
        }
    }
}

/// Fiscal dependency on the state treasury
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Dependency {
    Dependent,
    NonDependent,
}

impl Dependency {
    pub const ALL: [Self; 2] = [Self::Dependent, Self::NonDependent];

    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let normalized = raw?.trim().to_uppercase();
        match normalized.as_str() {
            "DEPENDENTE" => Some(Self::Dependent),
            "NÃO DEPENDENTE" | "NAO DEPENDENTE" => Some(Self::NonDependent),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dependent => "Dependente",
            Self::NonDependent => "Não Dependente",
        }
    }

    /// Label for an optional class, with missing values grouped together
    #[must_use]
    pub fn label_or_unknown(dependency: Option<Self>) -> &'static str {
        dependency.map_or(UNKNOWN_DEPENDENCY, Self::label)
    }
}

/// A row exactly as stored in the panel schema
#[derive(Debug, Clone, Deserialize)]
pub struct RawCompanyRow {
    #[serde(rename = "Estado")]
    pub state: Option<String>,
    #[serde(rename = "Ano")]
    pub year: Option<i64>,
    #[serde(rename = "emp")]
    pub company: Option<String>,
    #[serde(rename = "sit")]
    pub status: Option<String>,
    #[serde(rename = "setor")]
    pub sector: Option<String>,
    #[serde(rename = "esp")]
    pub legal_nature: Option<String>,
    #[serde(rename = "dep")]
    pub dependency: Option<String>,
    #[serde(rename = "gov_ca")]
    pub board: Option<String>,
    #[serde(rename = "gov_cf")]
    pub fiscal_council: Option<String>,
    #[serde(rename = "gov_aud")]
    pub audit_committee: Option<String>,
    #[serde(rename = "PL")]
    pub net_equity: Option<f64>,
    #[serde(rename = "lucros")]
    pub profit: Option<f64>,
    #[serde(rename = "Resultado para o Estado Acionista")]
    pub shareholder_result: Option<f64>,
}

/// One company in one state and year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyRecord {
    pub state: String,
    pub year: i32,
    pub company: String,
    pub status: CompanyStatus,
    pub sector: Option<String>,
    pub legal_nature: Option<String>,
    pub dependency: Option<Dependency>,
    pub governance: GovernanceFlags,
    pub net_equity: Option<f64>,
    pub profit: Option<f64>,
    pub shareholder_result: Option<f64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl TryFrom<RawCompanyRow> for CompanyRecord {
    type Error = &'static str;

    fn try_from(row: RawCompanyRow) -> std::result::Result<Self, Self::Error> {
        let state = non_empty(row.state).ok_or("missing state")?;
        let company = non_empty(row.company).ok_or("missing company")?;
        let year = row
            .year
            .ok_or("missing year")
            .and_then(|y| i32::try_from(y).map_err(|_| "year out of range"))?;

        Ok(Self {
            state,
            year,
            company,
            status: CompanyStatus::parse(row.status.as_deref()),
            sector: non_empty(row.sector),
            legal_nature: non_empty(row.legal_nature),
            dependency: Dependency::parse(row.dependency.as_deref()),
            governance: GovernanceFlags::from_answers(
                row.board.as_deref(),
                row.fiscal_council.as_deref(),
                row.audit_committee.as_deref(),
            ),
            net_equity: finite(row.net_equity),
            profit: finite(row.profit),
            shareholder_result: finite(row.shareholder_result),
        })
    }
}

impl CompanyRecord {
    /// Key identifying the record across the dataset
    #[must_use]
    pub fn key(&self) -> (&str, &str, i32) {
        (&self.state, &self.company, self.year)
    }

    /// Profit as a percentage of net equity; only defined for positive equity
    #[must_use]
    pub fn profitability(&self) -> Option<f64> {
        match (self.profit, self.net_equity) {
            (Some(profit), Some(equity)) if equity > 0.0 => Some(profit / equity * 100.0),
            _ => None,
        }
    }

    #[must_use]
    pub fn dependency_label(&self) -> &'static str {
        Dependency::label_or_unknown(self.dependency)
    }
}

/// Decode a batch adapted to the panel schema into records
///
/// Rows that cannot be keyed are skipped with a warning.
///
/// # Errors
/// Returns an error if the batch does not match the panel schema
pub fn decode_batch(batch: &RecordBatch) -> Result<Vec<CompanyRecord>> {
    let rows: Vec<RawCompanyRow> = serde_arrow::from_record_batch(batch)?;

    let mut records = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        match CompanyRecord::try_from(row) {
            Ok(record) => records.push(record),
            Err(reason) => log_warning(&format!("Skipping row {idx}: {reason}"), None),
        }
    }
    Ok(records)
}
