//! Profitability of companies: profit as a percentage of net equity
//!
//! Only records with positive net equity and a reported profit take part.
//! Groups without qualifying members report `None` instead of a number.

use std::collections::BTreeSet;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::algorithm::mean;
use crate::models::{CompanyRecord, GovernanceCombination};

/// Why a record was left out of profitability figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExclusionReason {
    NonPositiveEquity,
    MissingFigures,
}

impl ExclusionReason {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NonPositiveEquity => "patrimônio líquido não positivo",
            Self::MissingFigures => "lucro ou patrimônio não informado",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exclusion {
    pub company: String,
    pub year: i32,
    pub reason: ExclusionReason,
}

/// A record that qualifies, with its ratio
#[derive(Debug, Clone, Copy)]
pub struct Qualified<'a> {
    pub record: &'a CompanyRecord,
    pub ratio: f64,
}

/// Records split into those with a defined ratio and those excluded
#[derive(Debug, Clone, Default)]
pub struct Population<'a> {
    pub included: Vec<Qualified<'a>>,
    pub excluded: Vec<Exclusion>,
}

/// Split records by whether their profitability is defined
#[must_use]
pub fn partition(records: &[CompanyRecord]) -> Population<'_> {
    let mut population = Population::default();
    for record in records {
        let reason = match (record.profit, record.net_equity) {
            (Some(_), Some(equity)) if equity > 0.0 => None,
            (Some(_), Some(_)) => Some(ExclusionReason::NonPositiveEquity),
            (_, Some(equity)) if equity <= 0.0 => Some(ExclusionReason::NonPositiveEquity),
            _ => Some(ExclusionReason::MissingFigures),
        };
        match (reason, record.profitability()) {
            (None, Some(ratio)) => population.included.push(Qualified { record, ratio }),
            (reason, _) => population.excluded.push(Exclusion {
                company: record.company.clone(),
                year: record.year,
                reason: reason.unwrap_or(ExclusionReason::MissingFigures),
            }),
        }
    }
    population
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationProfitability {
    pub combination: GovernanceCombination,
    pub companies: usize,
    pub mean: Option<f64>,
}

/// Mean profitability per governance combination, all eight in canonical order
#[must_use]
pub fn by_combination(records: &[CompanyRecord]) -> Vec<CombinationProfitability> {
    let population = partition(records);
    let mut groups: FxHashMap<GovernanceCombination, Vec<f64>> = FxHashMap::default();
    for q in &population.included {
        groups
            .entry(q.record.governance.combination())
            .or_default()
            .push(q.ratio);
    }

    GovernanceCombination::ALL
        .iter()
        .map(|&combination| {
            let ratios = groups.remove(&combination).unwrap_or_default();
            CombinationProfitability {
                combination,
                companies: ratios.len(),
                mean: mean(ratios),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorProfitability {
    pub sector: String,
    pub mean: f64,
    pub total_profit: f64,
    pub total_equity: f64,
    pub companies: Vec<String>,
}

/// Mean profitability per sector, ascending; sectorless records are dropped
#[must_use]
pub fn by_sector(records: &[CompanyRecord]) -> Vec<SectorProfitability> {
    let population = partition(records);
    let mut groups: FxHashMap<&str, Vec<Qualified<'_>>> = FxHashMap::default();
    for q in population.included {
        if let Some(sector) = q.record.sector.as_deref() {
            groups.entry(sector).or_default().push(q);
        }
    }

    groups
        .into_iter()
        .filter_map(|(sector, members)| {
            let companies: BTreeSet<String> =
                members.iter().map(|q| q.record.company.clone()).collect();
            Some(SectorProfitability {
                sector: sector.to_string(),
                mean: mean(members.iter().map(|q| q.ratio))?,
                total_profit: members.iter().filter_map(|q| q.record.profit).sum(),
                total_equity: members.iter().filter_map(|q| q.record.net_equity).sum(),
                companies: companies.into_iter().collect(),
            })
        })
        .sorted_by(|a, b| a.mean.total_cmp(&b.mean).then_with(|| a.sector.cmp(&b.sector)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProfitabilityStatus {
    Positive,
    Negative,
}

impl ProfitabilityStatus {
    #[must_use]
    pub fn of(ratio: f64) -> Self {
        if ratio >= 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "Rentabilidade Positiva",
            Self::Negative => "Rentabilidade Negativa",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyProfitability {
    pub company: String,
    pub sector: Option<String>,
    pub ratio: f64,
    pub status: ProfitabilityStatus,
}

/// Profitability per company (mean over its qualifying records), ascending
#[must_use]
pub fn by_company(records: &[CompanyRecord]) -> Vec<CompanyProfitability> {
    let population = partition(records);
    let mut groups: FxHashMap<&str, (Option<&str>, Vec<f64>)> = FxHashMap::default();
    for q in &population.included {
        let entry = groups
            .entry(q.record.company.as_str())
            .or_insert_with(|| (q.record.sector.as_deref(), Vec::new()));
        entry.1.push(q.ratio);
    }

    groups
        .into_iter()
        .filter_map(|(company, (sector, ratios))| {
            let ratio = mean(ratios)?;
            Some(CompanyProfitability {
                company: company.to_string(),
                sector: sector.map(str::to_string),
                ratio,
                status: ProfitabilityStatus::of(ratio),
            })
        })
        .sorted_by(|a, b| a.ratio.total_cmp(&b.ratio).then_with(|| a.company.cmp(&b.company)))
        .collect()
}

/// Overall figures for a population
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProfitabilitySummary {
    pub mean: Option<f64>,
    pub positive_mean: Option<f64>,
    pub negative_mean: Option<f64>,
    pub included: usize,
    pub excluded: usize,
}

#[must_use]
pub fn summary(records: &[CompanyRecord]) -> ProfitabilitySummary {
    let population = partition(records);
    let ratios = population.included.iter().map(|q| q.ratio).collect_vec();
    ProfitabilitySummary {
        mean: mean(ratios.iter().copied()),
        positive_mean: mean(ratios.iter().copied().filter(|r| *r > 0.0)),
        negative_mean: mean(ratios.iter().copied().filter(|r| *r < 0.0)),
        included: ratios.len(),
        excluded: population.excluded.len(),
    }
}

/// Number of sectors with a positive and with a negative mean
#[must_use]
pub fn sector_signs(sectors: &[SectorProfitability]) -> (usize, usize) {
    let positive = sectors.iter().filter(|s| s.mean > 0.0).count();
    let negative = sectors.iter().filter(|s| s.mean < 0.0).count();
    (positive, negative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyStatus, GovernanceFlags};

    fn record(company: &str, sector: &str, flags: (bool, bool, bool), pl: f64, profit: f64) -> CompanyRecord {
        CompanyRecord {
            state: "DF".into(),
            year: 2023,
            company: company.into(),
            status: CompanyStatus::Active,
            sector: Some(sector.into()),
            legal_nature: None,
            dependency: None,
            governance: GovernanceFlags::new(flags.0, flags.1, flags.2),
            net_equity: Some(pl),
            profit: Some(profit),
            shareholder_result: None,
        }
    }

    fn sample() -> Vec<CompanyRecord> {
        vec![
            record("A", "Energia", (true, true, false), 500.0, -50.0),
            record("B", "Saneamento", (true, true, false), 2000.0, 100.0),
            record("C", "Financeiro", (true, true, true), 1000.0, 150.0),
            record("D", "Rural", (false, false, false), -100.0, 50.0),
        ]
    }

    #[test]
    fn negative_equity_is_excluded_everywhere() {
        let records = sample();
        let population = partition(&records);
        assert_eq!(population.included.len(), 3);
        assert_eq!(population.excluded[0].reason, ExclusionReason::NonPositiveEquity);
        assert!(population.included.iter().all(|q| q.record.net_equity.unwrap() > 0.0));
        assert!(by_sector(&records).iter().all(|s| s.sector != "Rural"));
        assert!(by_company(&records).iter().all(|c| c.company != "D"));
    }

    #[test]
    fn empty_combination_has_no_mean() {
        let groups = by_combination(&sample());
        assert_eq!(groups.len(), 8);
        assert_eq!(groups[0].combination.label(), "CA,CF,COAUD");
        assert!((groups[0].mean.unwrap() - 15.0).abs() < 1e-9);
        assert!((groups[1].mean.unwrap() - (-2.5)).abs() < 1e-9);
        let none = groups.iter().find(|g| g.combination == GovernanceCombination::None).unwrap();
        assert_eq!(none.companies, 0);
        assert_eq!(none.mean, None);
    }

    #[test]
    fn sectors_sorted_ascending() {
        let sectors = by_sector(&sample());
        let names = sectors.iter().map(|s| s.sector.as_str()).collect_vec();
        assert_eq!(names, vec!["Energia", "Saneamento", "Financeiro"]);
        assert_eq!(sector_signs(&sectors), (2, 1));
    }

    #[test]
    fn summary_splits_signs() {
        let s = summary(&sample());
        assert_eq!(s.included, 3);
        assert_eq!(s.excluded, 1);
        assert!((s.positive_mean.unwrap() - 10.0).abs() < 1e-9);
        assert!((s.negative_mean.unwrap() - (-10.0)).abs() < 1e-9);
        assert_eq!(summary(&[]).mean, None);
    }
}
