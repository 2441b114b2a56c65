//! Result attributable to the state as controlling shareholder
//!
//! Positive totals mean the state received more (dividends) than it put in
//! (capital injections, subsidies).

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::algorithm::{count_percentage, mean};
use crate::models::{CompanyRecord, Dependency};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyResult {
    pub company: String,
    pub sector: Option<String>,
    pub result: f64,
}

/// Results of every company in one year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearResults {
    /// Companies sorted by result, ascending
    pub companies: Vec<CompanyResult>,
    pub total: f64,
    pub positive_count: usize,
    pub negative_count: usize,
    pub positive_share: Option<f64>,
    pub negative_share: Option<f64>,
    /// Largest positive result
    pub best: Option<CompanyResult>,
    /// Most negative result
    pub worst: Option<CompanyResult>,
}

/// Results of the given records, which should all belong to one year
#[must_use]
pub fn year_results(records: &[CompanyRecord]) -> YearResults {
    let companies = records
        .iter()
        .filter_map(|r| {
            Some(CompanyResult {
                company: r.company.clone(),
                sector: r.sector.clone(),
                result: r.shareholder_result?,
            })
        })
        .sorted_by(|a, b| a.result.total_cmp(&b.result).then_with(|| a.company.cmp(&b.company)))
        .collect_vec();

    let positive_count = companies.iter().filter(|c| c.result > 0.0).count();
    let negative_count = companies.iter().filter(|c| c.result < 0.0).count();
    let best = companies.last().filter(|c| c.result > 0.0).cloned();
    let worst = companies.first().filter(|c| c.result < 0.0).cloned();

    YearResults {
        total: companies.iter().map(|c| c.result).sum(),
        positive_count,
        negative_count,
        positive_share: count_percentage(positive_count, companies.len()),
        negative_share: count_percentage(negative_count, companies.len()),
        best,
        worst,
        companies,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccumulatedCompany {
    pub company: String,
    pub sector: Option<String>,
    pub dependency: Option<Dependency>,
    pub total: f64,
    pub years: usize,
}

/// Result summed per company over every record, ascending
///
/// Companies without a single reported value are left out.
#[must_use]
pub fn accumulate_by_company(records: &[CompanyRecord]) -> Vec<AccumulatedCompany> {
    let mut groups: FxHashMap<&str, AccumulatedCompany> = FxHashMap::default();
    for record in records {
        let Some(value) = record.shareholder_result else {
            continue;
        };
        let entry = groups
            .entry(record.company.as_str())
            .or_insert_with(|| AccumulatedCompany {
                company: record.company.clone(),
                sector: None,
                dependency: None,
                total: 0.0,
                years: 0,
            });
        entry.total += value;
        entry.years += 1;
        if entry.sector.is_none() {
            entry.sector.clone_from(&record.sector);
        }
        if entry.dependency.is_none() {
            entry.dependency = record.dependency;
        }
    }

    groups
        .into_values()
        .sorted_by(|a, b| a.total.total_cmp(&b.total).then_with(|| a.company.cmp(&b.company)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorResult {
    pub sector: String,
    pub total: f64,
    pub companies: Vec<String>,
}

/// Result summed per sector with its distinct companies, ascending
#[must_use]
pub fn accumulate_by_sector(records: &[CompanyRecord]) -> Vec<SectorResult> {
    let mut groups: BTreeMap<&str, (f64, BTreeSet<&str>)> = BTreeMap::new();
    for record in records {
        let (Some(sector), Some(value)) = (record.sector.as_deref(), record.shareholder_result)
        else {
            continue;
        };
        let entry = groups.entry(sector).or_default();
        entry.0 += value;
        entry.1.insert(record.company.as_str());
    }

    groups
        .into_iter()
        .map(|(sector, (total, companies))| SectorResult {
            sector: sector.to_string(),
            total,
            companies: companies.into_iter().map(str::to_string).collect(),
        })
        .sorted_by(|a, b| a.total.total_cmp(&b.total))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyResult {
    pub dependency: Option<Dependency>,
    pub total: f64,
    pub companies: Vec<String>,
    pub sectors: Vec<String>,
}

impl DependencyResult {
    #[must_use]
    pub fn label(&self) -> &'static str {
        Dependency::label_or_unknown(self.dependency)
    }
}

/// Result summed per dependency class; the unknown class is its own group
#[must_use]
pub fn accumulate_by_dependency(records: &[CompanyRecord]) -> Vec<DependencyResult> {
    let mut groups: BTreeMap<Option<Dependency>, (f64, BTreeSet<&str>, BTreeSet<&str>)> =
        BTreeMap::new();
    for record in records {
        let Some(value) = record.shareholder_result else {
            continue;
        };
        let entry = groups.entry(record.dependency).or_default();
        entry.0 += value;
        entry.1.insert(record.company.as_str());
        if let Some(sector) = record.sector.as_deref() {
            entry.2.insert(sector);
        }
    }

    groups
        .into_iter()
        .map(|(dependency, (total, companies, sectors))| DependencyResult {
            dependency,
            total,
            companies: companies.into_iter().map(str::to_string).collect(),
            sectors: sectors.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearResult {
    pub year: i32,
    pub total: f64,
    /// Difference from the previous year in the series
    pub change: Option<f64>,
    /// Change relative to the magnitude of the previous year; undefined after a zero year.
    ///
    /// Unlike a plain percent change this divides by `|previous|`, so a loss
    /// shrinking from -100 to -50 reads as +50% rather than -50%.
    pub change_percentage: Option<f64>,
}

/// Result summed per year, ascending, with year-over-year change
///
/// Only years with at least one reported value appear.
#[must_use]
pub fn results_by_year(records: &[CompanyRecord]) -> Vec<YearResult> {
    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    for record in records {
        if let Some(value) = record.shareholder_result {
            *totals.entry(record.year).or_default() += value;
        }
    }

    let mut previous: Option<f64> = None;
    totals
        .into_iter()
        .map(|(year, total)| {
            let change = previous.map(|p| total - p);
            let change_percentage = previous
                .filter(|p| *p != 0.0)
                .map(|p| (total - p) / p.abs() * 100.0);
            previous = Some(total);
            YearResult {
                year,
                total,
                change,
                change_percentage,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Improving,
    Deteriorating,
    Stable,
}

impl Trend {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Improving => "Tendência de melhoria",
            Self::Deteriorating => "Tendência de deterioração",
            Self::Stable => "Estável",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub mean_annual: Option<f64>,
    pub best_year: Option<YearResult>,
    pub worst_year: Option<YearResult>,
    /// Last year compared with the first; needs at least two years
    pub trend: Option<Trend>,
    /// Last year's total minus the first year's
    pub difference: Option<f64>,
}

#[must_use]
pub fn period_summary(years: &[YearResult]) -> PeriodSummary {
    let best_year = years
        .iter()
        .max_by(|a, b| a.total.total_cmp(&b.total))
        .cloned();
    let worst_year = years
        .iter()
        .min_by(|a, b| a.total.total_cmp(&b.total))
        .cloned();

    let difference = match (years.first(), years.last()) {
        (Some(first), Some(last)) if years.len() > 1 => Some(last.total - first.total),
        _ => None,
    };
    let trend = difference.map(|d| {
        if d > 0.0 {
            Trend::Improving
        } else if d < 0.0 {
            Trend::Deteriorating
        } else {
            Trend::Stable
        }
    });

    PeriodSummary {
        mean_annual: mean(years.iter().map(|y| y.total)),
        best_year,
        worst_year,
        trend,
        difference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyStatus, GovernanceFlags};

    fn record(company: &str, year: i32, dep: Option<Dependency>, result: Option<f64>) -> CompanyRecord {
        CompanyRecord {
            state: "DF".into(),
            year,
            company: company.into(),
            status: CompanyStatus::Active,
            sector: Some(format!("Setor {company}")),
            legal_nature: None,
            dependency: dep,
            governance: GovernanceFlags::default(),
            net_equity: None,
            profit: None,
            shareholder_result: result,
        }
    }

    fn sample() -> Vec<CompanyRecord> {
        use Dependency::{Dependent, NonDependent};
        vec![
            record("A", 2021, Some(NonDependent), Some(50.0)),
            record("A", 2022, Some(NonDependent), Some(80.0)),
            record("B", 2022, Some(Dependent), Some(-10.0)),
            record("A", 2023, Some(NonDependent), Some(120.0)),
            record("B", 2023, Some(Dependent), Some(-20.0)),
            record("C", 2023, None, None),
        ]
    }

    #[test]
    fn year_results_find_best_and_worst() {
        let in_2023 = sample().into_iter().filter(|r| r.year == 2023).collect_vec();
        let results = year_results(&in_2023);
        assert_eq!(results.companies.len(), 2);
        assert_eq!(results.companies[0].company, "B");
        assert!((results.total - 100.0).abs() < 1e-9);
        assert_eq!(results.best.unwrap().company, "A");
        assert_eq!(results.worst.unwrap().company, "B");
        assert_eq!(results.positive_share, Some(50.0));
    }

    #[test]
    fn companies_without_values_are_not_accumulated() {
        let accumulated = accumulate_by_company(&sample());
        assert_eq!(accumulated.len(), 2);
        assert_eq!(accumulated[0].company, "B");
        assert!((accumulated[1].total - 250.0).abs() < 1e-9);
        assert_eq!(accumulated[1].years, 3);
    }

    #[test]
    fn dependency_and_sector_groups() {
        let by_dep = accumulate_by_dependency(&sample());
        assert_eq!(by_dep.len(), 2);
        assert_eq!(by_dep[0].label(), "Dependente");
        assert!((by_dep[0].total - (-30.0)).abs() < 1e-9);
        assert_eq!(by_dep[1].sectors, vec!["Setor A".to_string()]);

        let by_sector = accumulate_by_sector(&sample());
        assert_eq!(by_sector[0].sector, "Setor B");
        assert_eq!(by_sector[1].companies, vec!["A".to_string()]);
    }

    #[test]
    fn year_over_year_change_and_trend() {
        let years = results_by_year(&sample());
        assert_eq!(years.len(), 3);
        assert_eq!(years[0].change, None);
        assert!((years[1].change.unwrap() - 20.0).abs() < 1e-9);
        assert!((years[1].change_percentage.unwrap() - 40.0).abs() < 1e-9);

        let summary = period_summary(&years);
        assert_eq!(summary.trend, Some(Trend::Improving));
        assert_eq!(summary.best_year.unwrap().year, 2023);
        assert_eq!(summary.worst_year.unwrap().year, 2021);
        assert!((summary.difference.unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn change_after_zero_year_is_undefined() {
        let records = vec![
            record("A", 2022, None, Some(0.0)),
            record("A", 2023, None, Some(10.0)),
        ];
        let years = results_by_year(&records);
        assert_eq!(years[1].change, Some(10.0));
        assert_eq!(years[1].change_percentage, None);
        assert_eq!(period_summary(&years[..1]).trend, None);
    }

    #[test]
    fn shrinking_loss_is_a_positive_change() {
        let records = vec![
            record("A", 2022, None, Some(-100.0)),
            record("A", 2023, None, Some(-50.0)),
        ];
        let years = results_by_year(&records);
        assert!((years[1].change_percentage.unwrap() - 50.0).abs() < 1e-9);
    }
}
