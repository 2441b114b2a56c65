//! Financial results of the companies: profit, loss and equity

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use crate::algorithm::{count_percentage, mean, round2};
use crate::models::CompanyRecord;

/// Outcome of a company's year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProfitClass {
    Profit,
    Loss,
    Unreported,
}

impl ProfitClass {
    /// Profit above zero is a profit; zero or below is a loss
    #[must_use]
    pub fn of(profit: Option<f64>) -> Self {
        match profit {
            Some(p) if p > 0.0 => Self::Profit,
            Some(_) => Self::Loss,
            None => Self::Unreported,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Profit => "Lucro",
            Self::Loss => "Prejuízo",
            Self::Unreported => "Não Informado",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyProfit {
    pub company: String,
    pub sector: Option<String>,
    pub profit: f64,
}

/// Profitable and loss-making companies of one year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearOutcome {
    pub year: i32,
    pub profitable: Vec<CompanyProfit>,
    pub loss_making: Vec<CompanyProfit>,
    pub unreported: Vec<String>,
}

impl YearOutcome {
    #[must_use]
    pub fn total(&self) -> usize {
        self.profitable.len() + self.loss_making.len() + self.unreported.len()
    }
}

/// Split the records of `year` by outcome; `None` when the year has no records
///
/// Both lists are sorted by profit, largest first.
#[must_use]
pub fn year_outcome(records: &[CompanyRecord], year: i32) -> Option<YearOutcome> {
    let in_year = records.iter().filter(|r| r.year == year).collect_vec();
    if in_year.is_empty() {
        return None;
    }

    let mut outcome = YearOutcome {
        year,
        profitable: Vec::new(),
        loss_making: Vec::new(),
        unreported: Vec::new(),
    };
    for record in in_year {
        let entry = |profit| CompanyProfit {
            company: record.company.clone(),
            sector: record.sector.clone(),
            profit,
        };
        match (ProfitClass::of(record.profit), record.profit) {
            (ProfitClass::Profit, Some(p)) => outcome.profitable.push(entry(p)),
            (ProfitClass::Loss, Some(p)) => outcome.loss_making.push(entry(p)),
            _ => outcome.unreported.push(record.company.clone()),
        }
    }

    let by_profit_desc = |a: &CompanyProfit, b: &CompanyProfit| {
        b.profit
            .total_cmp(&a.profit)
            .then_with(|| a.company.cmp(&b.company))
    };
    outcome.profitable.sort_by(by_profit_desc);
    outcome.loss_making.sort_by(by_profit_desc);
    outcome.unreported.sort();
    Some(outcome)
}

/// Outcome per year, most recent first; years without records map to `None`
#[must_use]
pub fn outcomes_by_year(records: &[CompanyRecord], years: &[i32]) -> Vec<(i32, Option<YearOutcome>)> {
    years
        .iter()
        .copied()
        .sorted_by(|a, b| b.cmp(a))
        .map(|year| (year, year_outcome(records, year)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionRow {
    pub year: i32,
    pub profit_count: usize,
    pub loss_count: usize,
    pub total: usize,
    pub profit_percentage: f64,
    pub loss_percentage: f64,
}

/// Profit and loss counts per year as shares of the year's records
///
/// Years without records are skipped. Percentages are rounded to two decimals.
#[must_use]
pub fn evolution(records: &[CompanyRecord], years: &[i32]) -> Vec<EvolutionRow> {
    let mut per_year: BTreeMap<i32, Vec<&CompanyRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| years.contains(&r.year)) {
        per_year.entry(record.year).or_default().push(record);
    }

    per_year
        .into_iter()
        .map(|(year, in_year)| {
            let total = in_year.len();
            let classes = in_year.iter().map(|r| ProfitClass::of(r.profit)).counts();
            let profit_count = classes.get(&ProfitClass::Profit).copied().unwrap_or(0);
            let loss_count = classes.get(&ProfitClass::Loss).copied().unwrap_or(0);
            EvolutionRow {
                year,
                profit_count,
                loss_count,
                total,
                profit_percentage: round2(count_percentage(profit_count, total).unwrap_or(0.0)),
                loss_percentage: round2(count_percentage(loss_count, total).unwrap_or(0.0)),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub company: String,
    pub net_equity: f64,
    pub profit: f64,
}

/// Companies with both equity and profit reported
#[must_use]
pub fn equity_vs_result(records: &[CompanyRecord]) -> Vec<EquityPoint> {
    records
        .iter()
        .filter_map(|r| {
            Some(EquityPoint {
                company: r.company.clone(),
                net_equity: r.net_equity?,
                profit: r.profit?,
            })
        })
        .sorted_by(|a, b| a.company.cmp(&b.company))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EquitySummary {
    pub mean_equity: Option<f64>,
    pub largest_equity: Option<(String, f64)>,
    pub mean_profit: Option<f64>,
    pub largest_profit: Option<(String, f64)>,
}

#[must_use]
pub fn equity_summary(points: &[EquityPoint]) -> EquitySummary {
    let largest = |value: fn(&EquityPoint) -> f64| {
        points
            .iter()
            .max_by(|a, b| value(a).total_cmp(&value(b)))
            .map(|p| (p.company.clone(), value(p)))
    };
    EquitySummary {
        mean_equity: mean(points.iter().map(|p| p.net_equity)),
        largest_equity: largest(|p| p.net_equity),
        mean_profit: mean(points.iter().map(|p| p.profit)),
        largest_profit: largest(|p| p.profit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyStatus, GovernanceFlags};

    fn record(company: &str, year: i32, pl: Option<f64>, profit: Option<f64>) -> CompanyRecord {
        CompanyRecord {
            state: "DF".into(),
            year,
            company: company.into(),
            status: CompanyStatus::Active,
            sector: None,
            legal_nature: None,
            dependency: None,
            governance: GovernanceFlags::default(),
            net_equity: pl,
            profit,
            shareholder_result: None,
        }
    }

    fn sample() -> Vec<CompanyRecord> {
        vec![
            record("A", 2023, Some(1000.0), Some(150.0)),
            record("B", 2023, Some(2000.0), Some(100.0)),
            record("C", 2023, Some(500.0), Some(-50.0)),
            record("D", 2023, Some(0.0), Some(0.0)),
            record("E", 2023, None, None),
            record("A", 2022, Some(900.0), Some(100.0)),
        ]
    }

    #[test]
    fn zero_profit_is_a_loss_and_missing_is_unreported() {
        assert_eq!(ProfitClass::of(Some(0.0)), ProfitClass::Loss);
        assert_eq!(ProfitClass::of(None), ProfitClass::Unreported);

        let outcome = year_outcome(&sample(), 2023).unwrap();
        assert_eq!(
            outcome.profitable.iter().map(|c| c.company.as_str()).collect_vec(),
            vec!["A", "B"]
        );
        assert_eq!(
            outcome.loss_making.iter().map(|c| c.company.as_str()).collect_vec(),
            vec!["D", "C"]
        );
        assert_eq!(outcome.unreported, vec!["E".to_string()]);
        assert_eq!(outcome.total(), 5);
    }

    #[test]
    fn years_without_records_have_no_outcome() {
        let outcomes = outcomes_by_year(&sample(), &[2020, 2021, 2022, 2023]);
        assert_eq!(outcomes[0].0, 2023);
        assert!(outcomes[0].1.is_some());
        assert!(outcomes[3].1.is_none());
    }

    #[test]
    fn evolution_uses_all_records_of_the_year() {
        let rows = evolution(&sample(), &[2020, 2021, 2022, 2023]);
        assert_eq!(rows.len(), 2);
        let latest = &rows[1];
        assert_eq!((latest.profit_count, latest.loss_count, latest.total), (2, 2, 5));
        assert!((latest.profit_percentage - 40.0).abs() < 1e-9);
        assert!((rows[0].profit_percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn equity_summary_picks_largest() {
        let in_2023 = sample().into_iter().filter(|r| r.year == 2023).collect_vec();
        let points = equity_vs_result(&in_2023);
        assert_eq!(points.len(), 4);
        let summary = equity_summary(&points);
        assert_eq!(summary.largest_equity, Some(("B".to_string(), 2000.0)));
        assert_eq!(summary.largest_profit, Some(("A".to_string(), 150.0)));
        assert!((summary.mean_equity.unwrap() - 875.0).abs() < 1e-9);
        assert_eq!(equity_summary(&[]), EquitySummary::default());
    }
}
