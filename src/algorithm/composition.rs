//! Who the companies are: listing and counts by dependency and sector

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use serde::Serialize;

use crate::algorithm::count_percentage;
use crate::models::{CompanyRecord, CompanyStatus, Dependency};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyListing {
    pub company: String,
    pub status: CompanyStatus,
    pub sector: Option<String>,
    pub legal_nature: Option<String>,
    pub dependency: Option<Dependency>,
}

/// One line per company, sorted by name
#[must_use]
pub fn company_listing(records: &[CompanyRecord]) -> Vec<CompanyListing> {
    records
        .iter()
        .map(|r| CompanyListing {
            company: r.company.clone(),
            status: r.status.clone(),
            sector: r.sector.clone(),
            legal_nature: r.legal_nature.clone(),
            dependency: r.dependency,
        })
        .sorted_by(|a, b| a.company.cmp(&b.company))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyCount {
    pub year: i32,
    pub dependency: Dependency,
    pub count: usize,
    pub percentage: Option<f64>,
}

/// Companies per year and dependency class
///
/// Both classes appear for every year present, with zero when absent.
/// Records with an unknown class count toward neither class nor the total.
#[must_use]
pub fn dependency_by_year(records: &[CompanyRecord]) -> Vec<DependencyCount> {
    let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
    let counts = records
        .iter()
        .filter_map(|r| Some((r.year, r.dependency?)))
        .counts();
    let counts = &counts;

    years
        .into_iter()
        .flat_map(|year| {
            let total: usize = Dependency::ALL
                .iter()
                .map(|&d| counts.get(&(year, d)).copied().unwrap_or(0))
                .sum();
            Dependency::ALL.into_iter().map(move |dependency| {
                let count = counts.get(&(year, dependency)).copied().unwrap_or(0);
                DependencyCount {
                    year,
                    dependency,
                    count,
                    percentage: count_percentage(count, total),
                }
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorCount {
    pub year: i32,
    pub sector: String,
    pub count: usize,
}

/// Companies per year and sector over the full grid of years and sectors present
#[must_use]
pub fn sector_by_year(records: &[CompanyRecord]) -> Vec<SectorCount> {
    let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
    let mut grid: BTreeMap<(i32, String), usize> = BTreeMap::new();
    let sectors: BTreeSet<&str> = records.iter().filter_map(|r| r.sector.as_deref()).collect();

    for &year in &years {
        for &sector in &sectors {
            grid.insert((year, sector.to_string()), 0);
        }
    }
    for record in records {
        if let Some(sector) = &record.sector {
            *grid.entry((record.year, sector.clone())).or_default() += 1;
        }
    }

    grid.into_iter()
        .map(|((year, sector), count)| SectorCount {
            year,
            sector,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GovernanceFlags;

    fn record(company: &str, year: i32, sector: Option<&str>, dep: Option<Dependency>) -> CompanyRecord {
        CompanyRecord {
            state: "DF".into(),
            year,
            company: company.into(),
            status: CompanyStatus::Active,
            sector: sector.map(Into::into),
            legal_nature: None,
            dependency: dep,
            governance: GovernanceFlags::default(),
            net_equity: None,
            profit: None,
            shareholder_result: None,
        }
    }

    #[test]
    fn listing_is_sorted_by_name() {
        let records = vec![
            record("SAB", 2023, None, None),
            record("BRB", 2023, None, None),
        ];
        let listing = company_listing(&records);
        assert_eq!(listing[0].company, "BRB");
        assert_eq!(listing[1].company, "SAB");
    }

    #[test]
    fn dependency_counts_are_zero_filled() {
        let records = vec![
            record("A", 2022, None, Some(Dependency::Dependent)),
            record("B", 2023, None, Some(Dependency::Dependent)),
            record("C", 2023, None, Some(Dependency::NonDependent)),
            record("D", 2023, None, Some(Dependency::NonDependent)),
            record("E", 2023, None, None),
        ];
        let counts = dependency_by_year(&records);
        assert_eq!(counts.len(), 4);
        assert_eq!(counts[1].dependency, Dependency::NonDependent);
        assert_eq!(counts[1].count, 0);
        assert_eq!(counts[0].percentage, Some(100.0));
        let non_dependent_2023 = &counts[3];
        assert_eq!(non_dependent_2023.count, 2);
        assert!((non_dependent_2023.percentage.unwrap() - 66.666_666).abs() < 1e-4);
    }

    #[test]
    fn sector_grid_covers_every_pair() {
        let records = vec![
            record("A", 2022, Some("Energia"), None),
            record("B", 2023, Some("Saneamento"), None),
            record("C", 2023, Some("Saneamento"), None),
            record("D", 2023, None, None),
        ];
        let grid = sector_by_year(&records);
        assert_eq!(grid.len(), 4);
        assert_eq!(
            grid.iter().map(|c| c.count).collect_vec(),
            vec![1, 0, 0, 2]
        );
    }
}
