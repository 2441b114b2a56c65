//! Comparison across states and years

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use serde::Serialize;

use crate::algorithm::mean;
use crate::models::CompanyRecord;

/// A state in a given year
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StateYear {
    pub state: String,
    pub year: i32,
}

impl StateYear {
    fn of(record: &CompanyRecord) -> Self {
        Self {
            state: record.state.clone(),
            year: record.year,
        }
    }

    /// "DF, 2023"
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}, {}", self.state, self.year)
    }
}

/// A value per (state, year) and category, zero-filled over every category
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StackedTable<T> {
    pub categories: Vec<String>,
    pub rows: Vec<(StateYear, Vec<T>)>,
}

impl<T: Copy> StackedTable<T> {
    /// Values of one category, in row order
    #[must_use]
    pub fn series(&self, category: &str) -> Option<Vec<T>> {
        let idx = self.categories.iter().position(|c| c == category)?;
        Some(self.rows.iter().map(|(_, values)| values[idx]).collect())
    }
}

fn stacked<T: Copy + Default + std::ops::AddAssign>(
    entries: impl Iterator<Item = (StateYear, String, T)>,
) -> StackedTable<T> {
    let mut cells: BTreeMap<StateYear, BTreeMap<String, T>> = BTreeMap::new();
    let mut categories: BTreeSet<String> = BTreeSet::new();
    for (key, category, value) in entries {
        categories.insert(category.clone());
        *cells.entry(key).or_default().entry(category).or_default() += value;
    }

    let categories = categories.into_iter().collect_vec();
    let rows = cells
        .into_iter()
        .map(|(key, values)| {
            let row = categories
                .iter()
                .map(|c| values.get(c).copied().unwrap_or_default())
                .collect();
            (key, row)
        })
        .collect();
    StackedTable { categories, rows }
}

/// Company counts per (state, year) and sector; sectorless records are dropped
#[must_use]
pub fn company_counts_by_sector(records: &[CompanyRecord]) -> StackedTable<usize> {
    stacked(
        records
            .iter()
            .filter_map(|r| Some((StateYear::of(r), r.sector.clone()?, 1))),
    )
}

/// Shareholder result per (state, year) and sector
#[must_use]
pub fn results_by_sector(records: &[CompanyRecord]) -> StackedTable<f64> {
    stacked(
        records
            .iter()
            .filter_map(|r| Some((StateYear::of(r), r.sector.clone()?, r.shareholder_result?))),
    )
}

/// Shareholder result per (state, year) and dependency; missing classes form their own group
#[must_use]
pub fn results_by_dependency(records: &[CompanyRecord]) -> StackedTable<f64> {
    stacked(records.iter().filter_map(|r| {
        Some((
            StateYear::of(r),
            r.dependency_label().to_string(),
            r.shareholder_result?,
        ))
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateYearTotal {
    pub key: StateYear,
    pub total: f64,
}

/// Shareholder result summed per (state, year), sorted by state then year
#[must_use]
pub fn results_by_state_year(records: &[CompanyRecord]) -> Vec<StateYearTotal> {
    let mut totals: BTreeMap<StateYear, f64> = BTreeMap::new();
    for record in records {
        if let Some(value) = record.shareholder_result {
            *totals.entry(StateYear::of(record)).or_default() += value;
        }
    }
    totals
        .into_iter()
        .map(|(key, total)| StateYearTotal { key, total })
        .collect()
}

/// Highest and lowest (state, year) totals
#[must_use]
pub fn best_and_worst(totals: &[StateYearTotal]) -> Option<(&StateYearTotal, &StateYearTotal)> {
    let best = totals.iter().max_by(|a, b| a.total.total_cmp(&b.total))?;
    let worst = totals.iter().min_by(|a, b| a.total.total_cmp(&b.total))?;
    Some((best, worst))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateStatistics {
    pub state: String,
    pub total: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub years: usize,
}

/// Per-state statistics over the yearly totals, largest total first
#[must_use]
pub fn state_statistics(totals: &[StateYearTotal]) -> Vec<StateStatistics> {
    totals
        .iter()
        .chunk_by(|t| t.key.state.as_str())
        .into_iter()
        .filter_map(|(state, group)| {
            let values = group.map(|t| t.total).collect_vec();
            Some(StateStatistics {
                state: state.to_string(),
                total: values.iter().sum(),
                mean: mean(values.iter().copied())?,
                min: values.iter().copied().reduce(f64::min)?,
                max: values.iter().copied().reduce(f64::max)?,
                years: values.len(),
            })
        })
        .sorted_by(|a, b| b.total.total_cmp(&a.total))
        .collect()
}

/// Sum, mean and number of records of one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStatistics {
    pub category: String,
    pub total: f64,
    pub mean: f64,
    pub records: usize,
}

fn category_statistics<'a>(
    values: impl Iterator<Item = (&'a str, f64)>,
) -> Vec<CategoryStatistics> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (category, value) in values {
        groups.entry(category).or_default().push(value);
    }
    groups
        .into_iter()
        .filter_map(|(category, values)| {
            Some(CategoryStatistics {
                category: category.to_string(),
                total: values.iter().sum(),
                mean: mean(values.iter().copied())?,
                records: values.len(),
            })
        })
        .sorted_by(|a, b| b.total.total_cmp(&a.total))
        .collect()
}

/// Shareholder result statistics per sector over individual records, largest total first
#[must_use]
pub fn sector_statistics(records: &[CompanyRecord]) -> Vec<CategoryStatistics> {
    category_statistics(
        records
            .iter()
            .filter_map(|r| Some((r.sector.as_deref()?, r.shareholder_result?))),
    )
}

/// Shareholder result statistics per dependency class, largest total first
#[must_use]
pub fn dependency_statistics(records: &[CompanyRecord]) -> Vec<CategoryStatistics> {
    category_statistics(
        records
            .iter()
            .filter_map(|r| Some((r.dependency_label(), r.shareholder_result?))),
    )
}

/// The `n` largest and `n` smallest categories of a list sorted by total, descending
#[must_use]
pub fn top_and_bottom(
    stats: &[CategoryStatistics],
    n: usize,
) -> (Vec<&CategoryStatistics>, Vec<&CategoryStatistics>) {
    let top = stats.iter().take(n).collect_vec();
    let bottom = stats.iter().rev().take(n).collect_vec();
    (top, bottom)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyPivotRow {
    pub state: String,
    pub values: Vec<f64>,
    pub total: f64,
}

/// State by dependency class with a total column, largest total first
#[must_use]
pub fn dependency_pivot(records: &[CompanyRecord]) -> StackedPivot {
    let mut cells: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
    let mut classes: BTreeSet<&str> = BTreeSet::new();
    for record in records {
        let Some(value) = record.shareholder_result else {
            continue;
        };
        let class = record.dependency_label();
        classes.insert(class);
        *cells
            .entry(record.state.as_str())
            .or_default()
            .entry(class)
            .or_default() += value;
    }

    let classes = classes.into_iter().map(str::to_string).collect_vec();
    let rows = cells
        .into_iter()
        .map(|(state, values)| {
            let values = classes
                .iter()
                .map(|c| values.get(c.as_str()).copied().unwrap_or(0.0))
                .collect_vec();
            DependencyPivotRow {
                state: state.to_string(),
                total: values.iter().sum(),
                values,
            }
        })
        .sorted_by(|a, b| b.total.total_cmp(&a.total))
        .collect();
    StackedPivot { classes, rows }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StackedPivot {
    pub classes: Vec<String>,
    pub rows: Vec<DependencyPivotRow>,
}
