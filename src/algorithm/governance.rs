//! Adoption of governance structures

use serde::Serialize;

use crate::algorithm::count_percentage;
use crate::models::{CompanyRecord, Dependency, GovernanceCombination, GovernanceStructure};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructurePresence {
    pub structure: GovernanceStructure,
    pub count: usize,
    pub total: usize,
    pub percentage: Option<f64>,
}

/// How many companies have each of the three structures
#[must_use]
pub fn structure_presence(records: &[CompanyRecord]) -> Vec<StructurePresence> {
    let total = records.len();
    GovernanceStructure::ALL
        .into_iter()
        .map(|structure| {
            let count = records
                .iter()
                .filter(|r| r.governance.has(structure))
                .count();
            StructurePresence {
                structure,
                count,
                total,
                percentage: count_percentage(count, total),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationGroup {
    pub combination: GovernanceCombination,
    pub count: usize,
    pub percentage: Option<f64>,
    pub companies: Vec<String>,
}

/// Companies in each of the eight combinations, canonical order
///
/// The counts always sum to the number of records.
#[must_use]
pub fn combination_distribution(records: &[CompanyRecord]) -> Vec<CombinationGroup> {
    let total = records.len();
    GovernanceCombination::ALL
        .into_iter()
        .map(|combination| {
            let mut companies: Vec<String> = records
                .iter()
                .filter(|r| r.governance.combination() == combination)
                .map(|r| r.company.clone())
                .collect();
            companies.sort();
            CombinationGroup {
                combination,
                count: companies.len(),
                percentage: count_percentage(companies.len(), total),
                companies,
            }
        })
        .collect()
}

/// Combinations with at least one company, largest first
#[must_use]
pub fn occupied_combinations(distribution: &[CombinationGroup]) -> Vec<&CombinationGroup> {
    let mut occupied: Vec<&CombinationGroup> =
        distribution.iter().filter(|g| g.count > 0).collect();
    occupied.sort_by(|a, b| b.count.cmp(&a.count).then(a.combination.cmp(&b.combination)));
    occupied
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassPresence {
    pub count: usize,
    pub total: usize,
    pub percentage: Option<f64>,
}

impl ClassPresence {
    fn new(count: usize, total: usize) -> Self {
        Self {
            count,
            total,
            percentage: count_percentage(count, total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureByDependency {
    pub structure: GovernanceStructure,
    pub dependent: ClassPresence,
    pub non_dependent: ClassPresence,
    pub combined: ClassPresence,
}

/// Presence of each structure within each dependency class
///
/// Records of unknown dependency are left out of every column.
#[must_use]
pub fn structure_by_dependency(records: &[CompanyRecord]) -> Vec<StructureByDependency> {
    let of_class = |class: Dependency| {
        records
            .iter()
            .filter(move |r| r.dependency == Some(class))
    };
    let dependent_total = of_class(Dependency::Dependent).count();
    let non_dependent_total = of_class(Dependency::NonDependent).count();

    GovernanceStructure::ALL
        .into_iter()
        .map(|structure| {
            let dependent = of_class(Dependency::Dependent)
                .filter(|r| r.governance.has(structure))
                .count();
            let non_dependent = of_class(Dependency::NonDependent)
                .filter(|r| r.governance.has(structure))
                .count();
            StructureByDependency {
                structure,
                dependent: ClassPresence::new(dependent, dependent_total),
                non_dependent: ClassPresence::new(non_dependent, non_dependent_total),
                combined: ClassPresence::new(
                    dependent + non_dependent,
                    dependent_total + non_dependent_total,
                ),
            }
        })
        .collect()
}
