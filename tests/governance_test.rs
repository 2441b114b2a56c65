mod utils;

use estatais_panel::algorithm::governance::{
    combination_distribution, occupied_combinations, structure_by_dependency, structure_presence,
};
use estatais_panel::algorithm::profitability::by_combination;
use estatais_panel::models::GovernanceStructure;
use estatais_panel::GovernanceCombination;
use utils::{assert_close_opt, load_sample};

#[test]
fn structure_presence_in_focus_year() {
    let records = utils::state_year(&load_sample(), "DF", 2023);
    let presence = structure_presence(&records);

    let counts: Vec<(GovernanceStructure, usize)> =
        presence.iter().map(|p| (p.structure, p.count)).collect();
    assert_eq!(
        counts,
        vec![
            (GovernanceStructure::Board, 4),
            (GovernanceStructure::FiscalCouncil, 4),
            (GovernanceStructure::AuditCommittee, 1),
        ]
    );
    assert!(presence.iter().all(|p| p.total == 7));
}

#[test]
fn every_company_lands_in_one_combination() {
    let records = utils::state_year(&load_sample(), "DF", 2023);
    let distribution = combination_distribution(&records);

    assert_eq!(distribution.len(), 8);
    assert_eq!(distribution.iter().map(|g| g.count).sum::<usize>(), records.len());

    let occupied: Vec<(&str, usize)> = occupied_combinations(&distribution)
        .into_iter()
        .map(|g| (g.combination.label(), g.count))
        .collect();
    assert_eq!(
        occupied,
        vec![
            ("CA,CF", 2),
            ("Nenhum", 2),
            ("CA,CF,COAUD", 1),
            ("CA", 1),
            ("CF", 1),
        ]
    );

    let none = distribution
        .iter()
        .find(|g| g.combination == GovernanceCombination::None)
        .unwrap();
    assert_eq!(none.companies, vec!["EMATER", "SAB"]);
}

#[test]
fn structures_by_dependency_class() {
    let records = utils::state_year(&load_sample(), "DF", 2023);
    let rows = structure_by_dependency(&records);

    let board = &rows[0];
    assert_eq!(board.structure, GovernanceStructure::Board);
    assert_eq!((board.dependent.count, board.dependent.total), (0, 3));
    assert_eq!((board.non_dependent.count, board.non_dependent.total), (4, 4));
    assert_eq!((board.combined.count, board.combined.total), (4, 7));

    let fiscal = &rows[1];
    assert_eq!(fiscal.dependent.count, 1);
    assert_eq!(fiscal.non_dependent.count, 3);
}

#[test]
fn profitability_per_combination() {
    let records = utils::state_year(&load_sample(), "DF", 2023);
    let groups = by_combination(&records);

    assert_eq!(groups.len(), 8);
    let mean_of = |combination| {
        groups
            .iter()
            .find(|g| g.combination == combination)
            .and_then(|g| g.mean)
    };
    assert_close_opt(mean_of(GovernanceCombination::BoardFiscalAudit), 15.0);
    assert_close_opt(mean_of(GovernanceCombination::BoardFiscal), -2.5);
    assert_close_opt(mean_of(GovernanceCombination::FiscalOnly), -5.0);
    // Instituto BRB has no figures, EMATER and SAB have no positive equity
    assert_eq!(mean_of(GovernanceCombination::BoardOnly), None);
    assert_eq!(mean_of(GovernanceCombination::None), None);
}
