//! Governance structures and their combinations

use serde::Serialize;

/// Which of the three governance bodies a company has
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct GovernanceFlags {
    /// Board of directors (Conselho de Administração)
    pub board: bool,
    /// Fiscal council (Conselho Fiscal)
    pub fiscal_council: bool,
    /// Audit committee (Comitê de Auditoria)
    pub audit_committee: bool,
}

impl GovernanceFlags {
    #[must_use]
    pub const fn new(board: bool, fiscal_council: bool, audit_committee: bool) -> Self {
        Self {
            board,
            fiscal_council,
            audit_committee,
        }
    }

    /// Build flags from the raw "Sim"/"Não" answers; anything but "Sim" is absent
    #[must_use]
    pub fn from_answers(board: Option<&str>, fiscal: Option<&str>, audit: Option<&str>) -> Self {
        Self::new(is_yes(board), is_yes(fiscal), is_yes(audit))
    }

    /// The combination these flags belong to
    #[must_use]
    pub const fn combination(self) -> GovernanceCombination {
        GovernanceCombination::classify(self)
    }

    /// Whether the given structure is present
    #[must_use]
    pub const fn has(self, structure: GovernanceStructure) -> bool {
        match structure {
            GovernanceStructure::Board => self.board,
            GovernanceStructure::FiscalCouncil => self.fiscal_council,
            GovernanceStructure::AuditCommittee => self.audit_committee,
        }
    }
}

fn is_yes(answer: Option<&str>) -> bool {
    answer.is_some_and(|a| a.trim().to_uppercase() == "SIM")
}

/// One governance body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum GovernanceStructure {
    Board,
    FiscalCouncil,
    AuditCommittee,
}

impl GovernanceStructure {
    pub const ALL: [Self; 3] = [Self::Board, Self::FiscalCouncil, Self::AuditCommittee];

    /// Short label used in combination names
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Board => "CA",
            Self::FiscalCouncil => "CF",
            Self::AuditCommittee => "COAUD",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Board => "Conselho de Administração",
            Self::FiscalCouncil => "Conselho Fiscal",
            Self::AuditCommittee => "Comitê de Auditoria",
        }
    }
}

/// The eight possible sets of governance bodies
///
/// Declaration order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum GovernanceCombination {
    BoardFiscalAudit,
    BoardFiscal,
    BoardAudit,
    FiscalAudit,
    BoardOnly,
    FiscalOnly,
    AuditOnly,
    None,
}

impl GovernanceCombination {
    pub const ALL: [Self; 8] = [
        Self::BoardFiscalAudit,
        Self::BoardFiscal,
        Self::BoardAudit,
        Self::FiscalAudit,
        Self::BoardOnly,
        Self::FiscalOnly,
        Self::AuditOnly,
        Self::None,
    ];

    /// Classify a company by the bodies it has. Total and exclusive.
    #[must_use]
    pub const fn classify(flags: GovernanceFlags) -> Self {
        match (flags.board, flags.fiscal_council, flags.audit_committee) {
            (true, true, true) => Self::BoardFiscalAudit,
            (true, true, false) => Self::BoardFiscal,
            (true, false, true) => Self::BoardAudit,
            (false, true, true) => Self::FiscalAudit,
            (true, false, false) => Self::BoardOnly,
            (false, true, false) => Self::FiscalOnly,
            (false, false, true) => Self::AuditOnly,
            (false, false, false) => Self::None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BoardFiscalAudit => "CA,CF,COAUD",
            Self::BoardFiscal => "CA,CF",
            Self::BoardAudit => "CA,COAUD",
            Self::FiscalAudit => "CF,COAUD",
            Self::BoardOnly => "CA",
            Self::FiscalOnly => "CF",
            Self::AuditOnly => "COAUD",
            Self::None => "Nenhum",
        }
    }
}

impl std::fmt::Display for GovernanceCombination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_total_and_exclusive() {
        let mut seen = Vec::new();
        for board in [false, true] {
            for fiscal in [false, true] {
                for audit in [false, true] {
                    seen.push(GovernanceFlags::new(board, fiscal, audit).combination());
                }
            }
        }
        seen.sort();
        assert_eq!(seen, GovernanceCombination::ALL.to_vec());
    }

    #[test]
    fn labels_follow_present_bodies() {
        assert_eq!(
            GovernanceFlags::new(true, true, true).combination().label(),
            "CA,CF,COAUD"
        );
        assert_eq!(
            GovernanceFlags::new(true, true, false).combination().label(),
            "CA,CF"
        );
        assert_eq!(GovernanceFlags::default().combination().label(), "Nenhum");
    }

    #[test]
    fn answers_are_case_and_space_insensitive() {
        let flags = GovernanceFlags::from_answers(Some(" sim "), Some("Não"), None);
        assert!(flags.board);
        assert!(!flags.fiscal_council);
        assert!(!flags.audit_committee);
        assert!(flags.has(GovernanceStructure::Board));
    }
}
