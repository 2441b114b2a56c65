//! Domain models for the state-owned company panel
//!
//! One entity, the company-year record, plus the governance vocabulary
//! shared by every page.

pub mod company;
pub mod governance;

pub use company::{CompanyRecord, CompanyStatus, Dependency, RawCompanyRow, decode_batch};
pub use governance::{GovernanceCombination, GovernanceFlags, GovernanceStructure};
