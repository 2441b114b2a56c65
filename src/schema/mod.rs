//! The panel schema and the column availability report.
//!
//! Every input batch is adapted to [`panel_schema`] before anything else
//! touches it: known columns are cast to their target types, missing ones are
//! null-filled and unknown ones are dropped. Which columns were really present
//! is kept in a [`ColumnAvailability`] so report sections can tell a null
//! value apart from an absent column.

pub mod adapt;

use std::collections::BTreeSet;
use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema, SchemaRef};

pub use adapt::{TypeCompatibility, adapt_record_batch, check_type_compatibility};

/// Source column names, as written in the national dataset
pub mod columns {
    pub const STATE: &str = "Estado";
    pub const YEAR: &str = "Ano";
    pub const COMPANY: &str = "emp";
    pub const STATUS: &str = "sit";
    pub const SECTOR: &str = "setor";
    pub const LEGAL_NATURE: &str = "esp";
    pub const DEPENDENCY: &str = "dep";
    pub const BOARD: &str = "gov_ca";
    pub const FISCAL_COUNCIL: &str = "gov_cf";
    pub const AUDIT_COMMITTEE: &str = "gov_aud";
    pub const NET_EQUITY: &str = "PL";
    pub const PROFIT: &str = "lucros";
    pub const SHAREHOLDER_RESULT: &str = "Resultado para o Estado Acionista";
}

/// Columns without which a record cannot be keyed
pub const REQUIRED_COLUMNS: [&str; 3] = [columns::STATE, columns::YEAR, columns::COMPANY];

/// The schema every loaded batch is adapted to
#[must_use]
pub fn panel_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(columns::STATE, DataType::Utf8, true),
        Field::new(columns::YEAR, DataType::Int64, true),
        Field::new(columns::COMPANY, DataType::Utf8, true),
        Field::new(columns::STATUS, DataType::Utf8, true),
        Field::new(columns::SECTOR, DataType::Utf8, true),
        Field::new(columns::LEGAL_NATURE, DataType::Utf8, true),
        Field::new(columns::DEPENDENCY, DataType::Utf8, true),
        Field::new(columns::BOARD, DataType::Utf8, true),
        Field::new(columns::FISCAL_COUNCIL, DataType::Utf8, true),
        Field::new(columns::AUDIT_COMMITTEE, DataType::Utf8, true),
        Field::new(columns::NET_EQUITY, DataType::Float64, true),
        Field::new(columns::PROFIT, DataType::Float64, true),
        Field::new(columns::SHAREHOLDER_RESULT, DataType::Float64, true),
    ]))
}

/// Which panel columns the source actually provided
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnAvailability {
    present: BTreeSet<String>,
}

impl ColumnAvailability {
    /// Record the panel columns found in a source schema
    #[must_use]
    pub fn from_source(source: &Schema) -> Self {
        let present = panel_schema()
            .fields()
            .iter()
            .filter(|f| source.field_with_name(f.name()).is_ok())
            .map(|f| f.name().clone())
            .collect();
        Self { present }
    }

    /// Availability where every panel column is present
    #[must_use]
    pub fn all() -> Self {
        Self {
            present: panel_schema()
                .fields()
                .iter()
                .map(|f| f.name().clone())
                .collect(),
        }
    }

    /// Whether `column` was present in the source
    #[must_use]
    pub fn has(&self, column: &str) -> bool {
        self.present.contains(column)
    }

    /// The first of `required` not present in the source, if any
    #[must_use]
    pub fn first_missing<'a>(&self, required: &[&'a str]) -> Option<&'a str> {
        required.iter().copied().find(|c| !self.has(c))
    }

    /// Panel columns absent from the source
    #[must_use]
    pub fn missing(&self) -> Vec<String> {
        panel_schema()
            .fields()
            .iter()
            .filter(|f| !self.has(f.name()))
            .map(|f| f.name().clone())
            .collect()
    }

    /// Merge availability from another source; a column counts when any source had it
    pub fn merge(&mut self, other: &Self) {
        self.present.extend(other.present.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_reports_missing_columns() {
        let source = Schema::new(vec![
            Field::new(columns::STATE, DataType::Utf8, true),
            Field::new(columns::YEAR, DataType::Int64, true),
            Field::new(columns::COMPANY, DataType::Utf8, true),
            Field::new("cnpj", DataType::Utf8, true),
        ]);
        let availability = ColumnAvailability::from_source(&source);

        assert!(availability.has(columns::STATE));
        assert!(!availability.has("cnpj"));
        assert_eq!(
            availability.first_missing(&[columns::COMPANY, columns::SECTOR, columns::DEPENDENCY]),
            Some(columns::SECTOR)
        );
        assert_eq!(availability.missing().len(), 10);
    }

    #[test]
    fn merge_unions_sources() {
        let mut a = ColumnAvailability::from_source(&Schema::new(vec![Field::new(
            columns::STATE,
            DataType::Utf8,
            true,
        )]));
        let b = ColumnAvailability::from_source(&Schema::new(vec![Field::new(
            columns::PROFIT,
            DataType::Float64,
            true,
        )]));
        a.merge(&b);
        assert!(a.has(columns::STATE) && a.has(columns::PROFIT));
    }
}
