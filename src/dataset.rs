//! The loaded dataset: adapted batches plus what the source provided.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::record_batch::RecordBatch;

use crate::config::PanelConfig;
use crate::error::{PanelError, Result};
use crate::filter::{BatchFilter, Expr, ExpressionFilter};
use crate::models::{CompanyRecord, decode_batch};
use crate::reader::{SourceTable, load_path};
use crate::schema::adapt::incompatible_columns;
use crate::schema::{ColumnAvailability, REQUIRED_COLUMNS, adapt_record_batch, panel_schema};
use crate::utils::{log_operation_complete, log_warning};

/// Every batch adapted to the panel schema
#[derive(Debug, Clone)]
pub struct Dataset {
    source: PathBuf,
    batches: Vec<RecordBatch>,
    availability: ColumnAvailability,
}

impl Dataset {
    /// Load the configured data path
    ///
    /// # Errors
    /// Returns an error if the input cannot be read or lacks a key column
    pub fn load(config: &PanelConfig) -> Result<Self> {
        Self::from_path(&config.data_path, config)
    }

    /// Load a file or directory
    ///
    /// # Errors
    /// Returns an error if the input cannot be read or lacks a key column
    pub fn from_path(path: &Path, config: &PanelConfig) -> Result<Self> {
        let start = Instant::now();
        let tables = load_path(path, config)?;
        let dataset = Self::from_tables(path, tables)?;
        log_operation_complete(
            "prepared",
            path,
            dataset.num_rows(),
            Some(start.elapsed()),
        );
        Ok(dataset)
    }

    /// Adapt the tables read from `source` to the panel schema
    ///
    /// # Errors
    /// Returns an error if any table lacks a key column or has a column
    /// whose type cannot be adapted
    pub fn from_tables(source: &Path, tables: Vec<SourceTable>) -> Result<Self> {
        let target = panel_schema();
        let mut availability = ColumnAvailability::default();
        let mut batches = Vec::new();

        for table in tables {
            let table_availability = ColumnAvailability::from_source(&table.schema);
            if let Some(column) = table_availability.first_missing(&REQUIRED_COLUMNS) {
                log::error!("{} has no '{column}' column", table.path.display());
                return Err(PanelError::MissingColumn(column.to_string()));
            }

            let incompatible = incompatible_columns(&table.schema, &target);
            if !incompatible.is_empty() {
                return Err(PanelError::schema(format!(
                    "{}: columns with unusable types: {}",
                    table.path.display(),
                    incompatible.join(", ")
                )));
            }

            for missing in table_availability.missing() {
                log::debug!("{} has no '{missing}' column", table.path.display());
            }
            availability.merge(&table_availability);

            for batch in &table.batches {
                batches.push(adapt_record_batch(batch, &target)?);
            }
        }

        Ok(Self {
            source: source.to_path_buf(),
            batches,
            availability,
        })
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    #[must_use]
    pub fn availability(&self) -> &ColumnAvailability {
        &self.availability
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Decode the records passing `filter`
    ///
    /// Records repeating an already seen (state, company, year) are dropped
    /// with a warning; the first occurrence wins.
    ///
    /// # Errors
    /// Returns an error if filtering or decoding fails
    pub fn select(&self, filter: &dyn BatchFilter) -> Result<Vec<CompanyRecord>> {
        let mut seen: HashSet<(String, String, i32)> = HashSet::new();
        let mut records = Vec::new();

        for batch in &self.batches {
            let filtered = filter.filter(batch)?;
            if filtered.num_rows() == 0 {
                continue;
            }
            for record in decode_batch(&filtered)? {
                let (state, company, year) = record.key();
                if seen.insert((state.to_string(), company.to_string(), year)) {
                    records.push(record);
                } else {
                    log_warning(
                        &format!("Duplicate record for {company} ({state}, {year}) ignored"),
                        None,
                    );
                }
            }
        }

        Ok(records)
    }

    /// Decode the records matching an expression
    ///
    /// # Errors
    /// Returns an error if filtering or decoding fails
    pub fn select_where(&self, expr: Expr) -> Result<Vec<CompanyRecord>> {
        self.select(&ExpressionFilter::new(expr))
    }

    /// Decode every record
    ///
    /// # Errors
    /// Returns an error if decoding fails
    pub fn records(&self) -> Result<Vec<CompanyRecord>> {
        self.select_where(Expr::AlwaysTrue)
    }

    /// Distinct years present, ascending
    ///
    /// # Errors
    /// Returns an error if decoding fails
    pub fn years(&self) -> Result<Vec<i32>> {
        let mut years: Vec<i32> = self.records()?.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        Ok(years)
    }

    /// Distinct states present, ascending
    ///
    /// # Errors
    /// Returns an error if decoding fails
    pub fn states(&self) -> Result<Vec<String>> {
        let mut states: Vec<String> = self.records()?.into_iter().map(|r| r.state).collect();
        states.sort();
        states.dedup();
        Ok(states)
    }
}
