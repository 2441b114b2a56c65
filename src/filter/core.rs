//! Core filtering functionality for record batches
//!
//! This module defines the filter trait shared by every page and the
//! mask application used by all filter implementations.

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray};
use arrow::compute::filter as arrow_filter;
use arrow::record_batch::RecordBatch;

use crate::error::{PanelError, Result};

/// Filter a record batch based on a boolean mask
///
/// Rows whose mask value is false or null are dropped.
///
/// # Errors
/// Returns an error if the mask length differs from the batch or filtering fails
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(PanelError::filter(format!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        )));
    }

    let filtered_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| arrow_filter(col, mask))
        .collect::<std::result::Result<_, _>>()?;

    Ok(RecordBatch::try_new(batch.schema(), filtered_columns)?)
}

/// Trait for objects that can filter record batches
pub trait BatchFilter: std::fmt::Debug {
    /// Filter a record batch
    ///
    /// # Errors
    /// Returns an error if filtering fails
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch>;

    /// Returns the set of column names required by this filter
    fn required_columns(&self) -> HashSet<String>;
}

/// Filters applied one after the other; stops early once no rows remain
#[derive(Debug, Clone)]
pub struct AndFilter {
    filters: Vec<Arc<dyn BatchFilter + Send + Sync>>,
}

impl AndFilter {
    /// Create a new AND filter
    #[must_use]
    pub fn new(filters: Vec<Arc<dyn BatchFilter + Send + Sync>>) -> Self {
        Self { filters }
    }
}

impl BatchFilter for AndFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        self.filters.iter().try_fold(batch.clone(), |current, filter| {
            if current.num_rows() == 0 {
                Ok(current)
            } else {
                filter.filter(&current)
            }
        })
    }

    fn required_columns(&self) -> HashSet<String> {
        self.filters
            .iter()
            .flat_map(|f| f.required_columns())
            .collect()
    }
}
