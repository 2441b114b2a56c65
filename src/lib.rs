//! Analytical panel over the national dataset of state-owned companies.
//!
//! Data flows one way: a CSV or Parquet source is read into Arrow batches
//! adapted to the panel schema, filtered per page, decoded into
//! [`CompanyRecord`]s, aggregated by the functions in [`algorithm`] and
//! assembled into [`PageReport`]s that are rendered as text or JSON.

pub mod algorithm;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod models;
pub mod reader;
pub mod report;
pub mod schema;
pub mod utils;

// Core types
pub use config::PanelConfig;
pub use dataset::Dataset;
pub use error::{PanelError, Result};
pub use models::{CompanyRecord, Dependency, GovernanceCombination, GovernanceFlags};

// Filtering
pub use filter::{Expr, LiteralValue, evaluate_expr, filter_record_batch};

// Loading
pub use reader::{InputFormat, SourceTable, load_files_parallel, load_path, read_table};

// Reports
pub use report::{OutputFormat, Page, PageReport, build_all, build_page, export_comparison};

// Arrow types
pub use arrow::datatypes::Schema as ArrowSchema;
pub use arrow::record_batch::RecordBatch;
