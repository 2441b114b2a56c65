//! Error handling for the panel.

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for loading and reporting
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error processing Arrow data (CSV parsing, casts, kernels)
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error turning record batches into company records
    #[error("Record decoding error: {0}")]
    Decode(#[from] serde_arrow::Error),

    /// Error reading or writing JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A key column is absent from the input
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Column types that cannot be adapted to the panel schema
    #[error("Schema error: {0}")]
    Schema(String),

    /// Error evaluating a filter expression
    #[error("Filter error: {0}")]
    Filter(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input file whose format cannot be determined
    #[error("Unsupported input file: {}", .0.display())]
    UnsupportedInput(PathBuf),
}

impl PanelError {
    /// Create a filter error from any message
    pub fn filter(message: impl Into<String>) -> Self {
        Self::Filter(message.into())
    }

    /// Create a schema error from any message
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a configuration error from any message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type for panel operations
pub type Result<T> = std::result::Result<T, PanelError>;
