//! Reading CSV and Parquet inputs into Arrow record batches.
//!
//! CSV columns are read as text and typed later by the schema adaptation,
//! so a stray "n/d" in a numeric column becomes a null instead of a parse
//! failure. Parquet keeps its stored types.

use std::fs::File;
use std::io::Seek;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use itertools::Itertools;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rayon::prelude::*;

use crate::config::PanelConfig;
use crate::error::{PanelError, Result};
use crate::utils::{log_operation_complete, log_operation_start, log_warning};

/// Rows sampled to discover the CSV header and column count
const CSV_SCHEMA_SAMPLE: usize = 100;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Parquet,
}

impl InputFormat {
    /// Detect the format from the file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "parquet" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// The batches read from one file, with the schema the file declared
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub path: PathBuf,
    pub schema: SchemaRef,
    pub batches: Vec<RecordBatch>,
}

impl SourceTable {
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }
}

/// Read a CSV file with a header row
///
/// # Errors
/// Returns an error if the file cannot be opened or a row cannot be parsed
pub fn read_csv(path: &Path, delimiter: u8, batch_size: usize) -> Result<SourceTable> {
    let start = Instant::now();
    log_operation_start("Reading CSV file", path);

    let mut file = File::open(path)?;
    let format = Format::default()
        .with_header(true)
        .with_delimiter(delimiter);
    let (inferred, _) = format.infer_schema(&mut file, Some(CSV_SCHEMA_SAMPLE))?;
    file.rewind()?;

    let text_schema: SchemaRef = Arc::new(Schema::new(
        inferred
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect_vec(),
    ));

    let reader = ReaderBuilder::new(text_schema.clone())
        .with_header(true)
        .with_delimiter(delimiter)
        .with_batch_size(batch_size)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    let table = SourceTable {
        path: path.to_path_buf(),
        schema: text_schema,
        batches,
    };
    log_operation_complete("read", path, table.num_rows(), Some(start.elapsed()));
    Ok(table)
}

/// Read a Parquet file
///
/// # Errors
/// Returns an error if the file cannot be opened or is not valid Parquet
pub fn read_parquet(path: &Path, batch_size: usize) -> Result<SourceTable> {
    let start = Instant::now();
    log_operation_start("Reading parquet file", path);

    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?.with_batch_size(batch_size);
    let schema = builder.schema().clone();
    let reader = builder.build()?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    let table = SourceTable {
        path: path.to_path_buf(),
        schema,
        batches,
    };
    log_operation_complete("read", path, table.num_rows(), Some(start.elapsed()));
    Ok(table)
}

/// Read one input file, dispatching on its extension
///
/// # Errors
/// Returns an error for unknown extensions or unreadable files
pub fn read_table(path: &Path, config: &PanelConfig) -> Result<SourceTable> {
    match InputFormat::from_path(path) {
        Some(InputFormat::Csv) => read_csv(path, config.delimiter_byte()?, config.batch_size),
        Some(InputFormat::Parquet) => read_parquet(path, config.batch_size),
        None => Err(PanelError::UnsupportedInput(path.to_path_buf())),
    }
}

/// Find all CSV and Parquet files in a directory, sorted by file name
///
/// # Errors
/// Returns an error if the directory cannot be read
pub fn find_data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    log_operation_start("Searching for data files in", dir);

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && InputFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        log_warning("No CSV or Parquet files found in directory", Some(dir));
    } else {
        log::info!("Found {} data files in {}", files.len(), dir.display());
    }
    Ok(files)
}

/// Read every data file in a directory in parallel
///
/// Tables come back in file-name order regardless of which worker finished first.
///
/// # Errors
/// Returns the first error from any file
pub fn load_files_parallel(dir: &Path, config: &PanelConfig) -> Result<Vec<SourceTable>> {
    let files = find_data_files(dir)?;
    let start = Instant::now();

    let tables = files
        .par_iter()
        .map(|path| read_table(path, config))
        .collect::<Result<Vec<_>>>()?;

    let rows: usize = tables.iter().map(SourceTable::num_rows).sum();
    log_operation_complete("loaded", dir, rows, Some(start.elapsed()));
    Ok(tables)
}

/// Read the configured data path, a file or a directory of files
///
/// # Errors
/// Returns an error if the path does not exist or any file fails to read
pub fn load_path(path: &Path, config: &PanelConfig) -> Result<Vec<SourceTable>> {
    if path.is_dir() {
        load_files_parallel(path, config)
    } else if path.is_file() {
        Ok(vec![read_table(path, config)?])
    } else {
        Err(PanelError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Data path does not exist: {}", path.display()),
        )))
    }
}
