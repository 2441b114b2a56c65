//! CSV export of the stacked comparison datasets

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Field, Schema};

use crate::algorithm::comparison::{StackedTable, company_counts_by_sector, results_by_sector};
use crate::config::PanelConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::report::pages::comparison_records;
use crate::schema::columns;

/// File written with company counts per state, year and sector
pub const COUNTS_FILE: &str = "empresas_por_estado_ano_setor.csv";

/// File written with shareholder results per state, year and sector
pub const RESULTS_FILE: &str = "resultado_por_estado_ano_setor.csv";

fn stacked_batch<T: Copy>(
    table: &StackedTable<T>,
    value_type: DataType,
    to_array: impl Fn(Vec<T>) -> ArrayRef,
) -> Result<RecordBatch> {
    let mut fields = vec![
        Field::new(columns::STATE, DataType::Utf8, false),
        Field::new(columns::YEAR, DataType::Int64, false),
    ];
    fields.extend(
        table
            .categories
            .iter()
            .map(|c| Field::new(c, value_type.clone(), false)),
    );

    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            table.rows.iter().map(|(key, _)| key.state.as_str()),
        )),
        Arc::new(Int64Array::from_iter_values(
            table.rows.iter().map(|(key, _)| i64::from(key.year)),
        )),
    ];
    for idx in 0..table.categories.len() {
        arrays.push(to_array(
            table.rows.iter().map(|(_, values)| values[idx]).collect(),
        ));
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

fn write_csv(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(batch)?;
    log::info!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(())
}

/// Write the two stacked comparison datasets as CSV into `out_dir`
///
/// # Errors
/// Returns an error if the directory or files cannot be written
pub fn export_comparison(
    dataset: &Dataset,
    config: &PanelConfig,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let records = comparison_records(dataset, config)?;

    let counts = stacked_batch(
        &company_counts_by_sector(&records),
        DataType::Int64,
        |values: Vec<usize>| {
            Arc::new(Int64Array::from_iter_values(
                values.into_iter().map(|n| n as i64),
            ))
        },
    )?;
    let results = stacked_batch(
        &results_by_sector(&records),
        DataType::Float64,
        |values: Vec<f64>| Arc::new(Float64Array::from(values)),
    )?;

    let counts_path = out_dir.join(COUNTS_FILE);
    let results_path = out_dir.join(RESULTS_FILE);
    write_csv(&counts_path, &counts)?;
    write_csv(&results_path, &results)?;
    Ok(vec![counts_path, results_path])
}
