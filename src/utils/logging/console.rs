//! Console output utilities
//!
//! Used by the `inspect` command to describe what was loaded.

use arrow_schema::Schema;

use crate::schema::ColumnAvailability;

/// Print the number of batches and rows loaded
pub fn print_batch_summary(batches: usize, rows: usize, elapsed: std::time::Duration) {
    println!("Read {batches} record batches in {elapsed:?}");
    println!("Total rows: {rows}");
}

/// Print each field of a schema with its type
pub fn print_schema_info(schema: &Schema) {
    println!("Schema:");
    for field in schema.fields() {
        println!("  - {} ({})", field.name(), field.data_type());
    }
}

/// Print which panel columns were missing from the source
pub fn print_availability(availability: &ColumnAvailability) {
    let missing = availability.missing();
    if missing.is_empty() {
        println!("All panel columns present");
    } else {
        println!("Missing columns (sections using them are skipped):");
        for column in missing {
            println!("  - {column}");
        }
    }
}
