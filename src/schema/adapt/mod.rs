//! Adapting source batches to the panel schema.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, NullArray, StringArray};
use arrow::compute::kernels::cast;
use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Schema, SchemaRef};

use crate::error::{PanelError, Result};

/// Types of data type compatibility
#[derive(Debug, PartialEq, Eq)]
pub enum TypeCompatibility {
    /// Types match exactly
    Exact,
    /// Types can be automatically converted
    Compatible,
    /// Types are incompatible
    Incompatible,
}

fn is_numeric(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Decimal128(_, _)
            | DataType::Decimal256(_, _)
    )
}

fn is_string(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
    )
}

/// Check if two Arrow data types are compatible for conversion
#[must_use]
pub fn check_type_compatibility(from: &DataType, to: &DataType) -> TypeCompatibility {
    if from == to {
        return TypeCompatibility::Exact;
    }

    match (from, to) {
        // An all-null column fits anywhere
        (DataType::Null, _) => TypeCompatibility::Compatible,
        (s, t) if is_numeric(s) && is_numeric(t) => TypeCompatibility::Compatible,
        // Numbers and flags can always be rendered as text
        (s, t) if (is_numeric(s) || is_string(s) || *s == DataType::Boolean) && is_string(t) => {
            TypeCompatibility::Compatible
        }
        // Text is parsed; values that fail to parse become null
        (s, t) if is_string(s) && is_numeric(t) => TypeCompatibility::Compatible,
        _ => TypeCompatibility::Incompatible,
    }
}

/// Governance flags stored as booleans become the "Sim"/"Não" answers of the CSV form
fn convert_boolean_to_string(array: &ArrayRef) -> Result<ArrayRef> {
    let flags = array
        .as_any()
        .downcast_ref::<BooleanArray>()
        .ok_or_else(|| PanelError::schema("Expected BooleanArray"))?;

    let values: StringArray = flags
        .iter()
        .map(|flag| flag.map(|f| if f { "Sim" } else { "Não" }))
        .collect();
    Ok(Arc::new(values))
}

/// Convert an Arrow array to the target data type
pub fn convert_array(array: &ArrayRef, target_type: &DataType) -> Result<ArrayRef> {
    let source_type = array.data_type();
    if source_type == target_type {
        return Ok(array.clone());
    }

    match (source_type, target_type) {
        (DataType::Boolean, t) if is_string(t) => convert_boolean_to_string(array),
        _ => cast::cast(array, target_type).map_err(|e| {
            PanelError::schema(format!(
                "Failed to convert from {source_type:?} to {target_type:?}: {e}"
            ))
        }),
    }
}

/// Create a null array of the specified type and length
pub fn create_null_array(data_type: &DataType, length: usize) -> Result<ArrayRef> {
    let null_array: ArrayRef = Arc::new(NullArray::new(length));
    cast::cast(&null_array, data_type).map_err(|e| {
        PanelError::schema(format!(
            "Failed to create null array of type {data_type:?}: {e}"
        ))
    })
}

/// Convert a record batch to match the target schema.
///
/// Matching columns are cast, missing ones are null-filled and columns the
/// target does not know are dropped.
pub fn adapt_record_batch(batch: &RecordBatch, target_schema: &SchemaRef) -> Result<RecordBatch> {
    let source_schema = batch.schema();
    let mut adapted_columns: Vec<ArrayRef> = Vec::with_capacity(target_schema.fields().len());

    for target_field in target_schema.fields() {
        let field_name = target_field.name();
        let target_type = target_field.data_type();

        if let Ok(source_idx) = source_schema.index_of(field_name) {
            let source_array = batch.column(source_idx);
            let source_type = source_array.data_type();

            match check_type_compatibility(source_type, target_type) {
                TypeCompatibility::Exact => adapted_columns.push(source_array.clone()),
                TypeCompatibility::Compatible => {
                    log::debug!("Adapting column '{field_name}' from {source_type} to {target_type}");
                    adapted_columns.push(convert_array(source_array, target_type)?);
                }
                TypeCompatibility::Incompatible => {
                    return Err(PanelError::schema(format!(
                        "Incompatible types for field '{field_name}': {source_type:?} -> {target_type:?}"
                    )));
                }
            }
        } else {
            adapted_columns.push(create_null_array(target_type, batch.num_rows())?);
        }
    }

    Ok(RecordBatch::try_new(target_schema.clone(), adapted_columns)?)
}

/// Names of source columns whose types cannot be adapted to the target schema
#[must_use]
pub fn incompatible_columns(source: &Schema, target: &Schema) -> Vec<String> {
    target
        .fields()
        .iter()
        .filter_map(|target_field| {
            let source_field = source.field_with_name(target_field.name()).ok()?;
            (check_type_compatibility(source_field.data_type(), target_field.data_type())
                == TypeCompatibility::Incompatible)
                .then(|| target_field.name().clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int32Array};
    use arrow_schema::Field;

    use crate::schema::{columns, panel_schema};

    #[test]
    fn adapts_types_and_fills_missing_columns() {
        let source = Arc::new(Schema::new(vec![
            Field::new(columns::STATE, DataType::Utf8, true),
            Field::new(columns::YEAR, DataType::Int32, true),
            Field::new(columns::COMPANY, DataType::Utf8, true),
            Field::new(columns::BOARD, DataType::Boolean, true),
            Field::new("cnpj", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            source,
            vec![
                Arc::new(StringArray::from(vec!["DF", "SP"])),
                Arc::new(Int32Array::from(vec![2023, 2022])),
                Arc::new(StringArray::from(vec!["CAESB", "SABESP"])),
                Arc::new(BooleanArray::from(vec![Some(true), None])),
                Arc::new(StringArray::from(vec!["00.000", "11.111"])),
            ],
        )
        .unwrap();

        let adapted = adapt_record_batch(&batch, &panel_schema()).unwrap();

        assert_eq!(adapted.schema(), panel_schema());
        assert_eq!(adapted.num_rows(), 2);
        let board = adapted
            .column_by_name(columns::BOARD)
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(board.value(0), "Sim");
        assert!(board.is_null(1));
        let equity = adapted.column_by_name(columns::NET_EQUITY).unwrap();
        assert_eq!(equity.null_count(), 2);
    }

    #[test]
    fn numeric_text_is_parsed() {
        let array: ArrayRef = Arc::new(StringArray::from(vec![Some("12.5"), Some("n/d"), None]));
        let converted = convert_array(&array, &DataType::Float64).unwrap();
        let values = converted.as_any().downcast_ref::<Float64Array>().unwrap();
        assert!((values.value(0) - 12.5).abs() < f64::EPSILON);
        assert!(values.is_null(1));
        assert!(values.is_null(2));
    }

    #[test]
    fn temporal_to_numeric_is_incompatible() {
        assert_eq!(
            check_type_compatibility(&DataType::Date32, &DataType::Float64),
            TypeCompatibility::Incompatible
        );
        let source = Schema::new(vec![Field::new(columns::PROFIT, DataType::Date32, true)]);
        assert_eq!(
            incompatible_columns(&source, &panel_schema()),
            vec![columns::PROFIT.to_string()]
        );
    }
}
