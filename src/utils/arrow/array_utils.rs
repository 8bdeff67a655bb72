//! Utilities for working with Arrow arrays.
//!
//! Extracts columns from record batches, casting to the types the readers
//! and the columnar classifier work with.

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::compute::kernels::cast::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::debug;

use crate::error::{Result, SragError};

/// Downcast a column to a specific array type with clear error messages
///
/// # Arguments
///
/// * `array` - The array reference to downcast
/// * `column_name` - The name of the column (for error messages)
/// * `expected_type_name` - A human-readable name of the expected type (for error messages)
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| SragError::InvalidDataType {
            column: column_name.to_string(),
            expected: expected_type_name.to_string(),
        })
}

/// Get the column index by name from a record batch
///
/// # Errors
/// Returns an error if the column does not exist
pub fn get_column_index(batch: &RecordBatch, column_name: &str) -> Result<usize> {
    batch
        .schema()
        .index_of(column_name)
        .map_err(|_| SragError::ColumnNotFound {
            column: column_name.to_string(),
        })
}

/// Get a column from a record batch by name
///
/// # Errors
/// Returns an error if the column does not exist
pub fn get_column_by_name<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a ArrayRef> {
    let idx = get_column_index(batch, column_name)?;
    Ok(batch.column(idx))
}

/// Fail on the first valid value of a float column with a fractional part
fn ensure_integral(values: &Float64Array, column_name: &str) -> Result<()> {
    match values
        .iter()
        .flatten()
        .find(|value| !value.is_finite() || value.fract() != 0.0)
    {
        Some(value) => Err(SragError::InvalidCode {
            column: column_name.to_string(),
            value: value.to_string(),
        }),
        None => Ok(()),
    }
}

/// Get a coded column as `Int64`, or an all-null column when it is missing
///
/// Floating point and string columns go through `Float64` first and must
/// hold integral values; a fractional code is an error rather than being
/// truncated. Strings that do not parse as numbers become null.
pub fn int64_column_or_null(batch: &RecordBatch, column_name: &str) -> Result<Int64Array> {
    let Ok(idx) = batch.schema().index_of(column_name) else {
        return Ok(Int64Array::new_null(batch.num_rows()));
    };
    let column = batch.column(idx);

    let converted = match column.data_type() {
        DataType::Int64 => column.clone(),
        other @ (DataType::Float16
        | DataType::Float32
        | DataType::Float64
        | DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Utf8View) => {
            debug!("Converting column '{column_name}' from {other:?} to Int64 via Float64");
            let floats = cast(column, &DataType::Float64)?;
            ensure_integral(
                downcast_array::<Float64Array>(&floats, column_name, "Float64")?,
                column_name,
            )?;
            cast(&floats, &DataType::Int64)?
        }
        other => {
            debug!("Converting column '{column_name}' from {other:?} to Int64");
            cast(column, &DataType::Int64)?
        }
    };

    downcast_array::<Int64Array>(&converted, column_name, "Int64").cloned()
}

/// Get a column as `Utf8`, or an all-null column when it is missing
pub fn string_column_or_null(batch: &RecordBatch, column_name: &str) -> Result<StringArray> {
    let Ok(idx) = batch.schema().index_of(column_name) else {
        return Ok(StringArray::new_null(batch.num_rows()));
    };
    let column = batch.column(idx);

    let converted = match column.data_type() {
        DataType::Utf8 => column.clone(),
        // Pass-through columns keep Arrow's display form
        _ => cast(column, &DataType::Utf8)?,
    };

    downcast_array::<StringArray>(&converted, column_name, "Utf8").cloned()
}
