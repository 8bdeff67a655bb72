//! Column layout of SRAG extracts and the Arrow schemas built from it.

pub mod columns;

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

/// Arrow schema of the lab columns read by the columnar classifier
#[must_use]
pub fn lab_schema() -> SchemaRef {
    let fields: Vec<Field> = columns::LAB_COLUMNS
        .iter()
        .map(|name| Field::new(*name, DataType::Int64, true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Arrow schema of the derived outcome columns
#[must_use]
pub fn outcome_schema() -> SchemaRef {
    use columns::derived;

    let mut fields: Vec<Field> = derived::ALL
        .iter()
        .filter(|name| **name != derived::POSITIVE_COUNT)
        .map(|name| {
            let nullable = *name != derived::NOT_TESTED && *name != derived::TESTING_IGNORED;
            Field::new(*name, DataType::Boolean, nullable)
        })
        .collect();
    fields.push(Field::new(derived::POSITIVE_COUNT, DataType::UInt8, true));
    Arc::new(Schema::new(fields))
}
