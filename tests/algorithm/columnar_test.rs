use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int32Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::utils::{notification, random_lab};
use srag_weekly::algorithm::classify;
use srag_weekly::algorithm::lab_outcome::columnar::{
    classify_batch, classify_records, lab_batch, outcomes_from_batch,
};
use srag_weekly::models::{DerivedOutcome, LabFields, SurveillanceRecord};
use srag_weekly::schema::{columns, outcome_schema};

fn random_records(seed: u64, count: usize) -> Vec<SurveillanceRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| notification("35", 1, random_lab(&mut rng)))
        .collect()
}

/// Columnar and per-record evaluation agree on arbitrary codes
#[test]
fn test_columnar_matches_per_record() {
    let records = random_records(11, 20_000);
    let columnar = classify_records(&records).unwrap();
    let per_record: Vec<DerivedOutcome> = records.iter().map(|r| classify(&r.lab)).collect();
    assert_eq!(columnar.len(), per_record.len());
    for (index, (left, right)) in columnar.iter().zip(&per_record).enumerate() {
        assert_eq!(left, right, "row {index}: {:?}", records[index].lab);
    }
}

/// Output batch follows the outcome schema, flags null outside Tested
#[test]
fn test_outcome_batch_shape() {
    let records = vec![
        notification("35", 1, LabFields::default()),
        notification(
            "35",
            1,
            LabFields {
                pcr_result: Some(1),
                pcr_etiology: Some(2),
                ..Default::default()
            },
        ),
    ];
    let outcomes = classify_batch(&lab_batch(&records).unwrap()).unwrap();
    assert_eq!(outcomes.schema(), outcome_schema());
    assert_eq!(outcomes.num_rows(), 2);

    let flu_a = outcomes
        .column_by_name(columns::derived::FLU_A)
        .unwrap()
        .as_any()
        .downcast_ref::<BooleanArray>()
        .unwrap();
    assert!(flu_a.is_null(0));
    assert!(flu_a.value(1));

    let not_tested = outcomes
        .column_by_name(columns::derived::NOT_TESTED)
        .unwrap()
        .as_any()
        .downcast_ref::<BooleanArray>()
        .unwrap();
    assert_eq!(not_tested.null_count(), 0);
    assert!(not_tested.value(0));
    assert!(!not_tested.value(1));
}

/// Extract-typed columns (floats, narrow ints) classify like Int64 codes
#[test]
fn test_mixed_column_types() {
    let schema = Arc::new(Schema::new(vec![
        Field::new(columns::PCR_PERFORMED, DataType::Int32, true),
        Field::new(columns::PCR_RESULT, DataType::Float64, true),
        Field::new(columns::RSV, DataType::Float64, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(vec![Some(1), Some(1), None])) as ArrayRef,
            Arc::new(Float64Array::from(vec![Some(4.0), Some(2.0), None])),
            Arc::new(Float64Array::from(vec![None, Some(1.0), None])),
        ],
    )
    .unwrap();

    let outcomes = outcomes_from_batch(&classify_batch(&batch).unwrap()).unwrap();
    assert_eq!(outcomes[0].delayed, Some(true));
    assert_eq!(outcomes[1].vsr, Some(true));
    assert_eq!(outcomes[1].positive_count, Some(1));
    assert!(outcomes[2].not_tested());
}

/// A fractional code is refused instead of being truncated into a match
#[test]
fn test_fractional_code_is_refused() {
    let schema = Arc::new(Schema::new(vec![
        Field::new(columns::PCR_PERFORMED, DataType::Int32, true),
        Field::new(columns::FLU_A, DataType::Float64, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(vec![Some(1)])) as ArrayRef,
            Arc::new(Float64Array::from(vec![Some(1.9)])),
        ],
    )
    .unwrap();

    let err = classify_batch(&batch).unwrap_err();
    assert!(err.to_string().contains(columns::FLU_A));
}

/// An empty batch classifies to an empty batch
#[test]
fn test_empty_batch() {
    let outcomes = classify_records(&[]).unwrap();
    assert!(outcomes.is_empty());
}
