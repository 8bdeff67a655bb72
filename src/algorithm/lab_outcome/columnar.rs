//! Columnar lab outcome classification over Arrow record batches
//!
//! Evaluates the guards in [`super::guards`] as boolean masks over whole
//! columns. Every mask is null-free: a null code simply does not match.
//! Flags of rows outside the `Tested` bucket are nulled at the end, which
//! matches the `None` the per-record classifier leaves there.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Int64Array, RecordBatch, UInt8Array};
use arrow::compute::kernels::boolean::{and, not, or};
use arrow::compute::nullif;
use log::debug;

use super::guards::{self, ResultCategory, RESULT_GUARDS};
use crate::error::{Result, SragError};
use crate::models::codes::{self, etiology};
use crate::models::{DerivedOutcome, SurveillanceRecord, TestingStatus};
use crate::schema::{self, columns};
use crate::utils::arrow::array_utils::{downcast_array, get_column_by_name, int64_column_or_null};

/// Mask of rows whose code is one of `codes`
fn any_code(column: &Int64Array, codes: &[i64]) -> BooleanArray {
    column
        .iter()
        .map(|value| Some(codes::is_any(value, codes)))
        .collect()
}

/// Mask of rows whose code is null or one of `codes`
fn null_or_code(column: &Int64Array, codes: &[i64]) -> BooleanArray {
    column
        .iter()
        .map(|value| Some(codes::is_null_or_any(value, codes)))
        .collect()
}

fn any_of(masks: &[BooleanArray], len: usize) -> Result<BooleanArray> {
    masks
        .iter()
        .try_fold(BooleanArray::from(vec![false; len]), |acc, mask| {
            or(&acc, mask).map_err(SragError::from)
        })
}

fn all_of(masks: &[BooleanArray], len: usize) -> Result<BooleanArray> {
    masks
        .iter()
        .try_fold(BooleanArray::from(vec![true; len]), |acc, mask| {
            and(&acc, mask).map_err(SragError::from)
        })
}

/// Lab columns of a batch, cast to Int64; missing columns are all-null
struct LabColumns {
    immunofluorescence: Int64Array,
    pcr_performed: Int64Array,
    other_method: Int64Array,
    pcr_result: Int64Array,
    culture_result: Int64Array,
    hemagglutination_result: Int64Array,
    pcr_etiology: Int64Array,
    hemagglutination_etiology: Int64Array,
    flu_a: Int64Array,
    flu_b: Int64Array,
    rsv: Int64Array,
    parainfluenza1: Int64Array,
    parainfluenza2: Int64Array,
    parainfluenza3: Int64Array,
    adenovirus: Int64Array,
    other: Int64Array,
}

impl LabColumns {
    fn from_batch(batch: &RecordBatch) -> Result<Self> {
        let column = |name: &str| int64_column_or_null(batch, name);
        Ok(Self {
            immunofluorescence: column(columns::IMMUNOFLUORESCENCE)?,
            pcr_performed: column(columns::PCR_PERFORMED)?,
            other_method: column(columns::OTHER_METHOD)?,
            pcr_result: column(columns::PCR_RESULT)?,
            culture_result: column(columns::CULTURE_RESULT)?,
            hemagglutination_result: column(columns::HEMAGGLUTINATION_RESULT)?,
            pcr_etiology: column(columns::PCR_ETIOLOGY)?,
            hemagglutination_etiology: column(columns::HEMAGGLUTINATION_ETIOLOGY)?,
            flu_a: column(columns::FLU_A)?,
            flu_b: column(columns::FLU_B)?,
            rsv: column(columns::RSV)?,
            parainfluenza1: column(columns::PARAINFLUENZA1)?,
            parainfluenza2: column(columns::PARAINFLUENZA2)?,
            parainfluenza3: column(columns::PARAINFLUENZA3)?,
            adenovirus: column(columns::ADENOVIRUS)?,
            other: column(columns::OTHER)?,
        })
    }

    fn result_fields(&self) -> [&Int64Array; 10] {
        [
            &self.pcr_result,
            &self.hemagglutination_result,
            &self.flu_a,
            &self.flu_b,
            &self.rsv,
            &self.parainfluenza1,
            &self.parainfluenza2,
            &self.parainfluenza3,
            &self.adenovirus,
            &self.other,
        ]
    }

    fn tested(&self, len: usize) -> Result<BooleanArray> {
        any_of(
            &[
                any_code(&self.pcr_result, &guards::TESTED_PCR_RESULTS),
                any_code(&self.culture_result, &guards::TESTED_CULTURE_RESULTS),
                any_code(&self.hemagglutination_result, &guards::TESTED_HEMAGGLUTINATION_RESULTS),
                any_code(&self.immunofluorescence, &guards::METHOD_USED),
                any_code(&self.pcr_performed, &guards::METHOD_USED),
                any_code(&self.other_method, &guards::METHOD_USED),
            ],
            len,
        )
    }

    fn not_tested_condition(&self, len: usize) -> Result<BooleanArray> {
        let no_method = all_of(
            &[
                null_or_code(&self.immunofluorescence, &guards::METHOD_NOT_USED),
                null_or_code(&self.pcr_performed, &guards::METHOD_NOT_USED),
                null_or_code(&self.other_method, &guards::METHOD_NOT_USED),
            ],
            len,
        )?;
        any_of(
            &[
                any_code(&self.pcr_result, &guards::NOT_TESTED_PCR_RESULTS),
                any_code(&self.culture_result, &guards::NOT_TESTED_CULTURE_RESULTS),
                any_code(
                    &self.hemagglutination_result,
                    &guards::NOT_TESTED_HEMAGGLUTINATION_RESULTS,
                ),
                no_method,
            ],
            len,
        )
    }

    fn by_etiology_or_flag(
        &self,
        etiologies: &[i64],
        flags: &[&Int64Array],
        len: usize,
    ) -> Result<BooleanArray> {
        let mut masks = vec![
            any_code(&self.pcr_etiology, etiologies),
            any_code(&self.hemagglutination_etiology, etiologies),
        ];
        masks.extend(
            flags
                .iter()
                .map(|flag| any_code(flag, &guards::PATHOGEN_POSITIVE)),
        );
        any_of(&masks, len)
    }

    /// One mask per result category, applying the guards in precedence order
    fn result_categories(&self, len: usize) -> Result<Vec<(ResultCategory, BooleanArray)>> {
        let fields = self.result_fields();
        let mut remaining = BooleanArray::from(vec![true; len]);
        let mut categories = Vec::with_capacity(RESULT_GUARDS.len());

        for guard in &RESULT_GUARDS {
            let masks: Vec<BooleanArray> = fields
                .iter()
                .map(|field| null_or_code(field, guard.accepted))
                .collect();
            let holds = all_of(&masks, len)?;
            categories.push((guard.category, and(&remaining, &holds)?));
            remaining = and(&remaining, &not(&holds)?)?;
        }
        Ok(categories)
    }
}

fn category_mask(
    categories: &[(ResultCategory, BooleanArray)],
    wanted: ResultCategory,
    len: usize,
) -> BooleanArray {
    categories
        .iter()
        .find(|(category, _)| *category == wanted)
        .map_or_else(|| BooleanArray::from(vec![false; len]), |(_, mask)| mask.clone())
}

fn positive_counts(masks: [&BooleanArray; 4], len: usize) -> UInt8Array {
    (0..len)
        .map(|row| {
            Some(
                masks
                    .iter()
                    .map(|mask| u8::from(mask.value(row)))
                    .sum::<u8>(),
            )
        })
        .collect()
}

/// Classify every row of `batch`, returning the derived outcome columns
///
/// The output follows [`schema::outcome_schema`]; rows line up with the input.
pub fn classify_batch(batch: &RecordBatch) -> Result<RecordBatch> {
    let len = batch.num_rows();
    let lab = LabColumns::from_batch(batch)?;

    let tested = lab.tested(len)?;
    let untested = not(&tested)?;
    let not_tested_condition = lab.not_tested_condition(len)?;
    let not_tested = and(&untested, &not_tested_condition)?;
    let testing_ignored = and(&untested, &not(&not_tested_condition)?)?;

    let flu_a = lab.by_etiology_or_flag(&etiology::FLU_A, &[&lab.flu_a], len)?;
    let flu_b = lab.by_etiology_or_flag(&guards::FLU_B_ETIOLOGIES, &[&lab.flu_b], len)?;
    let vsr = any_code(&lab.rsv, &guards::PATHOGEN_POSITIVE);
    let others = lab.by_etiology_or_flag(
        &guards::OTHER_ETIOLOGIES,
        &[
            &lab.parainfluenza1,
            &lab.parainfluenza2,
            &lab.parainfluenza3,
            &lab.adenovirus,
            &lab.other,
        ],
        len,
    )?;

    let categories = lab.result_categories(len)?;
    let delayed = category_mask(&categories, ResultCategory::Delayed, len);
    let inconclusive = category_mask(&categories, ResultCategory::Inconclusive, len);

    let negative = not(&any_of(
        &[
            flu_a.clone(),
            flu_b.clone(),
            vsr.clone(),
            others.clone(),
            delayed.clone(),
            inconclusive.clone(),
        ],
        len,
    )?)?;
    let positive_count = positive_counts([&flu_a, &flu_b, &vsr, &others], len);

    // Flags only exist for tested rows
    let only_tested = |array: &dyn Array| -> Result<ArrayRef> { Ok(nullif(array, &untested)?) };
    let columns: Vec<ArrayRef> = vec![
        only_tested(&flu_a as &dyn Array)?,
        only_tested(&flu_b as &dyn Array)?,
        only_tested(&vsr as &dyn Array)?,
        only_tested(&others as &dyn Array)?,
        only_tested(&delayed as &dyn Array)?,
        only_tested(&inconclusive as &dyn Array)?,
        only_tested(&negative as &dyn Array)?,
        Arc::new(not_tested),
        Arc::new(testing_ignored),
        only_tested(&positive_count as &dyn Array)?,
    ];

    debug!("Classified batch of {len} rows");
    Ok(RecordBatch::try_new(schema::outcome_schema(), columns)?)
}

/// Build a batch of the lab columns of `records`
pub fn lab_batch(records: &[SurveillanceRecord]) -> Result<RecordBatch> {
    let values: Vec<[Option<i64>; 16]> = records.iter().map(|r| r.lab.coded_values()).collect();
    let columns: Vec<ArrayRef> = (0..columns::LAB_COLUMNS.len())
        .map(|index| {
            let array: Int64Array = values.iter().map(|row| row[index]).collect();
            Arc::new(array) as ArrayRef
        })
        .collect();

    Ok(RecordBatch::try_new(schema::lab_schema(), columns)?)
}

fn boolean_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a BooleanArray> {
    let array = get_column_by_name(batch, name)?;
    downcast_array::<BooleanArray>(array, name, "Boolean")
}

fn optional_flag(array: &BooleanArray, row: usize) -> Option<bool> {
    array.is_valid(row).then(|| array.value(row))
}

/// Read the outcome columns produced by [`classify_batch`] back into outcomes
pub fn outcomes_from_batch(batch: &RecordBatch) -> Result<Vec<DerivedOutcome>> {
    use columns::derived;

    let flu_a = boolean_column(batch, derived::FLU_A)?;
    let flu_b = boolean_column(batch, derived::FLU_B)?;
    let vsr = boolean_column(batch, derived::VSR)?;
    let others = boolean_column(batch, derived::OTHERS)?;
    let delayed = boolean_column(batch, derived::DELAYED)?;
    let inconclusive = boolean_column(batch, derived::INCONCLUSIVE)?;
    let negative = boolean_column(batch, derived::NEGATIVE)?;
    let not_tested = boolean_column(batch, derived::NOT_TESTED)?;
    let testing_ignored = boolean_column(batch, derived::TESTING_IGNORED)?;
    let positive_count = downcast_array::<UInt8Array>(
        get_column_by_name(batch, derived::POSITIVE_COUNT)?,
        derived::POSITIVE_COUNT,
        "UInt8",
    )?;

    let outcomes = (0..batch.num_rows())
        .map(|row| {
            let status = if not_tested.value(row) {
                TestingStatus::NotTested
            } else if testing_ignored.value(row) {
                TestingStatus::TestingIgnored
            } else {
                TestingStatus::Tested
            };
            DerivedOutcome {
                status,
                flu_a: optional_flag(flu_a, row),
                flu_b: optional_flag(flu_b, row),
                vsr: optional_flag(vsr, row),
                others: optional_flag(others, row),
                delayed: optional_flag(delayed, row),
                inconclusive: optional_flag(inconclusive, row),
                negative: optional_flag(negative, row),
                positive_count: positive_count
                    .is_valid(row)
                    .then(|| positive_count.value(row)),
            }
        })
        .collect();
    Ok(outcomes)
}

/// Classify records through the columnar path, preserving order
pub fn classify_records(records: &[SurveillanceRecord]) -> Result<Vec<DerivedOutcome>> {
    let batch = lab_batch(records)?;
    let outcomes = classify_batch(&batch)?;
    outcomes_from_batch(&outcomes)
}
