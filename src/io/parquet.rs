//! Parquet extract reader

use std::path::Path;
use std::time::Instant;

use arrow::array::{Array, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::compute::kernels::cast::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use indicatif::MultiProgress;
use log::warn;
use parquet::arrow::ProjectionMask;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::config::{DEFAULT_BATCH_SIZE, ReaderConfig};
use crate::error::{Result, SragError};
use crate::error::util::safe_open_file;
use crate::io::ReadOutput;
use crate::io::cells::{apply_cell, float_code, in_target_region, parse_code};
use crate::models::SurveillanceRecord;
use crate::schema::columns::{self, LAB_COLUMNS, SYMPTOM_COLUMNS, TARGET_COLUMNS};
use crate::utils::arrow::{downcast_array, int64_column_or_null, string_column_or_null};
use crate::utils::dates::parse_date_string;
use crate::utils::logging::{
    FileOp, attach, create_main_progress_bar, finish_progress_bar, hidden_or, log_file_complete,
    log_file_start,
};

fn value_str(array: &StringArray, row: usize) -> &str {
    if array.is_valid(row) { array.value(row) } else { "" }
}

/// A coded column in the physical type it was stored with
///
/// Integer columns are exact. Float and string columns are checked per
/// value, so a fractional code rejects its row like it does in CSV.
enum CodeColumn {
    Integers(Int64Array),
    Floats(Float64Array),
    Text(StringArray),
}

impl CodeColumn {
    fn from_batch(batch: &RecordBatch, name: &str) -> Result<Self> {
        let Ok(idx) = batch.schema().index_of(name) else {
            return Ok(Self::Integers(Int64Array::new_null(batch.num_rows())));
        };
        let column = batch.column(idx);
        match column.data_type() {
            DataType::Float16 | DataType::Float32 | DataType::Float64 => {
                let floats = cast(column, &DataType::Float64)?;
                Ok(Self::Floats(
                    downcast_array::<Float64Array>(&floats, name, "Float64")?.clone(),
                ))
            }
            data_type if data_type.is_integer() || *data_type == DataType::Boolean => {
                Ok(Self::Integers(int64_column_or_null(batch, name)?))
            }
            _ => Ok(Self::Text(string_column_or_null(batch, name)?)),
        }
    }

    fn code(&self, name: &str, row: usize) -> Result<Option<i64>> {
        match self {
            Self::Integers(array) => Ok(array.is_valid(row).then(|| array.value(row))),
            Self::Floats(array) if array.is_null(row) => Ok(None),
            Self::Floats(array) => float_code(name, array.value(row)),
            Self::Text(array) => parse_code(name, value_str(array, row)),
        }
    }
}

/// The notification date column, as days or as text to parse
enum DateColumn {
    Days(Date32Array),
    Text(StringArray),
}

impl DateColumn {
    /// `Date64` and timestamp columns (pandas `datetime64`) are cast to days
    fn from_batch(batch: &RecordBatch, name: &str) -> Result<Self> {
        let Ok(idx) = batch.schema().index_of(name) else {
            return Ok(Self::Days(Date32Array::new_null(batch.num_rows())));
        };
        let column = batch.column(idx);
        match column.data_type() {
            DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
                let days = cast(column, &DataType::Date32)?;
                Ok(Self::Days(
                    downcast_array::<Date32Array>(&days, name, "Date32")?.clone(),
                ))
            }
            _ => Ok(Self::Text(string_column_or_null(batch, name)?)),
        }
    }

    fn date(&self, row: usize, config: &ReaderConfig) -> Option<NaiveDate> {
        match self {
            Self::Days(array) => array.is_valid(row).then(|| array.value_as_date(row)).flatten(),
            Self::Text(array) => {
                parse_date_string(value_str(array, row), &config.date_format_config)
            }
        }
    }
}

/// Typed views over the target columns of one batch
struct BatchColumns {
    week: CodeColumn,
    date: DateColumn,
    region: StringArray,
    residence_region: StringArray,
    symptoms: Vec<(&'static str, CodeColumn)>,
    lab: Vec<(&'static str, CodeColumn)>,
    passthrough: Vec<(&'static str, StringArray)>,
}

impl BatchColumns {
    fn from_batch(batch: &RecordBatch) -> Result<Self> {
        let coded = |names: &[&'static str]| -> Result<Vec<(&'static str, CodeColumn)>> {
            names
                .iter()
                .map(|name| Ok((*name, CodeColumn::from_batch(batch, name)?)))
                .collect()
        };
        let schema = batch.schema();
        let passthrough = TARGET_COLUMNS
            .iter()
            .filter(|name| !columns::is_modelled(name) && schema.index_of(name).is_ok())
            .map(|name| Ok((*name, string_column_or_null(batch, name)?)))
            .collect::<Result<_>>()?;

        Ok(Self {
            week: CodeColumn::from_batch(batch, columns::NOTIFICATION_WEEK)?,
            date: DateColumn::from_batch(batch, columns::NOTIFICATION_DATE)?,
            region: string_column_or_null(batch, columns::REGION)?,
            residence_region: string_column_or_null(batch, columns::RESIDENCE_REGION)?,
            symptoms: coded(&SYMPTOM_COLUMNS[..])?,
            lab: coded(&LAB_COLUMNS[..])?,
            passthrough,
        })
    }

    fn record(&self, row: usize, config: &ReaderConfig) -> Result<SurveillanceRecord> {
        let mut record = SurveillanceRecord {
            notification_week: self.week.code(columns::NOTIFICATION_WEEK, row)?,
            notification_date: self.date.date(row, config),
            ..Default::default()
        };
        apply_cell(&mut record, columns::REGION, value_str(&self.region, row), config)?;
        apply_cell(
            &mut record,
            columns::RESIDENCE_REGION,
            value_str(&self.residence_region, row),
            config,
        )?;

        for (name, column) in &self.symptoms {
            if let Some(field) = record.symptoms.field_mut(name) {
                *field = column.code(name, row)?;
            }
        }
        for (name, column) in &self.lab {
            if let Some(field) = record.lab.field_mut(name) {
                *field = column.code(name, row)?;
            }
        }
        for (name, array) in &self.passthrough {
            apply_cell(&mut record, name, value_str(array, row), config)?;
        }
        Ok(record)
    }
}

/// Read one Parquet extract, projecting to the target columns
///
/// Code columns may be stored as integers, floats or strings. A row holding
/// a fractional or unparsable code, or a malformed region, is rejected and
/// counted. Date columns may be `Date32`, `Date64`, timestamps or strings.
pub fn read_parquet_file(path: &Path, config: &ReaderConfig) -> Result<ReadOutput> {
    read_parquet_file_in(path, config, None)
}

/// [`read_parquet_file`] with its progress bar placed under `multi`
pub(crate) fn read_parquet_file_in(
    path: &Path,
    config: &ReaderConfig,
    multi: Option<&MultiProgress>,
) -> Result<ReadOutput> {
    let start = Instant::now();
    log_file_start(FileOp::Read, "parquet extract", path);

    let file = safe_open_file(path, "extract")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let file_schema = builder.schema().clone();
    let projection: Vec<usize> = TARGET_COLUMNS
        .iter()
        .filter_map(|name| file_schema.index_of(name).ok())
        .collect();
    if projection.is_empty() {
        return Err(SragError::Schema(format!(
            "{} has none of the SRAG target columns",
            path.display()
        )));
    }
    let mask = ProjectionMask::roots(builder.parquet_schema(), projection);
    let total_rows = u64::try_from(builder.metadata().file_metadata().num_rows()).unwrap_or(0);
    let reader = builder
        .with_projection(mask)
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .build()?;

    let file_name = path.file_name().map(|name| name.to_string_lossy().into_owned());
    let progress = hidden_or(config.show_progress, || {
        attach(multi, create_main_progress_bar(total_rows, file_name.as_deref()))
    });

    let mut output = ReadOutput::default();
    output.report.files = 1;
    for batch in reader {
        let batch = batch?;
        let columns = BatchColumns::from_batch(&batch)?;
        for row in 0..batch.num_rows() {
            output.report.rows += 1;
            match columns.record(row, config) {
                Ok(record) if in_target_region(&record, config) => output.records.push(record),
                Ok(_) => output.report.outside_target_region += 1,
                Err(err) => {
                    warn!("Rejected row {} of {}: {err}", output.report.rows, path.display());
                    output.report.rejected += 1;
                }
            }
        }
        progress.inc(batch.num_rows() as u64);
    }

    finish_progress_bar(&progress, Some("done"));
    output.report.records = output.records.len();
    log_file_complete(
        FileOp::Read,
        path,
        output.records.len(),
        "records",
        Some(start.elapsed()),
    );
    Ok(output)
}
