//! Writers for cleaned records, the weekly table and the run summary

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use arrow::datatypes::FieldRef;
use parquet::arrow::ArrowWriter;
use serde::Serialize;
use serde_arrow::schema::{SchemaLike, TracingOptions};

use crate::config::DateFormatConfig;
use crate::error::Result;
use crate::error::util::safe_create_file;
use crate::io::ReadReport;
use crate::models::{ClassifiedRecord, DerivedOutcome, SurveillanceRecord, WeeklyRow};
use crate::pipeline::RunStats;
use crate::schema::columns::{self, LAB_COLUMNS, SYMPTOM_COLUMNS, TARGET_COLUMNS, derived};
use crate::utils::dates::format_date;
use crate::utils::logging::{FileOp, log_file_complete, log_file_start};

fn flag_cell(flag: Option<bool>) -> String {
    flag.map_or_else(String::new, |value| u8::from(value).to_string())
}

fn code_cell(code: Option<i64>) -> String {
    code.map_or_else(String::new, |value| value.to_string())
}

/// Render a target column of `record` as written to the cleaned output
fn target_cell(record: &SurveillanceRecord, column: &str, dates: &DateFormatConfig) -> String {
    match column {
        columns::NOTIFICATION_WEEK => code_cell(record.notification_week),
        columns::NOTIFICATION_DATE => record
            .notification_date
            .map_or_else(String::new, |date| format_date(date, dates)),
        columns::REGION => record.region.clone().unwrap_or_default(),
        columns::RESIDENCE_REGION => record.residence_region.clone().unwrap_or_default(),
        _ => {
            if let Some(index) = SYMPTOM_COLUMNS.iter().position(|c| *c == column) {
                code_cell(record.symptoms.coded_values()[index])
            } else if let Some(index) = LAB_COLUMNS.iter().position(|c| *c == column) {
                code_cell(record.lab.coded_values()[index])
            } else {
                record.passthrough.get(column).cloned().unwrap_or_default()
            }
        }
    }
}

/// Derived columns in `derived::ALL` order
fn derived_cells(outcome: &DerivedOutcome) -> [String; 10] {
    [
        flag_cell(outcome.flu_a),
        flag_cell(outcome.flu_b),
        flag_cell(outcome.vsr),
        flag_cell(outcome.others),
        flag_cell(outcome.delayed),
        flag_cell(outcome.inconclusive),
        flag_cell(outcome.negative),
        flag_cell(Some(outcome.not_tested())),
        flag_cell(Some(outcome.testing_ignored())),
        outcome
            .positive_count
            .map_or_else(String::new, |count| count.to_string()),
    ]
}

/// Write kept records with their derived columns
///
/// Flags that do not apply to a record's testing status are left empty.
pub fn write_cleaned_csv(
    path: &Path,
    records: &[ClassifiedRecord],
    delimiter: u8,
    dates: &DateFormatConfig,
) -> Result<()> {
    let start = Instant::now();
    log_file_start(FileOp::Write, "cleaned records", path);

    let file = safe_create_file(path, "cleaned records")?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(file);

    writer.write_record(TARGET_COLUMNS.iter().chain(derived::ALL.iter()))?;
    for classified in records {
        let targets = TARGET_COLUMNS
            .iter()
            .map(|column| target_cell(&classified.record, column, dates));
        let outcome_cells = derived_cells(&classified.outcome);
        writer.write_record(targets.chain(outcome_cells))?;
    }
    writer.flush().map_err(|e| crate::error::SragError::io(path, e))?;

    log_file_complete(
        FileOp::Write,
        path,
        records.len(),
        "cleaned records",
        Some(start.elapsed()),
    );
    Ok(())
}

/// Write the weekly table; `.parquet` paths get Parquet, anything else
/// delimited text using `delimiter`
pub fn write_weekly(path: &Path, rows: &[WeeklyRow], delimiter: u8) -> Result<()> {
    let is_parquet = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        write_weekly_parquet(path, rows)
    } else {
        write_weekly_csv(path, rows, delimiter)
    }
}

/// Write the weekly table as delimited text with the contract header
pub fn write_weekly_csv(path: &Path, rows: &[WeeklyRow], delimiter: u8) -> Result<()> {
    log_file_start(FileOp::Write, "weekly table", path);
    let file = safe_create_file(path, "weekly table")?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(file);

    // serialize only emits a header with the first row
    if rows.is_empty() {
        writer.write_record(columns::WEEKLY_COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| crate::error::SragError::io(path, e))?;

    log_file_complete(FileOp::Write, path, rows.len(), "weekly rows", None);
    Ok(())
}

/// Write the weekly table as a single-batch Parquet file
pub fn write_weekly_parquet(path: &Path, rows: &[WeeklyRow]) -> Result<()> {
    log_file_start(FileOp::Write, "weekly table", path);

    let fields = Vec::<FieldRef>::from_type::<WeeklyRow>(TracingOptions::default())?;
    let batch = serde_arrow::to_record_batch(&fields, &rows)?;

    let file = safe_create_file(path, "weekly table")?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;

    log_file_complete(FileOp::Write, path, rows.len(), "weekly rows", None);
    Ok(())
}

/// JSON summary of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary<'a> {
    /// Input files in read order
    pub inputs: Vec<String>,
    /// Reader counts
    pub read: &'a ReadReport,
    /// Filter, classification and aggregation counts
    pub run: &'a RunStats,
}

/// Write the run summary as pretty-printed JSON
pub fn write_summary(path: &Path, summary: &RunSummary<'_>) -> Result<()> {
    log_file_start(FileOp::Write, "run summary", path);
    let file = safe_create_file(path, "run summary")?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|e| crate::error::SragError::io(path, e))?;
    Ok(())
}
