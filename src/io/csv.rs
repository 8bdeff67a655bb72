//! Delimited extract reader
//!
//! Columns are looked up by header name and restricted to the target column
//! list. Cells are decoded lossily since legacy extracts are not guaranteed
//! to be UTF-8.

use std::borrow::Cow;
use std::path::Path;
use std::time::Instant;

use csv::{ByteRecord, ReaderBuilder};
use indicatif::MultiProgress;
use log::warn;

use crate::config::ReaderConfig;
use crate::error::{Result, SragError};
use crate::error::util::safe_open_file;
use crate::io::ReadOutput;
use crate::io::cells::{apply_cell, in_target_region};
use crate::models::SurveillanceRecord;
use crate::schema::columns::TARGET_COLUMNS;
use crate::utils::logging::{
    FileOp, attach, create_spinner, finish_progress_bar, hidden_or, log_file_complete,
    log_file_start, log_warning,
};

/// Header positions of the target columns present in a file
#[derive(Debug, Clone)]
struct ColumnMap {
    positions: Vec<(usize, &'static str)>,
}

impl ColumnMap {
    fn from_headers(headers: &ByteRecord) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .filter_map(|(index, header)| {
                let name = String::from_utf8_lossy(header);
                let name = name.trim().trim_start_matches('\u{feff}');
                TARGET_COLUMNS
                    .iter()
                    .find(|column| **column == name)
                    .map(|column| (index, *column))
            })
            .collect();
        Self { positions }
    }

    fn missing(&self) -> Vec<&'static str> {
        TARGET_COLUMNS
            .iter()
            .filter(|column| !self.positions.iter().any(|(_, found)| found == *column))
            .copied()
            .collect()
    }
}

fn decode_row(
    row: &ByteRecord,
    map: &ColumnMap,
    config: &ReaderConfig,
) -> Result<SurveillanceRecord> {
    let mut record = SurveillanceRecord::default();
    for (index, column) in &map.positions {
        let raw: Cow<'_, str> = row
            .get(*index)
            .map_or(Cow::Borrowed(""), String::from_utf8_lossy);
        apply_cell(&mut record, column, &raw, config)?;
    }
    Ok(record)
}

/// Read one delimited extract
///
/// Fails with a schema error when the header holds none of the target
/// columns, since such a file cannot be a SRAG extract.
pub fn read_csv_file(path: &Path, config: &ReaderConfig) -> Result<ReadOutput> {
    read_csv_file_in(path, config, None)
}

/// [`read_csv_file`] with its spinner placed under `multi`
pub(crate) fn read_csv_file_in(
    path: &Path,
    config: &ReaderConfig,
    multi: Option<&MultiProgress>,
) -> Result<ReadOutput> {
    let start = Instant::now();
    log_file_start(FileOp::Read, "delimited extract", path);

    let file = safe_open_file(path, "extract")?;
    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .flexible(true)
        .from_reader(file);

    let map = ColumnMap::from_headers(reader.byte_headers()?);
    if map.positions.is_empty() {
        return Err(SragError::Schema(format!(
            "{} has none of the SRAG target columns",
            path.display()
        )));
    }
    let missing = map.missing();
    if !missing.is_empty() {
        log_warning(
            &format!(
                "{} target columns absent, read as null ({})",
                missing.len(),
                missing.join(", ")
            ),
            Some(path),
        );
    }

    let file_name = path.file_name().map(|name| name.to_string_lossy().into_owned());
    let progress = hidden_or(config.show_progress, || {
        attach(multi, create_spinner(file_name.as_deref()))
    });

    let mut output = ReadOutput::default();
    output.report.files = 1;
    let mut row = ByteRecord::new();
    while reader.read_byte_record(&mut row)? {
        output.report.rows += 1;
        progress.inc(1);

        match decode_row(&row, &map, config) {
            Ok(record) if in_target_region(&record, config) => output.records.push(record),
            Ok(_) => output.report.outside_target_region += 1,
            Err(err) => {
                let line = row.position().map_or(0, csv::Position::line);
                warn!("Rejected row at {}:{line}: {err}", path.display());
                output.report.rejected += 1;
            }
        }
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
