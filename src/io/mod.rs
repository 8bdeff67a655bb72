//! Extract readers and output writers
//!
//! Everything that touches the filesystem lives here; the classification
//! core only sees in-memory records.

pub mod cells;
pub mod csv;
pub mod parquet;
pub mod region;
pub mod writer;

use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use indicatif::MultiProgress;
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ReaderConfig;
use crate::error::Result;
use crate::models::SurveillanceRecord;
use crate::utils::logging::{create_multi_progress, finish_progress_bar};

pub use region::normalize_region_code;

/// Row counts of one or more read files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadReport {
    /// Files read
    pub files: usize,
    /// Data rows seen
    pub rows: usize,
    /// Records handed to the pipeline
    pub records: usize,
    /// Rows with a malformed code or region cell
    pub rejected: usize,
    /// Rows dropped by the target-region pre-filter
    pub outside_target_region: usize,
}

impl AddAssign for ReadReport {
    fn add_assign(&mut self, other: Self) {
        self.files += other.files;
        self.rows += other.rows;
        self.records += other.records;
        self.rejected += other.rejected;
        self.outside_target_region += other.outside_target_region;
    }
}

/// Records read from extracts, with their counts
#[derive(Debug, Clone, Default)]
pub struct ReadOutput {
    pub records: Vec<SurveillanceRecord>,
    pub report: ReadReport,
}

fn is_parquet(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"))
}

/// Read one extract, choosing the reader by file extension
pub fn read_extract(path: &Path, config: &ReaderConfig) -> Result<ReadOutput> {
    read_extract_in(path, config, None)
}

fn read_extract_in(
    path: &Path,
    config: &ReaderConfig,
    multi: Option<&MultiProgress>,
) -> Result<ReadOutput> {
    if is_parquet(path) {
        parquet::read_parquet_file_in(path, config, multi)
    } else {
        csv::read_csv_file_in(path, config, multi)
    }
}

/// Read several extracts in parallel, concatenated in argument order
///
/// With progress enabled, every file's bar sits under one shared display
/// headed by a bar counting finished files.
pub fn read_extracts(paths: &[PathBuf], config: &ReaderConfig) -> Result<ReadOutput> {
    let multi = config
        .show_progress
        .then(|| create_multi_progress(paths.len() as u64, Some("extracts")));

    let outputs: Vec<ReadOutput> = paths
        .par_iter()
        .map(|path| {
            let output = read_extract_in(path, config, multi.as_ref().map(|(mp, _)| mp));
            if let Some((_, files)) = &multi {
                files.inc(1);
            }
            output
        })
        .collect::<Result<_>>()?;

    if let Some((_, files)) = &multi {
        finish_progress_bar(files, Some("done"));
    }

    let mut combined = ReadOutput::default();
    for output in outputs {
        combined.records.extend(output.records);
        combined.report += output.report;
    }

    info!(
        "Read {} records from {} files ({} rows rejected, {} outside target region)",
        combined.report.records,
        combined.report.files,
        combined.report.rejected,
        combined.report.outside_target_region
    );
    Ok(combined)
}
