//! Configuration for reading and processing SRAG extracts.

use std::fmt;
use std::str::FromStr;

use log::warn;

use crate::error::SragError;
use crate::models::codes;

/// Default number of records per columnar batch
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Default kept-record count from which `EvaluationMode::Auto` goes columnar
pub const DEFAULT_COLUMNAR_THRESHOLD: usize = 250_000;

/// Which region column keys the weekly table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionBasis {
    /// `SG_UF_NOT` - region where the case was notified
    #[default]
    Notification,
    /// `SG_UF` - region of residence
    Residence,
}

impl fmt::Display for RegionBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Notification => write!(f, "notification"),
            Self::Residence => write!(f, "residence"),
        }
    }
}

/// Strategy used to classify kept records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationMode {
    /// Columnar when the kept set reaches `columnar_threshold`
    #[default]
    Auto,
    /// One pure function call per record
    PerRecord,
    /// Arrow boolean masks over record batches
    Columnar,
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::PerRecord => write!(f, "per-record"),
            Self::Columnar => write!(f, "columnar"),
        }
    }
}

impl FromStr for EvaluationMode {
    type Err = SragError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "per-record" | "record" | "row" => Ok(Self::PerRecord),
            "columnar" | "column" | "batch" => Ok(Self::Columnar),
            other => Err(SragError::Config(format!(
                "unknown evaluation mode '{other}' (expected auto, per-record or columnar)"
            ))),
        }
    }
}

/// Configuration for date format handling
#[derive(Debug, Clone)]
pub struct DateFormatConfig {
    /// List of date format strings to try when parsing dates
    pub date_formats: Vec<String>,
    /// Format used when writing dates back out
    pub output_format: String,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%d/%m/%Y".to_string(), // SINAN extracts: 15/01/2013
                "%Y-%m-%d".to_string(), // ISO format: 2013-01-15
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%d-%m-%Y".to_string(),
                "%Y%m%d".to_string(), // Compact: 20130115
            ],
            output_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// Configuration for the extract readers
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Field delimiter of delimited extracts
    pub delimiter: u8,
    /// Date parsing configuration
    pub date_format_config: DateFormatConfig,
    /// Keep only notifications from this (normalized) region
    pub target_region: Option<String>,
    /// Region column the target filter applies to
    pub region_basis: RegionBasis,
    /// Show progress bars while reading several files
    pub show_progress: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            date_format_config: DateFormatConfig::default(),
            target_region: None,
            region_basis: RegionBasis::default(),
            show_progress: false,
        }
    }
}

/// Configuration for the classification pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Region column keying the weekly table
    pub region_basis: RegionBasis,
    /// Classification strategy
    pub evaluation: EvaluationMode,
    /// Kept-record count from which `Auto` switches to columnar evaluation
    pub columnar_threshold: usize,
    /// Records per columnar batch
    pub batch_size: usize,
    /// Worker threads (rayon)
    pub threads: usize,
    /// `EVOLUCAO` code that satisfies the case definition on its own
    pub death_code: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            region_basis: RegionBasis::default(),
            evaluation: EvaluationMode::default(),
            columnar_threshold: DEFAULT_COLUMNAR_THRESHOLD,
            batch_size: DEFAULT_BATCH_SIZE,
            threads: num_cpus::get(),
            death_code: codes::outcome::DEATH,
        }
    }
}

impl PipelineConfig {
    /// Apply `SRAG_BATCH_SIZE` and `SRAG_COLUMNAR_THRESHOLD` from the environment
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(batch_size) = env_usize("SRAG_BATCH_SIZE") {
            self.batch_size = batch_size;
        }
        if let Some(threshold) = env_usize("SRAG_COLUMNAR_THRESHOLD") {
            self.columnar_threshold = threshold;
        }
        self
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.batch_size == 0 {
            return Err(SragError::Config("batch size must be positive".to_string()));
        }
        if self.threads == 0 {
            return Err(SragError::Config("thread count must be positive".to_string()));
        }
        Ok(())
    }
}

fn env_usize(name: &str) -> Option<usize> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {name}={raw}: not a non-negative integer");
            None
        }
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        writeln!(f, "  Region Basis: {}", self.region_basis)?;
        writeln!(f, "  Evaluation: {}", self.evaluation)?;
        writeln!(f, "  Columnar Threshold: {}", self.columnar_threshold)?;
        writeln!(f, "  Batch Size: {}", self.batch_size)?;
        writeln!(f, "  Threads: {}", self.threads)?;
        writeln!(f, "  Death Code: {}", self.death_code)
    }
}
