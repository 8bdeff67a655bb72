//! Weekly SRAG laboratory surveillance counts from SINAN notification extracts.
//!
//! Reads notification extracts, keeps the notifications that meet the SRAG
//! case definition, classifies each by testing status and laboratory outcome,
//! and aggregates the outcomes into per-region weekly counts.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod utils;

// Core types
pub use config::{EvaluationMode, PipelineConfig, ReaderConfig, RegionBasis};
pub use error::{Result, SragError};
pub use models::{
    ClassifiedRecord, DerivedOutcome, LabFields, SurveillanceRecord, SymptomFlags, TestingStatus,
    WeekKey, WeeklyCounts, WeeklyRow,
};

// Classification core
pub use algorithm::lab_outcome::columnar::{classify_batch, outcomes_from_batch};
pub use algorithm::{
    CaseFilter, ExclusionReason, FilterStats, LabOutcomeClassifier, WeeklyAggregator, WeeklyTable,
    classify,
};
pub use pipeline::{Pipeline, PipelineOutput, RunStats};

// Readers and writers
pub use io::{ReadOutput, ReadReport, read_extract, read_extracts};
