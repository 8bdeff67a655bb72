//! Classification core
//!
//! The case-definition filter, the laboratory outcome classifier and the
//! weekly aggregator. All three are pure transformations over in-memory
//! records.

pub mod case_filter;
pub mod lab_outcome;
pub mod weekly;

pub use case_filter::{CaseFilter, ExclusionReason, FilterStats};
pub use lab_outcome::{LabOutcomeClassifier, classify};
pub use weekly::{WeeklyAggregator, WeeklyTable};
