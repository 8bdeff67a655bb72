//! Data models for SRAG notifications, derived outcomes and weekly rows

pub mod codes;
pub mod outcome;
pub mod record;
pub mod weekly;

pub use outcome::{ClassifiedRecord, DerivedOutcome, TestingStatus};
pub use record::{LabFields, SurveillanceRecord, SymptomFlags};
pub use weekly::{WeekKey, WeeklyCounts, WeeklyRow};
