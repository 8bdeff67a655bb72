//! Derived laboratory outcome attached to every kept notification

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::record::SurveillanceRecord;

/// Testing-status bucket; every kept record belongs to exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestingStatus {
    /// At least one method was performed or produced a result
    Tested,
    /// Explicitly not performed, or no method flagged
    NotTested,
    /// Ambiguous combination of testing fields
    TestingIgnored,
}

impl TestingStatus {
    /// Get the display name for this status
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Tested => "Tested",
            Self::NotTested => "NotTested",
            Self::TestingIgnored => "TestingIgnored",
        }
    }
}

impl fmt::Display for TestingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Pathogen and result flags derived for one notification
///
/// The fine-grained flags are only set for tested records; for the other
/// two buckets they stay `None` so the per-record output can tell "not
/// applicable" apart from "false". Zero substitution happens at aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedOutcome {
    /// Testing-status bucket
    pub status: TestingStatus,
    /// Influenza A detected
    pub flu_a: Option<bool>,
    /// Influenza B detected
    pub flu_b: Option<bool>,
    /// Respiratory syncytial virus detected
    pub vsr: Option<bool>,
    /// Any other agent detected
    pub others: Option<bool>,
    /// Tested but no result reported yet
    pub delayed: Option<bool>,
    /// Tested with only indeterminate or pending results
    pub inconclusive: Option<bool>,
    /// Residual category: tested, resolved, nothing detected
    pub negative: Option<bool>,
    /// Number of pathogen categories detected
    pub positive_count: Option<u8>,
}

impl DerivedOutcome {
    /// Outcome for a record outside the `Tested` bucket
    #[must_use]
    pub const fn untested(status: TestingStatus) -> Self {
        Self {
            status,
            flu_a: None,
            flu_b: None,
            vsr: None,
            others: None,
            delayed: None,
            inconclusive: None,
            negative: None,
            positive_count: None,
        }
    }

    /// `NotTested` projection of the status
    #[must_use]
    pub fn not_tested(&self) -> bool {
        self.status == TestingStatus::NotTested
    }

    /// `TestingIgnored` projection of the status
    #[must_use]
    pub fn testing_ignored(&self) -> bool {
        self.status == TestingStatus::TestingIgnored
    }

    /// `Tested` projection of the status
    #[must_use]
    pub fn tested(&self) -> bool {
        self.status == TestingStatus::Tested
    }
}

/// A kept notification with its derived outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    /// The notification as read
    pub record: SurveillanceRecord,
    /// Outcome computed once by the classifier
    pub outcome: DerivedOutcome,
}

impl ClassifiedRecord {
    /// Pair a record with its outcome
    #[must_use]
    pub const fn new(record: SurveillanceRecord, outcome: DerivedOutcome) -> Self {
        Self { record, outcome }
    }
}
