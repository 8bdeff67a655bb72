//! Laboratory outcome classification
//!
//! Derives the testing status and the pathogen/result flags of a kept
//! notification from the legacy lab fields. The classifier is a pure,
//! total function: nulls and out-of-domain codes never fail, they only fail
//! to match.
//!
//! Two evaluation strategies produce identical outcomes: [`classify`] per
//! record, and [`columnar::classify_batch`] over Arrow record batches.

pub mod columnar;
pub mod guards;

use rayon::prelude::*;

use crate::models::{ClassifiedRecord, DerivedOutcome, LabFields, SurveillanceRecord, TestingStatus};
use guards::ResultCategory;

/// Classify one notification's lab fields
#[must_use]
pub fn classify(lab: &LabFields) -> DerivedOutcome {
    let status = guards::testing_status(lab);
    if status != TestingStatus::Tested {
        return DerivedOutcome::untested(status);
    }

    let flu_a = guards::flu_a(lab);
    let flu_b = guards::flu_b(lab);
    let vsr = guards::vsr(lab);
    let others = guards::others(lab);

    let category = guards::result_category(lab);
    let delayed = category == ResultCategory::Delayed;
    let inconclusive = category == ResultCategory::Inconclusive;

    // Residual: no pathogen and no pending/indeterminate category
    let negative = !(flu_a || flu_b || vsr || others || delayed || inconclusive);

    let positive_count = [flu_a, flu_b, vsr, others]
        .into_iter()
        .map(u8::from)
        .sum::<u8>();

    DerivedOutcome {
        status,
        flu_a: Some(flu_a),
        flu_b: Some(flu_b),
        vsr: Some(vsr),
        others: Some(others),
        delayed: Some(delayed),
        inconclusive: Some(inconclusive),
        negative: Some(negative),
        positive_count: Some(positive_count),
    }
}

/// Per-record lab outcome classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct LabOutcomeClassifier;

impl LabOutcomeClassifier {
    /// Classify a single notification
    #[must_use]
    pub fn classify(&self, record: &SurveillanceRecord) -> DerivedOutcome {
        classify(&record.lab)
    }

    /// Classify kept notifications in parallel, preserving order
    #[must_use]
    pub fn classify_all(&self, records: Vec<SurveillanceRecord>) -> Vec<ClassifiedRecord> {
        records
            .into_par_iter()
            .map(|record| {
                let outcome = self.classify(&record);
                ClassifiedRecord::new(record, outcome)
            })
            .collect()
    }
}
