//! Case-definition filtering of SRAG notifications
//!
//! A notification is kept when it has both temporal keys and either meets
//! the symptom definition (fever, cough or sore throat, and a respiratory
//! severity sign) or ended in death. Excluded notifications are counted,
//! never reported as errors.

use std::fmt;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::codes::{self, flag};
use crate::models::{SurveillanceRecord, SymptomFlags};

/// Why a notification was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExclusionReason {
    /// Missing notification week or date
    IncompleteTemporalKey,
    /// Neither the symptom clause nor the death clause holds
    CaseDefinitionNotMet,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompleteTemporalKey => write!(f, "incomplete temporal key"),
            Self::CaseDefinitionNotMet => write!(f, "case definition not met"),
        }
    }
}

/// Counts produced by one filtering pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    /// Records seen
    pub total: usize,
    /// Records kept
    pub kept: usize,
    /// Records dropped for a missing week or date
    pub incomplete_temporal_key: usize,
    /// Records dropped by the case definition
    pub case_definition_not_met: usize,
}

impl FilterStats {
    fn record(&mut self, decision: Result<(), ExclusionReason>) {
        self.total += 1;
        match decision {
            Ok(()) => self.kept += 1,
            Err(ExclusionReason::IncompleteTemporalKey) => self.incomplete_temporal_key += 1,
            Err(ExclusionReason::CaseDefinitionNotMet) => self.case_definition_not_met += 1,
        }
    }

    /// Records excluded for any reason
    #[must_use]
    pub const fn excluded(&self) -> usize {
        self.incomplete_temporal_key + self.case_definition_not_met
    }
}

/// SRAG case-definition filter
#[derive(Debug, Clone, Copy)]
pub struct CaseFilter {
    death_code: i64,
}

impl Default for CaseFilter {
    fn default() -> Self {
        Self::new(codes::outcome::DEATH)
    }
}

impl CaseFilter {
    /// Create a filter treating `death_code` in `EVOLUCAO` as a qualifying outcome
    #[must_use]
    pub const fn new(death_code: i64) -> Self {
        Self { death_code }
    }

    /// Symptom clause OR death clause
    #[must_use]
    pub fn meets_case_definition(&self, symptoms: &SymptomFlags) -> bool {
        let yes = |value: Option<i64>| value == Some(flag::YES);

        let symptomatic = yes(symptoms.fever)
            && (yes(symptoms.cough) || yes(symptoms.sore_throat))
            && (yes(symptoms.dyspnea)
                || yes(symptoms.low_saturation)
                || yes(symptoms.respiratory_distress));

        symptomatic || symptoms.clinical_outcome == Some(self.death_code)
    }

    /// Decide a single record; the temporal key is checked first
    pub fn evaluate(&self, record: &SurveillanceRecord) -> Result<(), ExclusionReason> {
        if !record.has_temporal_key() {
            return Err(ExclusionReason::IncompleteTemporalKey);
        }
        if !self.meets_case_definition(&record.symptoms) {
            return Err(ExclusionReason::CaseDefinitionNotMet);
        }
        Ok(())
    }

    /// Keep qualifying records, preserving input order
    #[must_use]
    pub fn filter(&self, records: Vec<SurveillanceRecord>) -> (Vec<SurveillanceRecord>, FilterStats) {
        let mut stats = FilterStats::default();
        let mut kept = Vec::with_capacity(records.len());

        for record in records {
            let decision = self.evaluate(&record);
            stats.record(decision);
            if decision.is_ok() {
                kept.push(record);
            }
        }

        debug!(
            "Case filter kept {} of {} records ({} without temporal key, {} outside case definition)",
            stats.kept, stats.total, stats.incomplete_temporal_key, stats.case_definition_not_met
        );
        (kept, stats)
    }

    /// Parallel equivalent of [`CaseFilter::filter`]; output order matches input order
    #[must_use]
    pub fn par_filter(
        &self,
        records: Vec<SurveillanceRecord>,
    ) -> (Vec<SurveillanceRecord>, FilterStats) {
        let decided: Vec<(Result<(), ExclusionReason>, SurveillanceRecord)> = records
            .into_par_iter()
            .map(|record| (self.evaluate(&record), record))
            .collect();

        let mut stats = FilterStats::default();
        let mut kept = Vec::with_capacity(decided.len());
        for (decision, record) in decided {
            stats.record(decision);
            if decision.is_ok() {
                kept.push(record);
            }
        }
        (kept, stats)
    }
}
