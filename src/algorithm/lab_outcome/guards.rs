//! Ordered guard predicates for testing status and result categories
//!
//! Both decisions are "first guard that holds wins". The order is part of
//! the rule: `Tested` is checked before `NotTested`, and the all-pending
//! `Delayed` guard before the indeterminate-or-pending `Inconclusive` guard.
//! The columnar evaluator reads the same code sets from here.

use crate::models::codes::{culture, etiology, flag, is_any, is_null_or_any, result};
use crate::models::{LabFields, TestingStatus};

/// PCR results that show a test was run
pub const TESTED_PCR_RESULTS: [i64; 3] = [result::POSITIVE, result::NEGATIVE, result::INDETERMINATE];
/// Culture results that show a test was run
pub const TESTED_CULTURE_RESULTS: [i64; 2] = [culture::POSITIVE, culture::NEGATIVE];
/// Hemagglutination results that show a test was run
pub const TESTED_HEMAGGLUTINATION_RESULTS: [i64; 3] =
    [result::POSITIVE, result::NEGATIVE, result::INDETERMINATE];
/// Method flag values meaning the method was used
pub const METHOD_USED: [i64; 1] = [flag::YES];
/// Method flag values meaning the method was not used (null also counts)
pub const METHOD_NOT_USED: [i64; 1] = [flag::NO];

/// PCR result meaning no test was performed
pub const NOT_TESTED_PCR_RESULTS: [i64; 1] = [result::PENDING];
/// Culture result meaning no culture was performed
pub const NOT_TESTED_CULTURE_RESULTS: [i64; 1] = [culture::NOT_PERFORMED];
/// Hemagglutination result meaning no test was performed
pub const NOT_TESTED_HEMAGGLUTINATION_RESULTS: [i64; 1] = [result::PENDING];

/// Etiologies implicating influenza B
pub const FLU_B_ETIOLOGIES: [i64; 1] = [etiology::FLU_B];
/// Etiologies implicating another agent
pub const OTHER_ETIOLOGIES: [i64; 1] = [etiology::OTHER];
/// Per-pathogen flag value for a positive finding
pub const PATHOGEN_POSITIVE: [i64; 1] = [result::POSITIVE];

/// Result category of a tested notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCategory {
    /// Every result field null or pending
    Delayed,
    /// Every result field null, indeterminate or pending
    Inconclusive,
    /// At least one field carries a positive, negative or out-of-domain value
    Resolved,
}

/// A guard over the ten result fields: holds when every field is null or accepted
#[derive(Debug, Clone, Copy)]
pub struct ResultGuard {
    /// Category assigned when the guard holds
    pub category: ResultCategory,
    /// Codes accepted besides null
    pub accepted: &'static [i64],
}

impl ResultGuard {
    /// Evaluate against a set of result fields
    #[must_use]
    pub fn holds(&self, fields: &[Option<i64>]) -> bool {
        fields.iter().all(|field| is_null_or_any(*field, self.accepted))
    }
}

/// Result guards in precedence order
pub const RESULT_GUARDS: [ResultGuard; 2] = [
    ResultGuard {
        category: ResultCategory::Delayed,
        accepted: &[result::PENDING],
    },
    ResultGuard {
        category: ResultCategory::Inconclusive,
        accepted: &[result::INDETERMINATE, result::PENDING],
    },
];

/// First result guard that holds, `Resolved` otherwise
#[must_use]
pub fn result_category(lab: &LabFields) -> ResultCategory {
    let fields = lab.result_fields();
    RESULT_GUARDS
        .iter()
        .find(|guard| guard.holds(&fields))
        .map_or(ResultCategory::Resolved, |guard| guard.category)
}

/// Any method performed or any result reported
#[must_use]
pub fn is_tested(lab: &LabFields) -> bool {
    is_any(lab.pcr_result, &TESTED_PCR_RESULTS)
        || is_any(lab.culture_result, &TESTED_CULTURE_RESULTS)
        || is_any(lab.hemagglutination_result, &TESTED_HEMAGGLUTINATION_RESULTS)
        || is_any(lab.immunofluorescence, &METHOD_USED)
        || is_any(lab.pcr_performed, &METHOD_USED)
        || is_any(lab.other_method, &METHOD_USED)
}

/// A method explicitly not performed, or no method flagged at all
#[must_use]
pub fn is_not_tested(lab: &LabFields) -> bool {
    is_any(lab.pcr_result, &NOT_TESTED_PCR_RESULTS)
        || is_any(lab.culture_result, &NOT_TESTED_CULTURE_RESULTS)
        || is_any(lab.hemagglutination_result, &NOT_TESTED_HEMAGGLUTINATION_RESULTS)
        || (is_null_or_any(lab.immunofluorescence, &METHOD_NOT_USED)
            && is_null_or_any(lab.pcr_performed, &METHOD_NOT_USED)
            && is_null_or_any(lab.other_method, &METHOD_NOT_USED))
}

/// Testing-status guards in precedence order
pub const TESTING_GUARDS: [(TestingStatus, fn(&LabFields) -> bool); 2] = [
    (TestingStatus::Tested, is_tested),
    (TestingStatus::NotTested, is_not_tested),
];

/// First testing guard that holds, `TestingIgnored` otherwise
#[must_use]
pub fn testing_status(lab: &LabFields) -> TestingStatus {
    TESTING_GUARDS
        .iter()
        .find(|(_, guard)| guard(lab))
        .map_or(TestingStatus::TestingIgnored, |(status, _)| *status)
}

/// Influenza A by etiology or flag
#[must_use]
pub fn flu_a(lab: &LabFields) -> bool {
    is_any(lab.pcr_etiology, &etiology::FLU_A)
        || is_any(lab.hemagglutination_etiology, &etiology::FLU_A)
        || is_any(lab.flu_a, &PATHOGEN_POSITIVE)
}

/// Influenza B by etiology or flag
#[must_use]
pub fn flu_b(lab: &LabFields) -> bool {
    is_any(lab.pcr_etiology, &FLU_B_ETIOLOGIES)
        || is_any(lab.hemagglutination_etiology, &FLU_B_ETIOLOGIES)
        || is_any(lab.flu_b, &PATHOGEN_POSITIVE)
}

/// RSV by flag
#[must_use]
pub fn vsr(lab: &LabFields) -> bool {
    is_any(lab.rsv, &PATHOGEN_POSITIVE)
}

/// Other agents by etiology or any of the remaining pathogen flags
#[must_use]
pub fn others(lab: &LabFields) -> bool {
    is_any(lab.pcr_etiology, &OTHER_ETIOLOGIES)
        || is_any(lab.hemagglutination_etiology, &OTHER_ETIOLOGIES)
        || lab
            .other_pathogen_flags()
            .iter()
            .any(|value| is_any(*value, &PATHOGEN_POSITIVE))
}
