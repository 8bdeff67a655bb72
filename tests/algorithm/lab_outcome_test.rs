use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::utils::{notification, random_lab};
use srag_weekly::algorithm::lab_outcome::guards::{ResultCategory, result_category};
use srag_weekly::algorithm::{CaseFilter, LabOutcomeClassifier, classify};
use srag_weekly::models::{DerivedOutcome, LabFields, SymptomFlags, TestingStatus};

fn all_pathogen_flags(code: Option<i64>) -> LabFields {
    LabFields {
        flu_a: code,
        flu_b: code,
        rsv: code,
        parainfluenza1: code,
        parainfluenza2: code,
        parainfluenza3: code,
        adenovirus: code,
        other: code,
        ..Default::default()
    }
}

/// Symptomatic record without lab data: kept, not tested, flags unset
#[test]
fn test_no_lab_data_is_not_tested() {
    let record = notification("35", 12, LabFields::default());
    assert!(CaseFilter::default().evaluate(&record).is_ok());

    let outcome = LabOutcomeClassifier.classify(&record);
    assert_eq!(outcome, DerivedOutcome::untested(TestingStatus::NotTested));
    assert!(outcome.not_tested());
    assert_eq!(outcome.flu_a, None);
    assert_eq!(outcome.positive_count, None);
}

/// Death clause, PCR positive for H1N1
#[test]
fn test_death_with_pcr_flu_a() {
    let mut record = notification(
        "35",
        12,
        LabFields {
            pcr_result: Some(1),
            pcr_etiology: Some(1),
            ..Default::default()
        },
    );
    record.symptoms = SymptomFlags {
        fever: Some(0),
        cough: Some(1),
        clinical_outcome: Some(2),
        ..Default::default()
    };
    assert!(CaseFilter::default().evaluate(&record).is_ok());

    let outcome = classify(&record.lab);
    assert_eq!(outcome.status, TestingStatus::Tested);
    assert_eq!(outcome.flu_a, Some(true));
    assert_eq!(outcome.flu_b, Some(false));
    assert_eq!(outcome.positive_count, Some(1));
    assert_eq!(outcome.negative, Some(false));
}

/// PCR performed, everything pending: delayed, not inconclusive
#[test]
fn test_all_pending_is_delayed() {
    let lab = LabFields {
        pcr_performed: Some(1),
        pcr_result: Some(4),
        hemagglutination_result: Some(4),
        flu_b: None,
        ..all_pathogen_flags(Some(4))
    };
    let outcome = classify(&lab);
    assert_eq!(outcome.status, TestingStatus::Tested);
    assert_eq!(outcome.delayed, Some(true));
    assert_eq!(outcome.inconclusive, Some(false));
    assert_eq!(outcome.negative, Some(false));
    assert_eq!(outcome.positive_count, Some(0));

    // Without a method flag the pending PCR result reads as not performed
    let unflagged = LabFields {
        pcr_performed: None,
        ..lab
    };
    assert_eq!(classify(&unflagged).status, TestingStatus::NotTested);
}

/// A single indeterminate PCR result: inconclusive, not delayed
#[test]
fn test_indeterminate_pcr_is_inconclusive() {
    let lab = LabFields {
        pcr_result: Some(3),
        ..Default::default()
    };
    let outcome = classify(&lab);
    assert_eq!(outcome.status, TestingStatus::Tested);
    assert_eq!(outcome.delayed, Some(false));
    assert_eq!(outcome.inconclusive, Some(true));
    assert_eq!(outcome.negative, Some(false));
}

/// The negative rule is the fully parenthesized residual:
/// `Negative = !(FluA | FluB | VSR | Others | Delayed | Inconclusive)`,
/// so a delayed record is never negative and Delayed excludes Inconclusive.
#[test]
fn test_negative_residual_interpretation() {
    let mut rng = StdRng::seed_from_u64(2013);
    for _ in 0..5_000 {
        let lab = random_lab(&mut rng);
        let outcome = classify(&lab);
        if outcome.status != TestingStatus::Tested {
            assert_eq!(outcome, DerivedOutcome::untested(outcome.status));
            continue;
        }

        let flag = |f: Option<bool>| f.unwrap_or_else(|| panic!("tested flags are set"));
        let delayed = flag(outcome.delayed);
        let inconclusive = flag(outcome.inconclusive);
        let any_positive = flag(outcome.flu_a)
            || flag(outcome.flu_b)
            || flag(outcome.vsr)
            || flag(outcome.others);

        assert!(!(delayed && inconclusive), "{lab:?}");
        assert_eq!(
            flag(outcome.negative),
            !(any_positive || delayed || inconclusive),
            "{lab:?}"
        );
        let count = [outcome.flu_a, outcome.flu_b, outcome.vsr, outcome.others]
            .into_iter()
            .filter(|f| *f == Some(true))
            .count();
        assert_eq!(outcome.positive_count, Some(count as u8));
    }
}

/// A positive agent next to a pending category keeps both flags
#[test]
fn test_positive_with_pending_results_is_not_negative() {
    let lab = LabFields {
        pcr_performed: Some(1),
        pcr_etiology: Some(3),
        pcr_result: Some(4),
        ..Default::default()
    };
    let outcome = classify(&lab);
    assert_eq!(outcome.flu_b, Some(true));
    assert_eq!(outcome.delayed, Some(true));
    assert_eq!(outcome.negative, Some(false));
}

/// Out-of-domain codes never match and never fail
#[test]
fn test_out_of_domain_codes() {
    let lab = LabFields {
        pcr_result: Some(7),
        pcr_etiology: Some(42),
        immunofluorescence: Some(-1),
        ..all_pathogen_flags(Some(8))
    };
    let outcome = classify(&lab);
    assert_eq!(outcome.status, TestingStatus::TestingIgnored);
    assert_eq!(result_category(&lab), ResultCategory::Resolved);
}

/// Every record lands in exactly one testing bucket
#[test]
fn test_testing_status_partition() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..2_000 {
        let outcome = classify(&random_lab(&mut rng));
        let buckets = [outcome.tested(), outcome.not_tested(), outcome.testing_ignored()];
        assert_eq!(buckets.iter().filter(|b| **b).count(), 1);
    }
}
