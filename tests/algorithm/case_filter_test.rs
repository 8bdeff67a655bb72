use crate::utils::{notification, symptomatic};
use srag_weekly::algorithm::{CaseFilter, ExclusionReason};
use srag_weekly::models::{LabFields, SymptomFlags};

/// Symptom clause with every all-lab-null record is kept
#[test]
fn test_symptomatic_record_is_kept() {
    let filter = CaseFilter::default();
    let record = notification("35", 12, LabFields::default());
    assert_eq!(filter.evaluate(&record), Ok(()));
}

/// Death alone satisfies the case definition, whatever the symptoms say
#[test]
fn test_death_clause_overrides_symptoms() {
    let filter = CaseFilter::default();
    let mut record = notification("35", 12, LabFields::default());
    record.symptoms = SymptomFlags {
        fever: Some(0),
        cough: Some(1),
        clinical_outcome: Some(2),
        ..Default::default()
    };
    assert_eq!(filter.evaluate(&record), Ok(()));

    record.symptoms.clinical_outcome = Some(1);
    assert_eq!(
        filter.evaluate(&record),
        Err(ExclusionReason::CaseDefinitionNotMet)
    );
}

/// Ignored (9) symptom codes never count as present
#[test]
fn test_ignored_symptoms_do_not_qualify() {
    let filter = CaseFilter::default();
    let symptoms = SymptomFlags {
        fever: Some(9),
        cough: Some(9),
        dyspnea: Some(9),
        ..Default::default()
    };
    assert!(!filter.meets_case_definition(&symptoms));
}

/// Missing week or date excludes even a death
#[test]
fn test_missing_temporal_key_excludes() {
    let filter = CaseFilter::default();

    let mut no_week = notification("35", 12, LabFields::default());
    no_week.notification_week = None;
    no_week.symptoms.clinical_outcome = Some(2);
    assert_eq!(
        filter.evaluate(&no_week),
        Err(ExclusionReason::IncompleteTemporalKey)
    );

    let mut no_date = notification("35", 12, LabFields::default());
    no_date.notification_date = None;
    assert_eq!(
        filter.evaluate(&no_date),
        Err(ExclusionReason::IncompleteTemporalKey)
    );
}

/// Parallel filtering keeps the same records in the same order
#[test]
fn test_par_filter_matches_filter() {
    let filter = CaseFilter::default();
    let records: Vec<_> = (0..200)
        .map(|i| {
            let mut record = notification("35", i, LabFields::default());
            if i % 3 == 0 {
                record.symptoms = SymptomFlags::default();
            }
            if i % 7 == 0 {
                record.notification_date = None;
            }
            record
        })
        .collect();

    let (sequential, sequential_stats) = filter.filter(records.clone());
    let (parallel, parallel_stats) = filter.par_filter(records);
    assert_eq!(sequential, parallel);
    assert_eq!(sequential_stats, parallel_stats);
    assert_eq!(sequential_stats.kept + sequential_stats.excluded(), 200);
    assert!(sequential.iter().all(|r| r.symptoms == symptomatic()));
}
