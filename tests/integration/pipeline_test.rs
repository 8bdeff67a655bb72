use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::utils::{notification, random_notifications};
use srag_weekly::config::{EvaluationMode, PipelineConfig, RegionBasis};
use srag_weekly::models::{LabFields, WeekKey};
use srag_weekly::pipeline::Pipeline;

fn config(evaluation: EvaluationMode) -> PipelineConfig {
    PipelineConfig {
        evaluation,
        batch_size: 257,
        ..PipelineConfig::default()
    }
}

/// Both strategies produce the same classified records and weekly table
#[test]
fn test_strategies_agree() {
    let mut rng = StdRng::seed_from_u64(2009);
    let records = random_notifications(&mut rng, 5_000);

    let per_record = Pipeline::new(config(EvaluationMode::PerRecord))
        .run(records.clone())
        .unwrap();
    let columnar = Pipeline::new(config(EvaluationMode::Columnar))
        .run(records)
        .unwrap();

    assert_eq!(per_record.stats.evaluation, "per-record");
    assert_eq!(columnar.stats.evaluation, "columnar");
    assert_eq!(per_record.classified, columnar.classified);
    assert_eq!(per_record.weekly, columnar.weekly);
    assert_eq!(per_record.stats.totals, columnar.stats.totals);
}

/// Stats account for every input record
#[test]
fn test_stats_partition_input() {
    let mut rng = StdRng::seed_from_u64(17);
    let records = random_notifications(&mut rng, 1_000);
    let output = Pipeline::new(PipelineConfig::default()).run(records).unwrap();
    let stats = &output.stats;

    assert_eq!(stats.filter.total, 1_000);
    assert_eq!(stats.filter.kept + stats.filter.excluded(), 1_000);
    assert_eq!(stats.filter.kept, output.classified.len());
    assert_eq!(
        stats.tested + stats.not_tested + stats.testing_ignored,
        stats.filter.kept
    );
    assert_eq!(stats.weekly_groups, output.weekly.len());
}

/// Kept records keep their input order
#[test]
fn test_classified_order_preserved() {
    let records: Vec<_> = (1..=50)
        .map(|week| notification("35", week, LabFields::default()))
        .collect();
    let output = Pipeline::new(config(EvaluationMode::Columnar)).run(records).unwrap();
    let weeks: Vec<i64> = output
        .classified
        .iter()
        .filter_map(|c| c.record.notification_week)
        .collect();
    assert_eq!(weeks, (1..=50).collect::<Vec<_>>());
}

/// Residence basis keys the weekly table by `SG_UF`
#[test]
fn test_residence_region_basis() {
    let mut record = notification("35", 3, LabFields::default());
    record.residence_region = Some("33".to_string());

    let output = Pipeline::new(PipelineConfig {
        region_basis: RegionBasis::Residence,
        ..PipelineConfig::default()
    })
    .run(vec![record])
    .unwrap();

    assert!(output.weekly.get(&WeekKey::new(Some("33"), 3)).is_some());
    assert!(output.weekly.get(&WeekKey::new(Some("35"), 3)).is_none());
}

/// The run summary serializes to JSON
#[test]
fn test_stats_serialize() {
    let output = Pipeline::new(PipelineConfig::default())
        .run(vec![notification("35", 1, LabFields::default())])
        .unwrap();
    let json = serde_json::to_value(&output.stats).unwrap();
    assert_eq!(json["filter"]["kept"], 1);
    assert_eq!(json["not_tested"], 1);
    assert_eq!(json["totals"]["not_tested"], 1);
}
