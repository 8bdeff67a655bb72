use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::utils::random_notifications;
use srag_weekly::algorithm::{CaseFilter, LabOutcomeClassifier, WeeklyAggregator, WeeklyTable};
use srag_weekly::models::{ClassifiedRecord, DerivedOutcome, TestingStatus, WeekKey};
use srag_weekly::schema::columns::WEEKLY_COLUMNS;

fn classified_sample(seed: u64, count: usize) -> Vec<ClassifiedRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (kept, _) = CaseFilter::default().filter(random_notifications(&mut rng, count));
    LabOutcomeClassifier.classify_all(kept)
}

fn tested(flu_a: bool, flu_b: bool) -> DerivedOutcome {
    DerivedOutcome {
        flu_a: Some(flu_a),
        flu_b: Some(flu_b),
        vsr: Some(false),
        others: Some(false),
        delayed: Some(false),
        inconclusive: Some(false),
        negative: Some(false),
        positive_count: Some(u8::from(flu_a) + u8::from(flu_b)),
        ..DerivedOutcome::untested(TestingStatus::Tested)
    }
}

/// One FluA and one FluB record in the same region and week
#[test]
fn test_two_positives_same_week() {
    let records: Vec<ClassifiedRecord> = [tested(true, false), tested(false, true)]
        .into_iter()
        .map(|outcome| {
            ClassifiedRecord::new(crate::utils::notification("35", 12, Default::default()), outcome)
        })
        .collect();

    let rows = WeeklyAggregator::default().aggregate(&records).rows();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.region.as_deref(), Some("35"));
    assert_eq!(row.week, 12);
    assert_eq!(row.flu_a, 1);
    assert_eq!(row.flu_b, 1);
    assert_eq!(row.positive_total, 2);
    assert_eq!(row.tested, 2);
    assert_eq!(row.total_cases, 2);
    assert_eq!(row.not_tested, 0);
}

/// Every key appears exactly once and rows come out sorted
#[test]
fn test_rows_unique_and_sorted() {
    let table = WeeklyAggregator::default().aggregate(&classified_sample(1, 2_000));
    let rows = table.rows();
    assert_eq!(rows.len(), table.len());
    for pair in rows.windows(2) {
        let left = WeekKey::new(pair[0].region.as_deref(), pair[0].week);
        let right = WeekKey::new(pair[1].region.as_deref(), pair[1].week);
        assert!(left < right);
    }
}

/// Null flags count as zero; every kept record lands in some group
#[test]
fn test_totals_match_record_flags() {
    let records = classified_sample(2, 3_000);
    let totals = WeeklyAggregator::default().aggregate(&records).totals();
    let count = |pred: fn(&DerivedOutcome) -> bool| {
        records.iter().filter(|c| pred(&c.outcome)).count() as u64
    };

    assert_eq!(totals.not_tested, count(DerivedOutcome::not_tested));
    assert_eq!(totals.testing_ignored, count(DerivedOutcome::testing_ignored));
    assert_eq!(totals.flu_a, count(|o| o.flu_a == Some(true)));
    assert_eq!(totals.delayed, count(|o| o.delayed == Some(true)));
    assert_eq!(
        totals.positive_total,
        records
            .iter()
            .map(|c| u64::from(c.outcome.positive_count.unwrap_or(0)))
            .sum::<u64>()
    );
    assert_eq!(
        totals.total_cases(),
        totals.positive_total
            + totals.negative
            + totals.inconclusive
            + totals.not_tested
            + totals.testing_ignored
    );
}

/// Any partition, merged in any order, equals the whole
#[test]
fn test_partition_merge_equals_whole() {
    let records = classified_sample(3, 4_000);
    let aggregator = WeeklyAggregator::default();
    let whole = aggregator.aggregate(&records);

    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..5 {
        let parts = rng.random_range(2..8);
        let mut partitions: Vec<Vec<ClassifiedRecord>> = vec![Vec::new(); parts];
        for record in &records {
            partitions[rng.random_range(0..parts)].push(record.clone());
        }

        let mut merged = WeeklyTable::new();
        for partition in partitions.iter().rev() {
            merged.merge(aggregator.aggregate(partition));
        }
        assert_eq!(merged, whole);
        assert_eq!(merged.rows(), whole.rows());
    }
}

/// Parallel aggregation equals sequential aggregation
#[test]
fn test_par_aggregate_matches_aggregate() {
    let records = classified_sample(4, 10_000);
    let aggregator = WeeklyAggregator::default();
    assert_eq!(aggregator.par_aggregate(&records), aggregator.aggregate(&records));
}

/// Weekly rows serialize with the contract header
#[test]
fn test_weekly_row_header() {
    let records = classified_sample(5, 50);
    let rows = WeeklyAggregator::default().aggregate(&records).rows();

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in &rows {
        writer.serialize(row).unwrap();
    }
    let bytes = writer.into_inner().unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(header, WEEKLY_COLUMNS.join(","));
}
