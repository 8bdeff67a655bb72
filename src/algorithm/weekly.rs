//! Weekly per-region aggregation of classified notifications
//!
//! Counts are summed per exact `(region, week)` key. Partial tables built
//! over disjoint partitions merge by per-field addition, so the parallel
//! aggregation returns the same table as the sequential one.

use log::{debug, warn};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::config::RegionBasis;
use crate::models::{ClassifiedRecord, WeekKey, WeeklyCounts, WeeklyRow};

/// Weekly counts keyed by region and week
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyTable {
    groups: FxHashMap<WeekKey, WeeklyCounts>,
}

impl WeeklyTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the counts of one notification under `key`
    pub fn add(&mut self, key: WeekKey, counts: WeeklyCounts) {
        *self.groups.entry(key).or_default() += counts;
    }

    /// Fold another partial table into this one
    pub fn merge(&mut self, other: Self) {
        for (key, counts) in other.groups {
            self.add(key, counts);
        }
    }

    /// Counts for a key, if any notification fell under it
    #[must_use]
    pub fn get(&self, key: &WeekKey) -> Option<&WeeklyCounts> {
        self.groups.get(key)
    }

    /// Number of keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no notification was aggregated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum over all keys
    #[must_use]
    pub fn totals(&self) -> WeeklyCounts {
        self.groups
            .values()
            .fold(WeeklyCounts::default(), |mut acc, counts| {
                acc += *counts;
                acc
            })
    }

    /// Output rows sorted by region, then week
    #[must_use]
    pub fn rows(&self) -> Vec<WeeklyRow> {
        let mut keys: Vec<&WeekKey> = self.groups.keys().collect();
        keys.sort_unstable();
        keys.into_iter()
            .map(|key| WeeklyRow::new(key.clone(), &self.groups[key]))
            .collect()
    }
}

/// Groups classified notifications into weekly counts
#[derive(Debug, Clone, Copy, Default)]
pub struct WeeklyAggregator {
    region_basis: RegionBasis,
}

impl WeeklyAggregator {
    /// Create an aggregator keyed by the given region column
    #[must_use]
    pub const fn new(region_basis: RegionBasis) -> Self {
        Self { region_basis }
    }

    fn key(&self, classified: &ClassifiedRecord) -> Option<WeekKey> {
        let record = &classified.record;
        record
            .notification_week
            .map(|week| WeekKey::new(record.region_for(self.region_basis), week))
    }

    fn add_to(&self, table: &mut WeeklyTable, unkeyed: &mut usize, classified: &ClassifiedRecord) {
        match self.key(classified) {
            Some(key) => table.add(key, WeeklyCounts::from_outcome(&classified.outcome)),
            None => *unkeyed += 1,
        }
    }

    /// Sequential aggregation
    #[must_use]
    pub fn aggregate(&self, records: &[ClassifiedRecord]) -> WeeklyTable {
        let mut table = WeeklyTable::new();
        let mut unkeyed = 0;
        for classified in records {
            self.add_to(&mut table, &mut unkeyed, classified);
        }
        self.report(&table, unkeyed);
        table
    }

    /// Parallel aggregation: per-thread partial tables merged at the end
    #[must_use]
    pub fn par_aggregate(&self, records: &[ClassifiedRecord]) -> WeeklyTable {
        let (table, unkeyed) = records
            .par_iter()
            .fold(
                || (WeeklyTable::new(), 0_usize),
                |(mut table, mut unkeyed), classified| {
                    self.add_to(&mut table, &mut unkeyed, classified);
                    (table, unkeyed)
                },
            )
            .reduce(
                || (WeeklyTable::new(), 0_usize),
                |(mut left, left_unkeyed), (right, right_unkeyed)| {
                    left.merge(right);
                    (left, left_unkeyed + right_unkeyed)
                },
            );
        self.report(&table, unkeyed);
        table
    }

    fn report(&self, table: &WeeklyTable, unkeyed: usize) {
        if unkeyed > 0 {
            warn!("Skipped {unkeyed} classified records without a notification week");
        }
        debug!(
            "Aggregated into {} (region, week) groups by {} region",
            table.len(),
            self.region_basis
        );
    }
}
