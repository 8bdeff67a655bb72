//! Weekly per-region count rows

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::models::outcome::DerivedOutcome;

/// Aggregation key: exact region code and notification week
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeekKey {
    /// Region code as given (null when the record has none)
    pub region: Option<String>,
    /// `SEM_NOT` value as given
    pub week: i64,
}

impl WeekKey {
    /// Create a key
    #[must_use]
    pub fn new(region: Option<&str>, week: i64) -> Self {
        Self {
            region: region.map(str::to_string),
            week,
        }
    }
}

/// Summed outcome counts for one key
///
/// Addition is per field, so partial counts from disjoint partitions can be
/// merged in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCounts {
    pub flu_a: u64,
    pub flu_b: u64,
    pub vsr: u64,
    pub others: u64,
    pub positive_total: u64,
    pub negative: u64,
    pub inconclusive: u64,
    pub delayed: u64,
    pub not_tested: u64,
    pub testing_ignored: u64,
}

/// Null counts as zero
#[inline]
fn count(flag: Option<bool>) -> u64 {
    u64::from(flag.unwrap_or(false))
}

impl WeeklyCounts {
    /// Counts contributed by a single classified notification
    #[must_use]
    pub fn from_outcome(outcome: &DerivedOutcome) -> Self {
        Self {
            flu_a: count(outcome.flu_a),
            flu_b: count(outcome.flu_b),
            vsr: count(outcome.vsr),
            others: count(outcome.others),
            positive_total: outcome.positive_count.map_or(0, u64::from),
            negative: count(outcome.negative),
            inconclusive: count(outcome.inconclusive),
            delayed: count(outcome.delayed),
            not_tested: u64::from(outcome.not_tested()),
            testing_ignored: u64::from(outcome.testing_ignored()),
        }
    }

    /// `PositiveTotal + Negative + Inconclusive`
    #[must_use]
    pub const fn tested(&self) -> u64 {
        self.positive_total + self.negative + self.inconclusive
    }

    /// `Tested + NotTested + TestingIgnored`
    #[must_use]
    pub const fn total_cases(&self) -> u64 {
        self.tested() + self.not_tested + self.testing_ignored
    }
}

impl AddAssign for WeeklyCounts {
    fn add_assign(&mut self, other: Self) {
        self.flu_a += other.flu_a;
        self.flu_b += other.flu_b;
        self.vsr += other.vsr;
        self.others += other.others;
        self.positive_total += other.positive_total;
        self.negative += other.negative;
        self.inconclusive += other.inconclusive;
        self.delayed += other.delayed;
        self.not_tested += other.not_tested;
        self.testing_ignored += other.testing_ignored;
    }
}

/// One output row of the weekly table, columns in contract order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRow {
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "Week")]
    pub week: i64,
    #[serde(rename = "FluA")]
    pub flu_a: u64,
    #[serde(rename = "FluB")]
    pub flu_b: u64,
    #[serde(rename = "VSR")]
    pub vsr: u64,
    #[serde(rename = "Others")]
    pub others: u64,
    #[serde(rename = "PositiveTotal")]
    pub positive_total: u64,
    #[serde(rename = "Negative")]
    pub negative: u64,
    #[serde(rename = "Inconclusive")]
    pub inconclusive: u64,
    #[serde(rename = "Delayed")]
    pub delayed: u64,
    #[serde(rename = "NotTested")]
    pub not_tested: u64,
    #[serde(rename = "TestingIgnored")]
    pub testing_ignored: u64,
    #[serde(rename = "Tested")]
    pub tested: u64,
    #[serde(rename = "TotalCases")]
    pub total_cases: u64,
}

impl WeeklyRow {
    /// Build a row from its key and counts
    #[must_use]
    pub fn new(key: WeekKey, counts: &WeeklyCounts) -> Self {
        Self {
            region: key.region,
            week: key.week,
            flu_a: counts.flu_a,
            flu_b: counts.flu_b,
            vsr: counts.vsr,
            others: counts.others,
            positive_total: counts.positive_total,
            negative: counts.negative,
            inconclusive: counts.inconclusive,
            delayed: counts.delayed,
            not_tested: counts.not_tested,
            testing_ignored: counts.testing_ignored,
            tested: counts.tested(),
            total_cases: counts.total_cases(),
        }
    }
}
