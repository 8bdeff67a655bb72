//! End-to-end classification run: filter, classify, aggregate

use std::time::{Duration, Instant};

use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algorithm::lab_outcome::columnar;
use crate::algorithm::{CaseFilter, FilterStats, LabOutcomeClassifier, WeeklyAggregator, WeeklyTable};
use crate::config::{EvaluationMode, PipelineConfig};
use crate::error::Result;
use crate::models::{ClassifiedRecord, DerivedOutcome, SurveillanceRecord, TestingStatus, WeeklyCounts};
use crate::utils::logging::log_stage;

/// Wall-clock time spent per stage, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimings {
    pub filter_ms: u64,
    pub classify_ms: u64,
    pub aggregate_ms: u64,
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Statistics of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Case filter counts
    pub filter: FilterStats,
    /// Strategy actually used to classify (`per-record` or `columnar`)
    pub evaluation: String,
    /// Kept records per testing status
    pub tested: usize,
    pub not_tested: usize,
    pub testing_ignored: usize,
    /// Number of (region, week) groups
    pub weekly_groups: usize,
    /// Counts summed over all groups
    pub totals: WeeklyCounts,
    pub timings: StageTimings,
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Kept records with their outcomes, in input order
    pub classified: Vec<ClassifiedRecord>,
    /// Weekly per-region table
    pub weekly: WeeklyTable,
    pub stats: RunStats,
}

/// Filter, classify and aggregate a set of notifications
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    filter: CaseFilter,
    classifier: LabOutcomeClassifier,
    aggregator: WeeklyAggregator,
}

impl Pipeline {
    /// Create a pipeline from its configuration
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            filter: CaseFilter::new(config.death_code),
            classifier: LabOutcomeClassifier,
            aggregator: WeeklyAggregator::new(config.region_basis),
            config,
        }
    }

    /// The configuration this pipeline runs with
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Strategy used for `kept` records; never `Auto`
    #[must_use]
    pub fn resolve_evaluation(&self, kept: usize) -> EvaluationMode {
        match self.config.evaluation {
            EvaluationMode::Auto if kept >= self.config.columnar_threshold => {
                EvaluationMode::Columnar
            }
            EvaluationMode::Auto => EvaluationMode::PerRecord,
            mode => mode,
        }
    }

    /// Run all stages over `records`
    pub fn run(&self, records: Vec<SurveillanceRecord>) -> Result<PipelineOutput> {
        self.config.validate()?;
        info!("Processing {} notifications", records.len());

        let start = Instant::now();
        let (kept, filter_stats) = self.filter.par_filter(records);
        let filter_elapsed = start.elapsed();
        log_stage("Case filter", filter_stats.kept, filter_elapsed);

        let start = Instant::now();
        let evaluation = self.resolve_evaluation(kept.len());
        let classified = self.classify(kept, evaluation)?;
        let classify_elapsed = start.elapsed();
        log_stage(&format!("Classified ({evaluation})"), classified.len(), classify_elapsed);

        let start = Instant::now();
        let weekly = self.aggregator.par_aggregate(&classified);
        let aggregate_elapsed = start.elapsed();
        log_stage("Weekly aggregation", classified.len(), aggregate_elapsed);

        let by_status = classified.iter().counts_by(|c| c.outcome.status);
        let count = |status: TestingStatus| by_status.get(&status).copied().unwrap_or(0);
        let stats = RunStats {
            filter: filter_stats,
            evaluation: evaluation.to_string(),
            tested: count(TestingStatus::Tested),
            not_tested: count(TestingStatus::NotTested),
            testing_ignored: count(TestingStatus::TestingIgnored),
            weekly_groups: weekly.len(),
            totals: weekly.totals(),
            timings: StageTimings {
                filter_ms: millis(filter_elapsed),
                classify_ms: millis(classify_elapsed),
                aggregate_ms: millis(aggregate_elapsed),
            },
        };

        Ok(PipelineOutput {
            classified,
            weekly,
            stats,
        })
    }

    fn classify(
        &self,
        kept: Vec<SurveillanceRecord>,
        evaluation: EvaluationMode,
    ) -> Result<Vec<ClassifiedRecord>> {
        if evaluation != EvaluationMode::Columnar {
            return Ok(self.classifier.classify_all(kept));
        }

        let batch_size = self.config.batch_size;
        debug!(
            "Columnar evaluation over {} batches of up to {batch_size} records",
            kept.len().div_ceil(batch_size)
        );
        let outcomes: Vec<Vec<DerivedOutcome>> = kept
            .par_chunks(batch_size)
            .map(columnar::classify_records)
            .collect::<Result<_>>()?;

        Ok(kept
            .into_iter()
            .zip(outcomes.into_iter().flatten())
            .map(|(record, outcome)| ClassifiedRecord::new(record, outcome))
            .collect())
    }
}
