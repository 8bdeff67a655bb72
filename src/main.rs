//! srag-weekly CLI
//!
//! Reads SINAN SRAG notification extracts, keeps the notifications that meet
//! the case definition, classifies their laboratory outcome and writes weekly
//! per-region counts.
//!
//! Usage:
//!   srag-weekly <extract>... --weekly-output <file> [--clean-output <file>]
//!               [--summary <file>] [--region <code>] [--by-residence]

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::Parser;
use log::info;

use srag_weekly::config::{
    DEFAULT_BATCH_SIZE, DEFAULT_COLUMNAR_THRESHOLD, EvaluationMode, PipelineConfig, ReaderConfig,
    RegionBasis,
};
use srag_weekly::io::writer::{RunSummary, write_cleaned_csv, write_summary, write_weekly};
use srag_weekly::io::{normalize_region_code, read_extracts};
use srag_weekly::pipeline::Pipeline;

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

#[derive(Parser)]
#[command(name = "srag-weekly")]
#[command(version)]
#[command(about = "Weekly SRAG laboratory surveillance counts from SINAN extracts", long_about = None)]
struct Cli {
    /// Notification extracts (CSV, or Parquet by extension), read in order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Weekly table output (`.parquet` for Parquet, CSV otherwise)
    #[arg(short, long)]
    weekly_output: PathBuf,

    /// Kept notifications with their derived columns (CSV)
    #[arg(short, long)]
    clean_output: Option<PathBuf>,

    /// JSON run summary
    #[arg(short, long)]
    summary: Option<PathBuf>,

    /// Keep only notifications from this region (code or abbreviation)
    #[arg(short, long)]
    region: Option<String>,

    /// Key the weekly table (and the region filter) by residence region
    #[arg(long)]
    by_residence: bool,

    /// Field delimiter of delimited extracts
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Classification strategy: auto, per-record or columnar
    #[arg(short, long, default_value = "auto")]
    evaluation: String,

    /// Kept-record count from which `auto` goes columnar
    #[arg(long, default_value_t = DEFAULT_COLUMNAR_THRESHOLD)]
    columnar_threshold: usize,

    /// Records per columnar batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Disable progress bars
    #[arg(long)]
    no_progress: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let start = Instant::now();

    let region_basis = if cli.by_residence {
        RegionBasis::Residence
    } else {
        RegionBasis::Notification
    };
    if !cli.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got '{}'", cli.delimiter);
    }
    let target_region = match cli.region.as_deref() {
        Some(raw) => Some(
            normalize_region_code(raw)?
                .with_context(|| format!("empty region filter '{raw}'"))?,
        ),
        None => None,
    };

    let mut pipeline_config = PipelineConfig {
        region_basis,
        evaluation: cli.evaluation.parse::<EvaluationMode>()?,
        columnar_threshold: cli.columnar_threshold,
        batch_size: cli.batch_size,
        ..PipelineConfig::default()
    }
    .with_env_overrides();
    if let Some(threads) = cli.threads {
        pipeline_config.threads = threads;
    }
    pipeline_config.validate()?;
    info!("{pipeline_config}");

    rayon::ThreadPoolBuilder::new()
        .num_threads(pipeline_config.threads)
        .build_global()
        .context("failed to configure the worker thread pool")?;

    let reader_config = ReaderConfig {
        delimiter: cli.delimiter as u8,
        target_region,
        region_basis,
        show_progress: !cli.no_progress,
        ..ReaderConfig::default()
    };
    let read = read_extracts(&cli.inputs, &reader_config)?;
    let report = read.report;

    let output = Pipeline::new(pipeline_config).run(read.records)?;

    write_weekly(&cli.weekly_output, &output.weekly.rows(), reader_config.delimiter)?;
    if let Some(path) = &cli.clean_output {
        write_cleaned_csv(
            path,
            &output.classified,
            reader_config.delimiter,
            &reader_config.date_format_config,
        )?;
    }
    if let Some(path) = &cli.summary {
        let summary = RunSummary {
            inputs: cli.inputs.iter().map(|p| p.display().to_string()).collect(),
            read: &report,
            run: &output.stats,
        };
        write_summary(path, &summary)?;
    }

    let stats = &output.stats;
    info!(
        "Kept {} of {} notifications ({} tested, {} not tested, {} ignored) in {} weekly groups",
        stats.filter.kept,
        stats.filter.total,
        stats.tested,
        stats.not_tested,
        stats.testing_ignored,
        stats.weekly_groups
    );
    info!("Finished in {:?}", start.elapsed());
    Ok(())
}
