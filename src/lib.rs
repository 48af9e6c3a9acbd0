//! Workspace umbrella crate for fragscore.
//!
//! This crate stitches fragment extraction, aggregation, and contribution
//! scoring together so callers can go from raw records to a score table with
//! a single API entry point.

pub mod config;

pub use contribution::{
    contribution_score, score_contributions, score_contributions_default, ContributionConfig,
    ContributionError, ContributionMeta, ContributionReport, ContributionScores,
    CONTRIBUTION_ALGORITHM, CONTRIBUTION_VERSION, DEFAULT_FREQUENT_FRACTION,
};
pub use fragments::{
    aggregate, aggregate_parallel, aggregate_refs, aggregate_with_config, AggregateConfig,
    FragmentCounts, FragmentExtractor, FragmentId, GlobalFragmentCounts,
};

pub use crate::config::{ConfigLoadError, FragscoreConfig};

use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn, Level};

/// Errors that can occur while running records through the pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("contribution scoring failed: {0}")]
    Contribution(#[from] ContributionError),

    #[error("fragment extraction failed for record {index}: {message}")]
    Extraction { index: usize, message: String },
}

/// What to do with a record the extractor rejects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRecordPolicy {
    /// Drop the record and keep going.
    #[default]
    Skip,
    /// Abort the run with [`PipelineError::Extraction`].
    Fail,
}

/// Outcome of [`score_records`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRun {
    pub report: ContributionReport,
    pub records_seen: usize,
    pub records_skipped: usize,
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_extraction(&self, latency: Duration, result: Result<(), PipelineError>);
    fn record_aggregate(&self, latency: Duration, records: usize, distinct_fragments: usize);
    fn record_score(&self, latency: Duration, result: Result<(), ContributionError>);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_extraction(self, result: Result<(), PipelineError>) {
        self.recorder
            .record_extraction(self.start.elapsed(), result);
    }

    fn record_aggregate(self, records: usize, distinct_fragments: usize) {
        self.recorder
            .record_aggregate(self.start.elapsed(), records, distinct_fragments);
    }

    fn record_score(self, result: Result<(), ContributionError>) {
        self.recorder.record_score(self.start.elapsed(), result);
    }
}

fn aggregate_stage<I>(maps: I, agg_cfg: &AggregateConfig) -> (GlobalFragmentCounts, usize)
where
    I: IntoIterator<Item = FragmentCounts>,
{
    let span = MetricsSpan::start();
    let (global, records) = if agg_cfg.use_parallel {
        let maps: Vec<FragmentCounts> = maps.into_iter().collect();
        let records = maps.len();
        (aggregate_with_config(maps, agg_cfg), records)
    } else {
        let mut records = 0usize;
        let global = aggregate(maps.into_iter().inspect(|_| records += 1));
        (global, records)
    };
    if let Some(span) = span {
        span.record_aggregate(records, global.len());
    }
    (global, records)
}

fn score_stage(
    global: &GlobalFragmentCounts,
    cfg: &ContributionConfig,
) -> Result<ContributionReport, PipelineError> {
    let mut span = MetricsSpan::start();
    match score_contributions(global, cfg) {
        Ok(report) => {
            if let Some(span) = span.take() {
                span.record_score(Ok(()));
            }
            Ok(report)
        }
        Err(err) => {
            if let Some(span) = span.take() {
                span.record_score(Err(err.clone()));
            }
            Err(PipelineError::Contribution(err))
        }
    }
}

/// Aggregate already-extracted per-record maps and score the result.
pub fn score_fragment_counts<I>(
    maps: I,
    agg_cfg: &AggregateConfig,
    contribution_cfg: &ContributionConfig,
) -> Result<ContributionReport, PipelineError>
where
    I: IntoIterator<Item = FragmentCounts>,
{
    contribution_cfg.validate()?;
    let (global, _) = aggregate_stage(maps, agg_cfg);
    score_stage(&global, contribution_cfg)
}

/// Convenience helper using default aggregation and the 80% rule.
pub fn score_fragment_counts_default<I>(maps: I) -> ContributionReport
where
    I: IntoIterator<Item = FragmentCounts>,
{
    score_contributions_default(&aggregate(maps))
}

/// Run `extractor` over every record, then aggregate and score.
///
/// Records the extractor rejects are handled according to `policy`; skipped
/// records contribute nothing to the counts.
pub fn score_records<R, E, I>(
    records: I,
    extractor: &E,
    agg_cfg: &AggregateConfig,
    contribution_cfg: &ContributionConfig,
    policy: InvalidRecordPolicy,
) -> Result<ScoringRun, PipelineError>
where
    I: IntoIterator<Item = R>,
    E: FragmentExtractor<R>,
{
    contribution_cfg.validate()?;

    let start = Instant::now();
    let span = tracing::span!(Level::INFO, "fragscore.score_records", policy = ?policy);
    let _guard = span.enter();

    let mut maps = Vec::new();
    let mut records_seen = 0usize;
    let mut records_skipped = 0usize;

    for (index, record) in records.into_iter().enumerate() {
        records_seen += 1;
        let mut extract_metrics = MetricsSpan::start();
        match extractor.extract(&record) {
            Ok(counts) => {
                if let Some(span) = extract_metrics.take() {
                    span.record_extraction(Ok(()));
                }
                maps.push(counts);
            }
            Err(err) => {
                let err = PipelineError::Extraction {
                    index,
                    message: err.to_string(),
                };
                if let Some(span) = extract_metrics.take() {
                    span.record_extraction(Err(err.clone()));
                }
                match policy {
                    InvalidRecordPolicy::Skip => {
                        warn!(index, error = %err, "record_skipped");
                        records_skipped += 1;
                    }
                    InvalidRecordPolicy::Fail => {
                        warn!(
                            index,
                            error = %err,
                            elapsed_micros = start.elapsed().as_micros(),
                            "scoring_failure"
                        );
                        return Err(err);
                    }
                }
            }
        }
    }

    let (global, _) = aggregate_stage(maps, agg_cfg);
    let report = score_stage(&global, contribution_cfg)?;

    info!(
        records_seen,
        records_skipped,
        distinct_fragments = report.distinct_fragments,
        total = report.total,
        frequent_count = report.frequent_count,
        elapsed_micros = start.elapsed().as_micros(),
        "scoring_success"
    );

    Ok(ScoringRun {
        report,
        records_seen,
        records_skipped,
    })
}

/// Score records using every setting from a loaded [`FragscoreConfig`].
pub fn score_records_with_config<R, E, I>(
    records: I,
    extractor: &E,
    config: &FragscoreConfig,
) -> Result<ScoringRun, PipelineError>
where
    I: IntoIterator<Item = R>,
    E: FragmentExtractor<R>,
{
    score_records(
        records,
        extractor,
        &config.aggregate_config(),
        &config.contribution_config(),
        config.pipeline.invalid_records,
    )
}
