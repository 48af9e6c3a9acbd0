//! Population-wide aggregation of per-record fragment counts.
//!
//! Summation is commutative and associative, so the sequential fold and the
//! rayon map-then-combine reduction produce identical maps for any input
//! order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::types::{FragmentCounts, GlobalFragmentCounts};

/// Aggregation knobs. None of them change the result, only how it is computed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregateConfig {
    /// Reduce with rayon instead of a sequential fold.
    pub use_parallel: bool,
    /// Inputs with fewer records than this are folded sequentially even when
    /// `use_parallel` is set.
    pub min_parallel_records: usize,
}

impl AggregateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    pub fn with_min_parallel_records(mut self, min_parallel_records: usize) -> Self {
        self.min_parallel_records = min_parallel_records;
        self
    }
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            use_parallel: false,
            min_parallel_records: 1024,
        }
    }
}

/// Sum a (possibly lazy) sequence of per-record maps into one global map.
///
/// Empty input, or input made only of empty maps, yields an empty map.
pub fn aggregate<I>(records: I) -> GlobalFragmentCounts
where
    I: IntoIterator<Item = FragmentCounts>,
{
    records
        .into_iter()
        .fold(GlobalFragmentCounts::new(), |mut acc, record| {
            acc.merge(&record);
            acc
        })
}

/// Borrowing variant of [`aggregate`] for callers that keep the per-record maps.
pub fn aggregate_refs<'a, I>(records: I) -> GlobalFragmentCounts
where
    I: IntoIterator<Item = &'a FragmentCounts>,
{
    records
        .into_iter()
        .fold(GlobalFragmentCounts::new(), |mut acc, record| {
            acc.merge(record);
            acc
        })
}

/// Parallel map-then-combine reduction over already materialized records.
pub fn aggregate_parallel(records: Vec<FragmentCounts>) -> GlobalFragmentCounts {
    records
        .into_par_iter()
        .reduce(GlobalFragmentCounts::new, FragmentCounts::merged)
}

/// Aggregate with the strategy selected by `cfg`.
pub fn aggregate_with_config(
    records: Vec<FragmentCounts>,
    cfg: &AggregateConfig,
) -> GlobalFragmentCounts {
    if cfg.use_parallel && records.len() >= cfg.min_parallel_records {
        aggregate_parallel(records)
    } else {
        aggregate(records)
    }
}
