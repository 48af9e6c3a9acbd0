//! # fragscore contribution scoring
//!
//! Turns population-wide fragment counts into a log-scaled contribution
//! score per fragment type.
//!
//! ## Contract
//!
//! - Input is the aggregated [`fragments::GlobalFragmentCounts`]; this crate
//!   never sees records or fingerprints.
//! - The scorer is a pure function of `(global_counts, config)`. The same
//!   input and config always yield exactly equal scores.
//! - Every observed fragment is scored, frequent or not. Scores are
//!   unbounded and may be negative.
//!
//! ## Algorithm
//!
//! 1.  **Ranking**: fragments are ordered by descending global count, ties by
//!     ascending [`fragments::FragmentId`].
//! 2.  **Frequent set**: the ranking is walked while accumulating counts until
//!     the running sum reaches `frequent_fraction * total` (0.8 by default).
//!     The fragment that crosses the threshold belongs to the set. Its size
//!     `k` does not depend on how ties are ordered.
//! 3.  **Scoring**: every fragment gets `ln(count / k)`.
//!
//! An empty input (total of zero) produces an empty report rather than an
//! error.
//!
//! ## Example Usage
//!
//! ```
//! use contribution::{score_contributions, ContributionConfig};
//! use fragments::{FragmentCounts, FragmentId};
//!
//! let global: FragmentCounts = [(1u64, 80), (2u64, 10), (3u64, 10)].into_iter().collect();
//! let report = score_contributions(&global, &ContributionConfig::default()).unwrap();
//!
//! assert_eq!(report.frequent_count, 1);
//! assert_eq!(report.score(FragmentId(1)), Some(80f64.ln()));
//! ```
//!
pub mod config;
pub mod frequent;
pub mod report;

use tracing::debug;

use fragments::GlobalFragmentCounts;

pub use crate::config::{ContributionConfig, ContributionError, DEFAULT_FREQUENT_FRACTION};
pub use crate::frequent::{frequent_prefix_len, rank_by_count};
pub use crate::report::{ContributionMeta, ContributionReport, ContributionScores};

/// Current scoring algorithm version for this crate.
pub const CONTRIBUTION_VERSION: u16 = 1;

/// Human-readable algorithm identifier.
pub const CONTRIBUTION_ALGORITHM: &str = "frequentset_lnratio_v1";

/// Score one fragment: `ln(count / frequent_count)`.
///
/// A frequent set of size zero scores `-inf`. The scorer never produces one
/// for non-empty input.
#[inline]
pub fn contribution_score(count: u64, frequent_count: usize) -> f64 {
    if frequent_count == 0 {
        return f64::NEG_INFINITY;
    }
    (count as f64 / frequent_count as f64).ln()
}

/// Select the frequent set and score every fragment in `counts`.
pub fn score_contributions(
    counts: &GlobalFragmentCounts,
    cfg: &ContributionConfig,
) -> Result<ContributionReport, ContributionError> {
    cfg.validate()?;

    let meta = ContributionMeta {
        contribution_version: CONTRIBUTION_VERSION,
        algorithm_name: CONTRIBUTION_ALGORITHM.to_string(),
        frequent_fraction: cfg.frequent_fraction,
        config_version: cfg.version,
    };

    let total = counts.total();
    if total == 0 {
        debug!("contribution_empty_input");
        return Ok(ContributionReport {
            scores: ContributionScores::new(),
            frequent: Vec::new(),
            frequent_count: 0,
            total: 0,
            distinct_fragments: 0,
            meta,
        });
    }

    let ranked = rank_by_count(counts);
    let k = frequent_prefix_len(&ranked, total, cfg.frequent_fraction);

    let scores: ContributionScores = ranked
        .iter()
        .map(|&(id, count)| (id, contribution_score(count, k)))
        .collect();

    let frequent = if cfg.include_frequent_set {
        ranked[..k].iter().map(|&(id, _)| id).collect()
    } else {
        Vec::new()
    };

    debug!(
        total,
        frequent_count = k,
        distinct_fragments = ranked.len(),
        "contribution_scored"
    );

    Ok(ContributionReport {
        scores,
        frequent,
        frequent_count: k,
        total,
        distinct_fragments: ranked.len(),
        meta,
    })
}

/// [`score_contributions`] with the default 80% rule. Infallible.
pub fn score_contributions_default(counts: &GlobalFragmentCounts) -> ContributionReport {
    let cfg = ContributionConfig::default();
    match score_contributions(counts, &cfg) {
        Ok(report) => report,
        Err(err) => unreachable!("default contribution config is valid: {err}"),
    }
}
