//! Score table and report types produced by the contribution scorer.
//!
//! The report schema is part of the public contract: any change that alters
//! scores for the same input must come with a new `contribution_version`.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Write as _;

use fragments::FragmentId;
use serde::{Deserialize, Serialize};

/// `FragmentId -> ln(count / k)` for every observed fragment.
pub type ContributionScores = HashMap<FragmentId, f64>;

/// Result of one scoring pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContributionReport {
    /// Score of every fragment in the global counts.
    pub scores: ContributionScores,
    /// Members of the frequent set in selection order.
    ///
    /// Empty when the config asked not to keep it; `frequent_count` is
    /// always populated.
    pub frequent: Vec<FragmentId>,
    /// Size of the frequent set (`k`).
    pub frequent_count: usize,
    /// Grand total of occurrences across all fragments.
    pub total: u64,
    /// Number of distinct fragment types scored.
    pub distinct_fragments: usize,
    pub meta: ContributionMeta,
}

/// Metadata for traceability and determinism.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContributionMeta {
    /// Scoring algorithm version, owned by this crate.
    pub contribution_version: u16,
    /// Human-readable algorithm identifier.
    pub algorithm_name: String,
    pub frequent_fraction: f64,
    /// Configuration schema version supplied for this run.
    pub config_version: u32,
}

impl ContributionReport {
    /// Score for `id`, `None` if the fragment was never observed.
    pub fn score(&self, id: FragmentId) -> Option<f64> {
        self.scores.get(&id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Whether `id` made it into the frequent set. Always `false` when the
    /// set was not kept.
    pub fn is_frequent(&self, id: FragmentId) -> bool {
        self.frequent.contains(&id)
    }

    /// All scores ordered by ascending fragment id.
    pub fn sorted_scores(&self) -> Vec<(FragmentId, f64)> {
        let mut sorted: Vec<(FragmentId, f64)> =
            self.scores.iter().map(|(&id, &score)| (id, score)).collect();
        sorted.sort_unstable_by_key(|&(id, _)| id);
        sorted
    }

    /// The `n` highest scores, ties by ascending id.
    pub fn top_n(&self, n: usize) -> Vec<(FragmentId, f64)> {
        let mut sorted = self.sorted_scores();
        sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        sorted.truncate(n);
        sorted
    }

    /// Newline-delimited `id\tscore` records in ascending id order.
    pub fn to_tsv(&self) -> String {
        let mut out = String::with_capacity(self.scores.len() * 24);
        for (id, score) in self.sorted_scores() {
            let _ = writeln!(out, "{id}\t{score}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(pairs: &[(u64, f64)], frequent: &[u64]) -> ContributionReport {
        ContributionReport {
            scores: pairs.iter().map(|&(id, s)| (FragmentId(id), s)).collect(),
            frequent: frequent.iter().map(|&id| FragmentId(id)).collect(),
            frequent_count: frequent.len(),
            total: 0,
            distinct_fragments: pairs.len(),
            meta: ContributionMeta {
                contribution_version: 1,
                algorithm_name: "test".to_string(),
                frequent_fraction: 0.8,
                config_version: 1,
            },
        }
    }

    #[test]
    fn lookup_and_membership() {
        let r = report(&[(1, 2.0), (2, -0.5)], &[1]);
        assert_eq!(r.score(FragmentId(1)), Some(2.0));
        assert_eq!(r.score(FragmentId(3)), None);
        assert!(r.is_frequent(FragmentId(1)));
        assert!(!r.is_frequent(FragmentId(2)));
        assert!(!r.is_empty());
    }

    #[test]
    fn top_n_orders_by_score_then_id() {
        let r = report(&[(5, 1.0), (2, 3.0), (9, 1.0), (1, -1.0)], &[2]);
        assert_eq!(
            r.top_n(3),
            vec![(FragmentId(2), 3.0), (FragmentId(5), 1.0), (FragmentId(9), 1.0)]
        );
        assert_eq!(r.top_n(10).len(), 4);
    }

    #[test]
    fn tsv_is_sorted_by_id() {
        let r = report(&[(20, 0.5), (3, 0.0)], &[20]);
        assert_eq!(r.to_tsv(), "3\t0\n20\t0.5\n");
    }

    #[test]
    fn report_serde_roundtrip() {
        let r = report(&[(1, 1.25), (2, -0.75)], &[1]);
        let json = serde_json::to_string(&r).unwrap();
        let back: ContributionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
