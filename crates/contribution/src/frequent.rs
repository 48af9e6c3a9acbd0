//! Frequent-set selection over aggregated fragment counts.

use std::cmp::Reverse;

use fragments::{FragmentCounts, FragmentId};

/// Fragments ordered by descending count, ties by ascending id.
pub fn rank_by_count(counts: &FragmentCounts) -> Vec<(FragmentId, u64)> {
    let mut ranked: Vec<(FragmentId, u64)> = counts.iter().collect();
    ranked.sort_unstable_by_key(|&(id, count)| (Reverse(count), id));
    ranked
}

/// Length of the shortest prefix of `ranked` whose cumulative count reaches
/// `fraction * total`.
///
/// The fragment that crosses the threshold is counted. Returns `0` only for
/// an empty ranking.
pub fn frequent_prefix_len(ranked: &[(FragmentId, u64)], total: u64, fraction: f64) -> usize {
    let threshold = total as f64 * fraction;
    let mut cumulative = 0u64;
    for (idx, &(_, count)) in ranked.iter().enumerate() {
        cumulative = cumulative.saturating_add(count);
        if cumulative as f64 >= threshold {
            return idx + 1;
        }
    }
    // Only reachable through float rounding with fraction == 1.0.
    ranked.len()
}
