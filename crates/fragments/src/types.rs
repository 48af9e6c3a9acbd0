//! Fragment identifier and count-map types shared by every fragscore stage.
//!
//! A [`FragmentCounts`] map is the only thing the scoring core ever sees from
//! the fingerprinting side: one map per record, and one aggregated map for a
//! whole population. Zero counts are never stored.

use std::collections::hash_map::{self, HashMap};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque identifier of one structural fragment type.
///
/// In the molecular domain this is the hash of a local atom environment. The
/// scoring core only relies on equality, hashing, and the total order used
/// for deterministic tie-breaking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FragmentId(pub u64);

impl FragmentId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for FragmentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<u32> for FragmentId {
    fn from(value: u32) -> Self {
        Self(u64::from(value))
    }
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Multiset of fragment identifiers: `FragmentId -> positive count`.
///
/// Used both for the output of the fingerprinting collaborator on a single
/// record and for the aggregated population counts (see
/// [`GlobalFragmentCounts`]). Counts saturate at `u64::MAX`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FragmentCounts {
    counts: HashMap<FragmentId, u64>,
}

/// Population-wide counts produced by [`crate::aggregate`].
pub type GlobalFragmentCounts = FragmentCounts;

impl FragmentCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: HashMap::with_capacity(capacity),
        }
    }

    /// Add `count` occurrences of `id`. A zero count leaves the map untouched.
    pub fn add(&mut self, id: impl Into<FragmentId>, count: u64) {
        if count == 0 {
            return;
        }
        let slot = self.counts.entry(id.into()).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    /// Record a single occurrence of `id`.
    pub fn increment(&mut self, id: impl Into<FragmentId>) {
        self.add(id, 1);
    }

    /// Occurrence count of `id`, `0` when absent.
    pub fn get(&self, id: FragmentId) -> u64 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    pub fn contains(&self, id: FragmentId) -> bool {
        self.counts.contains_key(&id)
    }

    /// Number of distinct fragment types.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all occurrence counts.
    pub fn total(&self) -> u64 {
        self.counts
            .values()
            .fold(0u64, |acc, &count| acc.saturating_add(count))
    }

    pub fn iter(&self) -> impl Iterator<Item = (FragmentId, u64)> + '_ {
        self.counts.iter().map(|(&id, &count)| (id, count))
    }

    pub fn ids(&self) -> impl Iterator<Item = FragmentId> + '_ {
        self.counts.keys().copied()
    }

    /// Fold every entry of `other` into `self`.
    pub fn merge(&mut self, other: &FragmentCounts) {
        self.counts.reserve(other.len());
        for (id, count) in other.iter() {
            self.add(id, count);
        }
    }

    /// Owned variant of [`FragmentCounts::merge`]; reuses the larger map.
    pub fn merged(mut self, mut other: FragmentCounts) -> FragmentCounts {
        if other.len() > self.len() {
            std::mem::swap(&mut self, &mut other);
        }
        self.merge(&other);
        self
    }
}

impl<I: Into<FragmentId>> FromIterator<(I, u64)> for FragmentCounts {
    fn from_iter<T: IntoIterator<Item = (I, u64)>>(iter: T) -> Self {
        let mut counts = FragmentCounts::new();
        counts.extend(iter);
        counts
    }
}

impl<I: Into<FragmentId>> Extend<(I, u64)> for FragmentCounts {
    fn extend<T: IntoIterator<Item = (I, u64)>>(&mut self, iter: T) {
        for (id, count) in iter {
            self.add(id, count);
        }
    }
}

// Goes through `add` so zero entries in serialized input are dropped.
impl<'de> Deserialize<'de> for FragmentCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<FragmentId, u64>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

impl IntoIterator for FragmentCounts {
    type Item = (FragmentId, u64);
    type IntoIter = hash_map::IntoIter<FragmentId, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_accumulates_counts() {
        let mut counts = FragmentCounts::new();
        counts.add(7u64, 2);
        counts.add(7u64, 3);
        counts.increment(9u64);
        assert_eq!(counts.get(FragmentId(7)), 5);
        assert_eq!(counts.get(FragmentId(9)), 1);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn zero_count_never_creates_key() {
        let mut counts = FragmentCounts::new();
        counts.add(1u64, 0);
        assert!(counts.is_empty());
        assert!(!counts.contains(FragmentId(1)));
        assert_eq!(counts.get(FragmentId(1)), 0);
    }

    #[test]
    fn counts_saturate_instead_of_wrapping() {
        let mut counts = FragmentCounts::new();
        counts.add(1u64, u64::MAX);
        counts.add(1u64, 10);
        assert_eq!(counts.get(FragmentId(1)), u64::MAX);
        counts.add(2u64, 5);
        assert_eq!(counts.total(), u64::MAX);
    }

    #[test]
    fn merge_sums_overlapping_ids() {
        let mut a: FragmentCounts = [(1u64, 2), (2u64, 1)].into_iter().collect();
        let b: FragmentCounts = [(2u64, 4), (3u64, 1)].into_iter().collect();
        a.merge(&b);
        assert_eq!(a.get(FragmentId(1)), 2);
        assert_eq!(a.get(FragmentId(2)), 5);
        assert_eq!(a.get(FragmentId(3)), 1);
    }

    #[test]
    fn merged_is_symmetric() {
        let a: FragmentCounts = [(1u64, 2), (2u64, 1), (4u64, 8)].into_iter().collect();
        let b: FragmentCounts = [(2u64, 4)].into_iter().collect();
        assert_eq!(a.clone().merged(b.clone()), b.merged(a));
    }

    #[test]
    fn fragment_id_conversions_and_display() {
        assert_eq!(FragmentId::from(42u32), FragmentId::new(42));
        assert_eq!(FragmentId::from(42u64).get(), 42);
        assert_eq!(FragmentId(2245384272).to_string(), "2245384272");
        assert!(FragmentId(1) < FragmentId(2));
    }

    #[test]
    fn json_map_keys_are_fragment_ids() {
        let counts: FragmentCounts =
            serde_json::from_str(r#"{"864662311": 3, "2246728737": 1}"#).unwrap();
        assert_eq!(counts.get(FragmentId(864662311)), 3);
        assert_eq!(counts.get(FragmentId(2246728737)), 1);

        let json = serde_json::to_string(&counts).unwrap();
        let back: FragmentCounts = serde_json::from_str(&json).unwrap();
        assert_eq!(counts, back);
    }

    #[test]
    fn json_zero_counts_are_dropped() {
        let counts: FragmentCounts = serde_json::from_str(r#"{"1": 0, "2": 4}"#).unwrap();
        assert_eq!(counts.len(), 1);
        assert!(!counts.contains(FragmentId(1)));
    }
}
