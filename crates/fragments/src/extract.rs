//! The seam between fragscore and a structural fingerprinting toolkit.
//!
//! fragscore never parses structures itself. Callers plug in an extractor
//! that turns one record (a SMILES string, a parsed molecule, anything) into
//! its fragment multiset, for example the non-zero elements of a radius-2
//! Morgan fingerprint.

use crate::types::FragmentCounts;

/// Turns one input record into the multiset of fragments it contains.
///
/// Returning `Err` marks the record as invalid; it is the pipeline's job to
/// skip or reject it before anything reaches the aggregator.
pub trait FragmentExtractor<R: ?Sized> {
    type Error: std::fmt::Display;

    fn extract(&self, record: &R) -> Result<FragmentCounts, Self::Error>;
}

impl<R, E, F> FragmentExtractor<R> for F
where
    R: ?Sized,
    E: std::fmt::Display,
    F: Fn(&R) -> Result<FragmentCounts, E>,
{
    type Error = E;

    fn extract(&self, record: &R) -> Result<FragmentCounts, E> {
        self(record)
    }
}
