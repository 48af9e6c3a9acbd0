//! # fragscore fragments
//!
//! Fragment identifiers, per-record fragment multisets, and the aggregation
//! stage that folds them into population-wide counts.
//!
//! ## Contract
//!
//! - Records reach this crate already decomposed into fragments by an
//!   external fingerprinting toolkit (see [`FragmentExtractor`]).
//! - Aggregation is a pure function of its inputs: no I/O, no global state.
//! - `aggregate(records)[f] == Σ record.get(f)` for every fragment `f`, and
//!   the result is independent of record order.
//!
//! ## Example Usage
//!
//! ```
//! use fragments::{aggregate, FragmentCounts, FragmentId};
//!
//! let ethanol: FragmentCounts = [(2246728737u64, 2), (864662311u64, 1)].into_iter().collect();
//! let methanol: FragmentCounts = [(2246728737u64, 1)].into_iter().collect();
//!
//! let global = aggregate([ethanol, methanol]);
//!
//! assert_eq!(global.get(FragmentId(2246728737)), 3);
//! assert_eq!(global.total(), 4);
//! ```
//!
pub mod aggregate;
pub mod extract;
pub mod types;

pub use crate::aggregate::{
    aggregate, aggregate_parallel, aggregate_refs, aggregate_with_config, AggregateConfig,
};
pub use crate::extract::FragmentExtractor;
pub use crate::types::{FragmentCounts, FragmentId, GlobalFragmentCounts};
