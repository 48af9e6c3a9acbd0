//! Configuration and error types for fragscore contribution scoring.
//!
//! Nothing here touches I/O or the environment; the scorer is a pure function
//! of `(global_counts, config)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default share of total occurrences the frequent set must cover.
pub const DEFAULT_FREQUENT_FRACTION: f64 = 0.8;

/// Configuration for the contribution scorer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContributionConfig {
    /// Configuration schema version.
    ///
    /// Any change that can affect scores must bump this version so older
    /// score tables stay comparable.
    pub version: u32,
    /// Fraction of the grand total the frequent set must reach.
    ///
    /// The walk over descending counts stops at the first fragment whose
    /// cumulative count is `>= frequent_fraction * total`; that fragment is
    /// part of the set. Must lie in `(0, 1]`.
    pub frequent_fraction: f64,
    /// Keep the frequent set (in selection order) on the returned report.
    ///
    /// When `false` only its size is reported.
    pub include_frequent_set: bool,
}

impl ContributionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coverage fraction. `0.8` reproduces the classic 80% rule.
    pub fn with_frequent_fraction(mut self, frequent_fraction: f64) -> Self {
        self.frequent_fraction = frequent_fraction;
        self
    }

    pub fn with_frequent_set(mut self, include_frequent_set: bool) -> Self {
        self.include_frequent_set = include_frequent_set;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ContributionError> {
        if self.version < 1 {
            return Err(ContributionError::InvalidConfigVersion {
                version: self.version,
            });
        }
        let fraction = self.frequent_fraction;
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(ContributionError::InvalidFrequentFraction { fraction });
        }
        Ok(())
    }
}

impl Default for ContributionConfig {
    fn default() -> Self {
        Self {
            version: 1,
            frequent_fraction: DEFAULT_FREQUENT_FRACTION,
            include_frequent_set: true,
        }
    }
}

/// Errors returned by the contribution scorer.
///
/// Scoring itself is total; only a bad configuration is rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContributionError {
    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },

    #[error("invalid config: frequent_fraction must be in (0, 1] (got {fraction})")]
    InvalidFrequentFraction { fraction: f64 },
}
