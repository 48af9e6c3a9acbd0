//! YAML Configuration File Support for fragscore
//!
//! Loads aggregation, scoring, and pipeline settings from a single YAML file.
//! Every section is optional and falls back to the library defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "morgan-r2-library"
//!
//! aggregate:
//!   use_parallel: true
//!   min_parallel_records: 4096
//!
//! contribution:
//!   version: 1
//!   frequent_fraction: 0.8
//!   include_frequent_set: true
//!
//! pipeline:
//!   invalid_records: "skip"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AggregateConfig, ContributionConfig, InvalidRecordPolicy, DEFAULT_FREQUENT_FRACTION};

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FragscoreConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub aggregate: AggregateYamlConfig,

    #[serde(default)]
    pub contribution: ContributionYamlConfig,

    #[serde(default)]
    pub pipeline: PipelineYamlConfig,
}

impl FragscoreConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: FragscoreConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.contribution.validate()?;
        Ok(())
    }

    pub fn aggregate_config(&self) -> AggregateConfig {
        AggregateConfig::new()
            .with_parallel(self.aggregate.use_parallel)
            .with_min_parallel_records(self.aggregate.min_parallel_records)
    }

    pub fn contribution_config(&self) -> ContributionConfig {
        ContributionConfig {
            version: self.contribution.version,
            frequent_fraction: self.contribution.frequent_fraction,
            include_frequent_set: self.contribution.include_frequent_set,
        }
    }
}

impl Default for FragscoreConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            aggregate: AggregateYamlConfig::default(),
            contribution: ContributionYamlConfig::default(),
            pipeline: PipelineYamlConfig::default(),
        }
    }
}

/// Aggregation YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateYamlConfig {
    #[serde(default)]
    pub use_parallel: bool,

    #[serde(default = "default_min_parallel_records")]
    pub min_parallel_records: usize,
}

impl Default for AggregateYamlConfig {
    fn default() -> Self {
        Self {
            use_parallel: false,
            min_parallel_records: default_min_parallel_records(),
        }
    }
}

/// Contribution scoring YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_frequent_fraction")]
    pub frequent_fraction: f64,

    #[serde(default = "true_value")]
    pub include_frequent_set: bool,
}

impl ContributionYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.version == 0 {
            return Err(ConfigLoadError::Validation(
                "contribution.version must be >= 1".to_string(),
            ));
        }
        let fraction = self.frequent_fraction;
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(ConfigLoadError::Validation(format!(
                "contribution.frequent_fraction must be in (0, 1], got {fraction}"
            )));
        }
        Ok(())
    }
}

impl Default for ContributionYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            frequent_fraction: DEFAULT_FREQUENT_FRACTION,
            include_frequent_set: true,
        }
    }
}

/// Record handling YAML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineYamlConfig {
    #[serde(default)]
    pub invalid_records: InvalidRecordPolicy,
}

fn default_version() -> u32 {
    1
}
fn default_min_parallel_records() -> usize {
    AggregateConfig::default().min_parallel_records
}
fn default_frequent_fraction() -> f64 {
    DEFAULT_FREQUENT_FRACTION
}
fn true_value() -> bool {
    true
}
