//! Engine configuration file support.
//!
//! This module provides the scoring weight vector and the engine tuning knobs,
//! with utilities for reading configuration from TOML files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Tolerance for the weight-sum invariant.
const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// Result type for configuration loading and validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Relative weight of each scoring factor.
///
/// The five weights must sum to 1.0. A mis-summing vector is rejected by
/// [`EngineConfig::validate`] before any scoring occurs; it is never silently
/// renormalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub location: f64,
    pub availability: f64,
    pub expertise: f64,
    pub rating: f64,
    pub workload: f64,
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.location + self.availability + self.expertise + self.rating + self.workload
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            location: 0.30,
            availability: 0.25,
            expertise: 0.20,
            rating: 0.15,
            workload: 0.10,
        }
    }
}

/// Engine tuning knobs.
///
/// All fields have serde defaults so a partial TOML file is enough:
///
/// ```toml
/// max_distance_km = 40.0
///
/// [weights]
/// location = 0.4
/// availability = 0.2
/// expertise = 0.2
/// rating = 0.1
/// workload = 0.1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub weights: ScoreWeights,
    /// Candidates farther than this from the job are disqualified.
    #[serde(default = "default_max_distance_km")]
    pub max_distance_km: f64,
    /// When true, a worker lacking the job's category is disqualified;
    /// when false, they receive `expertise_partial_credit` instead.
    #[serde(default = "default_require_expertise_match")]
    pub require_expertise_match: bool,
    /// Expertise sub-score for a non-matching worker when matching is not
    /// strictly required. Must be in [0, 1].
    #[serde(default = "default_expertise_partial_credit")]
    pub expertise_partial_credit: f64,
    /// Per-worker cap on same-day assignments; at or above it a worker is
    /// disqualified.
    #[serde(default = "default_max_daily_assignments")]
    pub max_daily_assignments: u32,
    /// Throttling pause between bulk items. Not a correctness knob.
    #[serde(default = "default_inter_item_delay_ms")]
    pub inter_item_delay_ms: u64,
    /// Timeout applied to every external-store call.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

fn default_max_distance_km() -> f64 {
    25.0
}

fn default_require_expertise_match() -> bool {
    true
}

fn default_expertise_partial_credit() -> f64 {
    0.5
}

fn default_max_daily_assignments() -> u32 {
    8
}

fn default_inter_item_delay_ms() -> u64 {
    100
}

fn default_store_timeout_ms() -> u64 {
    5_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            max_distance_km: default_max_distance_km(),
            require_expertise_match: default_require_expertise_match(),
            expertise_partial_credit: default_expertise_partial_credit(),
            max_daily_assignments: default_max_daily_assignments(),
            inter_item_delay_ms: default_inter_item_delay_ms(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl EngineConfig {
    /// Load engine configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(EngineConfig)` if read, parsed, and validated successfully
    /// * `Err(ConfigError)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load engine configuration from the default location.
    ///
    /// Searches for `dispatch.toml` in the current directory, then the
    /// parent directory.
    pub fn from_default_location() -> ConfigResult<Self> {
        let search_paths = vec![
            PathBuf::from("dispatch.toml"),
            PathBuf::from("../dispatch.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::Invalid(
            "No dispatch.toml found in standard locations".to_string(),
        ))
    }

    /// Enforce the configuration invariants.
    ///
    /// Weight-sum deviation beyond a small epsilon is a hard error: the
    /// weighted total of a score breakdown is only meaningful when the
    /// weights sum to exactly 1.0.
    pub fn validate(&self) -> ConfigResult<()> {
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::Invalid(format!(
                "Scoring weights must sum to 1.0, got {:.6}",
                sum
            )));
        }

        let w = &self.weights;
        for (name, value) in [
            ("location", w.location),
            ("availability", w.availability),
            ("expertise", w.expertise),
            ("rating", w.rating),
            ("workload", w.workload),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "Weight '{}' must be non-negative, got {}",
                    name, value
                )));
            }
        }

        if self.max_distance_km <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_distance_km must be positive, got {}",
                self.max_distance_km
            )));
        }

        if !(0.0..=1.0).contains(&self.expertise_partial_credit) {
            return Err(ConfigError::Invalid(format!(
                "expertise_partial_credit must be in [0, 1], got {}",
                self.expertise_partial_credit
            )));
        }

        if self.max_daily_assignments == 0 {
            return Err(ConfigError::Invalid(
                "max_daily_assignments must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert!((config.weights.sum() - 1.0).abs() < WEIGHT_SUM_EPSILON);
        assert_eq!(config.max_distance_km, 25.0);
        assert!(config.require_expertise_match);
        assert_eq!(config.max_daily_assignments, 8);
        assert_eq!(config.inter_item_delay_ms, 100);
    }

    #[test]
    fn test_parse_partial_toml_uses_defaults() {
        let toml = r#"
max_distance_km = 40.0
"#;
        let config: EngineConfig = toml::from_str(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.max_distance_km, 40.0);
        assert_eq!(config.weights, ScoreWeights::default());
    }

    #[test]
    fn test_mis_summing_weights_rejected() {
        let toml = r#"
[weights]
location = 0.5
availability = 0.5
expertise = 0.5
rating = 0.0
workload = 0.0
"#;
        let config: EngineConfig = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = EngineConfig {
            weights: ScoreWeights {
                location: 1.2,
                availability: -0.2,
                expertise: 0.0,
                rating: 0.0,
                workload: 0.0,
            },
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_daily_cap_rejected() {
        let config = EngineConfig {
            max_daily_assignments: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
