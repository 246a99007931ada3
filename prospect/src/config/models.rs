//! Configuration model definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Main configuration structure for Prospect.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProspectConfig {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Embedding provider configuration
    pub embedding: EmbeddingConfig,

    /// Scoring configuration
    pub scoring: ScoringConfig,

    /// Clustering configuration
    pub clustering: ClusteringConfig,

    /// Forecasting configuration
    pub forecast: ForecastConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Configuration for storage backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory for persistent backends; unused by the in-memory
    /// store
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = directories::ProjectDirs::from("org", "prospect", "prospect")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./data"));
        Self { data_dir }
    }
}

/// Configuration for the embedding provider boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Expected embedding vector dimension
    pub dimension: usize,

    /// Provider model identifier, recorded for reproducibility (a given
    /// text and model version must embed identically)
    pub model_name: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: 384,
            model_name: "user-provided".to_string(),
        }
    }
}

/// Configuration for the scoring pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Trailing window, in calendar months, an article must fall inside
    /// to count as recent
    pub recency_window_months: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            recency_window_months: 12,
        }
    }
}

/// Configuration for density-based topic clustering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Minimum number of points forming a dense region
    pub min_cluster_size: usize,

    /// Maximum distance between two points in the same neighborhood
    pub tolerance: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: 2,
            tolerance: 0.5,
        }
    }
}

/// Configuration for citation forecasting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of future periods to project
    pub horizon: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { horizon: 3 }
    }
}

/// Log verbosity levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace-level logging
    Trace,
    /// Debug-level logging
    Debug,
    /// Info-level logging
    Info,
    /// Warning-level logging
    Warn,
    /// Error-level logging
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Log output formats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output
    Pretty,
    /// Single-line output
    Compact,
    /// Newline-delimited JSON
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self::Compact
    }
}

/// Configuration for logging.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level to emit
    pub level: LogLevel,

    /// Output format
    pub format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ProspectConfig::default();
        assert_eq!(config.scoring.recency_window_months, 12);
        assert_eq!(config.clustering.min_cluster_size, 2);
        assert_eq!(config.forecast.horizon, 3);
        assert_eq!(config.embedding.dimension, 384);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn log_level_round_trips_through_strings() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
        assert!("verbose".parse::<LogLevel>().is_err());
    }
}
