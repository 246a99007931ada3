//! Configuration builder.

use super::{models::*, validation, Result};
use std::path::Path;

/// Builder for creating [`ProspectConfig`] instances.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: ProspectConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a validated default configuration builder.
    pub fn defaults() -> Self {
        Self::new()
    }

    /// Set the base data directory for persistent storage backends.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Set the expected embedding dimension.
    pub fn with_embedding_dimension(mut self, dimension: usize) -> Self {
        self.config.embedding.dimension = dimension;
        self
    }

    /// Record the embedding model identifier.
    pub fn with_embedding_model(mut self, model_name: impl Into<String>) -> Self {
        self.config.embedding.model_name = model_name.into();
        self
    }

    /// Set the recency window in calendar months.
    pub fn with_recency_window_months(mut self, months: i64) -> Self {
        self.config.scoring.recency_window_months = months;
        self
    }

    /// Set the DBSCAN minimum cluster size.
    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.config.clustering.min_cluster_size = size;
        self
    }

    /// Set the DBSCAN neighborhood tolerance.
    pub fn with_cluster_tolerance(mut self, tolerance: f64) -> Self {
        self.config.clustering.tolerance = tolerance;
        self
    }

    /// Set the forecast horizon in periods.
    pub fn with_forecast_horizon(mut self, horizon: usize) -> Self {
        self.config.forecast.horizon = horizon;
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log output format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<ProspectConfig> {
        validation::validate_config(&self.config)?;
        Ok(self.config)
    }
}
