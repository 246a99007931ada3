//! Configuration validation.

use super::models::ProspectConfig;
use super::{ConfigError, Result};

/// Validate a complete configuration.
pub fn validate_config(config: &ProspectConfig) -> Result<()> {
    if config.embedding.dimension == 0 {
        return Err(ConfigError::ValidationError(
            "embedding.dimension must be greater than 0".to_string(),
        ));
    }
    if config.scoring.recency_window_months <= 0 {
        return Err(ConfigError::ValidationError(
            "scoring.recency_window_months must be greater than 0".to_string(),
        ));
    }
    if config.clustering.min_cluster_size < 2 {
        return Err(ConfigError::ValidationError(
            "clustering.min_cluster_size must be at least 2".to_string(),
        ));
    }
    if config.clustering.tolerance <= 0.0 {
        return Err(ConfigError::ValidationError(
            "clustering.tolerance must be greater than 0".to_string(),
        ));
    }
    if config.forecast.horizon == 0 {
        return Err(ConfigError::ValidationError(
            "forecast.horizon must be at least 1".to_string(),
        ));
    }

    Ok(())
}
