//! Structured logging infrastructure.
//!
//! Thin setup over the `tracing` ecosystem: level and format come from
//! [`LoggingConfig`], with `RUST_LOG` taking precedence when set.

use crate::config::{LogFormat, LogLevel, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Error type for logging operations
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Subscriber installation failed (usually: already initialized)
    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Initialize the logging system with the given configuration.
///
/// Installs a global subscriber; calling it twice returns an error, which
/// callers embedding the crate in a larger application may ignore.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let default_directive = match config.level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| LogError::Subscriber(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_subscriber_error() {
        let config = LoggingConfig::default();
        // Whichever call wins the race, the second must fail cleanly.
        let _ = init(&config);
        assert!(init(&config).is_err());
    }
}
