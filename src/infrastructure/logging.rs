//! Subscriber setup for binaries embedding the cache

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::domain::DomainError;

/// Filter for the configured level; `RUST_LOG` takes precedence when set
fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, DomainError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => level_filter(&config.level),
    }
}

fn level_filter(level: &str) -> Result<EnvFilter, DomainError> {
    EnvFilter::try_new(level)
        .map_err(|e| DomainError::configuration(format!("Invalid log level '{}': {}", level, e)))
}

/// Installs the global subscriber, writing to stderr so command output on
/// stdout stays clean
pub fn init_logging(config: &LoggingConfig) -> Result<(), DomainError> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().compact().with_target(true).with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| DomainError::configuration(format!("Logging already initialized: {}", e)))?;

    tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_accepts_directives() {
        assert!(level_filter("info").is_ok());
        assert!(level_filter("warn,tiered_cacheable=debug").is_ok());
    }

    #[test]
    fn test_level_filter_rejects_unknown_level() {
        let result = level_filter("tiered_cacheable=verbose");
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
