//! Tracing subscriber setup for processes that run tasks
//!
//! `RUST_LOG` wins over the directives passed in, so a user can turn on
//! `jobenv_store=debug` for one run without code changes.

use crate::error::TelemetryError;
use tracing_subscriber::EnvFilter;

/// Directives used when the caller has no preference
pub const DEFAULT_DIRECTIVES: &str = "info";

/// Output format of log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Install the global `tracing` subscriber
///
/// # Errors
/// - `TelemetryError::InvalidFilter` if `directives` do not parse and `RUST_LOG` is unset
/// - `TelemetryError::AlreadyInitialized` if a global subscriber is already set
pub fn init_tracing(directives: &str, format: LogFormat) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directives)
            .map_err(|e| TelemetryError::InvalidFilter(e.to_string()))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialisation_fails() {
        let _ = init_tracing(DEFAULT_DIRECTIVES, LogFormat::Text);
        let err = init_tracing(DEFAULT_DIRECTIVES, LogFormat::Json).unwrap_err();
        assert!(matches!(err, TelemetryError::AlreadyInitialized(_)));
    }
}
