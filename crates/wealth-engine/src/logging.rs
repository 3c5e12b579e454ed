//! File-backed structured logging.
//!
//! The chart owns stdout for the whole run, so log lines go to
//! `logging.file` instead, without ANSI colours. `logging.json` switches
//! the format to JSON lines.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use wealth_core::config::LoggingConfig;

use crate::error::EngineError;

/// Build the filter: `RUST_LOG` wins when set and valid, else the
/// configured level.
fn build_filter(rust_log: Option<&str>, level: &str) -> Result<EnvFilter, EngineError> {
    if let Some(directives) = rust_log
        && let Ok(filter) = EnvFilter::try_new(directives)
    {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| EngineError::Logging {
        message: format!("invalid log level {level:?}: {e}"),
    })
}

/// Install the global subscriber writing to the configured file.
pub fn init(config: &LoggingConfig) -> Result<(), EngineError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|e| EngineError::Logging {
            message: format!("failed to open log file {}: {e}", config.file),
        })?;

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(rust_log.as_deref(), &config.level)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| EngineError::Logging {
        message: format!("failed to install subscriber: {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn config_level_used_without_rust_log() {
        let filter = build_filter(None, "debug").unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn rust_log_wins() {
        let filter = build_filter(Some("wealth_core=trace"), "info").unwrap();
        assert_eq!(filter.to_string(), "wealth_core=trace");
    }

    #[test]
    fn malformed_rust_log_falls_back() {
        let filter = build_filter(Some("wealth=loud"), "warn").unwrap();
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn malformed_level_is_an_error() {
        let result = build_filter(None, "wealth=loud");
        assert!(matches!(result, Err(EngineError::Logging { .. })));
    }
}
