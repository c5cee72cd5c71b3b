//! Logging setup for the NativeScript Nx tools
//!
//! Installs a `tracing` subscriber that writes to stderr, so diagnostic
//! output never interleaves with the child CLI's stdout.

use once_cell::sync::Lazy;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize logging with the default configuration
pub fn init() -> anyhow::Result<()> {
    init_with_config(TelemetryConfig::default())
}

/// Initialize logging with custom configuration
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.show_target)
                    .without_time()
                    .compact(),
            )
            .try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Logging initialized"
    );

    Ok(())
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Map `-v`/`-q` flags onto a filter directive, falling back to `default`
pub fn level_for_verbosity(verbose: u8, quiet: bool, default: &str) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose {
        0 => default.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub show_target: bool,
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            show_target: false,
            json: false,
        }
    }
}

/// Timer for measuring an operation, logged at debug level
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }

    /// Stop the timer and log the duration
    pub fn stop(self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.name,
            duration_ms = duration.as_millis(),
            "Timer completed"
        );
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_is_stable() {
        let id = session_id();
        assert!(!id.is_empty());
        assert_eq!(id, session_id());
    }

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0, false, "warn"), "warn");
        assert_eq!(level_for_verbosity(1, false, "warn"), "info");
        assert_eq!(level_for_verbosity(2, false, "warn"), "debug");
        assert_eq!(level_for_verbosity(5, false, "warn"), "trace");
        assert_eq!(level_for_verbosity(3, true, "warn"), "error");
    }

    #[test]
    fn test_timer() {
        let timer = Timer::start("patch");
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.stop() >= Duration::from_millis(5));
    }
}
