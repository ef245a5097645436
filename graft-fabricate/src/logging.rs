//! Structured logging controlled by the `GRAFT_DEBUG` environment variable.
//!
//! # Environment Variables
//!
//! - `GRAFT_DEBUG=true` - Enable debug logging
//! - `GRAFT_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `GRAFT_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use graft_fabricate::logging;
//!
//! // Initialize once at startup
//! logging::init();
//! ```
//!
//! Internally the crate logs through the standard `tracing` macros; without
//! the `logging` feature, `init` is a no-op and the host application's own
//! subscriber sees the events.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `GRAFT_DEBUG`.
///
/// Returns `true` when set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("GRAFT_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// The configured log level from `GRAFT_LOG_LEVEL`.
///
/// Defaults to "debug" when `GRAFT_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("GRAFT_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// The configured output format from `GRAFT_LOG_FORMAT`.
pub fn get_log_format() -> &'static str {
    env::var("GRAFT_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize the logging subscriber. Subsequent calls are no-ops.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("GRAFT_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "logging")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "graft={level},graft_fabricate={level},graft_schema={level}"
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            match get_log_format() {
                "json" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json())
                        .init();
                }
                "compact" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().compact())
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().pretty())
                        .init();
                }
            }

            tracing::info!(
                level = level,
                format = get_log_format(),
                "Graft logging initialized"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults_to_json() {
        // SAFETY: Test runs before any reader of this variable.
        unsafe {
            env::remove_var("GRAFT_LOG_FORMAT");
        }
        assert_eq!(get_log_format(), "json");
    }
}
