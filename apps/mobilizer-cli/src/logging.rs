//! Logging setup using tracing.
//!
//! Logs go to stderr so command output on stdout stays machine-readable.
//! `RUST_LOG` takes precedence over the configured filter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{CliError, CliResult};

/// Initialize the tracing subscriber.
///
/// # Arguments
///
/// * `filter` - The log filter directive (e.g., "info,mobilizer_authorization=debug")
/// * `json` - Emit one JSON object per event instead of compact text
pub fn init_logging(filter: &str, json: bool) -> CliResult<()> {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .map_err(|e| CliError::Config(format!("Failed to create log filter: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter_layer);
    let result = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .flatten_event(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init()
    };
    result.map_err(|e| CliError::Config(format!("Failed to install logger: {e}")))?;

    tracing::debug!(filter = %filter, json, "Logging initialized");
    Ok(())
}

/// Initialize logging for tests (with simpler output).
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}
