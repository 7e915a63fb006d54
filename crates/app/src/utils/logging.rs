use std::time::Duration;

use dealflow_domain::{CrmError, LoggingConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Calling this twice is harmless;
/// the second call leaves the first subscriber in place.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let result = if config.json { builder.json().try_init() } else { builder.try_init() };

    if result.is_err() {
        log::debug!("tracing subscriber already installed");
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a stable identifier such as `"pipeline::move_deal"`; never
/// put user data in it.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&CrmError>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(err) => {
            warn!(command, duration_ms, error_type = error_label(err), "command_execution_failure");
        }
    }
}

/// Convert a `CrmError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &CrmError) -> &'static str {
    error.label()
}
