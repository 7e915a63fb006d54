//! Command execution helpers
//!
//! Times a command and logs its outcome so individual commands stay focused
//! on their own logic.

use std::future::Future;
use std::time::Instant;

use dealflow_domain::Result;

use crate::utils::logging::log_command_execution;

/// Run `command_fn`, then log the elapsed time and outcome under
/// `command_name`.
pub async fn execute_logged<F, Fut, T>(command_name: &str, command_fn: F) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let start = Instant::now();
    let result = command_fn().await;
    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result
}
