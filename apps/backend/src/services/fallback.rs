//! Deadline and fallback handling for I/O collaborators.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Await `call` for at most `timeout`.
///
/// Errors and timeouts are logged and replaced by `fallback`, so a slow or
/// broken collaborator never fails the request that invoked it.
pub async fn with_fallback<T, E, F>(label: &'static str, timeout: Duration, call: F, fallback: T) -> T
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            tracing::warn!(collaborator = label, error = %e, "call failed, using fallback");
            fallback
        }
        Err(_) => {
            tracing::warn!(
                collaborator = label,
                timeout_ms = timeout.as_millis() as u64,
                "call timed out, using fallback"
            );
            fallback
        }
    }
}
