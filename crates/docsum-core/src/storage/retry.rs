//! Retry logic for archive uploads
//!
//! Object stores fail transiently (timeouts, throttling, 5xx responses). Uploads
//! are retried with exponential backoff; permanent failures return immediately.

use std::future::Future;
use std::time::Duration;

use super::StorageError;

/// Default number of retry attempts for archive uploads
pub const MAX_RETRIES: u32 = 3;

/// Calculate exponential backoff delay for retry attempt
///
/// Base delay: 200ms, doubling each attempt
/// Delays: 200ms, 400ms, 800ms, ...
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(200 * 2u64.pow(attempt.saturating_sub(1)))
}

/// Execute a storage operation, retrying transient errors up to `max_retries` times
pub async fn with_retry<F, Fut, T>(max_retries: u32, operation: F) -> Result<T, StorageError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, StorageError>>,
{
    let mut attempts = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() && attempts < max_retries => {
                attempts += 1;
                let delay = backoff_delay(attempts);
                tracing::debug!(
                    error = %e,
                    attempt = attempts,
                    max_retries = max_retries,
                    delay_ms = delay.as_millis(),
                    "Storage transient error, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
