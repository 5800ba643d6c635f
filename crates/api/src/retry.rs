//! Retry with exponential back-off and jitter.
//!
//! [`retry_with_backoff`] wraps any fallible async API call and retries it
//! while the error is transient (see [`ApiError::is_transient`]). Anything
//! else, including an expired session, is returned on the first failure.

use std::future::Future;
use std::time::Duration;

use crate::error::ApiError;

const MAX_DELAY_MS: u64 = 60_000;

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The delay before retry `n` is `backoff_base_ms × 2ⁿ⁻¹`, jittered by ±25 %
/// and capped at 60 s. A rate-limited response waits at least as long as the
/// backend asked for.
///
/// # Errors
///
/// Returns the last error once retries are exhausted, or the first
/// non-transient error.
pub async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transient() || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let jittered = (capped as f64 * rand::random::<f64>().mul_add(0.5, 0.75)) as u64;
                let delay_ms = match &err {
                    ApiError::RateLimited(secs) => jittered.max(secs.saturating_mul(1000)),
                    _ => jittered,
                };
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "Transient API error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
