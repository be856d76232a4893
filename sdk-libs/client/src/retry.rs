use std::{future::Future, time::Duration};

use tracing::{error, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub num_retries: u32,
    pub delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            num_retries: 10,
            delay_ms: 400,
            max_delay_ms: 8000,
        }
    }
}

/// Runs `operation` until it succeeds, fails with an error `is_retryable`
/// rejects, or failed `config.num_retries` more times after the first
/// attempt. The delay between attempts doubles up to `config.max_delay_ms`.
pub async fn with_retry<F, Fut, T, E>(
    config: RetryConfig,
    is_retryable: impl Fn(&E) -> bool,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.num_retries.saturating_add(1);
    let mut attempts = 0;
    let mut delay_ms = config.delay_ms;

    loop {
        attempts += 1;
        trace!("Attempt {}/{}: Executing operation", attempts, max_attempts);

        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let retryable = is_retryable(&e);
                if retryable && attempts < max_attempts {
                    warn!(
                        "Attempt {}/{}: Operation failed: {}. Retrying in {}ms",
                        attempts, max_attempts, e, delay_ms
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    delay_ms = std::cmp::min(delay_ms.saturating_mul(2), config.max_delay_ms);
                } else {
                    if retryable {
                        error!("Operation failed after max retries: {}", e);
                    } else {
                        error!("Operation failed with non-retryable error: {}", e);
                    }
                    return Err(e);
                }
            }
        }
    }
}
