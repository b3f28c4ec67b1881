//! Retry with exponential backoff for remote lookups

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 2000,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Configuration that never retries
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Errors that can tell whether another attempt may succeed
pub trait Retryable {
    /// True for transient failures (rate limiting, network hiccups, 5xx)
    fn is_retryable(&self) -> bool;

    /// Minimum wait requested by the server, if any
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Execute an operation, retrying transient failures with exponential backoff
///
/// Non-retryable errors are returned immediately. The delay doubles after each
/// attempt (bounded by `max_delay_ms`) and never undercuts a server-provided
/// `retry-after`.
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let mut attempt = 0;
    let mut delay_ms = config.initial_delay_ms;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!("Request succeeded after {} retries", attempt);
                }
                return Ok(result);
            }
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) => {
                attempt += 1;

                if attempt > config.max_retries {
                    if config.max_retries > 0 {
                        warn!(
                            "Request failed after {} retries: {}",
                            config.max_retries, err
                        );
                    }
                    return Err(err);
                }

                let wait_ms = err
                    .retry_after()
                    .map_or(delay_ms, |d| delay_ms.max(d.as_millis() as u64));
                warn!(
                    "Request failed (attempt {}/{}): {}. Retrying in {}ms...",
                    attempt, config.max_retries, err, wait_ms
                );

                sleep(Duration::from_millis(wait_ms)).await;

                delay_ms = ((delay_ms as f64) * config.backoff_multiplier) as u64;
                delay_ms = delay_ms.min(config.max_delay_ms);
            }
        }
    }
}

/// Check if an HTTP status code is worth retrying
pub fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status.is_server_error()
        || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
}

/// Parse a `retry-after` header given in seconds
pub fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
