use std::time::Duration;

use thiserror::Error;

use crate::retry::Retryable;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Cache lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Server error: {0}")]
    Unavailable(String),
}

impl Retryable for LifecycleError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            LifecycleError::Network(_)
                | LifecycleError::RateLimited { .. }
                | LifecycleError::Unavailable(_)
        )
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            LifecycleError::RateLimited {
                retry_after_secs: Some(secs),
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}
