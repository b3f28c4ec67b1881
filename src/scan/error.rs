use std::time::Duration;

use thiserror::Error;

use crate::retry::{Retryable, is_retryable_status};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid scan target: {0}")]
    InvalidTarget(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("GitHub API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl Retryable for ScanError {
    fn is_retryable(&self) -> bool {
        match self {
            ScanError::Network(_) | ScanError::RateLimited { .. } => true,
            ScanError::Api { status, .. } => reqwest::StatusCode::from_u16(*status)
                .map(is_retryable_status)
                .unwrap_or(false),
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            ScanError::RateLimited {
                retry_after_secs: Some(secs),
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}
