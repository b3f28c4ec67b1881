//! endoflife.date API client

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::DEFAULT_ENDOFLIFE_URL;
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::source::LifecycleSource;
use crate::lifecycle::types::{CycleRecord, LifecycleCycle};
use crate::retry::{RetryConfig, retry_after_secs, with_retry};

/// Client for `GET {base}/api/{product}.json`
pub struct EndOfLifeClient {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl Default for EndOfLifeClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDOFLIFE_URL)
    }
}

impl EndOfLifeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_once(&self, product: &str) -> Result<Vec<LifecycleCycle>, LifecycleError> {
        let url = format!("{}/api/{}.json", self.base_url, product);
        debug!("Fetching lifecycle data: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LifecycleError::NotFound(product.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LifecycleError::RateLimited {
                retry_after_secs: retry_after_secs(response.headers()),
            });
        }

        if status.is_server_error() {
            return Err(LifecycleError::Unavailable(format!(
                "endoflife.date returned status {}",
                status
            )));
        }

        if !status.is_success() {
            warn!("endoflife.date returned status {}: {}", status, url);
            return Err(LifecycleError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let records: Vec<CycleRecord> = response.json().await.map_err(|e| {
            warn!("Failed to parse lifecycle response for {}: {}", product, e);
            LifecycleError::InvalidResponse(e.to_string())
        })?;

        debug!("Found {} cycles for {}", records.len(), product);

        Ok(records.into_iter().map(LifecycleCycle::from).collect())
    }
}

#[async_trait]
impl LifecycleSource for EndOfLifeClient {
    async fn fetch_cycles(&self, product: &str) -> Result<Vec<LifecycleCycle>, LifecycleError> {
        with_retry(&self.retry, || self.fetch_once(product)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mockito::Server;

    fn client(url: &str) -> EndOfLifeClient {
        EndOfLifeClient::new(url).with_retry(RetryConfig {
            max_retries: 2,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 2.0,
        })
    }

    #[tokio::test]
    async fn fetch_cycles_returns_cycles_in_source_order() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/spring-framework.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"cycle": "6.1", "releaseDate": "2023-11-16", "eol": "2025-06-30", "latest": "6.1.14"},
                    {"cycle": "6.0", "eol": "2024-06-30"},
                    {"cycle": "5.3", "eol": false}
                ]"#,
            )
            .create_async()
            .await;

        let result = client(&server.url())
            .fetch_cycles("spring-framework")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            vec![
                LifecycleCycle::new("6.1", NaiveDate::from_ymd_opt(2025, 6, 30)),
                LifecycleCycle::new("6.0", NaiveDate::from_ymd_opt(2024, 6, 30)),
                LifecycleCycle::new("5.3", None),
            ]
        );
    }

    #[tokio::test]
    async fn fetch_cycles_returns_not_found_for_unknown_product() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/com.example.json")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let result = client(&server.url()).fetch_cycles("com.example").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(LifecycleError::NotFound(_))));
    }

    #[tokio::test]
    async fn fetch_cycles_retries_rate_limited_requests() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/guava.json")
            .with_status(429)
            .expect(3)
            .create_async()
            .await;

        let result = client(&server.url()).fetch_cycles("guava").await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(LifecycleError::RateLimited {
                retry_after_secs: None
            })
        ));
    }

    #[tokio::test]
    async fn fetch_cycles_rejects_malformed_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/guava.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "not a list"}"#)
            .create_async()
            .await;

        let result = client(&server.url()).fetch_cycles("guava").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(LifecycleError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn fetch_cycles_handles_network_error() {
        let client = EndOfLifeClient::new("http://invalid.localhost.test:99999")
            .with_retry(RetryConfig::disabled());

        let result = client.fetch_cycles("guava").await;

        assert!(matches!(result, Err(LifecycleError::Network(_))));
    }
}
