//! Maven Central search client for latest versions and release dates

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::config::DEFAULT_MAVEN_URL;
use crate::registry::error::ReleaseError;
use crate::registry::traits::{Release, ReleaseRegistry};

/// Maven Central `solrsearch` client
pub struct MavenCentral {
    client: Client,
    base_url: String,
}

impl Default for MavenCentral {
    fn default() -> Self {
        Self::new(DEFAULT_MAVEN_URL)
    }
}

impl MavenCentral {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn search(&self, params: &[(&str, &str)]) -> Result<Vec<SearchDoc>, ReleaseError> {
        let url = Url::parse_with_params(&format!("{}/solrsearch/select", self.base_url), params)
            .map_err(|e| ReleaseError::InvalidResponse(e.to_string()))?;
        debug!("Querying Maven Central: {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ReleaseError::InvalidResponse(format!(
                "Maven Central returned status {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ReleaseError::InvalidResponse(e.to_string()))?;

        Ok(body.response.docs)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchDoc {
    #[serde(default)]
    latest_version: Option<String>,
    /// Milliseconds since UNIX epoch
    #[serde(default)]
    timestamp: Option<i64>,
}

fn timestamp_to_date(timestamp: Option<i64>) -> Option<NaiveDate> {
    timestamp
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.date_naive())
}

#[async_trait]
impl ReleaseRegistry for MavenCentral {
    async fn latest_release(
        &self,
        group: &str,
        artifact: &str,
    ) -> Result<Option<Release>, ReleaseError> {
        let query = format!("g:{} AND a:{}", group, artifact);
        let docs = self
            .search(&[("q", query.as_str()), ("rows", "1"), ("wt", "json")])
            .await?;

        let release = docs.into_iter().next().and_then(|doc| {
            doc.latest_version.map(|version| Release {
                version,
                date: timestamp_to_date(doc.timestamp),
            })
        });

        debug!("Latest release of {}:{}: {:?}", group, artifact, release);
        Ok(release)
    }

    async fn release_date(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
    ) -> Result<Option<NaiveDate>, ReleaseError> {
        let query = format!("g:{} AND a:{} AND v:{}", group, artifact, version);
        let docs = self
            .search(&[
                ("q", query.as_str()),
                ("core", "gav"),
                ("rows", "1"),
                ("wt", "json"),
            ])
            .await?;

        Ok(docs
            .into_iter()
            .next()
            .and_then(|doc| timestamp_to_date(doc.timestamp)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn latest_release_returns_version_and_date() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/solrsearch/select")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded(
                    "q".into(),
                    "g:com.google.guava AND a:guava".into(),
                ),
                Matcher::UrlEncoded("rows".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "response": {
                        "numFound": 1,
                        "docs": [
                            {"id": "com.google.guava:guava", "latestVersion": "33.3.1-jre", "timestamp": 1726503284000}
                        ]
                    }
                }"#,
            )
            .create_async()
            .await;

        let registry = MavenCentral::new(&server.url());
        let release = registry
            .latest_release("com.google.guava", "guava")
            .await
            .unwrap();

        mock.assert_async().await;

        assert_eq!(
            release,
            Some(Release {
                version: "33.3.1-jre".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 9, 16),
            })
        );
    }

    #[tokio::test]
    async fn latest_release_returns_none_without_docs() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/solrsearch/select")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"response": {"numFound": 0, "docs": []}}"#)
            .create_async()
            .await;

        let registry = MavenCentral::new(&server.url());
        let release = registry.latest_release("com.example", "lib").await.unwrap();

        assert_eq!(release, None);
    }

    #[tokio::test]
    async fn release_date_queries_gav_core() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/solrsearch/select")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded(
                    "q".into(),
                    "g:org.springframework AND a:spring-core AND v:5.3.9".into(),
                ),
                Matcher::UrlEncoded("core".into(), "gav".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"response": {"docs": [{"id": "org.springframework:spring-core:5.3.9", "v": "5.3.9", "timestamp": 1626249600000}]}}"#,
            )
            .create_async()
            .await;

        let registry = MavenCentral::new(&server.url());
        let date = registry
            .release_date("org.springframework", "spring-core", "5.3.9")
            .await
            .unwrap();

        mock.assert_async().await;

        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 7, 14));
    }

    #[tokio::test]
    async fn search_reports_server_errors() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/solrsearch/select")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let registry = MavenCentral::new(&server.url());
        let result = registry.latest_release("com.example", "lib").await;

        assert!(matches!(result, Err(ReleaseError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn search_handles_network_error() {
        let registry = MavenCentral::new("http://invalid.localhost.test:99999");
        let result = registry.latest_release("com.example", "lib").await;

        assert!(matches!(
            result,
            Err(ReleaseError::Network(_) | ReleaseError::InvalidResponse(_))
        ));
    }
}
