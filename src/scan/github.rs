//! Manifest discovery through the GitHub REST API

use indexmap::IndexMap;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_GITHUB_API_URL;
use crate::parser::types::detect_dialect;
use crate::retry::{RetryConfig, retry_after_secs, with_retry};
use crate::scan::error::ScanError;
use crate::scan::traits::ManifestSource;
use crate::scan::types::{ManifestFile, SKIPPED_DIRS};

const PER_PAGE: usize = 100;
const FALLBACK_BRANCH: &str = "main";

/// What to scan on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubTarget {
    /// Every repository of a user or organization
    Owner(String),
    /// A single repository
    Repository { owner: String, name: String },
}

impl GitHubTarget {
    /// Parse `https://github.com/<owner>` or `https://github.com/<owner>/<repo>`
    pub fn parse(url: &str) -> Result<Self, ScanError> {
        let invalid = || ScanError::InvalidTarget(url.to_string());

        let rest = url
            .trim()
            .strip_prefix("https://github.com/")
            .or_else(|| url.trim().strip_prefix("http://github.com/"))
            .ok_or_else(invalid)?;

        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        match segments[..] {
            [owner] => Ok(GitHubTarget::Owner(owner.to_string())),
            [owner, name, ..] => Ok(GitHubTarget::Repository {
                owner: owner.to_string(),
                name: name.trim_end_matches(".git").to_string(),
            }),
            [] => Err(invalid()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RepositoryInfo {
    name: String,
    #[serde(default)]
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    download_url: Option<String>,
}

pub struct GitHubScanner {
    client: Client,
    api_url: String,
    target: GitHubTarget,
    branch: Option<String>,
    retry: RetryConfig,
}

impl GitHubScanner {
    pub fn new(target: GitHubTarget, token: Option<&str>) -> Result<Self, ScanError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("eol-checker"));
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ScanError::InvalidTarget("token is not a valid header value".into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
            target,
            branch: None,
            retry: RetryConfig::default(),
        })
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    /// Scan this branch instead of each repository's default branch
    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch.filter(|b| !b.is_empty());
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn send_once(&self, url: &str) -> Result<reqwest::Response, ScanError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ScanError::RateLimited {
                retry_after_secs: retry_after_secs(response.headers()),
            });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ScanError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ScanError> {
        with_retry(&self.retry, || async {
            let response = self.send_once(url).await?;
            let status = response.status();
            response.json::<T>().await.map_err(|e| ScanError::Api {
                status: status.as_u16(),
                message: e.to_string(),
            })
        })
        .await
    }

    async fn get_text(&self, url: &str) -> Result<String, ScanError> {
        with_retry(&self.retry, || async {
            let response = self.send_once(url).await?;
            Ok(response.text().await?)
        })
        .await
    }

    async fn list_repositories(&self, owner: &str) -> Result<Vec<String>, ScanError> {
        let mut names = Vec::new();

        for page in 1.. {
            let url = format!(
                "{}/users/{}/repos?per_page={}&page={}",
                self.api_url, owner, PER_PAGE, page
            );
            debug!("Fetching repositories: {}", url);

            let repositories: Vec<RepositoryInfo> = self.get_json(&url).await?;
            let count = repositories.len();
            names.extend(repositories.into_iter().map(|r| r.name));

            if count < PER_PAGE {
                break;
            }
        }

        info!("Found {} repositories for {}", names.len(), owner);
        Ok(names)
    }

    async fn resolve_branch(&self, owner: &str, name: &str) -> String {
        if let Some(branch) = &self.branch {
            return branch.clone();
        }

        let url = format!("{}/repos/{}/{}", self.api_url, owner, name);
        match self.get_json::<RepositoryInfo>(&url).await {
            Ok(RepositoryInfo {
                default_branch: Some(branch),
                ..
            }) => branch,
            Ok(_) => FALLBACK_BRANCH.to_string(),
            Err(e) => {
                warn!(
                    "Failed to fetch default branch for {}/{}: {}. Using '{}' as fallback.",
                    owner, name, e, FALLBACK_BRANCH
                );
                FALLBACK_BRANCH.to_string()
            }
        }
    }

    /// Recursively collect manifests below `path`
    async fn walk(
        &self,
        owner: &str,
        name: &str,
        branch: &str,
        path: &str,
        files: &mut Vec<ManifestFile>,
    ) -> Result<(), ScanError> {
        let url = if path.is_empty() {
            format!("{}/repos/{}/{}/contents?ref={}", self.api_url, owner, name, branch)
        } else {
            format!(
                "{}/repos/{}/{}/contents/{}?ref={}",
                self.api_url, owner, name, path, branch
            )
        };

        let entries: Vec<ContentEntry> = self.get_json(&url).await?;

        for entry in entries {
            match entry.kind.as_str() {
                "dir" => {
                    let dir_name = entry.path.rsplit('/').next().unwrap_or_default();
                    if SKIPPED_DIRS.contains(&dir_name) {
                        continue;
                    }
                    Box::pin(self.walk(owner, name, branch, &entry.path, files)).await?;
                }
                "file" => {
                    let Some(dialect) = detect_dialect(&entry.path) else {
                        continue;
                    };
                    let Some(download_url) = entry.download_url else {
                        warn!("No download URL for {}/{}:{}", owner, name, entry.path);
                        continue;
                    };

                    info!("Found Gradle file: {}", download_url);
                    let content = self.get_text(&download_url).await?;
                    files.push(ManifestFile {
                        repository: name.to_string(),
                        path: entry.path,
                        dialect,
                        content,
                    });
                }
                _ => {}
            }
        }

        Ok(())
    }

    async fn scan_repository(&self, owner: &str, name: &str) -> Result<Vec<ManifestFile>, ScanError> {
        let branch = self.resolve_branch(owner, name).await;
        info!("Scanning {}/{} on branch {}", owner, name, branch);

        let mut files = Vec::new();
        self.walk(owner, name, &branch, "", &mut files).await?;
        Ok(files)
    }
}

#[async_trait::async_trait]
impl ManifestSource for GitHubScanner {
    async fn collect(&self) -> Result<IndexMap<String, Vec<ManifestFile>>, ScanError> {
        let (owner, names) = match &self.target {
            GitHubTarget::Owner(owner) => (owner.as_str(), self.list_repositories(owner).await?),
            GitHubTarget::Repository { owner, name } => (owner.as_str(), vec![name.clone()]),
        };

        let mut repositories = IndexMap::new();
        for name in names {
            match self.scan_repository(owner, &name).await {
                Ok(files) if files.is_empty() => {
                    info!("No Gradle files found in repository: {}", name);
                }
                Ok(files) => {
                    repositories.insert(name, files);
                }
                Err(e) => warn!("Skipping repository {}/{}: {}", owner, name, e),
            }
        }

        Ok(repositories)
    }
}
