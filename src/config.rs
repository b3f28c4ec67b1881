use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::retry::RetryConfig;

// =============================================================================
// Time-related constants
// =============================================================================

/// Default refresh interval in milliseconds (24 hours)
pub const DEFAULT_REFRESH_INTERVAL_MS: i64 = 24 * 60 * 60 * 1000;

// =============================================================================
// Endpoints and file names
// =============================================================================

pub const DEFAULT_ENDOFLIFE_URL: &str = "https://endoflife.date";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_MAVEN_URL: &str = "https://search.maven.org";
pub const DEFAULT_MAPPING_FILE: &str = "mapping.conf";
pub const DEFAULT_CSV_PATH: &str = "eol_summary.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub github: GitHubConfig,
    pub end_of_life: EndOfLifeConfig,
    pub maven: MavenConfig,
    pub cache: CacheConfig,
    pub mapping_file: PathBuf,
    pub output: OutputConfig,
    pub retry: RetrySettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            end_of_life: EndOfLifeConfig::default(),
            maven: MavenConfig::default(),
            cache: CacheConfig::default(),
            mapping_file: PathBuf::from(DEFAULT_MAPPING_FILE),
            output: OutputConfig::default(),
            retry: RetrySettings::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.refresh_interval <= 0 {
            return Err(ConfigError::Invalid(
                "cache.refreshInterval must be positive".to_string(),
            ));
        }
        if self.end_of_life.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "endOfLife.baseUrl must not be empty".to_string(),
            ));
        }
        if self.maven.enabled && self.maven.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "maven.baseUrl must not be empty when maven is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

/// GitHub scan target
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GitHubConfig {
    /// `https://github.com/<owner>` or `https://github.com/<owner>/<repo>`
    pub repo: Option<String>,
    pub token: Option<String>,
    /// Branch to scan instead of each repository's default branch
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EndOfLifeConfig {
    pub base_url: String,
}

impl Default for EndOfLifeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENDOFLIFE_URL.to_string(),
        }
    }
}

/// Maven Central enrichment (latest version and release dates)
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MavenConfig {
    pub enabled: bool,
    pub base_url: String,
}

impl Default for MavenConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: DEFAULT_MAVEN_URL.to_string(),
        }
    }
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    pub enabled: bool,
    /// Cache refresh interval in milliseconds
    pub refresh_interval: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_interval: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputConfig {
    pub csv_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
        }
    }
}

/// Backoff settings for rate-limited and transient HTTP failures
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RetrySettings {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let defaults = RetryConfig::default();
        Self {
            max_retries: defaults.max_retries,
            initial_delay_ms: defaults.initial_delay_ms,
            max_delay_ms: defaults.max_delay_ms,
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            initial_delay_ms: settings.initial_delay_ms,
            max_delay_ms: settings.max_delay_ms,
            ..RetryConfig::default()
        }
    }
}

/// Load and validate a JSON config file
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns the path to the data directory for eol-checker.
/// Uses $XDG_DATA_HOME/eol-checker if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/eol-checker,
/// or ./eol-checker if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the database file.
pub fn db_path() -> PathBuf {
    data_dir().join("lifecycle.db")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("eol-checker.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("eol-checker")
}
