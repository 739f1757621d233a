//! Configuration for the sandbox tools.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryConfig;

/// Environment variable honoured for the dataset download directory.
pub const DATA_HOME_ENV: &str = "SEABORN_DATA";

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("sandbox.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Remote dataset source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,
}

fn default_base_url() -> String {
    crate::dataset::BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_secs() -> u64 {
    30
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_secs: default_max_backoff_secs(),
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy for dataset downloads
    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            initial_delay: Duration::from_millis(self.initial_backoff_ms),
            max_delay: Duration::from_secs(self.max_backoff_secs),
            multiplier: 2.0,
        }
    }
}

/// Download cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether downloaded CSV files are kept and reused
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Directory holding cached CSV files
    #[serde(default)]
    pub data_home: Option<PathBuf>,
    /// Age after which a cached file is downloaded again
    #[serde(default)]
    pub max_age_days: Option<u64>,
}

fn default_cache_enabled() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            data_home: None,
            max_age_days: None,
        }
    }
}

impl CacheConfig {
    /// Resolve the cache directory: explicit setting, then `SEABORN_DATA`,
    /// then `~/seaborn-data`.
    pub fn resolve_data_home(&self) -> PathBuf {
        if let Some(dir) = &self.data_home {
            return dir.clone();
        }
        if let Ok(dir) = std::env::var(DATA_HOME_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join("seaborn-data"))
            .unwrap_or_else(|| PathBuf::from("seaborn-data"))
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age_days
            .map(|days| Duration::from_secs(days.saturating_mul(86_400)))
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional `sandbox` config file and
    /// `SANDBOX_*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("sandbox").required(false))
            // SANDBOX_DATABASE__PATH, SANDBOX_CACHE__MAX_AGE_DAYS, ...
            .add_source(
                config::Environment::with_prefix("SANDBOX")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
