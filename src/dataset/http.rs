//! Dataset download over HTTP with optional local caching.

use anyhow::{Context, Result};
use async_trait::async_trait;
use polars::prelude::DataFrame;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use super::cache::DatasetCache;
use super::{dataset_url, frame, Dataset, DatasetSource};
use crate::config::AppConfig;
use crate::error::FetchError;
use crate::retry::{retry, RetryConfig};

/// Fetches dataset CSV files from the example dataset repository
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    cache: Option<DatasetCache>,
    retry: RetryConfig,
}

impl HttpSource {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        cache: Option<DatasetCache>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            cache,
            retry,
        }
    }

    /// Build a source from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.source.timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let cache = if config.cache.enabled {
            let dir = config.cache.resolve_data_home();
            debug!("Dataset cache directory: {}", dir.display());
            Some(DatasetCache::new(dir, config.cache.max_age()))
        } else {
            None
        };

        Ok(Self::new(
            client,
            config.source.base_url.clone(),
            cache,
            config.source.retry(),
        ))
    }

    async fn download(&self, name: &str) -> Result<Vec<u8>, FetchError> {
        let url = dataset_url(&self.base_url, name);
        let request_error = |source| FetchError::Request {
            url: url.clone(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(request_error)?;
        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(FetchError::NotFound {
                    name: name.to_string(),
                    url: url.clone(),
                })
            }
            status => {
                return Err(FetchError::Status {
                    url: url.clone(),
                    status: status.as_u16(),
                })
            }
        }

        let body = response.bytes().await.map_err(request_error)?;
        Ok(body.to_vec())
    }

    /// Raw CSV bytes for a dataset, from the cache when possible
    async fn load_bytes(&self, dataset: Dataset) -> Result<Vec<u8>> {
        let name = dataset.name();
        if let Some(bytes) = self.cache.as_ref().and_then(|c| c.get(name)) {
            return Ok(bytes);
        }

        info!("Downloading {} dataset", name);
        let operation = format!("download {}", name);
        let bytes = retry(&self.retry, &operation, FetchError::is_retryable, || {
            self.download(name)
        })
        .await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(name, &bytes) {
                warn!("Could not cache {} in {}: {:#}", name, cache.base_dir().display(), e);
            }
        }

        Ok(bytes)
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self, dataset: Dataset) -> Result<DataFrame> {
        let bytes = self.load_bytes(dataset).await?;
        frame::read_csv(bytes).with_context(|| format!("Invalid CSV for {} dataset", dataset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::TIPS_CSV;
    use tempfile::tempdir;

    /// Points at a local port nothing listens on
    fn offline_source(cache: Option<DatasetCache>) -> HttpSource {
        HttpSource::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            cache,
            RetryConfig::none(),
        )
    }

    #[tokio::test]
    async fn test_cached_dataset_needs_no_network() {
        let dir = tempdir().unwrap();
        let cache = DatasetCache::new(dir.path().to_path_buf(), None);
        cache.set("tips", TIPS_CSV.as_bytes()).unwrap();

        let source = offline_source(Some(cache));
        let df = source.fetch(Dataset::Tips).await.unwrap();
        assert_eq!(df.height(), 4);
        assert_eq!(df.width(), 7);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let source = offline_source(None);
        let err = source.fetch(Dataset::Mpg).await.unwrap_err();
        assert_eq!(err.to_string(), "request to http://127.0.0.1:9/mpg.csv failed");
        // The transport error appears once, as the cause
        let chain: Vec<String> = err.chain().map(|e| e.to_string()).collect();
        assert!(chain.len() >= 2);
        assert!(!chain[0].contains(&chain[1]));
    }

    #[tokio::test]
    async fn test_from_config_respects_disabled_cache() {
        let mut config = AppConfig::default();
        config.cache.enabled = false;
        let source = HttpSource::from_config(&config).unwrap();
        assert!(source.cache.is_none());
        assert_eq!(source.base_url, crate::dataset::BASE_URL);
    }
}
