//! Blocking HTTP downloads with an optional on-disk cache.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::cache::DownloadCache;
use crate::error::{IngestError, Result};

/// User agent string for provider requests.
const USER_AGENT_VALUE: &str = concat!("nuts-pop/", env!("CARGO_PKG_VERSION"));

/// Default request timeout. The full Eurostat table is tens of megabytes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// How a fetch uses the download cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Serve a cached copy no older than `max_age` (any age when `None`) and
    /// store fresh downloads.
    Reuse { max_age: Option<Duration> },
    /// Always download, then replace the cached copy.
    Refresh,
    /// Neither read nor write the cache.
    Bypass,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::Reuse { max_age: None }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub timeout: Duration,
    /// Cache directory; `None` disables caching entirely.
    pub cache_dir: Option<PathBuf>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            cache_dir: None,
        }
    }
}

/// Fetches URLs, consulting the cache when asked to.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::blocking::Client,
    cache: Option<DownloadCache>,
}

impl Downloader {
    pub fn new(options: &HttpOptions) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .timeout(options.timeout)
            .build()
            .map_err(|source| IngestError::Client { source })?;
        Ok(Self {
            client,
            cache: options.cache_dir.clone().map(DownloadCache::new),
        })
    }

    /// Download a URL and return its body.
    ///
    /// Without a configured cache every policy behaves like
    /// [`CachePolicy::Bypass`].
    pub fn fetch(&self, url: &str, policy: CachePolicy) -> Result<Vec<u8>> {
        let cache = self
            .cache
            .as_ref()
            .filter(|_| policy != CachePolicy::Bypass);

        if let (Some(cache), CachePolicy::Reuse { max_age }) = (cache, policy)
            && let Some(bytes) = cache.get(url, max_age)?
        {
            tracing::info!(url, bytes = bytes.len(), "using cached download");
            return Ok(bytes);
        }

        let start = Instant::now();
        tracing::info!(url, "downloading");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| IngestError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|source| IngestError::Request {
                url: url.to_string(),
                source,
            })?
            .to_vec();
        tracing::info!(
            url,
            bytes = bytes.len(),
            duration_ms = start.elapsed().as_millis(),
            "download complete"
        );

        if let Some(cache) = cache {
            cache.put(url, &bytes)?;
        }
        Ok(bytes)
    }
}
