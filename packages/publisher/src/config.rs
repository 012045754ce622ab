use std::time::Duration;

use crate::error::{PublishError, Result};
use crate::worker::RetryPolicy;

/// Concurrent in-flight publishes when nothing is configured.
pub const DEFAULT_POOL_SIZE: usize = 2;

/// Base retry delay when retries are enabled.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Configuration for publishing bills to the store.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub store_base_url: String,
    pub pool_size: usize,
    /// Extra attempts on connection failures and 5xx responses. Zero keeps
    /// the historical drop-on-first-failure behavior.
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl PublisherConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup. Unparseable values fall back
    /// to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store_base_url = lookup("STORE_BASE_URL")
            .ok_or_else(|| PublishError::Config("STORE_BASE_URL not set".into()))?;

        let pool_size = lookup("PUBLISH_POOL_SIZE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POOL_SIZE)
            .max(1);

        let max_retries = lookup("PUBLISH_MAX_RETRIES")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let retry_delay_ms = lookup("PUBLISH_RETRY_DELAY_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RETRY_DELAY_MS);

        let request_timeout = lookup("STORE_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs);

        Ok(Self {
            store_base_url,
            pool_size,
            max_retries,
            retry_delay: Duration::from_millis(retry_delay_ms),
            request_timeout,
        })
    }

    /// Create a config builder for testing.
    pub fn builder(store_base_url: impl Into<String>) -> PublisherConfigBuilder {
        PublisherConfigBuilder {
            store_base_url: store_base_url.into(),
            pool_size: DEFAULT_POOL_SIZE,
            max_retries: 0,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            request_timeout: None,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: self.retry_delay,
        }
    }
}

/// Builder for constructing `PublisherConfig` in tests.
pub struct PublisherConfigBuilder {
    store_base_url: String,
    pool_size: usize,
    max_retries: u32,
    retry_delay: Duration,
    request_timeout: Option<Duration>,
}

impl PublisherConfigBuilder {
    pub fn pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> PublisherConfig {
        PublisherConfig {
            store_base_url: self.store_base_url,
            pool_size: self.pool_size,
            max_retries: self.max_retries,
            retry_delay: self.retry_delay,
            request_timeout: self.request_timeout,
        }
    }
}
