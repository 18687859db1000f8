//! Client configuration
//!
//! [`ClientOptions`] holds the only state a client carries between calls: the
//! API key, the base address and the per-request timeout.

use crate::{Error, Result};
use reqwest::Url;
use std::env;
use std::time::Duration;

/// Production API address.
pub const DEFAULT_BASE_URL: &str = "https://api.artificial.agency";

/// Value sent in the [`API_VERSION_HEADER`] on every request.
pub const API_VERSION: &str = "2025-05-15";

/// Protocol-version header name.
pub const API_VERSION_HEADER: &str = "AA-API-Version";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const ENV_API_KEY: &str = "ARTIFICIAL_AGENCY_API_KEY";
const ENV_BASE_URL: &str = "ARTIFICIAL_AGENCY_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "ARTIFICIAL_AGENCY_TIMEOUT_SECS";

/// Immutable configuration captured when a client is constructed.
#[derive(Clone)]
pub struct ClientOptions {
    api_key: String,
    base_url: Url,
    timeout: Duration,
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("api_key", &"***")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientOptions {
    /// Create a new builder for ClientOptions
    pub fn builder() -> ClientOptionsBuilder {
        ClientOptionsBuilder::default()
    }

    /// Options with the given key and every other setting at its default.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Build options from the environment.
    ///
    /// - `ARTIFICIAL_AGENCY_API_KEY` (required)
    /// - `ARTIFICIAL_AGENCY_BASE_URL` (defaults to [`DEFAULT_BASE_URL`])
    /// - `ARTIFICIAL_AGENCY_TIMEOUT_SECS` (defaults to [`DEFAULT_TIMEOUT`])
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Self::builder();

        if let Some(key) = lookup(ENV_API_KEY) {
            builder = builder.api_key(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            builder = builder.base_url(url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                Error::config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}"))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for an API path such as `/v1/sessions`.
    ///
    /// Any path prefix on the base URL is kept; a trailing slash on the base
    /// URL does not produce a double slash.
    pub fn endpoint_url(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

/// Builder for ClientOptions
#[derive(Default)]
pub struct ClientOptionsBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for ClientOptionsBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptionsBuilder")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientOptionsBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ClientOptions> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::config("api_key must not be empty"))?;

        let raw_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw_url)
            .map_err(|e| Error::config(format!("invalid base_url {raw_url:?}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must use http or https, got {:?}",
                base_url.scheme()
            )));
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(Error::config("timeout must be greater than zero"));
        }

        Ok(ClientOptions {
            api_key,
            base_url,
            timeout,
        })
    }
}
