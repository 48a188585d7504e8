//! Upstream client configuration.

use crate::error::{Result, ToolsError};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Production WatchBase API root.
pub const DEFAULT_BASE_URL: &str = "https://api.watchbase.com/v1/";

/// Per-call timeout applied to every upstream request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Output format requested from the upstream API.
pub const DEFAULT_FORMAT: &str = "json";

/// Process-wide, read-only settings for talking to the upstream API.
///
/// Built once at startup and shared by every call.
#[derive(Clone)]
pub struct UpstreamConfig {
    base_url: Url,
    api_key: String,
    format: String,
    timeout: Duration,
}

impl UpstreamConfig {
    /// Config for the production API with the default format and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> UpstreamConfigBuilder {
        UpstreamConfigBuilder {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            format: DEFAULT_FORMAT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("format", &self.format)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamConfigBuilder {
    base_url: String,
    api_key: String,
    format: String,
    timeout: Duration,
}

impl UpstreamConfigBuilder {
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// The base URL always ends up with a trailing `/` so tool paths are appended below it
    /// rather than replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty, the base URL is not an absolute `http(s)` URL,
    /// or the timeout is zero.
    pub fn build(self) -> Result<UpstreamConfig> {
        if self.api_key.trim().is_empty() {
            return Err(ToolsError::Config("API key must not be empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(ToolsError::Config(
                "upstream timeout must be greater than zero".to_string(),
            ));
        }

        let mut base_url = Url::parse(&self.base_url).map_err(|e| {
            ToolsError::Config(format!("Invalid base URL '{}': {e}", self.base_url))
        })?;
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(ToolsError::Config(format!(
                "Invalid base URL '{}': unsupported scheme '{}'",
                self.base_url,
                base_url.scheme()
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        base_url.set_query(None);
        base_url.set_fragment(None);

        Ok(UpstreamConfig {
            base_url,
            api_key: self.api_key,
            format: self.format,
            timeout: self.timeout,
        })
    }
}
