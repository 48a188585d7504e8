//! HTTP client for the WatchBase API.
//!
//! Every request carries the API key and output format as query parameters, so anything that
//! might echo a URL (reqwest error messages in particular) goes through [`redact_url`] first.

use crate::config::UpstreamConfig;
use crate::error::{Result, ToolsError};
use crate::request::UpstreamRequest;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// A failed upstream call.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// The API answered with a non-2xx status.
    #[error("upstream returned {status}")]
    Status {
        status: StatusCode,
        /// The `error` field of the response body, when the body is a JSON object carrying one.
        detail: Option<String>,
    },

    /// No response: connection failure, timeout, or an unreadable body.
    #[error("upstream transport error: {message}")]
    Transport { message: String, timed_out: bool },
}

impl UpstreamError {
    fn from_reqwest(e: &reqwest::Error) -> Self {
        Self::Transport {
            message: sanitize_reqwest_error(e),
            timed_out: e.is_timeout(),
        }
    }
}

/// Shared upstream client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ToolsError::Client(sanitize_reqwest_error(&e)))?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Full URL for `request`, credential and format first.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined onto the base URL.
    pub fn build_url(&self, request: &UpstreamRequest) -> std::result::Result<Url, url::ParseError> {
        let mut url = self.config.base_url().join(request.path)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", self.config.api_key());
            pairs.append_pair("format", self.config.format());
            for (name, value) in &request.query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    /// Issue exactly one GET for `request` and decode the body.
    ///
    /// A 2xx body that is not JSON is returned as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Status`] for non-2xx answers and [`UpstreamError::Transport`] when
    /// no usable response arrived.
    pub async fn get(&self, url: Url) -> std::result::Result<Value, UpstreamError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::from_reqwest(&e))?;

        if status.is_success() {
            Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
        } else {
            Err(UpstreamError::Status {
                status,
                detail: error_detail(&text),
            })
        }
    }
}

/// Extract the API's `error` field from an error body.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Drop credentials, query and fragment from a URL.
#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}
