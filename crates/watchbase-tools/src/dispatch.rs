//! Call dispatch: resolve → decode → translate → call upstream → envelope.
//!
//! Each call runs linearly with no retries. Protocol errors (unknown tool, bad arguments) abort
//! before any network I/O and are returned as `Err`; everything that fails later is classified
//! and returned as a failure-flagged [`ResultEnvelope`].

use crate::args::ToolArgs;
use crate::catalog::Catalog;
use crate::classify::{Classified, classify_upstream, generic_failure};
use crate::client::{UpstreamClient, UpstreamError, redact_url};
use crate::config::UpstreamConfig;
use crate::envelope::ResultEnvelope;
use crate::error::{ProtocolError, Result};
use rmcp::model::Tool;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// How a call failed, decided once at the dispatcher boundary.
enum CallFailure {
    /// Rethrown to the caller unchanged.
    Protocol(ProtocolError),
    /// Classified into an envelope.
    Upstream(UpstreamError),
    /// Anything unexpected; reported generically.
    Internal(String),
}

impl From<ProtocolError> for CallFailure {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

impl From<UpstreamError> for CallFailure {
    fn from(e: UpstreamError) -> Self {
        Self::Upstream(e)
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    catalog: Catalog,
    client: UpstreamClient,
}

impl Dispatcher {
    /// Build a dispatcher over `catalog`, talking to the upstream described by `config`.
    ///
    /// The resulting instance is immutable and safe to share across tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(catalog: Catalog, config: UpstreamConfig) -> Result<Self> {
        let client = UpstreamClient::new(config)?;
        Ok(Self {
            inner: Arc::new(DispatcherInner { catalog, client }),
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn upstream_config(&self) -> &UpstreamConfig {
        self.inner.client.config()
    }

    /// Tools for discovery, in catalog order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.inner.catalog.list_tools()
    }

    /// Handle one tool call.
    ///
    /// `arguments` is the raw argument bag; pass `Value::Null` when the caller sent none.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] if the tool is unknown or the arguments do not match its
    /// shape. No upstream request is made in either case.
    pub async fn call(
        &self,
        name: &str,
        arguments: &Value,
    ) -> std::result::Result<ResultEnvelope, ProtocolError> {
        match self.execute(name, arguments).await {
            Ok(payload) => Ok(ResultEnvelope::success(payload)),
            Err(CallFailure::Protocol(e)) => {
                warn!(tool = %name, code = e.kind().code().0, error = %e, "tool call rejected");
                Err(e)
            }
            Err(CallFailure::Upstream(e)) => {
                let Classified { kind, message } = classify_upstream(&e);
                warn!(tool = %name, code = kind.code().0, error = %e, "upstream call failed");
                Ok(ResultEnvelope::failure(kind, message))
            }
            Err(CallFailure::Internal(detail)) => {
                let Classified { kind, message } = generic_failure(name);
                error!(tool = %name, code = kind.code().0, error = %detail, "tool call failed");
                Ok(ResultEnvelope::failure(kind, message))
            }
        }
    }

    async fn execute(&self, name: &str, arguments: &Value) -> std::result::Result<String, CallFailure> {
        let tool = self
            .inner
            .catalog
            .resolve(name)
            .ok_or_else(|| ProtocolError::UnknownTool(name.to_string()))?;

        let args = ToolArgs::decode(tool.name, arguments).map_err(ProtocolError::from)?;
        let request = crate::request::UpstreamRequest::from(&args);

        let url = self.inner.client.build_url(&request).map_err(|e| {
            CallFailure::Internal(format!("cannot build URL for path '{}': {e}", request.path))
        })?;
        debug!(tool = %tool.name, url = %redact_url(&url), "calling upstream");

        let body = self.inner.client.get(url).await?;
        serde_json::to_string_pretty(&body)
            .map_err(|e| CallFailure::Internal(format!("cannot serialize upstream body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use std::time::Duration;
    use watchbase_test_support::{CannedResponse, MockUpstream};

    fn dispatcher_for(base_url: &str, timeout: Duration) -> Dispatcher {
        let cfg = UpstreamConfig::builder("test-key")
            .base_url(base_url)
            .timeout(timeout)
            .build()
            .expect("valid config");
        Dispatcher::new(Catalog::watchbase(), cfg).expect("dispatcher")
    }

    async fn call_with_response(
        response: CannedResponse,
        tool: &str,
        arguments: Value,
    ) -> ResultEnvelope {
        let upstream = MockUpstream::start(response).await.expect("mock upstream");
        let dispatcher = dispatcher_for(upstream.base_url(), Duration::from_secs(5));
        let envelope = dispatcher
            .call(tool, &arguments)
            .await
            .expect("reaches upstream");
        assert_eq!(upstream.requests().len(), 1, "exactly one upstream call");
        upstream.shutdown().await.expect("shutdown");
        envelope
    }

    #[tokio::test]
    async fn unknown_tool_fails_without_network_call() {
        let upstream = MockUpstream::start(CannedResponse::json(200, &json!({})))
            .await
            .expect("mock upstream");
        let dispatcher = dispatcher_for(upstream.base_url(), Duration::from_secs(5));

        let err = dispatcher
            .call("does_not_exist", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err, ProtocolError::UnknownTool("does_not_exist".to_string()));
        assert_eq!(err.kind(), ErrorKind::UnknownTool);
        assert!(upstream.requests().is_empty());
        upstream.shutdown().await.expect("shutdown");
    }

    #[tokio::test]
    async fn invalid_arguments_fail_without_network_call() {
        let upstream = MockUpstream::start(CannedResponse::json(200, &json!({})))
            .await
            .expect("mock upstream");
        let dispatcher = dispatcher_for(upstream.base_url(), Duration::from_secs(5));

        for (tool, args) in [
            ("search", json!({"q": 5})),
            ("search_refnr", Value::Null),
            ("list_families", json!({})),
            ("list_watches", json!({"brand_id": "1", "updated_since": "01-05-2024"})),
            ("get_watch_details", json!({"id": null})),
        ] {
            let err = dispatcher.call(tool, &args).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParams, "{tool}");
        }
        assert!(upstream.requests().is_empty());
        upstream.shutdown().await.expect("shutdown");
    }

    #[tokio::test]
    async fn success_returns_pretty_printed_payload() {
        let payload = json!({
            "watch": {
                "id": 42,
                "name": "Speedmaster Professional",
                "brand": { "id": 3, "name": "Omega" },
                "refnr": "311.30.42.30.01.005"
            }
        });
        let upstream = MockUpstream::start(CannedResponse::json(200, &payload))
            .await
            .expect("mock upstream");
        let dispatcher = dispatcher_for(upstream.base_url(), Duration::from_secs(5));

        let envelope = dispatcher
            .call("get_watch_details", &json!({"id": 42}))
            .await
            .expect("success");
        assert!(!envelope.is_error());
        assert_eq!(envelope.texts().len(), 1);
        assert_eq!(
            envelope.texts()[0],
            serde_json::to_string_pretty(&payload).expect("serialize")
        );
        // Upstream key order survives ("watch" fields are not alphabetical).
        assert!(envelope.texts()[0].find("\"name\"") < envelope.texts()[0].find("\"brand\""));

        let requests = upstream.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/v1/watch");
        assert_eq!(requests[0].query_keys(), vec!["key", "format", "id"]);
        assert_eq!(requests[0].query_value("id"), Some("42"));
        upstream.shutdown().await.expect("shutdown");
    }

    #[tokio::test]
    async fn list_watches_sends_hyphenated_params() {
        let upstream = MockUpstream::start(CannedResponse::json(200, &json!({"watches": []})))
            .await
            .expect("mock upstream");
        let dispatcher = dispatcher_for(upstream.base_url(), Duration::from_secs(5));

        dispatcher
            .call(
                "list_watches",
                &json!({"brand_id": 1, "family_id": "2", "updated_since": "2024-01-05"}),
            )
            .await
            .expect("success");

        let requests = upstream.requests();
        assert_eq!(requests[0].path, "/v1/watches");
        assert_eq!(
            requests[0].query_keys(),
            vec!["key", "format", "brand-id", "family-id", "updated-since"]
        );
        assert_eq!(requests[0].query_value("updated-since"), Some("2024-01-05"));
        upstream.shutdown().await.expect("shutdown");
    }

    #[tokio::test]
    async fn not_found_is_reported_as_invalid_request() {
        let envelope = call_with_response(
            CannedResponse::json(404, &json!({"error": "no such watch"})),
            "get_watch_details",
            json!({"id": "nope"}),
        )
        .await;
        assert!(envelope.is_error());
        assert_eq!(envelope.error_kind(), Some(ErrorKind::InvalidRequest));
        assert!(envelope.texts()[0].contains("not found"));
    }

    #[tokio::test]
    async fn unauthorized_is_reported_as_internal_error_with_status() {
        let envelope = call_with_response(
            CannedResponse::json(401, &json!({"error": "invalid key"})),
            "list_brands",
            json!({}),
        )
        .await;
        assert_eq!(envelope.error_kind(), Some(ErrorKind::Internal));
        assert!(envelope.texts()[0].contains("401"));
    }

    #[tokio::test]
    async fn bad_request_forwards_upstream_error_text_only() {
        let envelope = call_with_response(
            CannedResponse::json(400, &json!({"error": "brand-id is invalid", "debug": "stack"})),
            "list_families",
            json!({"brand_id": "x"}),
        )
        .await;
        assert_eq!(envelope.error_kind(), Some(ErrorKind::InvalidParams));
        assert!(envelope.texts()[0].contains("brand-id is invalid"));
        assert!(!envelope.texts()[0].contains("stack"));
    }

    #[tokio::test]
    async fn server_error_without_json_uses_status_text() {
        let envelope = call_with_response(
            CannedResponse::text(503, "<html>maintenance</html>"),
            "search",
            json!({"q": "omega"}),
        )
        .await;
        assert_eq!(envelope.error_kind(), Some(ErrorKind::Internal));
        assert_eq!(envelope.texts(), ["WatchBase API error: Service Unavailable"]);
    }

    #[tokio::test]
    async fn timeout_is_reported_as_internal_error() {
        let upstream = MockUpstream::start(
            CannedResponse::json(200, &json!({})).delayed(Duration::from_secs(5)),
        )
        .await
        .expect("mock upstream");
        let dispatcher = dispatcher_for(upstream.base_url(), Duration::from_millis(200));

        let envelope = dispatcher
            .call("list_brands", &Value::Null)
            .await
            .expect("classified, not rethrown");
        assert!(envelope.is_error());
        assert_eq!(envelope.error_kind(), Some(ErrorKind::Internal));
        assert!(!envelope.texts()[0].contains("test-key"));
    }

    #[tokio::test]
    async fn connection_refused_is_reported_as_internal_error() {
        let dispatcher = dispatcher_for("http://127.0.0.1:1/v1/", Duration::from_secs(5));
        let envelope = dispatcher
            .call("search_refnr", &json!({"q": "5711"}))
            .await
            .expect("classified, not rethrown");
        assert_eq!(envelope.error_kind(), Some(ErrorKind::Internal));
        assert!(envelope.texts()[0].starts_with("WatchBase API error:"));
        assert!(!envelope.texts()[0].contains("test-key"));
    }
}
