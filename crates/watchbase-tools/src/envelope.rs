//! The uniform result shape returned for every call that reached the network stage.

use crate::error::ErrorKind;
use rmcp::model::{CallToolResult, Content};
use serde_json::json;

/// Either the serialized upstream payload or one error message, never both.
///
/// Constructors guarantee at least one text entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEnvelope {
    texts: Vec<String>,
    error: Option<ErrorKind>,
}

impl ResultEnvelope {
    #[must_use]
    pub fn success(payload: String) -> Self {
        Self {
            texts: vec![payload],
            error: None,
        }
    }

    #[must_use]
    pub fn failure(kind: ErrorKind, message: String) -> Self {
        Self {
            texts: vec![message],
            error: Some(kind),
        }
    }

    #[must_use]
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error
    }
}

impl From<ResultEnvelope> for CallToolResult {
    /// Failures carry their JSON-RPC code in `structuredContent.errorCode`.
    fn from(envelope: ResultEnvelope) -> Self {
        let content: Vec<Content> = envelope.texts.into_iter().map(Content::text).collect();
        match envelope.error {
            None => CallToolResult::success(content),
            Some(kind) => {
                let mut result = CallToolResult::error(content);
                result.structured_content = Some(json!({
                    "errorCode": kind.code().0,
                    "errorKind": kind.as_str(),
                }));
                result
            }
        }
    }
}
