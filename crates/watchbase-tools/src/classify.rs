//! Mapping of upstream failures onto the protocol error taxonomy.

use crate::client::UpstreamError;
use crate::error::ErrorKind;
use reqwest::StatusCode;

/// A failure reduced to an error kind and a message fit for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: ErrorKind,
    pub message: String,
}

impl Classified {
    fn new(kind: ErrorKind, message: String) -> Self {
        Self { kind, message }
    }
}

/// Classify a failed upstream call.
///
/// Only the status and the body's `error` text ever reach the message; the raw body does not.
#[must_use]
pub fn classify_upstream(err: &UpstreamError) -> Classified {
    match err {
        UpstreamError::Status { status, .. }
            if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN =>
        {
            Classified::new(
                ErrorKind::Internal,
                format!(
                    "WatchBase API error: Invalid or unauthorized API key. Status: {}",
                    status.as_u16()
                ),
            )
        }
        UpstreamError::Status { status, .. } if *status == StatusCode::NOT_FOUND => {
            Classified::new(
                ErrorKind::InvalidRequest,
                "WatchBase API error: Resource not found. Status: 404".to_string(),
            )
        }
        UpstreamError::Status { status, detail } if *status == StatusCode::BAD_REQUEST => {
            let mut message =
                "WatchBase API error: Bad request (check parameters). Status: 400.".to_string();
            if let Some(detail) = detail.as_deref().filter(|d| !d.is_empty()) {
                message.push(' ');
                message.push_str(detail);
            }
            Classified::new(ErrorKind::InvalidParams, message)
        }
        UpstreamError::Status { status, detail } => {
            let reason = detail
                .clone()
                .filter(|d| !d.is_empty())
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
            Classified::new(ErrorKind::Internal, format!("WatchBase API error: {reason}"))
        }
        UpstreamError::Transport { message, .. } => Classified::new(
            ErrorKind::Internal,
            format!("WatchBase API error: {message}"),
        ),
    }
}

/// Fallback for failures that are neither protocol nor upstream errors.
#[must_use]
pub fn generic_failure(tool: &str) -> Classified {
    Classified::new(
        ErrorKind::Internal,
        format!("Failed to execute tool {tool}."),
    )
}
