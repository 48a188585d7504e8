//! Error types for `watchbase-tools`.

use crate::args::ArgsError;
use rmcp::model::{ErrorCode, ErrorData};
use thiserror::Error;

/// Setup errors (bad configuration, HTTP client construction).
#[derive(Error, Debug)]
pub enum ToolsError {
    /// Configuration errors (invalid base URL, empty key, zero timeout).
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Result type alias for setup operations.
pub type Result<T> = std::result::Result<T, ToolsError>;

/// The protocol-level error taxonomy every failure is reduced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Arguments did not match the tool's shape, or upstream rejected them (400).
    InvalidParams,
    /// No tool with the requested name.
    UnknownTool,
    /// Upstream could not find the requested resource (404).
    InvalidRequest,
    /// Everything else: bad credentials, upstream 5xx, timeouts, unexpected failures.
    Internal,
}

impl ErrorKind {
    /// JSON-RPC error code for this kind.
    #[must_use]
    pub fn code(self) -> ErrorCode {
        match self {
            Self::InvalidParams => ErrorCode::INVALID_PARAMS,
            Self::UnknownTool => ErrorCode::METHOD_NOT_FOUND,
            Self::InvalidRequest => ErrorCode::INVALID_REQUEST,
            Self::Internal => ErrorCode::INTERNAL_ERROR,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParams => "invalid_params",
            Self::UnknownTool => "method_not_found",
            Self::InvalidRequest => "invalid_request",
            Self::Internal => "internal_error",
        }
    }
}

/// Hard protocol failures.
///
/// These abort a call before any network I/O and are surfaced to the client as JSON-RPC
/// errors, never as a tool result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    InvalidArguments(#[from] ArgsError),
}

impl ProtocolError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTool(_) => ErrorKind::UnknownTool,
            Self::InvalidArguments(_) => ErrorKind::InvalidParams,
        }
    }
}

impl From<ProtocolError> for ErrorData {
    fn from(err: ProtocolError) -> Self {
        ErrorData::new(err.kind().code(), err.to_string(), None)
    }
}
