//! Error types for the WatchBase MCP server binary.

use thiserror::Error;
use watchbase_tools::ToolsError;

/// Main error type for the server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration errors (invalid base URL, empty key, bad timeout)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Startup errors (HTTP client or MCP handshake failed)
    #[error("Startup error: {0}")]
    Startup(String),

    /// Runtime errors (transport task died)
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ToolsError> for ServerError {
    fn from(e: ToolsError) -> Self {
        match e {
            ToolsError::Config(s) => Self::Config(s),
            ToolsError::Client(s) => Self::Startup(s),
        }
    }
}

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;
