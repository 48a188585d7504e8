//! WatchBase tool surface and upstream dispatch.
//!
//! This crate holds everything with decision logic: the tool catalog, argument decoding, request
//! translation, the upstream client and error classification. The MCP transport lives in the
//! `watchbase-mcp` binary.

pub mod args;
pub mod catalog;
pub mod classify;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod request;

pub use catalog::Catalog;
pub use config::UpstreamConfig;
pub use dispatch::Dispatcher;
pub use envelope::ResultEnvelope;
pub use error::{ErrorKind, ProtocolError, ToolsError};
