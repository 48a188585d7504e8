//! Command line and environment configuration.

use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::time::Duration;
use watchbase_tools::UpstreamConfig;
use watchbase_tools::config::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Expose the WatchBase watch metadata API as MCP tools over stdio.
#[derive(Debug, Parser)]
#[command(name = "watchbase-mcp", version, about)]
pub struct Cli {
    /// WatchBase API key.
    #[arg(long, env = "WATCHBASE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// WatchBase API root.
    #[arg(long, env = "WATCHBASE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request upstream timeout in seconds.
    #[arg(
        long,
        env = "WATCHBASE_TIMEOUT_SECS",
        default_value_t = 15,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log output format (logs always go to stderr).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Freeze the upstream settings for the lifetime of the process.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or the base URL is invalid.
    pub fn upstream_config(&self) -> Result<UpstreamConfig> {
        Ok(UpstreamConfig::builder(self.api_key.clone())
            .base_url(self.base_url.clone())
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?)
    }
}
