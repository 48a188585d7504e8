//! WatchBase MCP server: stdio transport, configuration and process lifecycle.

mod cli;
mod error;
mod server;

use clap::Parser as _;
use cli::{Cli, LogFormat};
use error::{Result, ServerError};
use rmcp::ServiceExt as _;
use server::WatchbaseServer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use watchbase_tools::client::redact_url;
use watchbase_tools::{Catalog, Dispatcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(cli).await {
        error!(error = %e, "server failed");
        return Err(e.into());
    }
    Ok(())
}

/// Logs go to stderr; stdout carries the MCP protocol.
fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);
    match cli.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.with_ansi(false).init(),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.upstream_config()?;
    info!(
        base_url = %redact_url(config.base_url()),
        timeout_secs = config.timeout().as_secs(),
        "starting WatchBase MCP server on stdio"
    );

    let dispatcher = Dispatcher::new(Catalog::watchbase(), config)?;
    let service = WatchbaseServer::new(dispatcher)
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| ServerError::Startup(format!("MCP initialization failed: {e}")))?;

    tokio::select! {
        res = service.waiting() => {
            let reason = res.map_err(|e| ServerError::Runtime(format!("MCP service task failed: {e}")))?;
            info!(?reason, "MCP session ended");
        }
        signal = shutdown_signal() => {
            info!(signal, "shutting down");
        }
    }

    Ok(())
}

async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    }
}
