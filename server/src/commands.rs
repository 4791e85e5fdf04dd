//! Command implementations for the server binary.

use anyhow::{Context, Result};
use clipmind_history::HistoryRanker;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::cli::{Cli, Commands};
use crate::config::ServerConfig;
use crate::handler::{SharedRanker, share};
use crate::transport::{serve_stdio, serve_tcp};

/// Install the global tracing subscriber.
///
/// Logs go to stderr: in stdio mode stdout carries protocol responses.
pub fn init_logging(log_level: Option<&str>) -> Result<()> {
    let filter = match log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Construct the process's ranker from `config`.
pub fn build_ranker(config: &ServerConfig) -> Result<SharedRanker> {
    let provider = config.embedding.build_provider();
    let ranker = HistoryRanker::new(config.history.clone(), provider)
        .context("Invalid history configuration")?;

    info!("Configuration:");
    info!("  Max history: {}", ranker.max_history());
    info!("  Embedding provider: {}", ranker.provider_name());
    if let Some(timeout) = config.history.embed_timeout_ms {
        info!("  Embedding timeout: {timeout}ms");
    }

    Ok(share(ranker))
}

/// Run the command selected on the command line.
pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_level.as_deref())?;

    let mut config = ServerConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    cli.overrides.apply(&mut config);

    match cli.command {
        Commands::Stdio => {
            let ranker = build_ranker(&config)?;
            serve_stdio(ranker).await.context("stdio session failed")?;
        }
        Commands::Listen { host, port } => {
            if let Some(host) = host {
                config.listen.host = host;
            }
            if let Some(port) = port {
                config.listen.port = port;
            }

            let ranker = build_ranker(&config)?;
            let addr = config.listen.addr();
            let listener = TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?;
            serve_tcp(listener, ranker, shutdown_signal())
                .await
                .context("Listener failed")?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        () = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
