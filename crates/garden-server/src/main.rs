//! garden: portfolio site and knowledge-garden viewer
//!
//! Renders a markdown vault straight from its GitHub repository, with a
//! landing page, terminal easter egg, contact form and note graphs.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use garden_server::config::{Config, expand_tilde};
use garden_server::contact::HttpEmailRelay;
use garden_server::vault::GithubSource;
use garden_server::{AppState, router};

#[derive(Parser, Debug)]
#[command(name = "garden")]
#[command(about = "Portfolio site and knowledge garden for a GitHub-hosted markdown vault")]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 3000, env = "GARDEN_PORT")]
    port: u16,

    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0", env = "GARDEN_BIND")]
    bind: String,

    /// Path to config.json
    #[arg(long, default_value = "~/.config/garden/config.json", env = "GARDEN_CONFIG")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "garden=info,garden_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&expand_tilde(&cli.config))?;
    if config.vault.owner.is_empty() || config.vault.repo.is_empty() {
        tracing::warn!("No vault repository configured; the garden will be empty");
    }

    let source = GithubSource::new(&config.vault).context("Failed to build vault HTTP client")?;
    let relay = HttpEmailRelay::new(config.contact.clone(), &config.vault.user_agent)
        .context("Failed to build email relay HTTP client")?;

    tracing::info!(
        "Vault: {}/{}@{}",
        config.vault.owner,
        config.vault.repo,
        config.vault.branch
    );

    let state = Arc::new(AppState::new(config, Arc::new(source), Arc::new(relay))?);
    let app = router(state);

    // Parse bind address
    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", cli.bind, cli.port))?;

    tracing::info!("Starting garden on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("garden shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
