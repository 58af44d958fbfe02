//! Server binary for associa.

use std::path::PathBuf;
use std::sync::Arc;

use associa::{AppConfig, SearchServer};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// associa: keyword search with associative keywords over SSE.
#[derive(Parser)]
#[command(name = "associa", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the host to bind to.
    #[arg(long)]
    host: Option<String>,

    /// Override the port to bind to.
    #[arg(short, long)]
    port: Option<u16>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Load and validate the configuration, then exit.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Users can override with RUST_LOG=debug to see keywords and cache hits.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("associa=info,associa_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::CheckConfig => check_config(&config),
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    info!("associa v{}", env!("CARGO_PKG_VERSION"));

    let orchestrator = Arc::new(associa::build_orchestrator(&config));
    let server = SearchServer::start(orchestrator, &config.server).await?;

    tokio::signal::ctrl_c().await?;
    info!("interrupt received");
    server.shutdown().await;

    info!("associa shut down cleanly");
    Ok(())
}

fn check_config(config: &AppConfig) -> anyhow::Result<()> {
    let orchestrator = associa::build_orchestrator(config);
    println!("configuration OK");
    println!("  listen:    {}:{}", config.server.host, config.server.port);
    println!("  K:         {}", config.search.max_associative_words);
    println!("  cache TTL: {}s", config.search.cache_ttl_seconds);
    for (kind, available) in orchestrator.providers().status() {
        println!("  provider:  {kind} (available: {available})");
    }
    if orchestrator.providers().is_empty() {
        anyhow::bail!("no search provider could be registered");
    }
    Ok(())
}
