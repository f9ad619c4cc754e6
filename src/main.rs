//! Embedded asset server (standalone runner)
//!
//! Plays the part of the host application: loads configuration, serves a
//! directory of assets and stops on Ctrl+C / SIGTERM.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 LOCAL SERVER                  │
//!                        │                                               │
//!   WebView request      │  ┌─────────┐    ┌──────────────┐              │
//!   ─────────────────────┼─▶│  axum   │───▶│ static_files │──▶ AssetLoader
//!                        │  │ router  │    └──────────────┘              │
//!                        │  │         │    ┌──────────────┐              │
//!                        │  │         │───▶│    proxy     │──▶ Transport ┼──▶ Upstream
//!                        │  └─────────┘    └──────────────┘              │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use asset_proxy::config::{load_config, ServerConfig};
use asset_proxy::lifecycle::signals::wait_for_signal;
use asset_proxy::observability::init_logging;
use asset_proxy::{DirAssetLoader, LocalServer};

#[derive(Parser)]
#[command(name = "asset-proxy")]
#[command(about = "Local asset server with a header-rewriting proxy endpoint", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Asset directory (overrides assets.root)
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Bind address (overrides listener.bind_address)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(assets) = cli.assets {
        config.assets.root = assets.to_string_lossy().into_owned();
    }

    init_logging(&config.observability)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        assets = %config.assets.root,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let assets = DirAssetLoader::new(&config.assets.root);
    let mut server = LocalServer::new(config, assets)?.start().await?;

    wait_for_signal().await;
    server.stop().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
