//! Ahana Portal
//!
//! Serves the built web UI and forwards `/api/*` to the backend.
//!
//! Run with: cargo run --bin ahana-portal
//!
//! # Configuration
//!
//! Read from `--config <path>` when given, else the standard locations
//! (see `ahana config`). Environment variables override the file:
//! - `AHANA_API_URL`: backend base URL
//! - `AHANA_PORTAL_HOST` / `AHANA_PORTAL_PORT`: listen address
//! - `AHANA_UI_DIR`: directory holding the built UI
//! - `RUST_LOG`: log filter (default: ahana=info,tower_http=info)

use std::path::PathBuf;

use ahana::config::Config;
use clap::Parser;

#[derive(Parser)]
#[command(name = "ahana-portal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve the Ahana web UI and forward API calls to the backend")]
struct Args {
    /// Config file (default: standard locations)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_from(Args::parse().config.as_deref())?;
    ahana::logging::init(&config.logging)?;

    tracing::info!("Starting Ahana portal v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Backend: {}", config.api.base_url);

    ahana::gateway::serve(&config).await?;
    Ok(())
}
