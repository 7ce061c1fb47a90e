use std::net::SocketAddr;

use septa_watch::septa::{SeptaClient, SeptaConfig};
use septa_watch::shell::{Shell, ShellConfig};
use septa_watch::web::{AppState, create_router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Where the window is served unless `SEPTA_WATCH_ADDR` says otherwise.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("septa_watch=info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Optional overrides, mainly for pointing at a local stub
    let mut septa_config = SeptaConfig::new();
    if let Ok(url) = std::env::var("SEPTA_BASE_URL") {
        septa_config = septa_config.with_base_url(url);
    }
    let addr: SocketAddr = std::env::var("SEPTA_WATCH_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;

    info!(base_url = %septa_config.base_url, "using SEPTA API");
    let client = SeptaClient::new(septa_config)?;
    let shell = Shell::new(client, ShellConfig::default());

    let static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static");
    let app = create_router(AppState::new(shell.clone()), static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("SEPTAwatch listening on http://{addr}");
    info!("Open http://{addr} in your browser for the tracker.");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("failed to listen for shutdown signal: {e}");
            }
        })
        .await?;

    shell.shutdown().await;
    info!("SEPTAwatch stopped");
    Ok(())
}
