//! Serve command implementation.
//!
//! Mounts the EdgeWeave API under `/api` and serves it until interrupted.

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use edgeweave_api::{create_api_router, create_api_state};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;

/// Run the API server.
pub async fn execute(config: &Config) -> Result<()> {
    let state = create_api_state(&config.save_file, config.bundle.clone());
    let app = Router::new().nest("/api", create_api_router(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, save_file = %config.save_file.display(), "Starting server");

    println!();
    println!("🚀 EdgeWeave Server");
    println!("   API:   http://localhost:{}/api/health", config.port);
    println!("   Setup: {}", config.save_file.display());
    println!();
    println!("   Press Ctrl+C to stop");
    println!();

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
