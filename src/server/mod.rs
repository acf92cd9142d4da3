//! HTTP surface for the graph client.
//!
//! Thin JSON routes over the topology assembler and the process detail
//! provider. All host queries are synchronous, so handlers move them onto
//! tokio's blocking pool.

mod routes;

pub use routes::{router, AppState, HealthResponse};

use std::net::SocketAddr;

use anyhow::{Context, Result};
use log::info;
use tokio::net::TcpListener;

pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("SysMap listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("SysMap server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
