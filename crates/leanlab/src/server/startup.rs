//! REST server startup and configuration

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::serve;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::Settings;
use crate::server::routing::create_router;
use crate::server::AppState;

/// Start the REST server and run until ctrl-c
pub async fn start_server(addr: SocketAddr, settings: Settings) -> Result<()> {
  info!(
    provider = ?settings.provider,
    policy = ?settings.failure_policy,
    store = ?settings.store,
    "starting leanlab server"
  );

  let state = AppState::from_settings(settings).context("failed to initialize idea service")?;
  let app = create_router(state)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()));

  let listener = TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;
  info!("server listening on {addr}");

  serve(listener, app).with_graceful_shutdown(shutdown_signal()).await.context("server error")?;
  info!("server shutdown gracefully");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("failed to listen for shutdown signal: {e}");
    std::future::pending::<()>().await;
  }
}
