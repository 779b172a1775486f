//! Health endpoint handler

use axum::{extract::State, response::Json};

use crate::config::Provider;
use crate::server::types::HealthResponse;
use crate::server::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
  let provider = match state.service.analyzer().provider() {
    Provider::Local => "local",
    Provider::Generation => "generation",
  };

  Json(HealthResponse {
    status: "ok".to_string(),
    version: env!("CARGO_PKG_VERSION").to_string(),
    provider: provider.to_string(),
  })
}
