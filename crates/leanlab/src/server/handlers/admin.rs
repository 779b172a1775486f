//! Admin endpoint handlers

use axum::{
  extract::{Query, State},
  http::HeaderMap,
  response::Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::server::types::{ApiError, ClearResponse};
use crate::server::AppState;

pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
  pub admin_secret: Option<String>,
}

/// The supplied secret must equal the configured one; no configured secret
/// means the admin routes are closed.
fn authorized(configured: Option<&str>, headers: &HeaderMap, query: &AdminQuery) -> bool {
  let supplied = headers
    .get(ADMIN_SECRET_HEADER)
    .and_then(|value| value.to_str().ok())
    .or(query.admin_secret.as_deref());

  matches!((configured, supplied), (Some(expected), Some(given)) if !expected.is_empty() && expected == given)
}

/// POST /api/admin/clear-ideas - Remove every stored idea
pub async fn clear_ideas(
  State(state): State<AppState>,
  headers: HeaderMap,
  Query(query): Query<AdminQuery>,
) -> Result<Json<ClearResponse>, ApiError> {
  if !authorized(state.settings.admin_secret.as_deref(), &headers, &query) {
    warn!("rejected admin clear request");
    return Err(ApiError::forbidden("Forbidden"));
  }

  let cleared = state.service.clear().await?;
  Ok(Json(ClearResponse { ok: true, cleared }))
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  #[test]
  fn header_or_query_secret_is_accepted() {
    let mut headers = HeaderMap::new();
    headers.insert(ADMIN_SECRET_HEADER, HeaderValue::from_static("s3cret"));
    assert!(authorized(Some("s3cret"), &headers, &AdminQuery::default()));

    let query = AdminQuery { admin_secret: Some("s3cret".into()) };
    assert!(authorized(Some("s3cret"), &HeaderMap::new(), &query));
  }

  #[test]
  fn missing_or_wrong_secret_is_rejected() {
    let query = AdminQuery { admin_secret: Some("guess".into()) };
    assert!(!authorized(Some("s3cret"), &HeaderMap::new(), &query));
    assert!(!authorized(Some("s3cret"), &HeaderMap::new(), &AdminQuery::default()));
    assert!(!authorized(None, &HeaderMap::new(), &AdminQuery { admin_secret: Some(String::new()) }));
  }
}
