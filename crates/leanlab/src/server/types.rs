//! REST API payloads and error mapping

use axum::{
  http::StatusCode,
  response::{IntoResponse, Json, Response},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::Error;
use crate::model::{Comparison, Version};

/// Response for GET /health
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
  pub status: String,
  pub version: String,
  /// `local` or `generation`
  pub provider: String,
}

/// Response for POST /api/ideas/{id}/versions
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionCreatedResponse {
  pub ok: bool,
  pub version: Version,
}

/// Response for GET /api/ideas/{id}/versions
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionsResponse {
  pub versions: Vec<Version>,
}

/// Response for POST /api/ideas/demo/populate
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PopulateResponse {
  pub ok: bool,
  pub id: String,
  pub compare: Comparison,
}

/// Response for POST /api/admin/clear-ideas
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ClearResponse {
  pub ok: bool,
  pub cleared: usize,
}

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ErrorBody {
  pub error: String,
}

/// Handler error carrying the HTTP status to answer with
#[derive(Debug)]
pub struct ApiError {
  pub status: StatusCode,
  pub message: String,
}

impl ApiError {
  pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
    Self { status, message: message.into() }
  }

  pub fn forbidden(message: impl Into<String>) -> Self {
    Self::new(StatusCode::FORBIDDEN, message)
  }
}

impl From<Error> for ApiError {
  fn from(err: Error) -> Self {
    let status = match &err {
      Error::NotFound { .. } => StatusCode::NOT_FOUND,
      Error::EmptyHistory { .. } => StatusCode::BAD_REQUEST,
      e if e.is_generation_failure() => StatusCode::BAD_GATEWAY,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
      error!(error = %err, "request failed");
    }
    Self::new(status, err.to_string())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status, Json(ErrorBody { error: self.message })).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn errors_map_to_statuses() {
    assert_eq!(ApiError::from(Error::not_found("x")).status, StatusCode::NOT_FOUND);
    assert_eq!(ApiError::from(Error::EmptyHistory { id: "x".into() }).status, StatusCode::BAD_REQUEST);
    assert_eq!(
      ApiError::from(Error::EmptyResponse { context: "lean canvas" }).status,
      StatusCode::BAD_GATEWAY
    );
    assert_eq!(
      ApiError::from(Error::Configuration("x".into())).status,
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }
}
