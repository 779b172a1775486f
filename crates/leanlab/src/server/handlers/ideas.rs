//! Idea endpoint handlers

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::Json,
};

use crate::model::{Comparison, Idea, IdeaInputs, IdeaPreview};
use crate::server::types::{ApiError, PopulateResponse, VersionCreatedResponse, VersionsResponse};
use crate::server::AppState;

/// POST /api/ideas - Analyze a submission and store it as a new idea
pub async fn create_idea(
  State(state): State<AppState>,
  Json(inputs): Json<IdeaInputs>,
) -> Result<(StatusCode, Json<Idea>), ApiError> {
  let idea = state.service.submit(inputs).await?;
  Ok((StatusCode::CREATED, Json(idea)))
}

/// GET /api/ideas/{id}
pub async fn get_idea(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Idea>, ApiError> {
  Ok(Json(state.service.idea(&id).await?))
}

/// POST /api/ideas/{id}/versions - Save a revision
pub async fn add_version(
  State(state): State<AppState>,
  Path(id): Path<String>,
  Json(inputs): Json<IdeaInputs>,
) -> Result<(StatusCode, Json<VersionCreatedResponse>), ApiError> {
  let version = state.service.revise(&id, inputs).await?;
  Ok((StatusCode::CREATED, Json(VersionCreatedResponse { ok: true, version })))
}

/// GET /api/ideas/{id}/versions
pub async fn list_versions(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<VersionsResponse>, ApiError> {
  let versions = state.service.versions(&id).await?;
  Ok(Json(VersionsResponse { versions }))
}

/// GET /api/ideas/{id}/compare - First version against the latest one
pub async fn compare(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<Comparison>, ApiError> {
  Ok(Json(state.service.compare(&id).await?))
}

/// GET /api/ideas/demo/list - Analyzed samples, not stored
pub async fn demo_list(State(state): State<AppState>) -> Result<Json<Vec<IdeaPreview>>, ApiError> {
  Ok(Json(state.service.demo_previews().await?))
}

/// POST /api/ideas/demo/populate - Store a demo idea with revisions
pub async fn demo_populate(State(state): State<AppState>) -> Result<Json<PopulateResponse>, ApiError> {
  if !state.settings.demo_populate_allowed {
    return Err(ApiError::forbidden(
      "Demo populate disabled. Set DEMO_POPULATE_ALLOWED=true or seed demo data with `leanlab seed`.",
    ));
  }

  let (idea, compare) = state.service.populate_demo().await?;
  Ok(Json(PopulateResponse { ok: true, id: idea.id, compare }))
}
