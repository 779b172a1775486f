//! Axum router configuration for all endpoints

use axum::{
  middleware,
  routing::{get, post},
  Router,
};

use crate::server::handlers::{admin, ideas, status};
use crate::server::middleware::request_logging;
use crate::server::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
  Router::new()
    .route("/health", get(status::health))
    // Demo routes are static segments, matched ahead of `{id}`
    .route("/api/ideas/demo/list", get(ideas::demo_list))
    .route("/api/ideas/demo/populate", post(ideas::demo_populate))
    .route("/api/ideas", post(ideas::create_idea))
    .route("/api/ideas/{id}", get(ideas::get_idea))
    .route("/api/ideas/{id}/versions", post(ideas::add_version).get(ideas::list_versions))
    .route("/api/ideas/{id}/compare", get(ideas::compare))
    .route("/api/admin/clear-ideas", post(admin::clear_ideas))
    .layer(middleware::from_fn(request_logging))
    .with_state(state)
}
