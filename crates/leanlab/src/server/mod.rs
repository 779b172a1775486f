//! REST API for idea submission, revision and comparison
//!
//! Handlers stay thin: they translate HTTP into [`IdeaService`] calls and map
//! [`crate::Error`] onto status codes in [`types::ApiError`].

use std::sync::Arc;

use crate::config::Settings;
use crate::service::IdeaService;

pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod startup;
pub mod types;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
  pub service: Arc<IdeaService>,
  pub settings: Arc<Settings>,
}

impl AppState {
  pub fn new(service: IdeaService, settings: Settings) -> Self {
    Self { service: Arc::new(service), settings: Arc::new(settings) }
  }

  /// Build the service the settings describe
  pub fn from_settings(settings: Settings) -> crate::Result<Self> {
    let service = IdeaService::from_settings(&settings)?;
    Ok(Self::new(service, settings))
  }
}
