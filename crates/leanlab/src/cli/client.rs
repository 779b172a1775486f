//! HTTP client for the leanlab REST API

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::model::{Comparison, Idea, IdeaInputs, IdeaPreview, Version};
use crate::server::handlers::admin::ADMIN_SECRET_HEADER;
use crate::server::types::{ClearResponse, ErrorBody, PopulateResponse, VersionCreatedResponse, VersionsResponse};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:4000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the leanlab HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Base URL of the server (e.g., "http://localhost:4000")
  pub base_url: String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { base_url: DEFAULT_SERVER_URL.to_string(), timeout_secs: DEFAULT_TIMEOUT_SECS }
  }
}

impl ClientConfig {
  /// `LEANLAB_SERVER_URL` and `LEANLAB_TIMEOUT_SECS`, falling back to defaults
  pub fn from_env() -> Self {
    let defaults = Self::default();
    Self {
      base_url: std::env::var("LEANLAB_SERVER_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or(defaults.base_url),
      timeout_secs: std::env::var("LEANLAB_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.timeout_secs),
    }
  }
}

/// HTTP client for the leanlab REST API
pub struct LeanlabClient {
  client: Client,
  config: ClientConfig,
}

impl LeanlabClient {
  pub fn with_config(config: ClientConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .context("Failed to create HTTP client")?;

    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.config.base_url)
  }

  /// Decode a success body, or surface the server's `{error}` message
  async fn decode<T: DeserializeOwned>(response: Response, action: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
      let text = response.text().await.unwrap_or_default();
      let message = serde_json::from_str::<ErrorBody>(&text).map(|body| body.error).unwrap_or(text);
      return Err(anyhow!("Failed to {action} ({status}): {message}"));
    }
    Ok(response.json().await?)
  }

  pub async fn submit(&self, inputs: &IdeaInputs) -> Result<Idea> {
    let response = self.client.post(self.url("/api/ideas")).json(inputs).send().await?;
    Self::decode(response, "submit idea").await
  }

  pub async fn idea(&self, id: &str) -> Result<Idea> {
    let response = self.client.get(self.url(&format!("/api/ideas/{id}"))).send().await?;
    Self::decode(response, "fetch idea").await
  }

  pub async fn revise(&self, id: &str, inputs: &IdeaInputs) -> Result<Version> {
    let response =
      self.client.post(self.url(&format!("/api/ideas/{id}/versions"))).json(inputs).send().await?;
    let created: VersionCreatedResponse = Self::decode(response, "save revision").await?;
    Ok(created.version)
  }

  pub async fn versions(&self, id: &str) -> Result<Vec<Version>> {
    let response = self.client.get(self.url(&format!("/api/ideas/{id}/versions"))).send().await?;
    let body: VersionsResponse = Self::decode(response, "list versions").await?;
    Ok(body.versions)
  }

  pub async fn compare(&self, id: &str) -> Result<Comparison> {
    let response = self.client.get(self.url(&format!("/api/ideas/{id}/compare"))).send().await?;
    Self::decode(response, "compare versions").await
  }

  pub async fn demo_list(&self) -> Result<Vec<IdeaPreview>> {
    let response = self.client.get(self.url("/api/ideas/demo/list")).send().await?;
    Self::decode(response, "list demo ideas").await
  }

  pub async fn demo_populate(&self) -> Result<PopulateResponse> {
    let response = self.client.post(self.url("/api/ideas/demo/populate")).send().await?;
    Self::decode(response, "populate demo idea").await
  }

  pub async fn clear(&self, secret: &str) -> Result<ClearResponse> {
    let response = self
      .client
      .post(self.url("/api/admin/clear-ideas"))
      .header(ADMIN_SECRET_HEADER, secret)
      .send()
      .await?;
    Self::decode(response, "clear ideas").await
  }
}

/// Client configured from the environment
pub fn get_client() -> Result<LeanlabClient> {
  LeanlabClient::with_config(ClientConfig::from_env())
}
