//! HTTP client for a local text-generation service
//!
//! Sends a single non-streaming `POST {host}/api/generate` per prompt and
//! tolerates the handful of response shapes that generation servers use.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::GenerationOptions;
use crate::error::{Error, Result};
use crate::generation::{extract::response_text, TextGenerator};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
  model: &'a str,
  prompt: &'a str,
  stream: bool,
}

/// Generation client bound to a host and model
#[derive(Debug, Clone)]
pub struct OllamaClient {
  client: Client,
  options: GenerationOptions,
}

impl OllamaClient {
  /// Build a client; fails with a configuration error on an unusable host.
  pub fn new(options: GenerationOptions) -> Result<Self> {
    options.validate()?;

    let mut builder = Client::builder();
    if let Some(timeout) = options.timeout {
      builder = builder.timeout(timeout);
    }
    let client = builder
      .build()
      .map_err(|e| Error::Configuration(format!("failed to create HTTP client: {e}")))?;

    Ok(Self { client, options })
  }

  pub fn options(&self) -> &GenerationOptions {
    &self.options
  }

  /// Generate with explicit host/model overrides
  pub async fn generate_with(&self, prompt: &str, options: &GenerationOptions) -> Result<Option<String>> {
    let url = options.endpoint();
    debug!(%url, model = %options.model, prompt_chars = prompt.len(), "sending generation request");

    let request = GenerateRequest { model: &options.model, prompt, stream: false };
    let response = self.client.post(&url).json(&request).send().await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(Error::Transport { status: status.as_u16(), body });
    }

    let text = response.text().await?;
    let Ok(body) = serde_json::from_str::<Value>(&text) else {
      debug!("generation response body was not JSON");
      return Ok(None);
    };

    Ok(Some(response_text(&body)))
  }
}

#[async_trait]
impl TextGenerator for OllamaClient {
  async fn generate(&self, prompt: &str) -> Result<Option<String>> {
    self.generate_with(prompt, &self.options).await
  }
}
