//! Text-generation service abstraction
//!
//! The analysis layer only sees [`TextGenerator`]; the production
//! implementation is [`client::OllamaClient`].

pub mod client;
pub mod extract;

use async_trait::async_trait;

use crate::error::Result;

pub use client::OllamaClient;
pub use extract::{parse_json_response, response_text};

/// Produces text for a prompt. One call per prompt, awaited to completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
  /// Generate text for `prompt`. `Ok(None)` means the service answered with a
  /// body that was not JSON at all.
  async fn generate(&self, prompt: &str) -> Result<Option<String>>;
}
