//! Error types shared by the analysis, generation and storage layers

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while analyzing ideas or talking to collaborators.
#[derive(Debug, Error)]
pub enum Error {
  /// Generation mode selected without a usable configuration.
  #[error("configuration error: {0}")]
  Configuration(String),

  /// The generation service answered with a non-success status.
  #[error("generation request failed ({status}): {body}")]
  Transport {
    /// HTTP status code returned by the service.
    status: u16,
    /// Response body text.
    body: String,
  },

  /// The generation service could not be reached.
  #[error("generation request failed: {0}")]
  Network(#[from] reqwest::Error),

  /// The generation service returned no text.
  #[error("generation service returned an empty response for {context}")]
  EmptyResponse { context: &'static str },

  /// The returned text is not recoverable JSON.
  #[error("unable to parse generation response for {context}: {message}")]
  Parse { context: &'static str, message: String },

  /// The referenced idea does not exist.
  #[error("idea not found: {id}")]
  NotFound { id: String },

  /// The idea exists but holds no versions to compare.
  #[error("idea {id} has no versions to compare")]
  EmptyHistory { id: String },

  #[error("storage error: {0}")]
  Storage(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),
}

impl Error {
  /// Whether this error came out of the generation path and may be replaced
  /// by the deterministic computation under the lenient policy.
  pub fn is_generation_failure(&self) -> bool {
    matches!(
      self,
      Error::Transport { .. } | Error::Network(_) | Error::EmptyResponse { .. } | Error::Parse { .. }
    )
  }

  pub fn not_found(id: impl Into<String>) -> Self {
    Error::NotFound { id: id.into() }
  }
}
