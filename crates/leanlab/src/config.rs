//! Deployment configuration
//!
//! [`Settings`] is read once from the environment and then handed to the
//! analyzer, the store factory and the server state. Nothing below this module
//! consults the environment at call time.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_GENERATION_HOST: &str = "http://127.0.0.1:11434";
pub const DEFAULT_GENERATION_MODEL: &str = "llama3.1:8b";
pub const DEFAULT_SEED_DELAY_MS: u64 = 600;

/// Which backend produces scores, canvases and explanations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
  /// Deterministic heuristics only
  #[default]
  Local,
  /// External text-generation service
  Generation,
}

impl FromStr for Provider {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "" | "local" => Ok(Provider::Local),
      "ollama" | "generation" => Ok(Provider::Generation),
      other => Err(Error::Configuration(format!(
        "LLM_PROVIDER must be \"local\" or \"ollama\", got \"{other}\""
      ))),
    }
  }
}

/// How generation failures are surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
  /// Propagate generation failures to the caller
  Strict,
  /// Substitute the deterministic result and attach a warning
  #[default]
  Lenient,
}

impl FromStr for FailurePolicy {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "strict" => Ok(FailurePolicy::Strict),
      "" | "lenient" => Ok(FailurePolicy::Lenient),
      other => Err(Error::Configuration(format!(
        "LLM_FAILURE_POLICY must be \"strict\" or \"lenient\", got \"{other}\""
      ))),
    }
  }
}

/// Which idea store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
  #[default]
  File,
  Memory,
}

impl FromStr for StoreKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "" | "file" => Ok(StoreKind::File),
      "memory" => Ok(StoreKind::Memory),
      other => Err(Error::Configuration(format!(
        "LEANLAB_STORE must be \"file\" or \"memory\", got \"{other}\""
      ))),
    }
  }
}

/// Whether demo ideas go through the configured analyzer or the local one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemoAnalysis {
  #[default]
  Configured,
  Local,
}

impl FromStr for DemoAnalysis {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "" | "configured" => Ok(DemoAnalysis::Configured),
      "local" => Ok(DemoAnalysis::Local),
      other => Err(Error::Configuration(format!(
        "DEMO_ANALYSIS must be \"configured\" or \"local\", got \"{other}\""
      ))),
    }
  }
}

/// Connection options for the text-generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
  pub host: String,
  pub model: String,
  /// No timeout when unset
  pub timeout: Option<Duration>,
}

impl Default for GenerationOptions {
  fn default() -> Self {
    Self {
      host: DEFAULT_GENERATION_HOST.to_string(),
      model: DEFAULT_GENERATION_MODEL.to_string(),
      timeout: None,
    }
  }
}

impl GenerationOptions {
  /// `{host}/api/generate`, tolerating a trailing slash on the host
  pub fn endpoint(&self) -> String {
    format!("{}/api/generate", self.host.trim_end_matches('/'))
  }

  pub fn validate(&self) -> Result<()> {
    let url = reqwest::Url::parse(&self.host)
      .map_err(|e| Error::Configuration(format!("invalid generation host \"{}\": {e}", self.host)))?;
    if !matches!(url.scheme(), "http" | "https") {
      return Err(Error::Configuration(format!(
        "generation host must use http or https, got \"{}\"",
        url.scheme()
      )));
    }
    if self.model.trim().is_empty() {
      return Err(Error::Configuration("generation model must not be empty".to_string()));
    }
    Ok(())
  }
}

/// Process-wide settings, built once at startup
#[derive(Debug, Clone)]
pub struct Settings {
  pub provider: Provider,
  pub failure_policy: FailurePolicy,
  pub generation: GenerationOptions,
  pub store: StoreKind,
  pub data_dir: PathBuf,
  pub demo_populate_allowed: bool,
  pub demo_analysis: DemoAnalysis,
  pub admin_secret: Option<String>,
  pub seed_delay: Duration,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      provider: Provider::default(),
      failure_policy: FailurePolicy::default(),
      generation: GenerationOptions::default(),
      store: StoreKind::default(),
      data_dir: default_data_dir(),
      demo_populate_allowed: false,
      demo_analysis: DemoAnalysis::default(),
      admin_secret: None,
      seed_delay: Duration::from_millis(DEFAULT_SEED_DELAY_MS),
    }
  }
}

impl Settings {
  /// Read settings from the process environment
  pub fn from_env() -> Result<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Read settings through an arbitrary variable lookup
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let timeout = match get("OLLAMA_TIMEOUT_SECS") {
      Some(raw) => Some(Duration::from_secs(raw.trim().parse().map_err(|_| {
        Error::Configuration(format!("OLLAMA_TIMEOUT_SECS must be a whole number, got \"{raw}\""))
      })?)),
      None => None,
    };

    let seed_delay = match get("LEANLAB_SEED_DELAY_MS") {
      Some(raw) => Duration::from_millis(raw.trim().parse().map_err(|_| {
        Error::Configuration(format!("LEANLAB_SEED_DELAY_MS must be a whole number, got \"{raw}\""))
      })?),
      None => Duration::from_millis(DEFAULT_SEED_DELAY_MS),
    };

    let settings = Self {
      provider: get("LLM_PROVIDER").as_deref().unwrap_or_default().parse()?,
      failure_policy: get("LLM_FAILURE_POLICY").as_deref().unwrap_or_default().parse()?,
      generation: GenerationOptions {
        host: get("OLLAMA_HOST").unwrap_or_else(|| DEFAULT_GENERATION_HOST.to_string()),
        model: get("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string()),
        timeout,
      },
      store: get("LEANLAB_STORE").as_deref().unwrap_or_default().parse()?,
      data_dir: get("LEANLAB_DATA_DIR").map(PathBuf::from).unwrap_or_else(default_data_dir),
      demo_populate_allowed: get("DEMO_POPULATE_ALLOWED").is_some_and(|v| v.trim() == "true"),
      demo_analysis: get("DEMO_ANALYSIS").as_deref().unwrap_or_default().parse()?,
      admin_secret: get("ADMIN_SECRET"),
      seed_delay,
    };

    settings.validate()?;
    Ok(settings)
  }

  /// Generation options must be usable when the generation provider is chosen
  pub fn validate(&self) -> Result<()> {
    if self.provider == Provider::Generation {
      self.generation.validate()?;
    }
    Ok(())
  }
}

/// `~/.leanlab/ideas`, or a temp-dir fallback when no home directory exists
pub fn default_data_dir() -> PathBuf {
  dirs::home_dir().unwrap_or_else(std::env::temp_dir).join(".leanlab").join("ideas")
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings> {
    let vars: HashMap<String, String> =
      pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Settings::from_lookup(|key| vars.get(key).cloned())
  }

  #[test]
  fn defaults_are_local_and_lenient() {
    let settings = settings_from(&[]).unwrap();
    assert_eq!(settings.provider, Provider::Local);
    assert_eq!(settings.failure_policy, FailurePolicy::Lenient);
    assert_eq!(settings.generation.host, DEFAULT_GENERATION_HOST);
    assert_eq!(settings.generation.model, DEFAULT_GENERATION_MODEL);
    assert_eq!(settings.generation.timeout, None);
    assert_eq!(settings.store, StoreKind::File);
    assert!(!settings.demo_populate_allowed);
    assert!(settings.admin_secret.is_none());
    assert_eq!(settings.seed_delay, Duration::from_millis(600));
  }

  #[test]
  fn reads_generation_overrides() {
    let settings = settings_from(&[
      ("LLM_PROVIDER", "Ollama"),
      ("LLM_FAILURE_POLICY", "strict"),
      ("OLLAMA_HOST", "http://gpu-box:11434/"),
      ("OLLAMA_MODEL", "mistral"),
      ("OLLAMA_TIMEOUT_SECS", "45"),
      ("DEMO_POPULATE_ALLOWED", "true"),
      ("ADMIN_SECRET", "hunter2"),
    ])
    .unwrap();

    assert_eq!(settings.provider, Provider::Generation);
    assert_eq!(settings.failure_policy, FailurePolicy::Strict);
    assert_eq!(settings.generation.endpoint(), "http://gpu-box:11434/api/generate");
    assert_eq!(settings.generation.model, "mistral");
    assert_eq!(settings.generation.timeout, Some(Duration::from_secs(45)));
    assert!(settings.demo_populate_allowed);
    assert_eq!(settings.admin_secret.as_deref(), Some("hunter2"));
  }

  #[test]
  fn unknown_provider_is_a_configuration_error() {
    let err = settings_from(&[("LLM_PROVIDER", "openai")]).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert!(err.to_string().contains("LLM_PROVIDER"));
  }

  #[test]
  fn invalid_host_only_matters_for_generation() {
    assert!(settings_from(&[("OLLAMA_HOST", "not a url")]).is_ok());

    let err = settings_from(&[("LLM_PROVIDER", "ollama"), ("OLLAMA_HOST", "not a url")]).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
  }

  #[test]
  fn demo_populate_needs_literal_true() {
    let settings = settings_from(&[("DEMO_POPULATE_ALLOWED", "yes")]).unwrap();
    assert!(!settings.demo_populate_allowed);
  }
}
