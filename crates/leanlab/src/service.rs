//! Idea lifecycle: submit, revise, list and compare
//!
//! Analysis always happens before the store is touched, so a failed analysis
//! never leaves a half-written idea or version behind.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::analysis::Analyzer;
use crate::config::{DemoAnalysis, Settings};
use crate::demo;
use crate::error::{Error, Result};
use crate::model::{Comparison, Idea, IdeaInputs, IdeaPreview, Version};
use crate::store::{open_store, IdeaStore};

#[derive(Clone)]
pub struct IdeaService {
  store: Arc<dyn IdeaStore>,
  analyzer: Analyzer,
  demo_analyzer: Analyzer,
}

impl IdeaService {
  pub fn new(store: Arc<dyn IdeaStore>, analyzer: Analyzer) -> Self {
    Self { store, demo_analyzer: analyzer.clone(), analyzer }
  }

  /// Use a different analyzer for demo ideas
  pub fn with_demo_analyzer(mut self, analyzer: Analyzer) -> Self {
    self.demo_analyzer = analyzer;
    self
  }

  /// Store, analyzer and demo analyzer as the settings describe them
  pub fn from_settings(settings: &Settings) -> Result<Self> {
    let service = Self::new(open_store(settings)?, Analyzer::from_settings(settings)?);
    Ok(match settings.demo_analysis {
      DemoAnalysis::Configured => service,
      DemoAnalysis::Local => service.with_demo_analyzer(Analyzer::local()),
    })
  }

  pub fn analyzer(&self) -> &Analyzer {
    &self.analyzer
  }

  pub fn store(&self) -> &Arc<dyn IdeaStore> {
    &self.store
  }

  async fn analyze_with(analyzer: &Analyzer, inputs: IdeaInputs) -> Result<Version> {
    let insights = analyzer.assess(&inputs).await?;
    Ok(Version::new(inputs, insights))
  }

  /// Analyze inputs without storing anything
  pub async fn analyze(&self, inputs: IdeaInputs) -> Result<Version> {
    Self::analyze_with(&self.analyzer, inputs).await
  }

  /// Create an idea whose first version is the analysis of `inputs`
  pub async fn submit(&self, inputs: IdeaInputs) -> Result<Idea> {
    let version = self.analyze(inputs.clone()).await?;
    let idea = self.store.create_idea(inputs, version).await?;
    info!(id = %idea.id, "created idea");
    Ok(idea)
  }

  /// Save a new revision of an existing idea
  pub async fn revise(&self, id: &str, inputs: IdeaInputs) -> Result<Version> {
    self.store.get_idea(id).await?;
    let version = self.analyze(inputs.clone()).await?;
    self.store.append_version(id, inputs, version.clone()).await?;
    info!(%id, "appended version");
    Ok(version)
  }

  pub async fn idea(&self, id: &str) -> Result<Idea> {
    self.store.get_idea(id).await
  }

  pub async fn versions(&self, id: &str) -> Result<Vec<Version>> {
    self.store.list_versions(id).await
  }

  /// Compare the first version of an idea against its latest one
  pub async fn compare(&self, id: &str) -> Result<Comparison> {
    let versions = self.store.list_versions(id).await?;
    let (Some(first), Some(latest)) = (versions.first(), versions.last()) else {
      return Err(Error::EmptyHistory { id: id.to_string() });
    };
    self.analyzer.compare(first, latest).await
  }

  /// Admin bulk clear of every stored idea
  pub async fn clear(&self) -> Result<usize> {
    let cleared = self.store.clear().await?;
    info!(cleared, "cleared all ideas");
    Ok(cleared)
  }

  /// Analyze the built-in samples, one at a time, without storing them
  pub async fn demo_previews(&self) -> Result<Vec<IdeaPreview>> {
    let mut previews = Vec::new();
    for inputs in demo::samples() {
      let insights = self.demo_analyzer.assess(&inputs).await?;
      previews.push(IdeaPreview { inputs, insights, created_at: Utc::now() });
    }
    Ok(previews)
  }

  /// Store the demo idea with its simulated revisions and compare them
  pub async fn populate_demo(&self) -> Result<(Idea, Comparison)> {
    let base = demo::base();
    let mut versions = vec![Self::analyze_with(&self.demo_analyzer, base.clone()).await?];
    for inputs in demo::revisions() {
      versions.push(Self::analyze_with(&self.demo_analyzer, inputs).await?);
    }

    let mut versions = versions.into_iter();
    let Some(first) = versions.next() else {
      return Err(Error::Storage("demo produced no versions".to_string()));
    };
    let idea = self.store.create_idea(base, first).await?;
    for version in versions {
      self.store.append_version(&idea.id, version.inputs.clone(), version).await?;
    }

    let idea = self.store.get_idea(&idea.id).await?;
    let comparison = match (idea.first(), idea.latest()) {
      (Some(first), Some(latest)) => self.demo_analyzer.compare(first, latest).await?,
      _ => return Err(Error::EmptyHistory { id: idea.id.clone() }),
    };
    info!(id = %idea.id, versions = idea.versions.len(), "populated demo idea");
    Ok((idea, comparison))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::MemoryIdeaStore;

  fn service() -> IdeaService {
    IdeaService::new(Arc::new(MemoryIdeaStore::new()), Analyzer::local())
  }

  #[tokio::test]
  async fn revise_unknown_idea_is_not_found() {
    let err = service().revise("missing", IdeaInputs::default()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
  }

  #[tokio::test]
  async fn compare_single_version_reports_no_change() {
    let service = service();
    let idea = service.submit(demo::base()).await.unwrap();
    let comparison = service.compare(&idea.id).await.unwrap();
    assert!(comparison.deltas.is_unchanged());
    assert_eq!(comparison.explanation, crate::analysis::delta::NO_CHANGES);
  }

  #[tokio::test]
  async fn demo_population_stores_four_versions() {
    let service = service();
    let (idea, comparison) = service.populate_demo().await.unwrap();
    assert_eq!(idea.versions.len(), 4);
    assert_eq!(comparison.first, idea.versions[0].insights);
    assert_eq!(comparison.latest, idea.versions[3].insights);
    assert_eq!(service.store().list_ideas().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn demo_previews_are_not_stored() {
    let service = service();
    let previews = service.demo_previews().await.unwrap();
    assert_eq!(previews.len(), 3);
    assert!(service.store().list_ideas().await.unwrap().is_empty());
  }
}
