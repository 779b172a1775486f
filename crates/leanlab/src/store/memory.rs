//! Ephemeral store living for the lifetime of the process

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::model::{Idea, IdeaInputs, Version};
use crate::store::{new_idea_id, IdeaStore};

/// In-memory idea store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryIdeaStore {
  ideas: RwLock<HashMap<String, Idea>>,
}

impl MemoryIdeaStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl IdeaStore for MemoryIdeaStore {
  async fn create_idea(&self, inputs: IdeaInputs, version: Version) -> Result<Idea> {
    let idea = Idea::new(new_idea_id(), inputs, version);
    self.ideas.write().await.insert(idea.id.clone(), idea.clone());
    Ok(idea)
  }

  async fn get_idea(&self, id: &str) -> Result<Idea> {
    self.ideas.read().await.get(id).cloned().ok_or_else(|| Error::not_found(id))
  }

  async fn append_version(&self, id: &str, inputs: IdeaInputs, version: Version) -> Result<()> {
    let mut ideas = self.ideas.write().await;
    let idea = ideas.get_mut(id).ok_or_else(|| Error::not_found(id))?;
    idea.push_version(inputs, version);
    Ok(())
  }

  async fn list_ideas(&self) -> Result<Vec<Idea>> {
    let mut ideas: Vec<Idea> = self.ideas.read().await.values().cloned().collect();
    ideas.sort_by_key(|idea| idea.created_at);
    Ok(ideas)
  }

  async fn clear(&self) -> Result<usize> {
    let mut ideas = self.ideas.write().await;
    let count = ideas.len();
    ideas.clear();
    Ok(count)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::InsightBundle;

  fn inputs(problem: &str) -> IdeaInputs {
    IdeaInputs { problem: Some(problem.to_string()), ..Default::default() }
  }

  #[tokio::test]
  async fn appends_keep_order() {
    let store = MemoryIdeaStore::new();
    let idea = store.create_idea(inputs("v1"), Version::new(inputs("v1"), InsightBundle::default())).await.unwrap();

    for label in ["v2", "v3"] {
      store
        .append_version(&idea.id, inputs(label), Version::new(inputs(label), InsightBundle::default()))
        .await
        .unwrap();
    }

    let versions = store.list_versions(&idea.id).await.unwrap();
    let labels: Vec<&str> = versions.iter().map(|v| v.inputs.problem()).collect();
    assert_eq!(labels, ["v1", "v2", "v3"]);
    assert_eq!(store.get_idea(&idea.id).await.unwrap().inputs.problem(), "v3");
  }

  #[tokio::test]
  async fn unknown_ids_are_not_found() {
    let store = MemoryIdeaStore::new();
    assert!(matches!(store.get_idea("nope").await, Err(Error::NotFound { .. })));
    assert!(matches!(
      store.append_version("nope", IdeaInputs::default(), Version::new(IdeaInputs::default(), InsightBundle::default())).await,
      Err(Error::NotFound { .. })
    ));
    assert!(matches!(store.list_versions("nope").await, Err(Error::NotFound { .. })));
  }

  #[tokio::test]
  async fn clear_reports_count() {
    let store = MemoryIdeaStore::new();
    for _ in 0..3 {
      store.create_idea(IdeaInputs::default(), Version::new(IdeaInputs::default(), InsightBundle::default())).await.unwrap();
    }
    assert_eq!(store.clear().await.unwrap(), 3);
    assert!(store.list_ideas().await.unwrap().is_empty());
  }
}
