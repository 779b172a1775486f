//! Idea storage abstraction layer
//!
//! A generic interface over idea persistence so the durable file store and
//! the process-lifetime memory store can be swapped without touching the
//! service or the HTTP layer. Implementations must preserve version
//! insertion order and treat an append as atomic.

pub mod file;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Settings, StoreKind};
use crate::error::Result;
use crate::model::{Idea, IdeaInputs, Version};

pub use file::FileIdeaStore;
pub use memory::MemoryIdeaStore;

/// Persistence for ideas and their version history
#[async_trait]
pub trait IdeaStore: Send + Sync {
  /// Store a new idea holding `version` as its only version
  async fn create_idea(&self, inputs: IdeaInputs, version: Version) -> Result<Idea>;

  /// Fetch an idea, `NotFound` when absent
  async fn get_idea(&self, id: &str) -> Result<Idea>;

  /// Append a version and mirror its inputs onto the idea
  async fn append_version(&self, id: &str, inputs: IdeaInputs, version: Version) -> Result<()>;

  /// Versions of an idea in insertion order
  async fn list_versions(&self, id: &str) -> Result<Vec<Version>> {
    Ok(self.get_idea(id).await?.versions)
  }

  /// Every stored idea, oldest first
  async fn list_ideas(&self) -> Result<Vec<Idea>>;

  /// Remove every idea, returning how many were removed
  async fn clear(&self) -> Result<usize>;
}

/// Open the store the settings select
pub fn open_store(settings: &Settings) -> Result<Arc<dyn IdeaStore>> {
  Ok(match settings.store {
    StoreKind::File => Arc::new(FileIdeaStore::open(&settings.data_dir)?),
    StoreKind::Memory => Arc::new(MemoryIdeaStore::new()),
  })
}

/// Fresh identifier for a new idea
pub(crate) fn new_idea_id() -> String {
  uuid::Uuid::new_v4().simple().to_string()
}
