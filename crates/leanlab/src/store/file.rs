//! Durable store keeping one JSON document per idea
//!
//! Layout: `<data_dir>/<id>.json`. Every write lands in a temp file first and
//! is renamed over the document, so a failed append leaves the previous
//! versions intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Idea, IdeaInputs, Version};
use crate::store::{new_idea_id, IdeaStore};

const DOCUMENT_EXTENSION: &str = "json";

#[derive(Debug)]
pub struct FileIdeaStore {
  root: PathBuf,
  // serializes read-modify-write cycles
  writes: Mutex<()>,
}

impl FileIdeaStore {
  /// Open (and create if needed) a store rooted at `root`
  pub fn open(root: impl AsRef<Path>) -> Result<Self> {
    let root = root.as_ref().to_path_buf();
    std::fs::create_dir_all(&root)
      .map_err(|e| Error::Storage(format!("cannot create data directory {}: {e}", root.display())))?;
    Ok(Self { root, writes: Mutex::new(()) })
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  fn document_path(&self, id: &str) -> Option<PathBuf> {
    let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| self.root.join(format!("{id}.{DOCUMENT_EXTENSION}")))
  }

  async fn read(&self, id: &str) -> Result<Idea> {
    let path = self.document_path(id).ok_or_else(|| Error::not_found(id))?;
    let raw = match fs::read_to_string(&path).await {
      Ok(raw) => raw,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(Error::not_found(id)),
      Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&raw)
      .map_err(|e| Error::Storage(format!("corrupt idea document {}: {e}", path.display())))
  }

  async fn write(&self, idea: &Idea) -> Result<()> {
    let path = self.document_path(&idea.id).ok_or_else(|| Error::not_found(&idea.id))?;
    let temp = self.root.join(format!(".{}.{DOCUMENT_EXTENSION}.tmp", idea.id));

    fs::write(&temp, serde_json::to_vec_pretty(idea)?).await?;
    fs::rename(&temp, &path).await?;
    debug!(path = %path.display(), versions = idea.versions.len(), "wrote idea document");
    Ok(())
  }

  async fn document_paths(&self) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(&self.root).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
      let path = entry.path();
      let is_document = path.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION)
        && !entry.file_name().to_string_lossy().starts_with('.');
      if is_document {
        paths.push(path);
      }
    }
    Ok(paths)
  }
}

#[async_trait]
impl IdeaStore for FileIdeaStore {
  async fn create_idea(&self, inputs: IdeaInputs, version: Version) -> Result<Idea> {
    let _guard = self.writes.lock().await;
    let idea = Idea::new(new_idea_id(), inputs, version);
    self.write(&idea).await?;
    Ok(idea)
  }

  async fn get_idea(&self, id: &str) -> Result<Idea> {
    self.read(id).await
  }

  async fn append_version(&self, id: &str, inputs: IdeaInputs, version: Version) -> Result<()> {
    let _guard = self.writes.lock().await;
    let mut idea = self.read(id).await?;
    idea.push_version(inputs, version);
    self.write(&idea).await
  }

  async fn list_ideas(&self) -> Result<Vec<Idea>> {
    let mut ideas = Vec::new();
    for path in self.document_paths().await? {
      let raw = fs::read_to_string(&path).await?;
      let idea: Idea = serde_json::from_str(&raw)
        .map_err(|e| Error::Storage(format!("corrupt idea document {}: {e}", path.display())))?;
      ideas.push(idea);
    }
    ideas.sort_by_key(|idea| idea.created_at);
    Ok(ideas)
  }

  async fn clear(&self) -> Result<usize> {
    let _guard = self.writes.lock().await;
    let paths = self.document_paths().await?;
    for path in &paths {
      fs::remove_file(path).await?;
    }
    Ok(paths.len())
  }
}
