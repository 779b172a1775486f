//! Command implementations for the `leanlab` binary

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use colored::*;
use schemars::schema_for;
use serde::{Deserialize, Serialize};

use crate::analysis::{prompts::export_prompt, Analyzer};
use crate::cli::client::get_client;
use crate::cli::display;
use crate::config::Settings;
use crate::generation::{OllamaClient, TextGenerator};
use crate::model::{Comparison, Idea, IdeaInputs, IdeaPreview, InsightBundle, Version};
use crate::output;
use crate::store::{open_store, IdeaStore};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

/// Analyze inputs with the locally configured analyzer, storing nothing
pub async fn assess(inputs: IdeaInputs, json: bool) -> Result<()> {
  let settings = Settings::from_env()?;
  let analyzer = Analyzer::from_settings(&settings)?;
  let bundle = analyzer.assess(&inputs).await?;

  if json {
    return print_json(&bundle);
  }
  display::display_bundle(&bundle);
  Ok(())
}

pub async fn submit(inputs: IdeaInputs, json: bool) -> Result<()> {
  let idea = get_client()?.submit(&inputs).await?;
  if json {
    return print_json(&idea);
  }
  output::success(&format!("Created idea {}", idea.id));
  display::display_idea(&idea);
  Ok(())
}

pub async fn show(id: &str, json: bool) -> Result<()> {
  let idea = get_client()?.idea(id).await?;
  if json {
    return print_json(&idea);
  }
  display::display_idea(&idea);
  Ok(())
}

pub async fn revise(id: &str, inputs: IdeaInputs, json: bool) -> Result<()> {
  let version = get_client()?.revise(id, &inputs).await?;
  if json {
    return print_json(&version);
  }
  output::success(&format!("Saved revision of {id}"));
  display::display_bundle(&version.insights);
  Ok(())
}

pub async fn versions(id: &str, json: bool) -> Result<()> {
  let versions = get_client()?.versions(id).await?;
  if json {
    return print_json(&versions);
  }
  println!("{} {}", "💡".yellow(), id.bold());
  display::display_versions(&versions);
  Ok(())
}

pub async fn compare(id: &str, json: bool) -> Result<()> {
  let comparison = get_client()?.compare(id).await?;
  if json {
    return print_json(&comparison);
  }
  display::display_comparison(&comparison);
  Ok(())
}

/// Submit every record of a JSON array of inputs, one at a time
pub async fn seed(path: &Path) -> Result<()> {
  let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let records: Vec<IdeaInputs> =
    serde_json::from_str(&raw).with_context(|| format!("{} is not a JSON array of idea inputs", path.display()))?;
  let delay = Settings::from_env()?.seed_delay;
  let client = get_client()?;

  output::info(&format!("Seeding {} ideas to {}", records.len(), client.config().base_url));
  let mut created = 0;
  for (index, inputs) in records.iter().enumerate() {
    if index > 0 {
      tokio::time::sleep(delay).await;
    }
    match client.submit(inputs).await {
      Ok(idea) => {
        created += 1;
        output::info(&format!("[{}/{}] created {}", index + 1, records.len(), idea.id));
      }
      Err(e) => output::error(&format!("[{}/{}] {e}", index + 1, records.len())),
    }
  }

  if created == records.len() {
    output::success(&format!("Seeded {created} ideas"));
  } else {
    output::warn(&format!("Seeded {created} of {} ideas", records.len()));
  }
  Ok(())
}

pub async fn demo(populate: bool, json: bool) -> Result<()> {
  let client = get_client()?;

  if populate {
    let populated = client.demo_populate().await?;
    if json {
      return print_json(&populated);
    }
    output::success(&format!("Populated demo idea {}", populated.id));
    display::display_comparison(&populated.compare);
    return Ok(());
  }

  let previews = client.demo_list().await?;
  if json {
    return print_json(&previews);
  }
  for preview in &previews {
    println!("{} {}", "💡".yellow(), preview.inputs.problem().bold());
    display::display_scores(&preview.insights.scores);
    println!();
  }
  Ok(())
}

pub async fn clear(secret: &str) -> Result<()> {
  let cleared = get_client()?.clear(secret).await?;
  output::success(&format!("Cleared {} ideas", cleared.cleared));
  Ok(())
}

/// Generation output for one exported idea
#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratedExport {
  pub id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub response: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

/// Files written by an export run
#[derive(Debug)]
pub struct ExportReport {
  pub ideas: usize,
  pub ideas_file: PathBuf,
  pub generated_file: Option<PathBuf>,
  pub cleared: Option<usize>,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
  let json = serde_json::to_string_pretty(value)?;
  std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Dump every stored idea to `out_dir`, optionally feed each one to the
/// generation service, and optionally clear the store afterwards.
///
/// The store is only cleared once every file has been written.
pub async fn export_ideas(
  store: &dyn IdeaStore,
  generator: Option<&dyn TextGenerator>,
  out_dir: &Path,
  delete: bool,
  delay: Duration,
) -> Result<ExportReport> {
  std::fs::create_dir_all(out_dir).with_context(|| format!("Failed to create {}", out_dir.display()))?;
  let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3fZ");

  let ideas: Vec<Idea> = store.list_ideas().await?;
  let ideas_file = out_dir.join(format!("exported_ideas_{stamp}.json"));
  write_json(&ideas_file, &ideas)?;

  let generated_file = match generator {
    Some(generator) => {
      let mut generated = Vec::with_capacity(ideas.len());
      for (index, idea) in ideas.iter().enumerate() {
        if index > 0 {
          tokio::time::sleep(delay).await;
        }
        let entry = match generator.generate(&export_prompt(idea)).await {
          Ok(response) => GeneratedExport { id: idea.id.clone(), response, error: None },
          Err(e) => {
            output::warn(&format!("Generation failed for {}: {e}", idea.id));
            GeneratedExport { id: idea.id.clone(), response: None, error: Some(e.to_string()) }
          }
        };
        generated.push(entry);
      }

      let path = out_dir.join(format!("exported_ideas_generated_{stamp}.json"));
      write_json(&path, &generated)?;
      Some(path)
    }
    None => None,
  };

  let cleared = if delete { Some(store.clear().await?) } else { None };

  Ok(ExportReport { ideas: ideas.len(), ideas_file, generated_file, cleared })
}

pub async fn export(out_dir: Option<PathBuf>, feed: bool, delete: bool) -> Result<()> {
  let settings = Settings::from_env()?;
  let store = open_store(&settings)?;
  let client = if feed { Some(OllamaClient::new(settings.generation.clone())?) } else { None };
  let out_dir = out_dir.unwrap_or_else(|| PathBuf::from("."));

  let report = export_ideas(
    store.as_ref(),
    client.as_ref().map(|c| c as &dyn TextGenerator),
    &out_dir,
    delete,
    settings.seed_delay,
  )
  .await?;

  output::success(&format!("Exported {} ideas to {}", report.ideas, report.ideas_file.display()));
  if let Some(path) = &report.generated_file {
    output::success(&format!("Wrote generation results to {}", path.display()));
  }
  if let Some(cleared) = report.cleared {
    output::info(&format!("Deleted {cleared} ideas from the store"));
  }
  Ok(())
}

/// JSON schemas of the stable output shapes
pub fn schema() -> Result<()> {
  let schemas = serde_json::json!({
    "Idea": schema_for!(Idea),
    "Version": schema_for!(Version),
    "InsightBundle": schema_for!(InsightBundle),
    "Comparison": schema_for!(Comparison),
    "IdeaPreview": schema_for!(IdeaPreview),
  });
  print_json(&schemas)
}
