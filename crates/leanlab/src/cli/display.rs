//! Display formatting utilities for CLI output

use colored::*;

use crate::model::{Comparison, DeltaEntry, Idea, InsightBundle, InsightScores, LeanCanvas, Metric, Version};

const WRAP_WIDTH: usize = 76;

/// Wrap text to fit within a specified width
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();

  for paragraph in text.split('\n') {
    if paragraph.trim().is_empty() {
      lines.push(String::new());
      continue;
    }

    let mut current_line = String::new();
    for word in paragraph.split_whitespace() {
      if current_line.is_empty() {
        current_line = word.to_string();
      } else if current_line.len() + 1 + word.len() <= width {
        current_line.push(' ');
        current_line.push_str(word);
      } else {
        lines.push(std::mem::take(&mut current_line));
        current_line = word.to_string();
      }
    }

    if !current_line.is_empty() {
      lines.push(current_line);
    }
  }

  lines
}

/// Ten-cell bar for a 0-100 score
pub fn score_bar(value: i64) -> String {
  let filled = (value.clamp(0, 100) as usize + 5) / 10;
  format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

fn colored_score(value: i64) -> ColoredString {
  let text = format!("{value:>3}");
  match value {
    70.. => text.green(),
    40..=69 => text.yellow(),
    _ => text.red(),
  }
}

fn colored_delta(entry: DeltaEntry) -> ColoredString {
  let text = format!("{:+}", entry.delta);
  match entry.delta {
    d if d > 0 => text.green().bold(),
    d if d < 0 => text.red().bold(),
    _ => text.dimmed(),
  }
}

pub fn display_scores(scores: &InsightScores) {
  println!("{}", "Insight scores".blue().bold());
  for metric in Metric::ALL {
    let value = scores.get(metric);
    println!("  {:<24} {} {}", metric.label(), colored_score(value), score_bar(value).dimmed());
  }
}

pub fn display_canvas(canvas: &LeanCanvas) {
  println!("{}", "Lean canvas".blue().bold());
  for (key, value) in canvas.entries() {
    println!("  {}", key.cyan().bold());
    for line in wrap_text(value.unwrap_or("—"), WRAP_WIDTH - 4) {
      println!("    {line}");
    }
  }
}

pub fn display_bundle(bundle: &InsightBundle) {
  display_scores(&bundle.scores);
  println!();
  display_canvas(&bundle.lean_canvas);
  if let Some(warning) = &bundle.llm_warning {
    println!();
    println!("{} {}", "⚠".yellow(), warning.yellow());
  }
}

pub fn display_idea(idea: &Idea) {
  println!("{} {}", "💡".yellow(), idea.id.bold());
  println!(
    "  {} versions, created {}, updated {}",
    idea.versions.len(),
    idea.created_at.format("%Y-%m-%d %H:%M"),
    idea.updated_at.format("%Y-%m-%d %H:%M")
  );
  if let Some(latest) = idea.latest() {
    println!();
    display_bundle(&latest.insights);
  }
}

/// One line per version with its scores in canonical order
pub fn display_versions(versions: &[Version]) {
  if versions.is_empty() {
    println!("No versions found.");
    return;
  }

  for (index, version) in versions.iter().enumerate() {
    let scores =
      Metric::ALL.iter().map(|m| version.insights.scores.get(*m).to_string()).collect::<Vec<_>>().join(" / ");
    println!(
      "  {} {} {}",
      format!("v{}", index + 1).cyan().bold(),
      version.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
      scores
    );
  }
}

pub fn display_comparison(comparison: &Comparison) {
  println!("{}", "Changes since the first version".blue().bold());
  for (metric, entry) in comparison.deltas.iter() {
    println!("  {:<24} {:>3} → {:>3}  {}", metric.label(), entry.from, entry.to, colored_delta(entry));
  }
  println!();
  for line in wrap_text(&comparison.explanation, WRAP_WIDTH) {
    println!("{line}");
  }
  if let Some(warning) = &comparison.llm_warning {
    println!();
    println!("{} {}", "⚠".yellow(), warning.yellow());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wrap_text_respects_width_and_paragraphs() {
    let lines = wrap_text("one two three four\n\nfive", 9);
    assert_eq!(lines, vec!["one two", "three", "four", "", "five"]);
  }

  #[test]
  fn score_bar_rounds_to_tenths() {
    assert_eq!(score_bar(0), "░░░░░░░░░░");
    assert_eq!(score_bar(45), "█████░░░░░");
    assert_eq!(score_bar(100), "██████████");
  }
}
