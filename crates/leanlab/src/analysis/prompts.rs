//! Prompt text sent to the generation service

use crate::model::{Idea, IdeaInputs, LeanCanvas, Metric, MetricDeltas};

fn inputs_json(inputs: &IdeaInputs) -> String {
  serde_json::to_string(inputs).unwrap_or_default()
}

pub fn scores_prompt(inputs: &IdeaInputs) -> String {
  let keys = Metric::ALL.map(Metric::key).join(", ");
  format!(
    "You are an assistant that produces a numerical assessment (0-100) for a startup idea.\n\
     Input JSON: {}\n\n\
     Respond with valid JSON object with keys: {keys} (values 0-100). Output only JSON.",
    inputs_json(inputs)
  )
}

pub fn canvas_prompt(inputs: &IdeaInputs) -> String {
  let keys = LeanCanvas::KEYS.join(", ");
  let instruction = if inputs.has_solution() {
    "The founder supplied a solution. Restate it neutrally in Solution, then critique it honestly \
     in SuggestedSolution: name its weakest assumptions and propose concrete improvements."
  } else {
    "The founder did not supply a solution. Propose one in SuggestedSolution and repeat it in \
     Solution."
  };

  format!(
    "You are an assistant that drafts a lean canvas for a startup idea.\n\
     Input JSON: {}\n\n\
     {instruction}\n\n\
     Respond with valid JSON object representing a lean canvas with exactly these keys: {keys}. \
     Every value must be a string. Output only JSON.",
    inputs_json(inputs)
  )
}

pub fn explain_prompt(deltas: &MetricDeltas, first: &IdeaInputs, latest: &IdeaInputs) -> String {
  let deltas = serde_json::to_string(deltas).unwrap_or_default();
  format!(
    "You are a startup mentor comparing two revisions of the same idea.\n\
     First revision inputs: {}\n\
     Latest revision inputs: {}\n\
     Metric deltas (0-100 scale, delta = to - from): {deltas}\n\n\
     Explain in plain prose, in at most 200 words, what changed between the revisions, why the \
     metrics likely moved, and the single most useful next step for the founder.",
    inputs_json(first),
    inputs_json(latest)
  )
}

/// Prompt used when exported ideas are fed to the generation service
pub fn export_prompt(idea: &Idea) -> String {
  let idea = serde_json::to_string_pretty(idea).unwrap_or_default();
  format!(
    "Analyze this idea and produce a short summary and suggested lean-canvas JSON.\n\nIDEA:\n{idea}"
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scores_prompt_lists_every_metric_key() {
    let prompt = scores_prompt(&IdeaInputs::default());
    for metric in Metric::ALL {
      assert!(prompt.contains(metric.key()));
    }
  }

  #[test]
  fn canvas_prompt_switches_on_solution() {
    let with_solution = IdeaInputs { solution: Some("An app".into()), ..Default::default() };
    assert!(canvas_prompt(&with_solution).contains("critique it honestly"));

    let blank = IdeaInputs { solution: Some("   ".into()), ..Default::default() };
    assert!(canvas_prompt(&blank).contains("Propose one in SuggestedSolution"));
  }
}
