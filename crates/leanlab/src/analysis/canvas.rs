//! Lean canvas drafting

use serde_json::Value;

use crate::analysis::prompts;
use crate::error::{Error, Result};
use crate::generation::{parse_json_response, TextGenerator};
use crate::model::{IdeaInputs, LeanCanvas};

pub const CANVAS_CONTEXT: &str = "lean canvas";

const PLACEHOLDER: &str = "—";
const CHANNELS: &str = "Website, Social, Direct outreach";
const REVENUE_MODEL: &str = "Subscription / One-time / Freemium — choose suitable model";
const COST_STRUCTURE: &str = "Dev, Hosting, Marketing";
const KEY_METRICS: &str = "Activation, Retention, CAC, LTV";

fn or_placeholder(text: &str) -> String {
  if text.is_empty() { PLACEHOLDER.to_string() } else { text.to_string() }
}

/// Generic solution sentence for founders who did not propose one
pub fn suggested_solution(inputs: &IdeaInputs) -> String {
  let audience = match inputs.audience() {
    "" => "target customers",
    audience => audience,
  };
  format!(
    "A product that addresses \"{}\" for {audience} by offering a focused, easy-to-adopt service \
     that reduces the stated pain.",
    inputs.problem().replace('\n', " ")
  )
}

/// Deterministic canvas for `inputs`
pub fn draft(inputs: &IdeaInputs) -> LeanCanvas {
  let suggested = (!inputs.has_solution()).then(|| suggested_solution(inputs));
  let solution = match &suggested {
    Some(suggested) => suggested.clone(),
    None => inputs.solution().to_string(),
  };
  let value_proposition = solution.split('.').next().unwrap_or_default().to_string();

  let advantage = match inputs.alternatives() {
    "" => PLACEHOLDER.to_string(),
    alternatives => format!("Compared to: {alternatives}"),
  };

  LeanCanvas {
    problem: Some(or_placeholder(inputs.problem())),
    solution: Some(solution),
    suggested_solution: suggested,
    unique_value_proposition: Some(value_proposition),
    customer_segments: Some(or_placeholder(inputs.audience())),
    channels: Some(CHANNELS.to_string()),
    revenue_model: Some(REVENUE_MODEL.to_string()),
    cost_structure: Some(COST_STRUCTURE.to_string()),
    key_metrics: Some(KEY_METRICS.to_string()),
    advantage: Some(advantage),
  }
}

/// Read a canvas out of a parsed generation response. Strings are kept,
/// `null` stays absent, anything else is stringified; unknown keys are ignored.
pub fn canvas_from_value(value: &Value) -> Result<LeanCanvas> {
  let object = value.as_object().ok_or_else(|| Error::Parse {
    context: CANVAS_CONTEXT,
    message: "expected a JSON object".to_string(),
  })?;

  let mut canvas = LeanCanvas::default();
  for (key, raw) in object {
    let Some(slot) = canvas.slot_mut(key) else { continue };
    *slot = match raw {
      Value::Null => None,
      Value::String(text) => Some(text.clone()),
      other => Some(other.to_string()),
    };
  }
  Ok(canvas)
}

/// Generation-backed canvas, critiquing a supplied solution or proposing one.
pub async fn draft_with(generator: &dyn TextGenerator, inputs: &IdeaInputs) -> Result<LeanCanvas> {
  let text = generator.generate(&prompts::canvas_prompt(inputs)).await?;
  let value = parse_json_response(text.as_deref(), CANVAS_CONTEXT)?;
  canvas_from_value(&value)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn missing_solution_gets_a_suggestion() {
    let inputs = IdeaInputs {
      problem: Some("Users face a real pain and challenge daily".into()),
      solution: Some(String::new()),
      audience: Some("freelancers".into()),
      alternatives: Some(String::new()),
      technology: Some(String::new()),
    };
    let canvas = draft(&inputs);

    let suggested = canvas.suggested_solution.clone().unwrap();
    assert!(!suggested.is_empty());
    assert!(suggested.contains("\"Users face a real pain and challenge daily\" for freelancers"));
    assert_eq!(canvas.solution.as_deref(), Some(suggested.as_str()));

    let until_period = suggested.split('.').next().unwrap();
    assert_eq!(canvas.unique_value_proposition.as_deref(), Some(until_period));
    assert!(!until_period.ends_with('.'));
    assert_eq!(canvas.advantage.as_deref(), Some(PLACEHOLDER));
  }

  #[test]
  fn supplied_solution_is_kept() {
    let inputs = IdeaInputs {
      problem: Some("Inventory drifts".into()),
      solution: Some("Sync stock nightly. Alert on drift.".into()),
      alternatives: Some("excel".into()),
      ..Default::default()
    };
    let canvas = draft(&inputs);

    assert_eq!(canvas.suggested_solution, None);
    assert_eq!(canvas.solution.as_deref(), Some("Sync stock nightly. Alert on drift."));
    assert_eq!(canvas.unique_value_proposition.as_deref(), Some("Sync stock nightly"));
    assert_eq!(canvas.advantage.as_deref(), Some("Compared to: excel"));
    assert_eq!(canvas.customer_segments.as_deref(), Some(PLACEHOLDER));
  }

  #[test]
  fn suggestion_defaults_audience_and_flattens_newlines() {
    let inputs = IdeaInputs { problem: Some("line one\nline two".into()), ..Default::default() };
    let suggested = suggested_solution(&inputs);
    assert!(suggested.contains("\"line one line two\" for target customers"));
  }

  #[test]
  fn drafting_is_idempotent() {
    let inputs = IdeaInputs { problem: Some("Teams lose context".into()), ..Default::default() };
    let first = serde_json::to_string(&draft(&inputs)).unwrap();
    let second = serde_json::to_string(&draft(&inputs)).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn generated_canvas_values_are_normalized() {
    let value = json!({
      "Problem": "p",
      "SuggestedSolution": null,
      "KeyMetrics": ["activation", "retention"],
      "Unrelated": "ignored"
    });
    let canvas = canvas_from_value(&value).unwrap();
    assert_eq!(canvas.problem.as_deref(), Some("p"));
    assert_eq!(canvas.suggested_solution, None);
    assert_eq!(canvas.key_metrics.as_deref(), Some("[\"activation\",\"retention\"]"));
    assert_eq!(canvas.solution, None);
  }
}
