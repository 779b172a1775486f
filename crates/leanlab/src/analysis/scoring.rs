//! Insight scoring
//!
//! Deterministic scoring takes, per metric, the larger of a keyword-presence
//! score and a length-proximity score. Generation-backed scoring asks the
//! service for the six values and maps whatever key spellings come back onto
//! the canonical keys.
//!
//! The market keyword is the whole word `alternative`; earlier deployments
//! matched the truncated `alternativ`, which never equals a real token, so
//! market scores from those deployments can be lower for the same text.

use std::collections::HashSet;

use serde_json::Value;

use crate::analysis::prompts;
use crate::error::{Error, Result};
use crate::generation::{parse_json_response, TextGenerator};
use crate::model::{normalize, score_from_value, IdeaInputs, InsightScores, Metric};

pub const SCORES_CONTEXT: &str = "insight scores";

const PROBLEM_KEYWORDS: &[&str] = &["problem", "need", "pain", "issue", "challenge"];
const MARKET_KEYWORDS: &[&str] = &["competitor", "alternative", "incumbent", "existing"];
const DIFFERENTIATION_KEYWORDS: &[&str] = &["unique", "different", "novel", "patent", "proprietary"];
const TECHNOLOGY_KEYWORDS: &[&str] =
  &["prototype", "api", "openai", "ml", "ai", "framework", "node", "react"];

const PROBLEM_IDEAL_LEN: usize = 80;
const MARKET_IDEAL_LEN: usize = 40;
const DIFFERENTIATION_IDEAL_LEN: usize = 60;
const TECHNOLOGY_IDEAL_LEN: usize = 40;

/// Accepted spellings per canonical key, resolved first-match.
const KEY_ALIASES: [(Metric, &[&str]); 6] = [
  (Metric::ProblemValidation, &["problemValidationScore", "problemValidation"]),
  (Metric::MarketMaturity, &["marketMaturity"]),
  (Metric::CompetitionDensity, &["competitionDensity", "competition"]),
  (Metric::DifferentiationPotential, &["differentiationPotential", "differentiation"]),
  (Metric::TechnicalFeasibility, &["technicalFeasibility", "techFeasibility"]),
  (Metric::RiskAndUncertainty, &["riskAndUncertainty", "risk"]),
];

fn tokens(text: &str) -> HashSet<String> {
  text
    .to_lowercase()
    .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
    .filter(|token| !token.is_empty())
    .map(str::to_string)
    .collect()
}

/// Share of `keywords` present in `text`, scaled to 0-100
pub fn keyword_presence(text: &str, keywords: &[&str]) -> i64 {
  let tokens = tokens(text);
  let hits = keywords.iter().filter(|k| tokens.contains(**k)).count();
  normalize(hits as f64 / keywords.len().max(1) as f64 * 100.0)
}

/// 100 minus the distance between the text length and `ideal`, floored at 0
pub fn length_proximity(text: &str, ideal: usize) -> i64 {
  let len = text.chars().count();
  normalize(100.0 - len.abs_diff(ideal) as f64)
}

fn field_score(text: &str, keywords: &[&str], ideal: usize) -> i64 {
  keyword_presence(text, keywords).max(length_proximity(text, ideal))
}

/// Deterministic scores for `inputs`. Pure: identical inputs give identical output.
pub fn score(inputs: &IdeaInputs) -> InsightScores {
  let problem_clarity = field_score(inputs.problem(), PROBLEM_KEYWORDS, PROBLEM_IDEAL_LEN);
  let market_maturity = field_score(inputs.alternatives(), MARKET_KEYWORDS, MARKET_IDEAL_LEN);
  let differentiation =
    field_score(inputs.solution(), DIFFERENTIATION_KEYWORDS, DIFFERENTIATION_IDEAL_LEN);
  let technical = field_score(inputs.technology(), TECHNOLOGY_KEYWORDS, TECHNOLOGY_IDEAL_LEN);

  let competition_density = normalize(100.0 - market_maturity as f64);
  let mean = (problem_clarity + technical + differentiation) as f64 / 3.0;
  let risk = normalize(100.0 - mean);

  InsightScores {
    problem_validation_score: normalize(problem_clarity as f64),
    market_maturity: normalize(market_maturity as f64),
    competition_density,
    differentiation_potential: normalize(differentiation as f64),
    technical_feasibility: normalize(technical as f64),
    risk_and_uncertainty: risk,
  }
}

/// Map a parsed generation response onto the canonical scores
pub fn scores_from_value(value: &Value) -> Result<InsightScores> {
  let object = value.as_object().ok_or_else(|| Error::Parse {
    context: SCORES_CONTEXT,
    message: "expected a JSON object".to_string(),
  })?;

  let mut scores = InsightScores::default();
  for (metric, aliases) in KEY_ALIASES {
    let raw = aliases.iter().filter_map(|alias| object.get(*alias)).find_map(score_from_value);
    scores.set(metric, raw.map(normalize).unwrap_or(0));
  }
  Ok(scores)
}

/// Generation-backed scores. Failures are returned as-is; the caller applies
/// the failure policy.
pub async fn score_with(generator: &dyn TextGenerator, inputs: &IdeaInputs) -> Result<InsightScores> {
  let text = generator.generate(&prompts::scores_prompt(inputs)).await?;
  let value = parse_json_response(text.as_deref(), SCORES_CONTEXT)?;
  scores_from_value(&value)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn inputs(problem: &str, solution: &str, audience: &str, alternatives: &str, technology: &str) -> IdeaInputs {
    IdeaInputs {
      problem: Some(problem.into()),
      solution: Some(solution.into()),
      audience: Some(audience.into()),
      alternatives: Some(alternatives.into()),
      technology: Some(technology.into()),
    }
  }

  fn assert_bounded(scores: &InsightScores) {
    for metric in Metric::ALL {
      let value = scores.get(metric);
      assert!((0..=100).contains(&value), "{} out of range: {value}", metric.key());
    }
  }

  #[test]
  fn keyword_presence_counts_whole_tokens() {
    assert_eq!(keyword_presence("A real PAIN, a real need!", PROBLEM_KEYWORDS), 40);
    assert_eq!(keyword_presence("painful needs", PROBLEM_KEYWORDS), 0);
    assert_eq!(keyword_presence("", &[]), 0);
  }

  #[test]
  fn length_proximity_peaks_at_ideal() {
    assert_eq!(length_proximity(&"x".repeat(40), 40), 100);
    assert_eq!(length_proximity(&"x".repeat(50), 40), 90);
    assert_eq!(length_proximity("", 40), 60);
    assert_eq!(length_proximity(&"x".repeat(400), 40), 0);
  }

  #[test]
  fn empty_inputs_score_from_length_alone() {
    let scores = score(&IdeaInputs::default());
    assert_eq!(scores.problem_validation_score, 20);
    assert_eq!(scores.market_maturity, 60);
    assert_eq!(scores.competition_density, 40);
    assert_eq!(scores.differentiation_potential, 40);
    assert_eq!(scores.technical_feasibility, 60);
    // 100 - (20 + 60 + 40) / 3
    assert_eq!(scores.risk_and_uncertainty, 60);
  }

  #[test]
  fn competition_is_complement_of_maturity() {
    let samples = [
      IdeaInputs::default(),
      inputs("p", "s", "a", "existing competitor and incumbent alternative", "node"),
      inputs(&"long ".repeat(100), "", "", "excel, pos systems", "webapp, integrations"),
    ];
    for sample in &samples {
      let scores = score(sample);
      assert_eq!(scores.competition_density, 100 - scores.market_maturity);
      assert_bounded(&scores);
    }
  }

  #[test]
  fn scores_stay_bounded_at_the_extremes() {
    let every_keyword = [
      PROBLEM_KEYWORDS,
      MARKET_KEYWORDS,
      DIFFERENTIATION_KEYWORDS,
      TECHNOLOGY_KEYWORDS,
    ]
    .map(|keywords| keywords.join(" "));
    let long = "problem ".repeat(5_000);
    let unicode = "Ünïcödé 问题 проблема 🚀 ".repeat(40);

    let samples = [
      inputs(&every_keyword[0], &every_keyword[2], "", &every_keyword[1], &every_keyword[3]),
      inputs(&long, &long, &long, &long, &long),
      inputs(&unicode, &unicode, &unicode, &unicode, &unicode),
      inputs("\n\t ", "...", "", "!!!", "__"),
    ];
    for sample in &samples {
      let scores = score(sample);
      assert_bounded(&scores);
      assert_eq!(scores.competition_density, 100 - scores.market_maturity);
    }

    let all = score(&samples[0]);
    assert_eq!(all.problem_validation_score, 100);
    assert_eq!(all.market_maturity, 100);
    assert_eq!(all.differentiation_potential, 100);
    assert_eq!(all.technical_feasibility, 100);
    assert_eq!(all.risk_and_uncertainty, 0);
  }

  #[test]
  fn scoring_is_idempotent() {
    let sample = inputs(
      "Users face a real pain and challenge daily",
      "A unique tool",
      "freelancers",
      "lawyers",
      "react, api",
    );
    assert_eq!(score(&sample), score(&sample));
  }

  #[test]
  fn aliases_resolve_first_match() {
    let value = json!({
      "problemValidation": 55.6,
      "marketMaturity": "70",
      "competition": 150,
      "differentiation": -3,
      "techFeasibility": null,
      "riskAndUncertainty": 20,
      "risk": 99
    });
    let scores = scores_from_value(&value).unwrap();
    assert_eq!(scores.problem_validation_score, 56);
    assert_eq!(scores.market_maturity, 70);
    assert_eq!(scores.competition_density, 100);
    assert_eq!(scores.differentiation_potential, 0);
    assert_eq!(scores.technical_feasibility, 0);
    assert_eq!(scores.risk_and_uncertainty, 20);
  }

  #[test]
  fn non_object_response_is_a_parse_error() {
    let err = scores_from_value(&json!([1, 2, 3])).unwrap_err();
    assert!(matches!(err, Error::Parse { context: SCORES_CONTEXT, .. }));
  }
}
