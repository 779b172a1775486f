//! Version comparison: per-metric deltas and their explanation

use crate::analysis::prompts;
use crate::error::{Error, Result};
use crate::generation::TextGenerator;
use crate::model::{DeltaEntry, IdeaInputs, InsightScores, Metric, MetricDeltas};

pub const EXPLANATION_CONTEXT: &str = "delta explanation";

/// Returned by the templated explanation when nothing moved
pub const NO_CHANGES: &str = "No measurable changes between revisions.";

/// Signed change of every metric from `first` to `latest`
pub fn compute_deltas(first: &InsightScores, latest: &InsightScores) -> MetricDeltas {
  let mut deltas = MetricDeltas::default();
  for metric in Metric::ALL {
    deltas.set(metric, DeltaEntry::between(first.get(metric), latest.get(metric)));
  }
  deltas
}

/// Metric with the largest absolute change; earlier canonical keys win ties.
pub fn largest_change(deltas: &MetricDeltas) -> Option<(Metric, DeltaEntry)> {
  deltas.iter().fold(None, |best, (metric, entry)| match best {
    Some((_, top)) if entry.delta.abs() <= top.delta.abs() => best,
    _ => Some((metric, entry)),
  })
}

fn change_sentence(metric: Metric, entry: DeltaEntry) -> String {
  let direction = if entry.delta > 0 { "improved" } else { "decreased" };
  format!(
    "{} {direction} by {} points (from {} to {}).",
    metric.label(),
    entry.delta.abs(),
    entry.from,
    entry.to
  )
}

fn recommendation(metric: Metric, entry: DeltaEntry) -> String {
  if entry.delta > 0 {
    format!(
      "Good progress on {}. Consider doubling down on what caused this improvement.",
      metric.label()
    )
  } else {
    format!(
      "Attention: {} saw the largest drop. Re-check the proposed changes for clarity or feasibility.",
      metric.label()
    )
  }
}

/// Templated explanation: one sentence per moved metric in canonical order,
/// then a recommendation about the largest move.
pub fn explain(deltas: &MetricDeltas) -> String {
  let lines: Vec<String> = deltas
    .iter()
    .filter(|(_, entry)| entry.delta != 0)
    .map(|(metric, entry)| change_sentence(metric, entry))
    .collect();

  match largest_change(deltas) {
    Some((metric, top)) if !lines.is_empty() => {
      format!("{} {}", lines.join(" "), recommendation(metric, top))
    }
    _ => NO_CHANGES.to_string(),
  }
}

/// Generated explanation, returned trimmed and otherwise verbatim.
pub async fn explain_with(
  generator: &dyn TextGenerator,
  deltas: &MetricDeltas,
  first: &IdeaInputs,
  latest: &IdeaInputs,
) -> Result<String> {
  let text = generator.generate(&prompts::explain_prompt(deltas, first, latest)).await?;
  text
    .map(|t| t.trim().to_string())
    .filter(|t| !t.is_empty())
    .ok_or(Error::EmptyResponse { context: EXPLANATION_CONTEXT })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scores(values: [i64; 6]) -> InsightScores {
    let mut scores = InsightScores::default();
    for (metric, value) in Metric::ALL.into_iter().zip(values) {
      scores.set(metric, value);
    }
    scores
  }

  #[test]
  fn deltas_are_latest_minus_first() {
    let first = scores([50, 50, 10, 0, 0, 100]);
    let latest = scores([75, 25, 10, 5, 0, 60]);
    let deltas = compute_deltas(&first, &latest);

    assert_eq!(deltas.problem_validation_score, DeltaEntry { from: 50, to: 75, delta: 25 });
    assert_eq!(deltas.market_maturity, DeltaEntry { from: 50, to: 25, delta: -25 });
    assert_eq!(deltas.competition_density.delta, 0);
    assert_eq!(deltas.risk_and_uncertainty.delta, -40);
    for (metric, entry) in deltas.iter() {
      assert_eq!(entry.delta, latest.get(metric) - first.get(metric));
    }
  }

  #[test]
  fn unchanged_versions_say_so() {
    let same = scores([10, 20, 30, 40, 50, 60]);
    assert_eq!(explain(&compute_deltas(&same, &same)), NO_CHANGES);
  }

  #[test]
  fn sentences_follow_canonical_order() {
    let deltas = compute_deltas(&scores([40, 50, 50, 0, 0, 0]), &scores([70, 45, 55, 0, 0, 0]));
    let text = explain(&deltas);

    assert!(text.starts_with(
      "Problem validation improved by 30 points (from 40 to 70). \
       Market maturity decreased by 5 points (from 50 to 45). \
       Competition density improved by 5 points (from 50 to 55)."
    ));
    assert!(text.ends_with(
      "Good progress on Problem validation. Consider doubling down on what caused this improvement."
    ));
  }

  #[test]
  fn largest_drop_produces_a_warning() {
    let deltas = compute_deltas(&scores([0, 0, 0, 0, 80, 0]), &scores([5, 0, 0, 0, 20, 0]));
    assert!(explain(&deltas).ends_with(
      "Attention: Technical feasibility saw the largest drop. Re-check the proposed changes for clarity or feasibility."
    ));
  }

  #[test]
  fn ties_resolve_to_first_canonical_metric() {
    let deltas = compute_deltas(&scores([0, 30, 0, 0, 0, 0]), &scores([0, 0, 30, 0, 0, 0]));
    let (metric, entry) = largest_change(&deltas).unwrap();
    assert_eq!(metric, Metric::MarketMaturity);
    assert_eq!(entry.delta, -30);
    assert!(explain(&deltas).contains("Attention: Market maturity saw the largest drop."));
  }
}
