//! Idea analysis: scoring, canvas drafting and revision comparison
//!
//! [`Analyzer`] is constructed once with an explicit backend and failure
//! policy. Every generation-backed step goes through the same policy:
//! strict deployments propagate generation failures, lenient ones fall back to
//! the deterministic computation and carry the failure message as a warning.

pub mod canvas;
pub mod delta;
pub mod prompts;
pub mod scoring;

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::config::{FailurePolicy, Provider, Settings};
use crate::error::Result;
use crate::generation::{OllamaClient, TextGenerator};
use crate::model::{Comparison, Explanation, IdeaInputs, InsightBundle, InsightScores, LeanCanvas, MetricDeltas, Version};

/// A value plus the warning recorded when it came from a fallback
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
  pub value: T,
  pub warning: Option<String>,
}

impl<T> Outcome<T> {
  fn clean(value: T) -> Self {
    Self { value, warning: None }
  }
}

#[derive(Clone)]
enum Backend {
  Local,
  Generation(Arc<dyn TextGenerator>),
}

impl fmt::Debug for Backend {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Backend::Local => f.write_str("Local"),
      Backend::Generation(_) => f.write_str("Generation"),
    }
  }
}

/// Scores, drafts and explains ideas with one backend and one failure policy.
#[derive(Debug, Clone)]
pub struct Analyzer {
  backend: Backend,
  policy: FailurePolicy,
}

impl Analyzer {
  /// Deterministic analyzer; never fails
  pub fn local() -> Self {
    Self { backend: Backend::Local, policy: FailurePolicy::Strict }
  }

  /// Generation-backed analyzer over any [`TextGenerator`]
  pub fn generation(generator: Arc<dyn TextGenerator>, policy: FailurePolicy) -> Self {
    Self { backend: Backend::Generation(generator), policy }
  }

  /// Build the analyzer the settings ask for
  pub fn from_settings(settings: &Settings) -> Result<Self> {
    match settings.provider {
      Provider::Local => Ok(Self::local()),
      Provider::Generation => {
        let client = OllamaClient::new(settings.generation.clone())?;
        Ok(Self::generation(Arc::new(client), settings.failure_policy))
      }
    }
  }

  pub fn provider(&self) -> Provider {
    match self.backend {
      Backend::Local => Provider::Local,
      Backend::Generation(_) => Provider::Generation,
    }
  }

  pub fn policy(&self) -> FailurePolicy {
    self.policy
  }

  /// Apply the failure policy to a generation attempt
  fn settle<T>(&self, step: &str, attempt: Result<T>, fallback: impl FnOnce() -> T) -> Result<Outcome<T>> {
    match attempt {
      Ok(value) => Ok(Outcome::clean(value)),
      Err(err) if self.policy == FailurePolicy::Lenient && err.is_generation_failure() => {
        warn!(error = %err, "LLM {step} failed, falling back to heuristics");
        Ok(Outcome { value: fallback(), warning: Some(format!("LLM {step} failed: {err}")) })
      }
      Err(err) => Err(err),
    }
  }

  pub async fn score(&self, inputs: &IdeaInputs) -> Result<Outcome<InsightScores>> {
    match &self.backend {
      Backend::Local => Ok(Outcome::clean(scoring::score(inputs))),
      Backend::Generation(generator) => {
        let attempt = scoring::score_with(generator.as_ref(), inputs).await;
        self.settle("scoring", attempt, || scoring::score(inputs))
      }
    }
  }

  pub async fn draft(&self, inputs: &IdeaInputs) -> Result<Outcome<LeanCanvas>> {
    match &self.backend {
      Backend::Local => Ok(Outcome::clean(canvas::draft(inputs))),
      Backend::Generation(generator) => {
        let attempt = canvas::draft_with(generator.as_ref(), inputs).await;
        self.settle("lean canvas", attempt, || canvas::draft(inputs))
      }
    }
  }

  /// Scores and canvas for one submission
  pub async fn assess(&self, inputs: &IdeaInputs) -> Result<InsightBundle> {
    let scores = self.score(inputs).await?;
    let canvas = self.draft(inputs).await?;

    let warnings: Vec<String> = [scores.warning, canvas.warning].into_iter().flatten().collect();
    let llm_warning = (!warnings.is_empty()).then(|| warnings.join("; "));

    Ok(InsightBundle { scores: scores.value, lean_canvas: canvas.value, llm_warning })
  }

  pub async fn explain(
    &self,
    deltas: &MetricDeltas,
    first: &IdeaInputs,
    latest: &IdeaInputs,
  ) -> Result<Explanation> {
    let outcome = match &self.backend {
      Backend::Local => Outcome::clean(delta::explain(deltas)),
      Backend::Generation(generator) => {
        let attempt = delta::explain_with(generator.as_ref(), deltas, first, latest).await;
        self.settle("explanation", attempt, || delta::explain(deltas))?
      }
    };
    Ok(Explanation { text: outcome.value, warning: outcome.warning })
  }

  /// Compare two versions of the same idea
  pub async fn compare(&self, first: &Version, latest: &Version) -> Result<Comparison> {
    let deltas = delta::compute_deltas(&first.insights.scores, &latest.insights.scores);
    let explanation = self.explain(&deltas, &first.inputs, &latest.inputs).await?;

    Ok(Comparison {
      deltas,
      explanation: explanation.text,
      first: first.insights.clone(),
      latest: latest.insights.clone(),
      llm_warning: explanation.warning,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;
  use crate::generation::MockTextGenerator;

  fn sample() -> IdeaInputs {
    IdeaInputs {
      problem: Some("Small retailers struggle to manage inventory across channels".into()),
      solution: Some("Unified stock sync".into()),
      audience: Some("small retailers".into()),
      alternatives: Some("excel, pos systems".into()),
      technology: Some("webapp, integrations".into()),
    }
  }

  fn analyzer_with(mock: MockTextGenerator, policy: FailurePolicy) -> Analyzer {
    Analyzer::generation(Arc::new(mock), policy)
  }

  #[tokio::test]
  async fn local_assessment_matches_pure_functions() {
    let inputs = sample();
    let bundle = Analyzer::local().assess(&inputs).await.unwrap();

    assert_eq!(bundle.scores, scoring::score(&inputs));
    assert_eq!(bundle.lean_canvas, canvas::draft(&inputs));
    assert_eq!(bundle.llm_warning, None);
  }

  #[tokio::test]
  async fn generated_scores_are_mapped_and_clamped() {
    let mut mock = MockTextGenerator::new();
    mock
      .expect_generate()
      .withf(|prompt| prompt.contains("numerical assessment"))
      .times(1)
      .returning(|_| {
        Ok(Some(
          "```json\n{\"problemValidationScore\": 150, \"marketMaturity\": -10, \"competition\": 50, \
           \"differentiationPotential\": 75, \"technicalFeasibility\": 0, \"risk\": 101}\n```"
            .to_string(),
        ))
      });

    let outcome = analyzer_with(mock, FailurePolicy::Strict).score(&sample()).await.unwrap();
    let scores = outcome.value;
    assert_eq!(scores.problem_validation_score, 100);
    assert_eq!(scores.market_maturity, 0);
    assert_eq!(scores.competition_density, 50);
    assert_eq!(scores.differentiation_potential, 75);
    assert_eq!(scores.technical_feasibility, 0);
    assert_eq!(scores.risk_and_uncertainty, 100);
    assert_eq!(outcome.warning, None);
  }

  #[tokio::test]
  async fn strict_policy_reports_empty_scores_response() {
    let mut mock = MockTextGenerator::new();
    mock.expect_generate().returning(|_| Ok(Some(String::new())));

    let err = analyzer_with(mock, FailurePolicy::Strict).score(&sample()).await.unwrap_err();
    assert!(matches!(err, Error::EmptyResponse { context: "insight scores" }));
  }

  #[tokio::test]
  async fn strict_policy_reports_empty_canvas_response() {
    let mut mock = MockTextGenerator::new();
    mock.expect_generate().returning(|_| Ok(None));

    let err = analyzer_with(mock, FailurePolicy::Strict).draft(&sample()).await.unwrap_err();
    assert!(matches!(err, Error::EmptyResponse { context: "lean canvas" }));
    assert!(err.to_string().contains("lean canvas"));
  }

  #[tokio::test]
  async fn strict_policy_propagates_parse_errors() {
    let mut mock = MockTextGenerator::new();
    mock.expect_generate().returning(|_| Ok(Some("this is not json".to_string())));

    let err = analyzer_with(mock, FailurePolicy::Strict).score(&sample()).await.unwrap_err();
    assert!(err.to_string().contains("unable to parse generation response for insight scores"));
  }

  #[tokio::test]
  async fn lenient_policy_falls_back_with_warnings() {
    let mut mock = MockTextGenerator::new();
    mock
      .expect_generate()
      .times(2)
      .returning(|_| Err(Error::Transport { status: 500, body: "model crashed".into() }));

    let inputs = sample();
    let bundle = analyzer_with(mock, FailurePolicy::Lenient).assess(&inputs).await.unwrap();

    assert_eq!(bundle.scores, scoring::score(&inputs));
    assert_eq!(bundle.lean_canvas, canvas::draft(&inputs));
    assert_eq!(
      bundle.llm_warning.as_deref(),
      Some(
        "LLM scoring failed: generation request failed (500): model crashed; \
         LLM lean canvas failed: generation request failed (500): model crashed"
      )
    );
  }

  #[tokio::test]
  async fn critique_prompt_is_used_when_solution_given() {
    let mut mock = MockTextGenerator::new();
    mock
      .expect_generate()
      .withf(|prompt| prompt.contains("critique it honestly"))
      .times(1)
      .returning(|_| Ok(Some(r#"{"Solution": "Unified stock sync", "SuggestedSolution": "Narrow the scope"}"#.into())));

    let outcome = analyzer_with(mock, FailurePolicy::Strict).draft(&sample()).await.unwrap();
    assert_eq!(outcome.value.suggested_solution.as_deref(), Some("Narrow the scope"));
  }

  #[tokio::test]
  async fn generated_explanation_is_trimmed() {
    let mut mock = MockTextGenerator::new();
    mock.expect_generate().returning(|_| Ok(Some("  This is an explanation.\n".into())));

    let explanation = analyzer_with(mock, FailurePolicy::Strict)
      .explain(&MetricDeltas::default(), &IdeaInputs::default(), &IdeaInputs::default())
      .await
      .unwrap();
    assert_eq!(explanation.text, "This is an explanation.");
    assert_eq!(explanation.warning, None);
  }

  #[tokio::test]
  async fn lenient_explanation_falls_back_to_template() {
    let mut mock = MockTextGenerator::new();
    mock.expect_generate().returning(|_| Ok(Some("   ".into())));

    let explanation = analyzer_with(mock, FailurePolicy::Lenient)
      .explain(&MetricDeltas::default(), &IdeaInputs::default(), &IdeaInputs::default())
      .await
      .unwrap();
    assert_eq!(explanation.text, delta::NO_CHANGES);
    assert!(explanation.warning.unwrap().starts_with("LLM explanation failed:"));
  }

  #[tokio::test]
  async fn lenient_policy_does_not_swallow_other_errors() {
    let mut mock = MockTextGenerator::new();
    mock.expect_generate().returning(|_| Err(Error::Storage("disk full".into())));

    let err = analyzer_with(mock, FailurePolicy::Lenient).score(&sample()).await.unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
  }

  #[test]
  fn settings_select_the_backend() {
    let settings = Settings { provider: Provider::Generation, ..Default::default() };
    let analyzer = Analyzer::from_settings(&settings).unwrap();
    assert_eq!(analyzer.provider(), Provider::Generation);
    assert_eq!(analyzer.policy(), FailurePolicy::Lenient);

    assert_eq!(Analyzer::from_settings(&Settings::default()).unwrap().provider(), Provider::Local);
  }
}
