//! Data model for ideas, their versions and the computed insights
//!
//! The JSON shapes produced here are stable contracts: an [`InsightBundle`]
//! always carries the six metric keys plus `leanCanvas` (and `llmWarning` when
//! generation degraded), and a [`DeltaEntry`] always carries `from`, `to` and
//! `delta`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

// Inputs
// ======

/// Free-text description of a startup idea. Every field is optional and an
/// absent field behaves like an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IdeaInputs {
  #[serde(default)]
  pub problem: Option<String>,
  #[serde(default)]
  pub solution: Option<String>,
  #[serde(default)]
  pub audience: Option<String>,
  #[serde(default)]
  pub alternatives: Option<String>,
  #[serde(default)]
  pub technology: Option<String>,
}

impl IdeaInputs {
  pub fn problem(&self) -> &str {
    self.problem.as_deref().unwrap_or_default()
  }

  pub fn solution(&self) -> &str {
    self.solution.as_deref().unwrap_or_default()
  }

  pub fn audience(&self) -> &str {
    self.audience.as_deref().unwrap_or_default()
  }

  pub fn alternatives(&self) -> &str {
    self.alternatives.as_deref().unwrap_or_default()
  }

  pub fn technology(&self) -> &str {
    self.technology.as_deref().unwrap_or_default()
  }

  /// Whether the founder supplied a non-blank solution
  pub fn has_solution(&self) -> bool {
    !self.solution().trim().is_empty()
  }
}

// Metrics
// =======

/// The six insight metrics in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
  ProblemValidation,
  MarketMaturity,
  CompetitionDensity,
  DifferentiationPotential,
  TechnicalFeasibility,
  RiskAndUncertainty,
}

impl Metric {
  /// Canonical order; ties in delta ranking resolve to the earliest entry.
  pub const ALL: [Metric; 6] = [
    Metric::ProblemValidation,
    Metric::MarketMaturity,
    Metric::CompetitionDensity,
    Metric::DifferentiationPotential,
    Metric::TechnicalFeasibility,
    Metric::RiskAndUncertainty,
  ];

  /// JSON key of the metric
  pub fn key(self) -> &'static str {
    match self {
      Metric::ProblemValidation => "problemValidationScore",
      Metric::MarketMaturity => "marketMaturity",
      Metric::CompetitionDensity => "competitionDensity",
      Metric::DifferentiationPotential => "differentiationPotential",
      Metric::TechnicalFeasibility => "technicalFeasibility",
      Metric::RiskAndUncertainty => "riskAndUncertainty",
    }
  }

  /// Human readable label used in explanations
  pub fn label(self) -> &'static str {
    match self {
      Metric::ProblemValidation => "Problem validation",
      Metric::MarketMaturity => "Market maturity",
      Metric::CompetitionDensity => "Competition density",
      Metric::DifferentiationPotential => "Differentiation",
      Metric::TechnicalFeasibility => "Technical feasibility",
      Metric::RiskAndUncertainty => "Risk / Uncertainty",
    }
  }
}

/// Clamp to `[0, 100]` and round to the nearest integer.
pub fn normalize(value: f64) -> i64 {
  if value.is_nan() {
    return 0;
  }
  value.round().clamp(0.0, 100.0) as i64
}

/// Reads a stored score: numbers are clamped and rounded, anything else
/// (strings, null, a missing key) becomes 0.
fn lenient_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
  D: Deserializer<'de>,
{
  let value = serde_json::Value::deserialize(deserializer)?;
  Ok(value.as_f64().map(normalize).unwrap_or(0))
}

/// Numeric view of a generated value. Unlike stored scores, numeric strings
/// are accepted here.
pub fn score_from_value(value: &serde_json::Value) -> Option<f64> {
  match value {
    serde_json::Value::Number(n) => n.as_f64(),
    serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  }
}

/// Six bounded metrics summarizing an idea.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightScores {
  #[serde(default, deserialize_with = "lenient_score")]
  pub problem_validation_score: i64,
  #[serde(default, deserialize_with = "lenient_score")]
  pub market_maturity: i64,
  #[serde(default, deserialize_with = "lenient_score")]
  pub competition_density: i64,
  #[serde(default, deserialize_with = "lenient_score")]
  pub differentiation_potential: i64,
  #[serde(default, deserialize_with = "lenient_score")]
  pub technical_feasibility: i64,
  #[serde(default, deserialize_with = "lenient_score")]
  pub risk_and_uncertainty: i64,
}

impl InsightScores {
  pub fn get(&self, metric: Metric) -> i64 {
    match metric {
      Metric::ProblemValidation => self.problem_validation_score,
      Metric::MarketMaturity => self.market_maturity,
      Metric::CompetitionDensity => self.competition_density,
      Metric::DifferentiationPotential => self.differentiation_potential,
      Metric::TechnicalFeasibility => self.technical_feasibility,
      Metric::RiskAndUncertainty => self.risk_and_uncertainty,
    }
  }

  pub fn set(&mut self, metric: Metric, value: i64) {
    let slot = match metric {
      Metric::ProblemValidation => &mut self.problem_validation_score,
      Metric::MarketMaturity => &mut self.market_maturity,
      Metric::CompetitionDensity => &mut self.competition_density,
      Metric::DifferentiationPotential => &mut self.differentiation_potential,
      Metric::TechnicalFeasibility => &mut self.technical_feasibility,
      Metric::RiskAndUncertainty => &mut self.risk_and_uncertainty,
    };
    *slot = value;
  }
}

// Lean canvas
// ===========

/// Ten-field narrative business model summary. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct LeanCanvas {
  #[serde(default)]
  pub problem: Option<String>,
  #[serde(default)]
  pub solution: Option<String>,
  #[serde(default)]
  pub suggested_solution: Option<String>,
  #[serde(default)]
  pub unique_value_proposition: Option<String>,
  #[serde(default)]
  pub customer_segments: Option<String>,
  #[serde(default)]
  pub channels: Option<String>,
  #[serde(default)]
  pub revenue_model: Option<String>,
  #[serde(default)]
  pub cost_structure: Option<String>,
  #[serde(default)]
  pub key_metrics: Option<String>,
  #[serde(default)]
  pub advantage: Option<String>,
}

impl LeanCanvas {
  /// JSON keys of the canvas, in display order
  pub const KEYS: [&'static str; 10] = [
    "Problem",
    "Solution",
    "SuggestedSolution",
    "UniqueValueProposition",
    "CustomerSegments",
    "Channels",
    "RevenueModel",
    "CostStructure",
    "KeyMetrics",
    "Advantage",
  ];

  /// Mutable slot for a canvas key, `None` for unknown keys
  pub fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
    let slot = match key {
      "Problem" => &mut self.problem,
      "Solution" => &mut self.solution,
      "SuggestedSolution" => &mut self.suggested_solution,
      "UniqueValueProposition" => &mut self.unique_value_proposition,
      "CustomerSegments" => &mut self.customer_segments,
      "Channels" => &mut self.channels,
      "RevenueModel" => &mut self.revenue_model,
      "CostStructure" => &mut self.cost_structure,
      "KeyMetrics" => &mut self.key_metrics,
      "Advantage" => &mut self.advantage,
      _ => return None,
    };
    Some(slot)
  }

  /// `(key, value)` pairs in display order
  pub fn entries(&self) -> [(&'static str, Option<&str>); 10] {
    [
      ("Problem", self.problem.as_deref()),
      ("Solution", self.solution.as_deref()),
      ("SuggestedSolution", self.suggested_solution.as_deref()),
      ("UniqueValueProposition", self.unique_value_proposition.as_deref()),
      ("CustomerSegments", self.customer_segments.as_deref()),
      ("Channels", self.channels.as_deref()),
      ("RevenueModel", self.revenue_model.as_deref()),
      ("CostStructure", self.cost_structure.as_deref()),
      ("KeyMetrics", self.key_metrics.as_deref()),
      ("Advantage", self.advantage.as_deref()),
    ]
  }
}

// Bundles, versions, ideas
// ========================

/// Scores plus canvas, as stored on every version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InsightBundle {
  #[serde(flatten)]
  pub scores: InsightScores,

  #[serde(rename = "leanCanvas", default)]
  pub lean_canvas: LeanCanvas,

  /// Set when generation degraded to the deterministic path
  #[serde(rename = "llmWarning", default, skip_serializing_if = "Option::is_none")]
  pub llm_warning: Option<String>,
}

/// Immutable snapshot of one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Version {
  pub inputs: IdeaInputs,
  pub insights: InsightBundle,
  pub created_at: DateTime<Utc>,
}

impl Version {
  pub fn new(inputs: IdeaInputs, insights: InsightBundle) -> Self {
    Self { inputs, insights, created_at: Utc::now() }
  }
}

/// An idea and its append-only version history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
  pub id: String,
  /// Mirror of the latest version's inputs
  pub inputs: IdeaInputs,
  #[serde(default)]
  pub versions: Vec<Version>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Idea {
  /// Create an idea holding exactly one version
  pub fn new(id: String, inputs: IdeaInputs, version: Version) -> Self {
    let now = version.created_at;
    Self { id, inputs, versions: vec![version], created_at: now, updated_at: now }
  }

  pub fn first(&self) -> Option<&Version> {
    self.versions.first()
  }

  pub fn latest(&self) -> Option<&Version> {
    self.versions.last()
  }

  /// Append a version and refresh the latest-inputs mirror
  pub fn push_version(&mut self, inputs: IdeaInputs, version: Version) {
    self.updated_at = version.created_at;
    self.inputs = inputs;
    self.versions.push(version);
  }
}

// Deltas
// ======

/// Change of one metric between two versions. `delta == to - from`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeltaEntry {
  pub from: i64,
  pub to: i64,
  pub delta: i64,
}

impl DeltaEntry {
  pub fn between(from: i64, to: i64) -> Self {
    Self { from, to, delta: to.saturating_sub(from) }
  }
}

/// Delta for each of the six metric keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricDeltas {
  pub problem_validation_score: DeltaEntry,
  pub market_maturity: DeltaEntry,
  pub competition_density: DeltaEntry,
  pub differentiation_potential: DeltaEntry,
  pub technical_feasibility: DeltaEntry,
  pub risk_and_uncertainty: DeltaEntry,
}

impl MetricDeltas {
  pub fn get(&self, metric: Metric) -> DeltaEntry {
    match metric {
      Metric::ProblemValidation => self.problem_validation_score,
      Metric::MarketMaturity => self.market_maturity,
      Metric::CompetitionDensity => self.competition_density,
      Metric::DifferentiationPotential => self.differentiation_potential,
      Metric::TechnicalFeasibility => self.technical_feasibility,
      Metric::RiskAndUncertainty => self.risk_and_uncertainty,
    }
  }

  fn slot_mut(&mut self, metric: Metric) -> &mut DeltaEntry {
    match metric {
      Metric::ProblemValidation => &mut self.problem_validation_score,
      Metric::MarketMaturity => &mut self.market_maturity,
      Metric::CompetitionDensity => &mut self.competition_density,
      Metric::DifferentiationPotential => &mut self.differentiation_potential,
      Metric::TechnicalFeasibility => &mut self.technical_feasibility,
      Metric::RiskAndUncertainty => &mut self.risk_and_uncertainty,
    }
  }

  pub fn set(&mut self, metric: Metric, entry: DeltaEntry) {
    *self.slot_mut(metric) = entry;
  }

  /// Entries in canonical metric order
  pub fn iter(&self) -> impl Iterator<Item = (Metric, DeltaEntry)> + '_ {
    Metric::ALL.into_iter().map(move |metric| (metric, self.get(metric)))
  }

  pub fn is_unchanged(&self) -> bool {
    self.iter().all(|(_, entry)| entry.delta == 0)
  }
}

// Results
// =======

/// Explanation of a comparison, with the warning set when generation
/// degraded to the templated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Explanation {
  pub text: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub warning: Option<String>,
}

/// First-versus-latest comparison payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Comparison {
  pub deltas: MetricDeltas,
  pub explanation: String,
  pub first: InsightBundle,
  pub latest: InsightBundle,
  #[serde(rename = "llmWarning", default, skip_serializing_if = "Option::is_none")]
  pub llm_warning: Option<String>,
}

/// An analyzed but unsaved idea, used for demo listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdeaPreview {
  #[serde(flatten)]
  pub inputs: IdeaInputs,
  pub insights: InsightBundle,
  pub created_at: DateTime<Utc>,
}
