//! Built-in demo ideas

use crate::model::IdeaInputs;

fn inputs(problem: &str, solution: &str, audience: &str, alternatives: &str, technology: &str) -> IdeaInputs {
  IdeaInputs {
    problem: Some(problem.to_string()),
    solution: Some(solution.to_string()),
    audience: Some(audience.to_string()),
    alternatives: Some(alternatives.to_string()),
    technology: Some(technology.to_string()),
  }
}

/// Sample submissions without a founder solution
pub fn samples() -> Vec<IdeaInputs> {
  vec![
    inputs(
      "Users waste time finding the right template for contracts",
      "",
      "freelancers",
      "generic templates, lawyers",
      "webapp, node",
    ),
    inputs(
      "Small retailers struggle to manage inventory across channels",
      "",
      "small retailers",
      "excel, pos systems",
      "webapp, integrations",
    ),
    inputs(
      "Remote teams have trouble running async retrospectives",
      "",
      "remote engineering teams",
      "zoom, miro",
      "saas, node, react",
    ),
  ]
}

/// First version of the populated demo idea
pub fn base() -> IdeaInputs {
  inputs(
    "Users abandon onboarding due to complexity",
    "A lightweight guided onboarding flow",
    "SaaS product teams",
    "manual onboarding, help docs",
    "web, analytics",
  )
}

/// Simulated founder iterations applied on top of [`base`]
pub fn revisions() -> Vec<IdeaInputs> {
  [
    ("Add step-by-step tooltip tour", "web, analytics, guided-tour"),
    ("Integrate with single-sign-on and smart defaults", "web, sso, server"),
    ("A/B test variants and auto-optimize flow", "web, analytics, ml"),
  ]
  .into_iter()
  .map(|(solution, technology)| IdeaInputs {
    solution: Some(solution.to_string()),
    technology: Some(technology.to_string()),
    ..base()
  })
  .collect()
}
