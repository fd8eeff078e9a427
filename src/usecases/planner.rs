//! Planner - Progression + Statistics Facade
//!
//! The entry point the presentation layer calls: validates the plan,
//! builds the progression, derives its statistics and echoes the
//! configuration back with the normalized odds and probabilities.

use serde::Serialize;
use tracing::debug;

use crate::domain::error::Result;
use crate::domain::plan::PlanConfig;
use crate::domain::progression::{Round, StopReason, build_progression};
use crate::domain::statistics::{self, Statistics};

/// Echo of the input plan, augmented with derived odds and probabilities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPlan {
  #[serde(flatten)]
  pub plan: PlanConfig,
  pub decimal_odds: f64,
  pub win_probability: f64,
  pub loss_probability: f64,
}

/// Everything the presentation layer needs to render one plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
  pub rounds: Vec<Round>,
  pub statistics: Statistics,
  pub config: ResolvedPlan,
  pub stop_reason: StopReason,
}

/// Runs a plan end to end.
///
/// # Errors
/// Returns `ValidationError` when the plan fails any precondition of the
/// progression engine.
pub fn plan(config: &PlanConfig) -> Result<PlanReport> {
  let progression = build_progression(config)?;
  let statistics = statistics::for_progression(&progression, config.bankroll, config.base_bet);

  debug!(
    rounds = progression.rounds.len(),
    stop_reason = ?progression.stop_reason,
    decimal_odds = progression.decimal_odds,
    bust_pct = statistics.bust_probability,
    "Progression built"
  );

  Ok(PlanReport {
    config: ResolvedPlan {
      plan: config.clone(),
      decimal_odds: progression.decimal_odds,
      win_probability: progression.win_probability,
      loss_probability: progression.loss_probability,
    },
    stop_reason: progression.stop_reason,
    rounds: progression.rounds,
    statistics,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::error::ValidationError;
  use crate::domain::odds::OddsType;

  #[test]
  fn test_plan_echoes_config_with_probabilities() {
    let config = PlanConfig::new(10.0, 1000.0, "3/2", OddsType::Fractional);
    let report = plan(&config).unwrap();

    assert_eq!(report.config.plan, config);
    assert!((report.config.decimal_odds - 2.5).abs() < 1e-12);
    assert!((report.config.win_probability - 0.4).abs() < 1e-12);
    assert!((report.config.loss_probability - 0.6).abs() < 1e-12);
    assert_eq!(report.statistics.max_possible_rounds, report.rounds.len());
  }

  #[test]
  fn test_plan_propagates_validation_error() {
    let config = PlanConfig::new(0.0, 1000.0, 2.0, OddsType::Decimal);
    assert_eq!(plan(&config), Err(ValidationError::InvalidBaseBet(0.0)));
  }

  #[test]
  fn test_report_serializes_flat_config() {
    let config = PlanConfig::new(10.0, 100.0, 2.0, OddsType::Decimal);
    let json = serde_json::to_value(plan(&config).unwrap()).unwrap();

    assert_eq!(json["config"]["odds_type"], "decimal");
    assert_eq!(json["config"]["base_bet"], 10.0);
    assert_eq!(json["config"]["win_probability"], 0.5);
    assert_eq!(json["stop_reason"], "bankroll_exhausted");
  }
}
