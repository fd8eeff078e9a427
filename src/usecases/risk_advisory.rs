//! Risk Advisory - Rule-based Plan Warnings
//!
//! Flags plans that exceed risk thresholds:
//! - Bust probability above the threshold (10% by default)
//! - Bankroll below the recommended bankroll
//! - Negative expected value
//! - Zero Kelly fraction (no edge to size)
//! - Largest bet above a fraction of bankroll (50% by default)
//!
//! Warnings are always emitted in that order. Evaluation is pure.

use serde::{Deserialize, Serialize};

use crate::config::AdvisoryConfig;
use crate::domain::plan::PlanConfig;
use crate::domain::statistics::Statistics;

/// Relative tolerance on expected value, scaled by the total staked.
/// Anything closer to zero is rounding noise of a fair-odds progression.
const EV_TOLERANCE: f64 = 1e-9;

/// Warning category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
  HighRisk,
  Bankroll,
  NegativeEv,
  Kelly,
  LargeBet,
}

impl std::fmt::Display for WarningKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::HighRisk => write!(f, "high-risk"),
      Self::Bankroll => write!(f, "bankroll"),
      Self::NegativeEv => write!(f, "negative-ev"),
      Self::Kelly => write!(f, "kelly"),
      Self::LargeBet => write!(f, "large-bet"),
    }
  }
}

/// A single advisory finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
  pub kind: WarningKind,
  pub message: String,
}

/// Risk advisor with configurable thresholds.
#[derive(Debug, Clone)]
pub struct RiskAdvisor {
  /// Bust probability (percent) above which a plan is high risk.
  bust_threshold_pct: f64,
  /// Largest bet as a fraction of bankroll before it is flagged.
  large_bet_fraction: f64,
}

impl RiskAdvisor {
  /// Create a new advisor from config.
  pub fn new(config: &AdvisoryConfig) -> Self {
    Self {
      bust_threshold_pct: config.bust_threshold_pct,
      large_bet_fraction: config.large_bet_fraction,
    }
  }

  /// Evaluate a plan against its statistics.
  pub fn evaluate(&self, config: &PlanConfig, stats: &Statistics) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if stats.bust_probability > self.bust_threshold_pct {
      warnings.push(Warning {
        kind: WarningKind::HighRisk,
        message: format!(
          "Bust probability is {:.2}%, above the {:.2}% threshold",
          stats.bust_probability, self.bust_threshold_pct
        ),
      });
    }

    if config.bankroll < stats.recommended_bankroll {
      warnings.push(Warning {
        kind: WarningKind::Bankroll,
        message: format!(
          "Bankroll {:.2} is below the recommended {:.2}",
          config.bankroll, stats.recommended_bankroll
        ),
      });
    }

    if stats.expected_value < -EV_TOLERANCE * stats.max_drawdown.max(1.0) {
      warnings.push(Warning {
        kind: WarningKind::NegativeEv,
        message: format!(
          "Expected value is negative ({:.2} per session)",
          stats.expected_value
        ),
      });
    }

    if stats.kelly_criterion <= 0.0 {
      warnings.push(Warning {
        kind: WarningKind::Kelly,
        message: "Kelly criterion is 0: the wager has no edge to size".to_string(),
      });
    }

    let large_bet_limit = config.bankroll * self.large_bet_fraction;
    if stats.largest_bet > large_bet_limit {
      warnings.push(Warning {
        kind: WarningKind::LargeBet,
        message: format!(
          "Largest bet {:.2} exceeds {:.0}% of bankroll ({:.2})",
          stats.largest_bet,
          self.large_bet_fraction * 100.0,
          large_bet_limit
        ),
      });
    }

    warnings
  }
}

impl Default for RiskAdvisor {
  /// Default: 10% bust threshold, 50% large-bet fraction.
  fn default() -> Self {
    Self::new(&AdvisoryConfig::default())
  }
}

/// Evaluate a plan with the default thresholds.
pub fn evaluate(config: &PlanConfig, stats: &Statistics) -> Vec<Warning> {
  RiskAdvisor::default().evaluate(config, stats)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::odds::OddsType;
  use crate::usecases::planner::plan;

  fn kinds(warnings: &[Warning]) -> Vec<WarningKind> {
    warnings.iter().map(|w| w.kind).collect()
  }

  #[test]
  fn test_doubling_plan_flags_only_kelly() {
    // 6 rounds: bust 1.5625%, bankroll 1000 >= 200, EV 0, largest bet 320
    let config = PlanConfig::new(10.0, 1000.0, 2.0, OddsType::Decimal).with_max_rounds(10);
    let report = plan(&config).unwrap();
    let warnings = evaluate(&config, &report.statistics);

    assert_eq!(kinds(&warnings), vec![WarningKind::Kelly]);
  }

  #[test]
  fn test_all_warnings_in_fixed_order() {
    let config = PlanConfig::new(10.0, 1000.0, 2.0, OddsType::Decimal);
    let stats = Statistics {
      max_possible_rounds: 2,
      bust_probability: 25.0,
      win_probability_at_least_once: 75.0,
      expected_value: -3.0,
      risk_of_ruin: 100.0,
      kelly_criterion: 0.0,
      max_drawdown: 30.0,
      recommended_bankroll: 5000.0,
      average_profit: 10.0,
      worst_case_scenario: -30.0,
      largest_bet: 600.0,
    };

    let warnings = evaluate(&config, &stats);
    assert_eq!(
      kinds(&warnings),
      vec![
        WarningKind::HighRisk,
        WarningKind::Bankroll,
        WarningKind::NegativeEv,
        WarningKind::Kelly,
        WarningKind::LargeBet,
      ]
    );
    assert!(warnings[0].message.contains("25.00%"));
  }

  #[test]
  fn test_small_bankroll_triggers_bankroll_and_high_risk() {
    // bankroll 30 at base 10: rounds 10, 20 → bust 25%, recommended 200
    let config = PlanConfig::new(10.0, 30.0, 2.0, OddsType::Decimal);
    let report = plan(&config).unwrap();
    let warnings = evaluate(&config, &report.statistics);

    assert_eq!(
      kinds(&warnings),
      vec![
        WarningKind::HighRisk,
        WarningKind::Bankroll,
        WarningKind::Kelly,
        WarningKind::LargeBet,
      ]
    );
  }

  #[test]
  fn test_custom_thresholds() {
    let advisor = RiskAdvisor::new(&AdvisoryConfig {
      bust_threshold_pct: 1.0,
      large_bet_fraction: 0.25,
    });
    let config = PlanConfig::new(10.0, 1000.0, 2.0, OddsType::Decimal).with_max_rounds(10);
    let report = plan(&config).unwrap();

    assert_eq!(
      kinds(&advisor.evaluate(&config, &report.statistics)),
      vec![WarningKind::HighRisk, WarningKind::Kelly, WarningKind::LargeBet]
    );
  }

  #[test]
  fn test_fair_plan_with_large_stakes_is_not_negative_ev() {
    let config = PlanConfig::new(1e6, 1e12, 4.7, OddsType::Decimal).with_max_rounds(15);
    let report = plan(&config).unwrap();
    assert_eq!(report.rounds.len(), 15);

    let warnings = evaluate(&config, &report.statistics);
    assert!(!kinds(&warnings).contains(&WarningKind::NegativeEv), "{warnings:?}");
  }

  #[test]
  fn test_negative_ev_still_flagged_beyond_rounding() {
    let config = PlanConfig::new(10.0, 1000.0, 2.0, OddsType::Decimal);
    let stats = Statistics {
      max_possible_rounds: 6,
      bust_probability: 1.5625,
      win_probability_at_least_once: 98.4375,
      expected_value: -0.01,
      risk_of_ruin: 100.0,
      kelly_criterion: 0.0,
      max_drawdown: 630.0,
      recommended_bankroll: 200.0,
      average_profit: 10.0,
      worst_case_scenario: -630.0,
      largest_bet: 320.0,
    };
    assert!(kinds(&evaluate(&config, &stats)).contains(&WarningKind::NegativeEv));
  }

  #[test]
  fn test_kind_serializes_kebab_case() {
    let json = serde_json::to_string(&WarningKind::NegativeEv).unwrap();
    assert_eq!(json, "\"negative-ev\"");
    assert_eq!(WarningKind::LargeBet.to_string(), "large-bet");
  }
}
