//! Staking plan configuration.
//!
//! A `PlanConfig` is what the caller hands to the progression engine and
//! the simulator. It is deserializable straight out of the `[plan]` table
//! of a TOML file, with the same defaults the CLI applies.

use serde::{Deserialize, Serialize};

use super::odds::{self, OddsType, OddsValue};

/// Default hard cap on progression length.
pub const DEFAULT_MAX_ROUNDS: u32 = 20;

/// Default stake growth after a loss (classic doubling).
pub const DEFAULT_BET_MULTIPLIER: f64 = 2.0;

/// Input to a progression run. Immutable once accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// First-round stake.
    pub base_bet: f64,
    /// Total funds available.
    pub bankroll: f64,
    /// Raw odds in the format matching `odds_type`.
    pub odds: OddsValue,
    /// Quoting convention of `odds`.
    pub odds_type: OddsType,
    /// Hard cap on progression length.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    /// Growth ratio applied to the stake after each loss.
    #[serde(default = "default_bet_multiplier")]
    pub bet_multiplier: f64,
    /// Stop once a win would net at least this much.
    #[serde(default)]
    pub target_profit: Option<f64>,
    /// Venue ceiling on a single bet.
    #[serde(default)]
    pub max_table_limit: Option<f64>,
}

impl PlanConfig {
    /// Creates a plan with default round cap and doubling multiplier.
    pub fn new(
        base_bet: f64,
        bankroll: f64,
        odds: impl Into<OddsValue>,
        odds_type: OddsType,
    ) -> Self {
        Self {
            base_bet,
            bankroll,
            odds: odds.into(),
            odds_type,
            max_rounds: DEFAULT_MAX_ROUNDS,
            bet_multiplier: DEFAULT_BET_MULTIPLIER,
            target_profit: None,
            max_table_limit: None,
        }
    }

    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    #[must_use]
    pub fn with_multiplier(mut self, bet_multiplier: f64) -> Self {
        self.bet_multiplier = bet_multiplier;
        self
    }

    #[must_use]
    pub fn with_target_profit(mut self, target_profit: f64) -> Self {
        self.target_profit = Some(target_profit);
        self
    }

    #[must_use]
    pub fn with_table_limit(mut self, max_table_limit: f64) -> Self {
        self.max_table_limit = Some(max_table_limit);
        self
    }

    /// Normalized decimal odds for this plan (never fails).
    pub fn decimal_odds(&self) -> f64 {
        odds::to_decimal(&self.odds, self.odds_type)
    }
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

fn default_bet_multiplier() -> f64 {
    DEFAULT_BET_MULTIPLIER
}
