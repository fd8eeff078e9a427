//! Progression Engine - the Martingale state machine
//!
//! Starting from the base bet, each round stakes the current bet, records
//! what a win on that round would net for the whole session, and then
//! grows the bet by the multiplier. The loop stops when the next bet is
//! unaffordable, exceeds the table limit, the profit target is reached,
//! or the round cap is hit.
//!
//! This is the one entry point that rejects bad input instead of
//! repairing it: a progression over a zero bankroll would be misleading.

use serde::{Deserialize, Serialize};

use super::error::{Result, ValidationError};
use super::odds;
use super::plan::PlanConfig;

/// One step of the progression. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-indexed round number.
    pub round: u32,
    /// Stake placed this round.
    pub bet_amount: f64,
    /// Total staked strictly before this round.
    pub cumulative_loss: f64,
    /// Total staked including this round.
    pub total_wagered: f64,
    /// Profit of this bet alone if it wins.
    pub potential_win: f64,
    /// Session result if the win lands on this round.
    pub net_profit_if_win: f64,
    /// Bankroll left after this round's stake, assuming no win yet.
    pub remaining_bankroll: f64,
    /// `net_profit_if_win >= 0`.
    pub breakeven: bool,
    /// Profit target (or any profit, without a target) reached here.
    pub target_met: bool,
}

/// Why the progression stopped emitting rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// `max_rounds` rounds were emitted.
    MaxRounds,
    /// The next bet exceeded the remaining bankroll.
    BankrollExhausted,
    /// The next bet exceeded the venue table limit.
    TableLimit,
    /// A win on the last round meets the profit target.
    TargetReached,
}

/// Completed progression plus the probabilities it was built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub rounds: Vec<Round>,
    pub decimal_odds: f64,
    pub win_probability: f64,
    pub loss_probability: f64,
    pub stop_reason: StopReason,
}

impl Progression {
    /// The final emitted round, if any.
    pub fn last_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// No viable progression: the first bet was already unplaceable.
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}

/// Checks every precondition and returns the normalized decimal odds.
pub fn validate(config: &PlanConfig) -> Result<f64> {
    if !config.base_bet.is_finite() || config.base_bet <= 0.0 {
        return Err(ValidationError::InvalidBaseBet(config.base_bet));
    }
    if !config.bankroll.is_finite() || config.bankroll <= 0.0 {
        return Err(ValidationError::InvalidBankroll(config.bankroll));
    }
    if !config.bet_multiplier.is_finite() || config.bet_multiplier < 1.0 {
        return Err(ValidationError::InvalidMultiplier(config.bet_multiplier));
    }
    if config.max_rounds == 0 {
        return Err(ValidationError::InvalidMaxRounds(config.max_rounds));
    }
    if let Some(target) = config.target_profit {
        if !target.is_finite() || target <= 0.0 {
            return Err(ValidationError::InvalidTargetProfit(target));
        }
    }
    if let Some(limit) = config.max_table_limit {
        if !limit.is_finite() || limit <= 0.0 {
            return Err(ValidationError::InvalidTableLimit(limit));
        }
    }

    let decimal_odds = config.decimal_odds();
    if !decimal_odds.is_finite() || decimal_odds <= 1.0 {
        return Err(ValidationError::InvalidOdds(decimal_odds));
    }

    let win_probability = 1.0 / decimal_odds;
    if !(win_probability > 0.0 && win_probability < 1.0) {
        return Err(ValidationError::InvalidProbability(win_probability));
    }

    Ok(decimal_odds)
}

/// Builds the full round sequence for a plan.
///
/// An empty `rounds` vector means the first bet could not be placed;
/// that is a valid result, not an error.
///
/// # Errors
/// Returns [`ValidationError`] when any precondition of [`validate`] fails.
pub fn build_progression(config: &PlanConfig) -> Result<Progression> {
    let decimal_odds = validate(config)?;
    let win_probability = 1.0 / decimal_odds;
    let loss_probability = 1.0 - win_probability;

    let mut rounds = Vec::with_capacity(config.max_rounds.min(64) as usize);
    let mut current_bet = config.base_bet;
    let mut remaining_bankroll = config.bankroll;
    let mut total_wagered = 0.0;
    let mut stop_reason = StopReason::MaxRounds;

    for round in 1..=config.max_rounds {
        if current_bet > remaining_bankroll {
            stop_reason = StopReason::BankrollExhausted;
            break;
        }
        if config
            .max_table_limit
            .is_some_and(|limit| current_bet > limit)
        {
            stop_reason = StopReason::TableLimit;
            break;
        }

        let payout = odds::payout(current_bet, decimal_odds);
        let cumulative_loss = total_wagered;
        total_wagered += current_bet;
        remaining_bankroll -= current_bet;

        let net_profit_if_win = payout.profit - cumulative_loss;
        let target_met = config
            .target_profit
            .map_or(net_profit_if_win > 0.0, |target| net_profit_if_win >= target);

        rounds.push(Round {
            round,
            bet_amount: current_bet,
            cumulative_loss,
            total_wagered,
            potential_win: payout.profit,
            net_profit_if_win,
            remaining_bankroll,
            breakeven: net_profit_if_win >= 0.0,
            target_met,
        });

        if config
            .target_profit
            .is_some_and(|target| net_profit_if_win >= target)
        {
            stop_reason = StopReason::TargetReached;
            break;
        }

        current_bet *= config.bet_multiplier;
    }

    Ok(Progression {
        rounds,
        decimal_odds,
        win_probability,
        loss_probability,
        stop_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::odds::OddsType;

    fn even_money(base_bet: f64, bankroll: f64) -> PlanConfig {
        PlanConfig::new(base_bet, bankroll, 2.0, OddsType::Decimal)
    }

    #[test]
    fn test_doubling_at_evens_nets_one_unit_every_round() {
        let config = even_money(10.0, 1000.0).with_max_rounds(10);
        let progression = build_progression(&config).unwrap();

        let bets: Vec<f64> = progression.rounds.iter().map(|r| r.bet_amount).collect();
        assert_eq!(bets, vec![10.0, 20.0, 40.0, 80.0, 160.0, 320.0]);
        for round in &progression.rounds {
            assert!(
                (round.net_profit_if_win - 10.0).abs() < 1e-9,
                "round {} nets {}",
                round.round,
                round.net_profit_if_win
            );
            assert!(round.breakeven);
            assert!(round.target_met);
        }
        assert_eq!(progression.stop_reason, StopReason::BankrollExhausted);

        let last = progression.last_round().unwrap();
        assert!((last.total_wagered - 630.0).abs() < 1e-9);
        assert!((last.cumulative_loss - 310.0).abs() < 1e-9);
        assert!((last.remaining_bankroll - 370.0).abs() < 1e-9);
        assert!((last.potential_win - 320.0).abs() < 1e-9);
    }

    #[test]
    fn test_bankroll_equal_to_base_bet_gives_single_round() {
        let progression = build_progression(&even_money(10.0, 10.0)).unwrap();
        assert_eq!(progression.rounds.len(), 1);
        assert!(progression.rounds[0].remaining_bankroll.abs() < f64::EPSILON);
    }

    #[test]
    fn test_unaffordable_first_bet_is_empty_not_error() {
        let progression = build_progression(&even_money(50.0, 10.0)).unwrap();
        assert!(progression.is_empty());
        assert_eq!(progression.stop_reason, StopReason::BankrollExhausted);
    }

    #[test]
    fn test_table_limit_stops_progression() {
        let config = even_money(10.0, 10_000.0).with_table_limit(100.0);
        let progression = build_progression(&config).unwrap();

        // 10, 20, 40, 80; 160 is over the limit
        assert_eq!(progression.rounds.len(), 4);
        assert_eq!(progression.stop_reason, StopReason::TableLimit);
    }

    #[test]
    fn test_target_profit_stops_after_emitting_round() {
        // 3.0 odds, tripling: net grows each round
        let config = PlanConfig::new(10.0, 100_000.0, 3.0, OddsType::Decimal)
            .with_multiplier(3.0)
            .with_target_profit(100.0);
        let progression = build_progression(&config).unwrap();

        let last = progression.last_round().unwrap();
        assert!(last.net_profit_if_win >= 100.0);
        assert!(last.target_met);
        assert_eq!(progression.stop_reason, StopReason::TargetReached);
        assert!(progression.rounds[..progression.rounds.len() - 1]
            .iter()
            .all(|r| !r.target_met));
    }

    #[test]
    fn test_max_rounds_caps_length() {
        let config = even_money(1.0, 1_000_000.0).with_max_rounds(5);
        let progression = build_progression(&config).unwrap();
        assert_eq!(progression.rounds.len(), 5);
        assert_eq!(progression.stop_reason, StopReason::MaxRounds);
    }

    #[test]
    fn test_long_flat_progression_has_no_round_ceiling() {
        let config = PlanConfig::new(1.0, 1e9, 2.0, OddsType::Decimal)
            .with_multiplier(1.0)
            .with_max_rounds(2000);
        let progression = build_progression(&config).unwrap();

        assert_eq!(progression.rounds.len(), 2000);
        assert_eq!(progression.stop_reason, StopReason::MaxRounds);
        let last = progression.last_round().unwrap();
        assert!((last.total_wagered - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_betting_with_unit_multiplier() {
        let config = even_money(10.0, 35.0).with_multiplier(1.0);
        let progression = build_progression(&config).unwrap();
        assert_eq!(progression.rounds.len(), 3);
        assert!(progression.rounds.iter().all(|r| (r.bet_amount - 10.0).abs() < f64::EPSILON));
        // Third win only recovers its own stake minus two prior losses
        assert!((progression.rounds[2].net_profit_if_win + 10.0).abs() < 1e-9);
        assert!(!progression.rounds[2].breakeven);
    }

    #[test]
    fn test_probabilities_from_decimal_odds() {
        let config = PlanConfig::new(10.0, 1000.0, "-200", OddsType::American);
        let progression = build_progression(&config).unwrap();
        assert!((progression.decimal_odds - 1.5).abs() < 1e-12);
        assert!((progression.win_probability - 2.0 / 3.0).abs() < 1e-12);
        assert!((progression.loss_probability - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_bankroll_and_bet() {
        assert_eq!(
            build_progression(&even_money(10.0, 0.0)),
            Err(ValidationError::InvalidBankroll(0.0))
        );
        assert_eq!(
            build_progression(&even_money(-1.0, 100.0)),
            Err(ValidationError::InvalidBaseBet(-1.0))
        );
        assert!(matches!(
            build_progression(&even_money(f64::NAN, 100.0)),
            Err(ValidationError::InvalidBaseBet(_))
        ));
        assert!(matches!(
            build_progression(&even_money(10.0, f64::INFINITY)),
            Err(ValidationError::InvalidBankroll(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_shape_parameters() {
        assert!(matches!(
            build_progression(&even_money(10.0, 100.0).with_multiplier(0.5)),
            Err(ValidationError::InvalidMultiplier(_))
        ));
        assert!(matches!(
            build_progression(&even_money(10.0, 100.0).with_max_rounds(0)),
            Err(ValidationError::InvalidMaxRounds(0))
        ));
        assert!(matches!(
            build_progression(&even_money(10.0, 100.0).with_target_profit(-5.0)),
            Err(ValidationError::InvalidTargetProfit(_))
        ));
        assert!(matches!(
            build_progression(&even_money(10.0, 100.0).with_table_limit(0.0)),
            Err(ValidationError::InvalidTableLimit(_))
        ));
    }
}
