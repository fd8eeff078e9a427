//! Closed-form risk and return metrics for a completed progression.
//!
//! Every field is guaranteed finite. Anything that could divide by zero,
//! raise a degenerate base to a power or sum over nothing has an explicit
//! fallback, so NaN and infinity never leave this module.
//!
//! The expected value assumes independent rounds at a fixed win
//! probability taken from the quoted price; a real venue edge is not
//! modelled.

use serde::{Deserialize, Serialize};

use super::kelly::kelly_fraction;
use super::progression::{Progression, Round};

/// Fixed multiple of the base bet suggested as a bankroll.
pub const RECOMMENDED_BANKROLL_MULTIPLE: f64 = 20.0;

/// Aggregate metrics of one progression. Probabilities are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of rounds the bankroll can sustain.
    pub max_possible_rounds: usize,
    /// Chance that every round loses (percent).
    pub bust_probability: f64,
    /// Chance that at least one round wins (percent).
    pub win_probability_at_least_once: f64,
    /// Probability-weighted session result.
    pub expected_value: f64,
    /// Gambler's-ruin approximation (percent).
    pub risk_of_ruin: f64,
    /// Kelly-optimal bankroll fraction (percent).
    pub kelly_criterion: f64,
    /// Total staked through the last round.
    pub max_drawdown: f64,
    /// `base_bet * 20`.
    pub recommended_bankroll: f64,
    /// Session profit if the last round wins.
    pub average_profit: f64,
    /// Session loss if every round loses.
    pub worst_case_scenario: f64,
    /// Largest single stake in the progression.
    pub largest_bet: f64,
}

/// Computes statistics from a progression's rounds.
///
/// With no rounds the result is neutral: bust probability 100 %, expected
/// value, drawdown and profits all 0.
pub fn compute_statistics(
    rounds: &[Round],
    win_probability: f64,
    loss_probability: f64,
    bankroll: f64,
    base_bet: f64,
    decimal_odds: f64,
) -> Statistics {
    let n = rounds.len();
    let last = rounds.last();
    let final_wagered = finite_or_zero(last.map_or(0.0, |r| r.total_wagered));

    let bust = bust_fraction(loss_probability, n);
    let bust_probability = bust * 100.0;

    let mut expected_value = 0.0;
    let mut survive = 1.0;
    for round in rounds {
        expected_value += finite_or_zero(survive * win_probability * round.net_profit_if_win);
        survive *= loss_probability;
    }
    expected_value += finite_or_zero(bust * -final_wagered);

    let largest_bet = rounds
        .iter()
        .map(|r| r.bet_amount)
        .filter(|b| b.is_finite())
        .fold(0.0, f64::max);

    Statistics {
        max_possible_rounds: n,
        bust_probability,
        win_probability_at_least_once: 100.0 - bust_probability,
        expected_value: finite_or_zero(expected_value),
        risk_of_ruin: risk_of_ruin(win_probability, bankroll, base_bet) * 100.0,
        kelly_criterion: kelly_fraction(decimal_odds, win_probability) * 100.0,
        max_drawdown: final_wagered,
        recommended_bankroll: finite_or_zero(base_bet * RECOMMENDED_BANKROLL_MULTIPLE),
        average_profit: finite_or_zero(last.map_or(0.0, |r| r.net_profit_if_win)),
        worst_case_scenario: -final_wagered,
        largest_bet,
    }
}

/// Convenience wrapper over [`compute_statistics`] for a built progression.
pub fn for_progression(progression: &Progression, bankroll: f64, base_bet: f64) -> Statistics {
    compute_statistics(
        &progression.rounds,
        progression.win_probability,
        progression.loss_probability,
        bankroll,
        base_bet,
        progression.decimal_odds,
    )
}

/// Classical gambler's-ruin approximation, as a fraction in `[0, 1]`.
///
/// `((1 - p) / p) ^ floor(bankroll / unit)`. Returns 1 (certain ruin) for
/// a fair coin, invalid inputs, or a non-finite result.
pub fn risk_of_ruin(win_probability: f64, bankroll: f64, unit_size: f64) -> f64 {
    if !(bankroll > 0.0 && unit_size > 0.0) || !bankroll.is_finite() || !unit_size.is_finite() {
        return 1.0;
    }
    if !(win_probability > 0.0 && win_probability < 1.0) {
        return 1.0;
    }
    if (win_probability - 0.5).abs() < f64::EPSILON {
        return 1.0;
    }

    let ratio = (1.0 - win_probability) / win_probability;
    let units = (bankroll / unit_size).floor();
    let ruin = ratio.powf(units);

    if ruin.is_finite() {
        ruin.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

fn bust_fraction(loss_probability: f64, rounds: usize) -> f64 {
    let exponent = i32::try_from(rounds).unwrap_or(i32::MAX);
    let bust = loss_probability.powi(exponent);
    if bust.is_finite() {
        bust.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
