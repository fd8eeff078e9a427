//! Kelly criterion for a single repeated wager.
//!
//! Kelly formula at decimal odds `d`:
//!   f* = (b * p - q) / b
//! where:
//!   b = d - 1 (net profit per unit staked)
//!   p = probability of winning
//!   q = 1 - p
//!
//! At fair odds (`p = 1 / d`) the edge is exactly zero, so the optimal
//! fraction is zero: a Martingale has no edge to size.

/// Raw Kelly values this close to zero are floating-point residue of a
/// zero-edge wager.
const KELLY_EPSILON: f64 = 1e-12;

/// Optimal fraction of bankroll to stake, in `[0, 1]`.
///
/// Returns 0 (do not bet) when the odds cannot pay out, the probability
/// sits on or outside the `(0, 1)` boundary, or the edge is negative.
pub fn kelly_fraction(decimal_odds: f64, win_probability: f64) -> f64 {
    if !decimal_odds.is_finite() || decimal_odds <= 1.0 {
        return 0.0;
    }
    if !(win_probability > 0.0 && win_probability < 1.0) {
        return 0.0;
    }

    let b = decimal_odds - 1.0;
    let q = 1.0 - win_probability;
    let full_kelly = (b * win_probability - q) / b;

    if !full_kelly.is_finite() || full_kelly <= KELLY_EPSILON {
        return 0.0;
    }

    full_kelly.min(1.0)
}
