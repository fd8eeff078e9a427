//! Validation errors raised when a plan is actually run.
//!
//! Odds conversion never fails (see `domain::odds`); the progression
//! engine and the simulator reject bad input instead of repairing it.

use thiserror::Error;

/// Why a plan or simulation request was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("base bet must be a finite number greater than 0, got {0}")]
    InvalidBaseBet(f64),

    #[error("bankroll must be a finite number greater than 0, got {0}")]
    InvalidBankroll(f64),

    #[error("decimal odds must be greater than 1.0, got {0}")]
    InvalidOdds(f64),

    #[error("win probability must be strictly between 0 and 1, got {0}")]
    InvalidProbability(f64),

    #[error("unsupported odds type '{0}' (expected decimal, american, fractional or implied)")]
    UnsupportedOddsType(String),

    #[error("bet multiplier must be a finite number of at least 1, got {0}")]
    InvalidMultiplier(f64),

    #[error("max rounds must be at least 1, got {0}")]
    InvalidMaxRounds(u32),

    #[error("target profit must be a finite number greater than 0, got {0}")]
    InvalidTargetProfit(f64),

    #[error("table limit must be a finite number greater than 0, got {0}")]
    InvalidTableLimit(f64),

    #[error("trial count must be between 1 and {max}, got {got}")]
    TrialCount { got: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
