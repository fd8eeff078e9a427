//! Configuration Module - TOML-based Plan Files
//!
//! Loads and validates a plan file such as `config.toml`. The `[plan]`
//! table is the staking plan itself; the other tables tune the
//! simulator, the risk advisory and logging, and all have defaults.

pub mod loader;

use serde::Deserialize;

use crate::domain::plan::PlanConfig;

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// The staking plan to evaluate.
  pub plan: PlanConfig,
  /// Monte Carlo simulation parameters.
  #[serde(default)]
  pub simulation: SimulationConfig,
  /// Risk advisory thresholds.
  #[serde(default)]
  pub advisory: AdvisoryConfig,
  /// Log output.
  #[serde(default)]
  pub logging: LoggingConfig,
}

/// Session simulator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
  /// Number of simulated sessions (1..=100000).
  #[serde(default = "default_trials")]
  pub trials: usize,
  /// Fixed seed for reproducible runs; entropy when absent.
  #[serde(default)]
  pub seed: Option<u64>,
  /// Trials per progress chunk.
  #[serde(default = "default_chunk_size")]
  pub chunk_size: usize,
}

/// Risk advisory thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisoryConfig {
  /// Bust probability (percent) above which a plan is high risk.
  #[serde(default = "default_bust_threshold")]
  pub bust_threshold_pct: f64,
  /// Largest bet as a fraction of bankroll before it is flagged.
  #[serde(default = "default_large_bet_fraction")]
  pub large_bet_fraction: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub level: String,
  /// Emit JSON lines instead of human-readable output.
  #[serde(default)]
  pub json: bool,
}

impl Default for SimulationConfig {
  fn default() -> Self {
    Self {
      trials: default_trials(),
      seed: None,
      chunk_size: default_chunk_size(),
    }
  }
}

impl Default for AdvisoryConfig {
  fn default() -> Self {
    Self {
      bust_threshold_pct: default_bust_threshold(),
      large_bet_fraction: default_large_bet_fraction(),
    }
  }
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      json: false,
    }
  }
}

// Default value functions for serde

fn default_trials() -> usize {
  1_000
}

fn default_chunk_size() -> usize {
  1_000
}

fn default_bust_threshold() -> f64 {
  10.0
}

fn default_large_bet_fraction() -> f64 {
  0.5
}

fn default_log_level() -> String {
  "info".to_string()
}
