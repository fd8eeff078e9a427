//! Configuration Loader - File Loading and Validation
//!
//! Handles loading a plan file, validating all parameters, and providing
//! clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;
use crate::domain::progression;
use crate::usecases::session_simulator::MAX_TRIALS;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails (including an unsupported `odds_type`)
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();

  let config = read_config(path)?;
  validate_overridable(&config)
    .with_context(|| format!("Invalid config file: {}", path.display()))?;

  log_loaded(path, &config);
  Ok(config)
}

/// Read and parse a plan file, checking only the `[advisory]` table.
///
/// `[plan]` and `[simulation]` values may still be replaced by command-line
/// flags; the planner and simulator validate them after the merge.
///
/// # Errors
/// Returns an error if the file can't be read, the TOML is malformed or
/// an advisory threshold is out of range.
pub fn read_config(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config: AppConfig = toml::from_str(&content)
    .context("Failed to parse TOML")
    .with_context(|| format!("Invalid config file: {}", path.display()))?;
  validate_advisory(&config)
    .with_context(|| format!("Invalid config file: {}", path.display()))?;

  Ok(config)
}

/// Summary event for a loaded plan file.
pub fn log_loaded(path: &Path, config: &AppConfig) {
  info!(
    path = %path.display(),
    base_bet = config.plan.base_bet,
    bankroll = config.plan.bankroll,
    odds_type = %config.plan.odds_type,
    trials = config.simulation.trials,
    "Configuration loaded successfully"
  );
}

/// Parse and validate configuration from TOML text.
///
/// # Errors
/// Returns an error if parsing or validation fails.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse TOML")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - A plan the progression engine accepts
/// - Trial count within simulator bounds
/// - Advisory thresholds in sensible ranges
fn validate_config(config: &AppConfig) -> Result<()> {
  validate_overridable(config)?;
  validate_advisory(config)
}

fn validate_overridable(config: &AppConfig) -> Result<()> {
  progression::validate(&config.plan).context("Invalid [plan]")?;

  anyhow::ensure!(
    config.simulation.trials >= 1 && config.simulation.trials <= MAX_TRIALS,
    "simulation.trials must be in [1, {}], got {}",
    MAX_TRIALS,
    config.simulation.trials
  );

  Ok(())
}

fn validate_advisory(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    config.advisory.bust_threshold_pct.is_finite()
      && (0.0..=100.0).contains(&config.advisory.bust_threshold_pct),
    "advisory.bust_threshold_pct must be in [0, 100], got {}",
    config.advisory.bust_threshold_pct
  );
  anyhow::ensure!(
    config.advisory.large_bet_fraction > 0.0 && config.advisory.large_bet_fraction <= 1.0,
    "advisory.large_bet_fraction must be in (0, 1], got {}",
    config.advisory.large_bet_fraction
  );

  Ok(())
}
