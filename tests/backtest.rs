//! Backtest Framework - Monte Carlo vs Closed-Form Statistics
//!
//! Replays a grid of staking plans through the seeded session simulator
//! and checks that the sampled win rate and average profit agree with
//! the analytic statistics within a few standard errors.

use martingale_planner::adapters::rng::SeededSource;
use martingale_planner::domain::odds::OddsType;
use martingale_planner::domain::plan::PlanConfig;
use martingale_planner::usecases::planner;
use martingale_planner::usecases::session_simulator::simulate_sessions;

const TRIALS: usize = 40_000;

/// Backtest result summary.
#[derive(Debug)]
struct BacktestResult {
    /// Analytic chance of at least one win, percent.
    expected_win_rate: f64,
    /// Sampled win rate, percent.
    simulated_win_rate: f64,
    /// Analytic expected session profit.
    expected_profit: f64,
    /// Sampled mean session profit.
    simulated_profit: f64,
    /// Sampled profit standard deviation.
    profit_std_dev: f64,
}

impl BacktestResult {
    /// Standard error of the sampled win rate, percent.
    fn win_rate_std_err(&self) -> f64 {
        let p = self.expected_win_rate / 100.0;
        (p * (1.0 - p) / TRIALS as f64).sqrt() * 100.0
    }

    fn profit_std_err(&self) -> f64 {
        self.profit_std_dev / (TRIALS as f64).sqrt()
    }
}

fn run_backtest(config: &PlanConfig, seed: u64) -> BacktestResult {
    let report = planner::plan(config).unwrap();
    let mut rng = SeededSource::seeded(seed);
    let outcome = simulate_sessions(config, TRIALS, &mut rng).unwrap();

    BacktestResult {
        expected_win_rate: report.statistics.win_probability_at_least_once,
        simulated_win_rate: outcome.summary.win_rate,
        expected_profit: report.statistics.expected_value,
        simulated_profit: outcome.summary.average_profit,
        profit_std_dev: outcome.summary.std_dev_profit,
    }
}

fn assert_converges(name: &str, result: &BacktestResult) {
    let win_tolerance = 5.0 * result.win_rate_std_err() + 0.05;
    assert!(
        (result.simulated_win_rate - result.expected_win_rate).abs() <= win_tolerance,
        "{name}: win rate {result:?}"
    );

    let profit_tolerance = 5.0 * result.profit_std_err() + 1e-6;
    assert!(
        (result.simulated_profit - result.expected_profit).abs() <= profit_tolerance,
        "{name}: profit {result:?}"
    );
}

#[test]
fn test_backtest_classic_doubling() {
    let config = PlanConfig::new(10.0, 1000.0, 2.0, OddsType::Decimal);
    assert_converges("doubling", &run_backtest(&config, 11));
}

#[test]
fn test_backtest_long_odds_american() {
    let config = PlanConfig::new(5.0, 2000.0, "+300", OddsType::American).with_multiplier(1.4);
    assert_converges("american +300", &run_backtest(&config, 23));
}

#[test]
fn test_backtest_short_odds_fractional() {
    let config = PlanConfig::new(20.0, 5000.0, "1/2", OddsType::Fractional)
        .with_multiplier(3.0)
        .with_max_rounds(8);
    assert_converges("fractional 1/2", &run_backtest(&config, 37));
}

#[test]
fn test_backtest_table_limited_implied() {
    let config = PlanConfig::new(10.0, 10_000.0, 40.0, OddsType::Implied)
        .with_multiplier(2.5)
        .with_table_limit(1_000.0);
    let result = run_backtest(&config, 41);
    assert_converges("implied 40%", &result);
    // Fair odds: expected value is zero whatever the stopping rule
    assert!(result.expected_profit.abs() < 1e-6);
}

#[test]
fn test_backtest_target_profit_stop() {
    let config = PlanConfig::new(10.0, 10_000.0, 3.0, OddsType::Decimal)
        .with_multiplier(1.5)
        .with_target_profit(15.0);
    assert_converges("target 15", &run_backtest(&config, 53));
}
