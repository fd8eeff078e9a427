//! Session Simulator - Monte Carlo over a Fixed Progression
//!
//! Builds the progression once and replays it for every trial: only the
//! round on which the first win lands is random, never the bet sizes.
//! Each trial draws one uniform value per round, in order; the first draw
//! below the win probability ends the session with that round's net
//! profit. If no draw wins, the session loses everything staked.
//!
//! Long runs can be chunked. Between chunks the caller gets a progress
//! callback and may cancel; a trial is never interrupted halfway.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::error::{Result, ValidationError};
use crate::domain::plan::PlanConfig;
use crate::domain::progression::{Progression, Round, build_progression};
use crate::ports::random::UniformSource;

/// Largest accepted trial count.
pub const MAX_TRIALS: usize = 100_000;

/// Trials per chunk when the caller does not choose.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000;

/// Outcome of one simulated session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub won: bool,
    pub rounds_played: u32,
    pub profit: f64,
    pub total_wagered: f64,
}

/// Aggregate over all completed trials. `win_rate` is a percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub trials: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub average_profit: f64,
    pub median_profit: f64,
    pub std_dev_profit: f64,
    pub max_profit: f64,
    pub min_profit: f64,
    pub profitable_trials: usize,
}

/// Trials finished so far, reported between chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationProgress {
    pub completed: usize,
    pub total: usize,
}

/// Per-trial results plus their summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub trials: Vec<SimulationResult>,
    pub summary: SimulationSummary,
    /// Stopped early at a chunk boundary.
    pub cancelled: bool,
}

/// Replays one shared, read-only progression table.
#[derive(Debug, Clone, Copy)]
pub struct SessionSimulator<'a> {
    rounds: &'a [Round],
    win_probability: f64,
}

impl<'a> SessionSimulator<'a> {
    pub fn new(progression: &'a Progression) -> Self {
        Self {
            rounds: &progression.rounds,
            win_probability: progression.win_probability,
        }
    }

    /// Plays a single session against the table.
    pub fn run_trial<S: UniformSource + ?Sized>(&self, rng: &mut S) -> SimulationResult {
        for round in self.rounds {
            if rng.next_uniform() < self.win_probability {
                return SimulationResult {
                    won: true,
                    rounds_played: round.round,
                    profit: round.net_profit_if_win,
                    total_wagered: round.total_wagered,
                };
            }
        }

        let staked = self.rounds.last().map_or(0.0, |r| r.total_wagered);
        SimulationResult {
            won: false,
            rounds_played: self.rounds.last().map_or(0, |r| r.round),
            profit: -staked,
            total_wagered: staked,
        }
    }

    /// Runs `trial_count` trials in chunks of `chunk_size`, calling
    /// `on_chunk` after each chunk. Returning `ControlFlow::Break` stops
    /// the run; the outcome then summarises only the completed trials.
    ///
    /// # Errors
    /// Returns [`ValidationError::TrialCount`] unless
    /// `1 <= trial_count <= MAX_TRIALS`.
    pub fn run_chunked<S, F>(
        &self,
        trial_count: usize,
        chunk_size: usize,
        rng: &mut S,
        mut on_chunk: F,
    ) -> Result<SimulationOutcome>
    where
        S: UniformSource + ?Sized,
        F: FnMut(SimulationProgress) -> ControlFlow<()>,
    {
        validate_trial_count(trial_count)?;
        let chunk_size = if chunk_size == 0 { trial_count } else { chunk_size };

        let mut trials = Vec::with_capacity(trial_count);
        let mut cancelled = false;

        while trials.len() < trial_count {
            let chunk_end = (trials.len() + chunk_size).min(trial_count);
            while trials.len() < chunk_end {
                trials.push(self.run_trial(rng));
            }

            let progress = SimulationProgress {
                completed: trials.len(),
                total: trial_count,
            };
            if on_chunk(progress).is_break() {
                cancelled = trials.len() < trial_count;
                break;
            }
        }

        if cancelled {
            debug!(completed = trials.len(), total = trial_count, "Simulation cancelled");
        }

        let summary = summarize(&trials);
        Ok(SimulationOutcome {
            trials,
            summary,
            cancelled,
        })
    }
}

/// Simulates `trial_count` independent sessions of the plan.
///
/// # Errors
/// Returns [`ValidationError`] when the trial count is out of range or
/// the plan itself is invalid.
pub fn simulate_sessions<S: UniformSource + ?Sized>(
    config: &PlanConfig,
    trial_count: usize,
    rng: &mut S,
) -> Result<SimulationOutcome> {
    simulate_sessions_chunked(config, trial_count, DEFAULT_CHUNK_SIZE, rng, |_| {
        ControlFlow::Continue(())
    })
}

/// [`simulate_sessions`] with a progress / cancellation hook between
/// chunks.
///
/// # Errors
/// Same as [`simulate_sessions`].
pub fn simulate_sessions_chunked<S, F>(
    config: &PlanConfig,
    trial_count: usize,
    chunk_size: usize,
    rng: &mut S,
    on_chunk: F,
) -> Result<SimulationOutcome>
where
    S: UniformSource + ?Sized,
    F: FnMut(SimulationProgress) -> ControlFlow<()>,
{
    validate_trial_count(trial_count)?;
    let progression = build_progression(config)?;

    let outcome =
        SessionSimulator::new(&progression).run_chunked(trial_count, chunk_size, rng, on_chunk)?;

    info!(
        trials = outcome.summary.trials,
        rounds = progression.rounds.len(),
        win_rate = outcome.summary.win_rate,
        average_profit = outcome.summary.average_profit,
        cancelled = outcome.cancelled,
        "Simulation complete"
    );

    Ok(outcome)
}

/// Aggregates trial results. An empty slice gives an all-zero summary.
pub fn summarize(trials: &[SimulationResult]) -> SimulationSummary {
    if trials.is_empty() {
        return SimulationSummary::default();
    }

    let count = trials.len();
    let n = count as f64;
    let wins = trials.iter().filter(|t| t.won).count();

    let mut profits: Vec<f64> = trials.iter().map(|t| t.profit).collect();
    profits.sort_by(f64::total_cmp);

    let mean = profits.iter().sum::<f64>() / n;
    let variance = profits.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;

    let median = if count % 2 == 0 {
        (profits[count / 2 - 1] + profits[count / 2]) / 2.0
    } else {
        profits[count / 2]
    };

    SimulationSummary {
        trials: count,
        wins,
        losses: count - wins,
        win_rate: wins as f64 / n * 100.0,
        average_profit: mean,
        median_profit: median,
        std_dev_profit: variance.sqrt(),
        max_profit: profits[count - 1],
        min_profit: profits[0],
        profitable_trials: profits.iter().filter(|&&p| p > 0.0).count(),
    }
}

fn validate_trial_count(trial_count: usize) -> Result<()> {
    if trial_count == 0 || trial_count > MAX_TRIALS {
        return Err(ValidationError::TrialCount {
            got: trial_count,
            max: MAX_TRIALS,
        });
    }
    Ok(())
}
