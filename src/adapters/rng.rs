//! Random Source Adapters - rand-backed and scripted uniform draws
//!
//! `RngSource` wraps any `rand::RngCore` (ChaCha20 by default, so a seed
//! reproduces a simulation bit for bit on every platform).
//! `ScriptedSource` replays a fixed list of draws for deterministic tests.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::ports::random::UniformSource;

/// Uniform source over a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

/// Seedable, platform-independent source used by the CLI.
pub type SeededSource = RngSource<ChaCha20Rng>;

impl<R: RngCore> RngSource<R> {
    /// Wrap an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<ChaCha20Rng> {
    /// Deterministic ChaCha20 stream for the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha20Rng::seed_from_u64(seed))
    }

    /// ChaCha20 stream seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha20Rng::from_entropy())
    }
}

impl<R: RngCore> UniformSource for RngSource<R> {
    fn next_uniform(&mut self) -> f64 {
        // Standard distribution for f64 is [0, 1)
        self.rng.r#gen::<f64>()
    }
}

/// Replays a fixed sequence of draws, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    /// Values outside `[0, 1)` are clamped into range.
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        let draws: Vec<f64> = draws
            .into()
            .into_iter()
            .map(|d| if d.is_finite() { d.clamp(0.0, 1.0 - f64::EPSILON) } else { 0.0 })
            .collect();
        Self { draws, cursor: 0 }
    }

    /// Number of draws handed out so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for ScriptedSource {
    fn next_uniform(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let draw = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        draw
    }
}
