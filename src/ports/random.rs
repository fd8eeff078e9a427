//! Random Source Port - Uniform Draws for the Session Simulator
//!
//! The simulator needs exactly one thing from the outside world: a stream
//! of uniform values in `[0, 1)`. Keeping it behind a trait lets tests
//! script the draws and lets the CLI pick a seeded or entropy-backed
//! generator.

/// Source of uniform draws in `[0, 1)`.
pub trait UniformSource {
  /// Next draw. Implementations must stay inside `[0, 1)`.
  fn next_uniform(&mut self) -> f64;
}

impl<T: UniformSource + ?Sized> UniformSource for &mut T {
  fn next_uniform(&mut self) -> f64 {
    (**self).next_uniform()
  }
}

impl<T: UniformSource + ?Sized> UniformSource for Box<T> {
  fn next_uniform(&mut self) -> f64 {
    (**self).next_uniform()
  }
}
