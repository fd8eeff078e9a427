//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires from
//! the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `UniformSource`: Uniform `[0, 1)` draws for the session simulator

pub mod random;

pub use random::UniformSource;
