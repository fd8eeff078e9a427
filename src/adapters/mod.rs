//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies, and renders reports for the presentation layer.
//!
//! Adapter categories:
//! - `rng`: `rand` / ChaCha20 backed uniform sources, plus a scripted one
//! - `export`: CSV and JSON rendering of plan reports

pub mod export;
pub mod rng;
