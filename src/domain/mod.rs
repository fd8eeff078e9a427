//! Domain layer - Core staking math.
//!
//! Pure functions and plain data: odds normalization, the progression
//! state machine and the closed-form statistics. No I/O and no logging
//! (hexagonal architecture inner ring). All types are serializable and
//! testable in isolation.

pub mod error;
pub mod kelly;
pub mod odds;
pub mod plan;
pub mod progression;
pub mod statistics;

// Re-export core types for convenience
pub use error::ValidationError;
pub use odds::{OddsType, OddsValue, Payout};
pub use plan::PlanConfig;
pub use progression::{Progression, Round, StopReason, build_progression};
pub use statistics::{Statistics, compute_statistics};
