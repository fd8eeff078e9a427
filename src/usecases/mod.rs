//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement the
//! planner's workflows. Each use case is a self-contained operation.
//!
//! Use cases:
//! - `planner`: Progression + statistics + resolved config echo
//! - `SessionSimulator`: Monte Carlo sessions over a shared progression
//! - `RiskAdvisor`: Rule-based warnings from plan statistics

pub mod planner;
pub mod risk_advisory;
pub mod session_simulator;
