//! # Load Balancing Module
//!
//! Agent selection with health and load tracking:
//!
//! - `LoadBalancer`: agent registration, the health/load filter, runtime
//!   algorithm switching, and the optional periodic health-check sweep
//! - `strategies`: the built-in selection algorithms behind the
//!   `BalancingStrategy` trait
//! - `health`: per-agent health records and the `AgentProbe` extension point

pub mod health;
pub mod manager;
pub mod strategies;

pub use health::{AgentHealth, AgentProbe, HealthStatus};
pub use manager::LoadBalancer;
pub use strategies::{AgentCandidate, BalancingStrategy};
