//! Core functionality: error types, configuration, and lifecycle events.
//! These are the fundamental building blocks used by both the queue manager
//! and the load balancer.

pub mod config;
pub mod error;
pub mod events;

pub use config::{LoadBalancerConfig, QueueConfig, TrafficConfig};
pub use error::{TrafficError, TrafficResult};
pub use events::{BalancerEvent, QueueEvent};
