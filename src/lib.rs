//! # Traffic Manager Library
//!
//! In-process traffic-handling primitives for host applications that dispatch
//! work to a pool of backend agents. Two independent components:
//!
//! - [`QueueManager`]: named, priority-ordered work queues with retry/backoff,
//!   per-queue statistics, and a per-queue asynchronous processing loop
//! - [`LoadBalancer`]: per-agent health and load tracking with pluggable,
//!   runtime-switchable selection algorithms and an optional periodic
//!   health-check sweep
//!
//! Both components are plain library objects: no network surface, no
//! persistence, no process-wide singletons. Construct them explicitly, share
//! them by cloning (clones share state via an inner `Arc`), and observe them
//! through their broadcast event channels.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use traffic_manager::{
//!     ItemProcessor, QueueConfig, QueueItem, QueueManager, TrafficResult,
//! };
//!
//! struct PrintProcessor;
//!
//! #[async_trait::async_trait]
//! impl ItemProcessor<String> for PrintProcessor {
//!     async fn process(&self, item: &QueueItem<String>) -> TrafficResult<()> {
//!         println!("processing {}", item.payload);
//!         Ok(())
//!     }
//! }
//!
//! # async fn run() -> TrafficResult<()> {
//! let manager = QueueManager::new(QueueConfig::default(), Arc::new(PrintProcessor));
//! manager.enqueue("rfq", "match supplier".to_string(), 5).await?;
//! # Ok(())
//! # }
//! ```

/// Core functionality: error types, configuration, and lifecycle events
pub mod core;

/// Named priority work queues with retry handling and worker loops
pub mod queue;

/// Agent health tracking and selection strategies
pub mod balancer;

// Re-export the main public API surface so users don't need to know the
// internal module layout.
pub use crate::core::config::{LoadBalancerConfig, QueueConfig, TrafficConfig};
pub use crate::core::error::{TrafficError, TrafficResult};
pub use crate::core::events::{BalancerEvent, QueueEvent};
pub use balancer::{AgentCandidate, AgentHealth, AgentProbe, BalancingStrategy, HealthStatus, LoadBalancer};
pub use queue::{ItemProcessor, QueueItem, QueueManager, QueueStats};
