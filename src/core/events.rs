//! # Lifecycle Events
//!
//! Both managers publish their lifecycle events on a `tokio::sync::broadcast`
//! channel. Hosts subscribe via `QueueManager::subscribe` /
//! `LoadBalancer::subscribe`; emission with no active subscribers is a no-op.
//!
//! Events are plain data and serde-serializable so they can be forwarded to
//! logs, admin endpoints, or external sinks without further mapping.

use serde::{Deserialize, Serialize};

/// Events emitted by the queue manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum QueueEvent {
    /// An item was accepted into a queue
    Enqueued {
        queue: String,
        item_id: String,
        priority: u8,
    },
    /// An item was handed out for processing
    Dequeued {
        queue: String,
        item_id: String,
        wait_ms: u64,
    },
    /// An item was explicitly removed before being dequeued
    Removed { queue: String, item_id: String },
    /// A queue was emptied and its statistics reset
    Cleared { queue: String },
    /// The worker loop picked up an item and is invoking the processor
    Processing {
        queue: String,
        item_id: String,
        attempt: u32,
    },
    /// An item failed permanently (no retry budget left)
    ItemFailed {
        queue: String,
        item_id: String,
        error: String,
    },
    /// A requeue was refused because the retry budget was exhausted
    MaxRetriesReached {
        queue: String,
        item_id: String,
        attempts: u32,
    },
    /// An enqueue was refused because the queue was at capacity
    Overflow { queue: String, size: usize },
}

/// Events emitted by the load balancer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BalancerEvent {
    /// An agent registered (or re-registered, resetting its state)
    AgentRegistered { agent_id: String },
    /// An agent was removed from the health table
    AgentUnregistered { agent_id: String },
    /// A caller reported a new in-flight load for an agent
    AgentLoadUpdated { agent_id: String, load: u32 },
    /// A caller reported an observed response time for an agent
    AgentResponseTimeUpdated { agent_id: String, response_ms: u64 },
    /// A health-check probe failed for an agent
    AgentHealthCheckFailed {
        agent_id: String,
        consecutive_failures: u32,
        status: String,
    },
    /// The active selection algorithm was switched at runtime
    AlgorithmChanged { algorithm: String },
}
