//! # Configuration Module
//!
//! Serde-backed configuration for the queue manager and load balancer.
//! Configuration can be built in code (every struct implements `Default`)
//! or loaded from a YAML file via [`TrafficConfig::from_yaml_file`].
//!
//! Durations are parsed with `humantime-serde`, so YAML values like `30s`
//! or `500ms` work as expected.

use crate::core::error::{TrafficError, TrafficResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the queue manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum number of items a single named queue may hold.
    /// Enqueueing beyond this limit fails with a capacity error.
    pub max_queue_size: usize,

    /// Maximum number of times a failed item may be re-enqueued before
    /// being dropped permanently. Applies to all queues.
    pub max_retries: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_queue_size: 1000,
            max_retries: 3,
        }
    }
}

/// Configuration for the load balancer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadBalancerConfig {
    /// Interval between health-check sweeps. A zero interval disables
    /// health checking entirely.
    #[serde(with = "humantime_serde")]
    pub health_check_interval: Duration,

    /// Number of consecutive failed health checks before an agent is
    /// marked unhealthy (and excluded from selection).
    pub failover_threshold: u32,

    /// Maximum in-flight work per agent. Agents at or above this load are
    /// excluded from selection.
    pub max_connections_per_agent: u32,

    /// Name of the selection algorithm to start with.
    pub algorithm: String,
}

impl Default for LoadBalancerConfig {
    fn default() -> Self {
        Self {
            health_check_interval: Duration::from_secs(30),
            failover_threshold: 3,
            max_connections_per_agent: 100,
            algorithm: "round_robin".to_string(),
        }
    }
}

/// Top-level configuration combining both components.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrafficConfig {
    /// Queue manager configuration
    #[serde(default)]
    pub queue: QueueConfig,

    /// Load balancer configuration
    #[serde(default)]
    pub balancer: LoadBalancerConfig,
}

impl TrafficConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> TrafficResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml_str(content: &str) -> TrafficResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> TrafficResult<()> {
        if self.queue.max_queue_size == 0 {
            return Err(TrafficError::config("max_queue_size must be greater than zero"));
        }
        if self.balancer.max_connections_per_agent == 0 {
            return Err(TrafficError::config(
                "max_connections_per_agent must be greater than zero",
            ));
        }
        if self.balancer.failover_threshold == 0 {
            return Err(TrafficError::config(
                "failover_threshold must be greater than zero",
            ));
        }
        Ok(())
    }
}
