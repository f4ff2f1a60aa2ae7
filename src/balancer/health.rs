//! # Agent Health Tracking
//!
//! Per-agent runtime state used by the load balancer: health status,
//! consecutive-failure counting, current load, and last observed response
//! time. Records are created on registration, updated by health-check sweeps
//! and by explicit load/response-time reports, and destroyed on
//! unregistration.

use crate::core::error::TrafficResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Health status of an agent.
///
/// Degraded agents remain eligible for selection; unhealthy ones do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Agent is healthy and ready to receive work
    Healthy,
    /// Agent has failed at least one recent check but is still eligible
    Degraded,
    /// Agent reached the failover threshold and is excluded from selection
    Unhealthy,
}

impl HealthStatus {
    /// Whether an agent with this status may be selected.
    pub fn is_eligible(&self) -> bool {
        !matches!(self, HealthStatus::Unhealthy)
    }

    /// Status name as used in events and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

/// Per-agent health record.
#[derive(Debug, Clone, Serialize)]
pub struct AgentHealth {
    /// Current health status
    pub status: HealthStatus,
    /// Timestamp of the last health check (registration time initially)
    pub last_check: DateTime<Utc>,
    /// Consecutive failed health checks since the last success
    pub consecutive_failures: u32,
    /// Count of in-flight work currently dispatched to the agent
    pub current_load: u32,
    /// Last observed response time; `None` until the caller reports one.
    /// Unreported agents are treated as infinitely slow by the
    /// least-response-time strategy.
    #[serde(with = "humantime_serde")]
    pub response_time: Option<Duration>,
}

impl AgentHealth {
    /// Fresh record for a newly registered agent.
    pub fn new() -> Self {
        Self {
            status: HealthStatus::Healthy,
            last_check: Utc::now(),
            consecutive_failures: 0,
            current_load: 0,
            response_time: None,
        }
    }

    /// Apply a successful health check.
    pub fn record_success(&mut self) {
        self.status = HealthStatus::Healthy;
        self.consecutive_failures = 0;
        self.last_check = Utc::now();
    }

    /// Apply a failed health check; the agent becomes unhealthy once
    /// `failover_threshold` consecutive failures accumulate, degraded before.
    pub fn record_failure(&mut self, failover_threshold: u32) {
        self.consecutive_failures += 1;
        self.last_check = Utc::now();
        self.status = if self.consecutive_failures >= failover_threshold {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Degraded
        };
    }
}

impl Default for AgentHealth {
    fn default() -> Self {
        Self::new()
    }
}

/// Pluggable health-check callback invoked by the periodic sweep.
///
/// No probe implementation ships with the crate: what "healthy" means is up
/// to the integrator (TCP connect, application ping, queue depth check, ...).
/// Probes are awaited sequentially within one sweep, so an implementation
/// must carry its own timeout.
#[async_trait]
pub trait AgentProbe: Send + Sync {
    async fn check(&self, agent_id: &str) -> TrafficResult<()>;
}
