//! # Load Balancer
//!
//! Chooses one agent from a candidate list according to a runtime-switchable
//! algorithm, while tracking each agent's health and load so that unhealthy
//! or overloaded agents are excluded from selection.
//!
//! Health checking is optional: when the configured interval is positive and
//! a probe is supplied, a background sweep checks every registered agent
//! sequentially each tick. A failed probe only changes the agent's recorded
//! status; it never aborts the sweep.

use crate::balancer::health::{AgentHealth, AgentProbe};
use crate::balancer::strategies::{
    AgentCandidate, BalancingStrategy, LeastConnections, LeastResponseTime, ResourceBased,
    RoundRobin, WeightedRoundRobin,
};
use crate::core::config::LoadBalancerConfig;
use crate::core::error::{TrafficError, TrafficResult};
use crate::core::events::BalancerEvent;
use dashmap::DashMap;
use metrics::{counter, gauge};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

struct BalancerInner {
    config: LoadBalancerConfig,
    agents: DashMap<String, AgentHealth>,
    strategies: DashMap<String, Arc<dyn BalancingStrategy>>,
    current: RwLock<Arc<dyn BalancingStrategy>>,
    events: broadcast::Sender<BalancerEvent>,
    sweep: Mutex<Option<CancellationToken>>,
}

/// Agent health tracking and pluggable selection.
///
/// Cheaply cloneable; clones share the same agent table and active strategy.
#[derive(Clone)]
pub struct LoadBalancer {
    inner: Arc<BalancerInner>,
}

impl LoadBalancer {
    /// Create a load balancer with the built-in strategies registered and
    /// the configured algorithm active.
    ///
    /// Fails with a configuration error if the configured algorithm name is
    /// unknown.
    pub fn new(config: LoadBalancerConfig) -> TrafficResult<Self> {
        let strategies: DashMap<String, Arc<dyn BalancingStrategy>> = DashMap::new();
        for strategy in [
            Arc::new(RoundRobin::new()) as Arc<dyn BalancingStrategy>,
            Arc::new(LeastConnections) as Arc<dyn BalancingStrategy>,
            Arc::new(WeightedRoundRobin) as Arc<dyn BalancingStrategy>,
            Arc::new(LeastResponseTime) as Arc<dyn BalancingStrategy>,
            Arc::new(ResourceBased::new()) as Arc<dyn BalancingStrategy>,
        ] {
            strategies.insert(strategy.name().to_string(), strategy);
        }

        let current = strategies
            .get(&config.algorithm)
            .map(|e| e.value().clone())
            .ok_or_else(|| {
                TrafficError::config(format!("unknown selection algorithm: {}", config.algorithm))
            })?;

        let (events, _) = broadcast::channel(256);
        Ok(Self {
            inner: Arc::new(BalancerInner {
                config,
                agents: DashMap::new(),
                strategies,
                current: RwLock::new(current),
                events,
                sweep: Mutex::new(None),
            }),
        })
    }

    /// Subscribe to balancer lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<BalancerEvent> {
        self.inner.events.subscribe()
    }

    /// Register an agent with a fresh health record.
    ///
    /// Idempotent per id: re-registering resets status, failures, load, and
    /// response time.
    pub fn register_agent(&self, agent_id: &str) {
        self.inner
            .agents
            .insert(agent_id.to_string(), AgentHealth::new());
        debug!(agent_id, "agent registered");
        self.inner.emit(BalancerEvent::AgentRegistered {
            agent_id: agent_id.to_string(),
        });
    }

    /// Remove an agent's health record. Returns whether it existed.
    pub fn unregister_agent(&self, agent_id: &str) -> bool {
        let removed = self.inner.agents.remove(agent_id).is_some();
        if removed {
            debug!(agent_id, "agent unregistered");
            self.inner.emit(BalancerEvent::AgentUnregistered {
                agent_id: agent_id.to_string(),
            });
        }
        removed
    }

    /// Select one agent from the candidate list using the active algorithm.
    ///
    /// Candidates are filtered to registered agents whose status is not
    /// unhealthy and whose load is strictly below the configured per-agent
    /// maximum; unknown ids are skipped. Returns `None` when no candidate
    /// survives — a valid result, not an error: the caller decides whether
    /// to queue, shed, or retry.
    pub fn select_agent(&self, candidates: &[String]) -> Option<String> {
        let survivors: Vec<AgentCandidate> = candidates
            .iter()
            .filter_map(|id| {
                let health = self.inner.agents.get(id)?;
                if health.status.is_eligible()
                    && health.current_load < self.inner.config.max_connections_per_agent
                {
                    Some(AgentCandidate {
                        id: id.clone(),
                        current_load: health.current_load,
                        response_time: health.response_time,
                    })
                } else {
                    None
                }
            })
            .collect();

        let strategy = self.inner.current.read().clone();
        let selected = strategy.select(&survivors).map(|c| c.id.clone());

        match &selected {
            Some(agent_id) => {
                counter!("traffic_balancer_selections_total").increment(1);
                debug!(
                    agent_id = %agent_id,
                    algorithm = strategy.name(),
                    survivors = survivors.len(),
                    "agent selected"
                );
            }
            None => {
                counter!("traffic_balancer_failed_selections_total").increment(1);
                warn!(
                    algorithm = strategy.name(),
                    candidates = candidates.len(),
                    "no agent available"
                );
            }
        }
        selected
    }

    /// Report the current in-flight load for an agent.
    /// Returns whether the agent is registered.
    pub fn update_agent_load(&self, agent_id: &str, load: u32) -> bool {
        let Some(mut health) = self.inner.agents.get_mut(agent_id) else {
            return false;
        };
        health.current_load = load;
        drop(health);

        gauge!("traffic_balancer_agent_load", "agent" => agent_id.to_string()).set(load as f64);
        self.inner.emit(BalancerEvent::AgentLoadUpdated {
            agent_id: agent_id.to_string(),
            load,
        });
        true
    }

    /// Report an observed response time for an agent.
    /// Returns whether the agent is registered.
    pub fn update_agent_response_time(&self, agent_id: &str, response_time: Duration) -> bool {
        let Some(mut health) = self.inner.agents.get_mut(agent_id) else {
            return false;
        };
        health.response_time = Some(response_time);
        drop(health);

        self.inner.emit(BalancerEvent::AgentResponseTimeUpdated {
            agent_id: agent_id.to_string(),
            response_ms: response_time.as_millis() as u64,
        });
        true
    }

    /// Switch the active selection algorithm at runtime.
    ///
    /// Takes effect on the next `select_agent` call; agents do not need to
    /// re-register.
    pub fn set_algorithm(&self, algorithm: &str) -> TrafficResult<()> {
        let strategy = self
            .inner
            .strategies
            .get(algorithm)
            .map(|e| e.value().clone())
            .ok_or_else(|| {
                TrafficError::config(format!("unknown selection algorithm: {algorithm}"))
            })?;

        *self.inner.current.write() = strategy;
        counter!("traffic_balancer_algorithm_switches_total").increment(1);
        info!(algorithm, "selection algorithm changed");
        self.inner.emit(BalancerEvent::AlgorithmChanged {
            algorithm: algorithm.to_string(),
        });
        Ok(())
    }

    /// Name of the currently active algorithm.
    pub fn current_algorithm(&self) -> &'static str {
        self.inner.current.read().name()
    }

    /// Names of all registered algorithms.
    pub fn available_algorithms(&self) -> Vec<String> {
        self.inner.strategies.iter().map(|e| e.key().clone()).collect()
    }

    /// Register a custom selection strategy under its own name.
    pub fn register_strategy(&self, strategy: Arc<dyn BalancingStrategy>) {
        self.inner
            .strategies
            .insert(strategy.name().to_string(), strategy);
    }

    /// Health record for one agent.
    pub fn agent_health(&self, agent_id: &str) -> Option<AgentHealth> {
        self.inner.agents.get(agent_id).map(|e| e.value().clone())
    }

    /// Health records for all registered agents.
    pub fn all_agent_health(&self) -> HashMap<String, AgentHealth> {
        self.inner
            .agents
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// Start the periodic health-check sweep with the given probe.
    ///
    /// Returns `false` without spawning when the configured interval is zero
    /// (health checking disabled) or a sweep is already running.
    pub fn start_health_checks(&self, probe: Arc<dyn AgentProbe>) -> bool {
        if self.inner.config.health_check_interval.is_zero() {
            debug!("health checking disabled (zero interval)");
            return false;
        }

        let mut sweep = self.inner.sweep.lock();
        if sweep.is_some() {
            return false;
        }

        let token = CancellationToken::new();
        *sweep = Some(token.clone());
        drop(sweep);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.run_health_sweep(probe, token).await;
        });
        true
    }

    /// Cancel the health-check sweep, if one is running.
    pub fn stop_health_checks(&self) {
        if let Some(token) = self.inner.sweep.lock().take() {
            token.cancel();
            debug!("health-check sweep stopped");
        }
    }
}

impl BalancerInner {
    fn emit(&self, event: BalancerEvent) {
        let _ = self.events.send(event);
    }

    /// Periodic sweep: probe every registered agent sequentially each tick.
    /// A slow probe delays the remainder of the same sweep, so probes must
    /// carry their own timeout.
    async fn run_health_sweep(
        self: Arc<Self>,
        probe: Arc<dyn AgentProbe>,
        token: CancellationToken,
    ) {
        let mut interval = tokio::time::interval(self.config.health_check_interval);
        // The first tick fires immediately; skip it so freshly registered
        // agents get a full interval before their first check.
        interval.tick().await;

        info!(
            interval = ?self.config.health_check_interval,
            "health-check sweep started"
        );
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = interval.tick() => {
                    let agent_ids: Vec<String> =
                        self.agents.iter().map(|e| e.key().clone()).collect();
                    for agent_id in agent_ids {
                        let result = probe.check(&agent_id).await;
                        self.apply_check_result(&agent_id, result);
                    }
                }
            }
        }
        info!("health-check sweep exited");
    }

    fn apply_check_result(&self, agent_id: &str, result: TrafficResult<()>) {
        // The agent may have unregistered while its probe was in flight.
        let Some(mut health) = self.agents.get_mut(agent_id) else {
            return;
        };
        match result {
            Ok(()) => {
                health.record_success();
            }
            Err(err) => {
                health.record_failure(self.config.failover_threshold);
                let consecutive_failures = health.consecutive_failures;
                let status = health.status;
                drop(health);

                warn!(
                    agent_id,
                    consecutive_failures,
                    status = status.as_str(),
                    error = %err,
                    "agent health check failed"
                );
                counter!("traffic_balancer_health_check_failures_total").increment(1);
                self.emit(BalancerEvent::AgentHealthCheckFailed {
                    agent_id: agent_id.to_string(),
                    consecutive_failures,
                    status: status.as_str().to_string(),
                });
            }
        }
    }
}
