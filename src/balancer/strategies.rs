//! # Selection Strategies
//!
//! Pluggable algorithms for picking one agent from the set of candidates that
//! survived the health/load filter. Each strategy is a separate type behind
//! the [`BalancingStrategy`] trait; the balancer keeps a registry of named
//! strategies and can switch the active one at runtime, so adding an
//! algorithm means adding a type here and registering it, not touching
//! calling code.

use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A selection candidate: one agent that passed the health/load filter,
/// snapshotted at selection time.
#[derive(Debug, Clone)]
pub struct AgentCandidate {
    pub id: String,
    pub current_load: u32,
    pub response_time: Option<Duration>,
}

/// Core trait for agent selection algorithms.
///
/// Implementations receive only eligible candidates; an empty slice must
/// yield `None`.
pub trait BalancingStrategy: Send + Sync {
    /// Algorithm name used for configuration, events, and logging
    fn name(&self) -> &'static str;

    /// Select one candidate from the eligible set
    fn select<'a>(&self, candidates: &'a [AgentCandidate]) -> Option<&'a AgentCandidate>;
}

/// Round-robin selection with an atomic cursor.
///
/// Deterministic rotation across calls: each selection advances the cursor,
/// so with a stable candidate list every agent is picked in turn.
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
        }
    }
}

impl Default for RoundRobin {
    fn default() -> Self {
        Self::new()
    }
}

impl BalancingStrategy for RoundRobin {
    fn name(&self) -> &'static str {
        "round_robin"
    }

    fn select<'a>(&self, candidates: &'a [AgentCandidate]) -> Option<&'a AgentCandidate> {
        if candidates.is_empty() {
            return None;
        }
        let index = self.counter.fetch_add(1, Ordering::Relaxed) % candidates.len();
        candidates.get(index)
    }
}

/// Picks the candidate with the fewest in-flight connections.
/// Deterministic: the first candidate wins ties.
pub struct LeastConnections;

impl BalancingStrategy for LeastConnections {
    fn name(&self) -> &'static str {
        "least_connections"
    }

    fn select<'a>(&self, candidates: &'a [AgentCandidate]) -> Option<&'a AgentCandidate> {
        candidates.iter().min_by_key(|c| c.current_load)
    }
}

/// Weighted random selection where each candidate's weight is inversely
/// proportional to its current load (`1 / (load + 1)`), so lightly loaded
/// agents are proportionally more likely to be picked.
pub struct WeightedRoundRobin;

impl BalancingStrategy for WeightedRoundRobin {
    fn name(&self) -> &'static str {
        "weighted_round_robin"
    }

    fn select<'a>(&self, candidates: &'a [AgentCandidate]) -> Option<&'a AgentCandidate> {
        if candidates.is_empty() {
            return None;
        }

        let weights: Vec<f64> = candidates
            .iter()
            .map(|c| 1.0 / (c.current_load as f64 + 1.0))
            .collect();
        let total: f64 = weights.iter().sum();

        let mut remaining = rand::thread_rng().gen_range(0.0..total);
        for (candidate, weight) in candidates.iter().zip(&weights) {
            if remaining < *weight {
                return Some(candidate);
            }
            remaining -= weight;
        }

        // Floating-point rounding can leave a sliver of remaining weight.
        candidates.last()
    }
}

/// Picks the candidate with the smallest recorded response time. Candidates
/// that never reported one are treated as infinitely slow, so they are only
/// chosen when no measured alternative exists.
pub struct LeastResponseTime;

impl BalancingStrategy for LeastResponseTime {
    fn name(&self) -> &'static str {
        "least_response_time"
    }

    fn select<'a>(&self, candidates: &'a [AgentCandidate]) -> Option<&'a AgentCandidate> {
        candidates
            .iter()
            .min_by_key(|c| c.response_time.unwrap_or(Duration::MAX))
    }
}

/// Extension point for context-aware selection (CPU, memory, queue depth).
/// Currently delegates to least-connections.
pub struct ResourceBased {
    fallback: LeastConnections,
}

impl ResourceBased {
    pub fn new() -> Self {
        Self {
            fallback: LeastConnections,
        }
    }
}

impl Default for ResourceBased {
    fn default() -> Self {
        Self::new()
    }
}

impl BalancingStrategy for ResourceBased {
    fn name(&self) -> &'static str {
        "resource_based"
    }

    fn select<'a>(&self, candidates: &'a [AgentCandidate]) -> Option<&'a AgentCandidate> {
        self.fallback.select(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(loads: &[u32]) -> Vec<AgentCandidate> {
        loads
            .iter()
            .enumerate()
            .map(|(i, &load)| AgentCandidate {
                id: format!("agent-{i}"),
                current_load: load,
                response_time: None,
            })
            .collect()
    }

    #[test]
    fn test_round_robin_rotates() {
        let strategy = RoundRobin::new();
        let pool = candidates(&[0, 0, 0]);

        let picks: Vec<&str> = (0..6)
            .map(|_| strategy.select(&pool).unwrap().id.as_str())
            .collect();
        assert_eq!(
            picks,
            vec!["agent-0", "agent-1", "agent-2", "agent-0", "agent-1", "agent-2"]
        );
    }

    #[test]
    fn test_round_robin_empty() {
        let strategy = RoundRobin::new();
        assert!(strategy.select(&[]).is_none());
    }

    #[test]
    fn test_least_connections_picks_minimum() {
        let strategy = LeastConnections;
        let pool = candidates(&[5, 2, 8]);
        assert_eq!(strategy.select(&pool).unwrap().id, "agent-1");
    }

    #[test]
    fn test_weighted_round_robin_prefers_light_agents() {
        let strategy = WeightedRoundRobin;
        // One idle agent and one heavily loaded agent: the idle one should
        // win the large majority of picks.
        let pool = candidates(&[0, 99]);

        let mut idle_wins = 0;
        for _ in 0..1000 {
            if strategy.select(&pool).unwrap().id == "agent-0" {
                idle_wins += 1;
            }
        }
        assert!(idle_wins > 900, "idle agent won only {idle_wins}/1000 picks");
    }

    #[test]
    fn test_least_response_time_ignores_unmeasured() {
        let strategy = LeastResponseTime;
        let pool = vec![
            AgentCandidate {
                id: "unmeasured".to_string(),
                current_load: 0,
                response_time: None,
            },
            AgentCandidate {
                id: "slow".to_string(),
                current_load: 0,
                response_time: Some(Duration::from_millis(900)),
            },
            AgentCandidate {
                id: "fast".to_string(),
                current_load: 0,
                response_time: Some(Duration::from_millis(30)),
            },
        ];
        assert_eq!(strategy.select(&pool).unwrap().id, "fast");
    }

    #[test]
    fn test_least_response_time_falls_back_to_unmeasured() {
        let strategy = LeastResponseTime;
        let pool = vec![AgentCandidate {
            id: "only".to_string(),
            current_load: 0,
            response_time: None,
        }];
        assert_eq!(strategy.select(&pool).unwrap().id, "only");
    }

    #[test]
    fn test_resource_based_delegates_to_least_connections() {
        let strategy = ResourceBased::new();
        let pool = candidates(&[7, 1, 4]);
        assert_eq!(strategy.select(&pool).unwrap().id, "agent-1");
    }
}
