//! # Error Handling Module
//!
//! This module provides the error types used throughout the traffic manager,
//! built on the `thiserror` crate. Every fallible operation in the crate
//! returns [`TrafficResult`], and the variants below form the complete error
//! taxonomy:
//!
//! - Resource exhaustion (`QueueFull`, `RetriesExhausted`) is raised
//!   synchronously to the caller of the specific operation.
//! - Steady-state failures (`Processing`, `AgentUnavailable`) are what the
//!   pluggable processor and probe callbacks return; the owning loops catch
//!   them and convert them into events and status changes, so they never
//!   propagate out of a worker or health sweep.

use thiserror::Error;

/// Main result type used throughout the traffic manager.
pub type TrafficResult<T> = Result<T, TrafficError>;

/// Comprehensive error types for the traffic manager.
///
/// Each variant represents a different category of error. The `#[error("...")]`
/// attribute from `thiserror` implements `Display` with the given message.
#[derive(Debug, Error, Clone)]
pub enum TrafficError {
    /// A queue has reached its configured maximum length
    #[error("Queue '{queue}' is full (max {max_size} items)")]
    QueueFull { queue: String, max_size: usize },

    /// An item's retry budget is exhausted; the item is dropped permanently
    #[error("Item '{item_id}' in queue '{queue}' exhausted its retry budget after {attempts} attempts")]
    RetriesExhausted {
        queue: String,
        item_id: String,
        attempts: u32,
    },

    /// An item-processing callback failed
    #[error("Processing failed: {message}")]
    Processing { message: String },

    /// A health-check probe could not reach an agent
    #[error("Agent '{agent_id}' unavailable: {reason}")]
    AgentUnavailable { agent_id: String, reason: String },

    /// Configuration-related errors (unknown algorithm, invalid values, etc.)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Timed out waiting on a condition (e.g. for a queue to drain)
    #[error("Timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// I/O errors (config file loading, etc.)
    #[error("I/O error: {message}")]
    Io { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// YAML parsing errors for configuration files
    #[error("YAML error: {message}")]
    Yaml { message: String },
}

impl TrafficError {
    /// Create a configuration error with a custom message
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing error with a custom message
    pub fn processing<S: Into<String>>(message: S) -> Self {
        Self::Processing {
            message: message.into(),
        }
    }

    /// Create an agent-unavailable error
    pub fn agent_unavailable<S: Into<String>>(agent_id: S, reason: S) -> Self {
        Self::AgentUnavailable {
            agent_id: agent_id.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error should be retried
    ///
    /// Processing and probe failures are transient; exhausted budgets and
    /// configuration problems are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Processing { .. } => true,
            Self::AgentUnavailable { .. } => true,
            Self::Timeout { .. } => true,
            Self::Io { .. } => true,
            _ => false,
        }
    }

    /// Get a string representation of the error type for events and logs
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::QueueFull { .. } => "queue_full",
            Self::RetriesExhausted { .. } => "retries_exhausted",
            Self::Processing { .. } => "processing_error",
            Self::AgentUnavailable { .. } => "agent_unavailable",
            Self::Configuration { .. } => "configuration_error",
            Self::Timeout { .. } => "timeout",
            Self::Io { .. } => "io_error",
            Self::Json { .. } => "json_error",
            Self::Yaml { .. } => "yaml_error",
        }
    }
}

/// Implement conversion from std::io::Error
impl From<std::io::Error> for TrafficError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Implement conversion from serde_json::Error
impl From<serde_json::Error> for TrafficError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
        }
    }
}

/// Implement conversion from serde_yaml::Error
impl From<serde_yaml::Error> for TrafficError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml {
            message: err.to_string(),
        }
    }
}
