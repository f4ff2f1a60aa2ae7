//! Queue item type shared by the queue manager and its callers.

use std::time::Instant;
use uuid::Uuid;

/// A unit of work submitted to a named queue.
///
/// The payload is opaque to the manager; priority and retry bookkeeping are
/// mutated only through [`crate::queue::QueueManager::requeue`].
#[derive(Debug, Clone)]
pub struct QueueItem<T> {
    /// Unique identifier assigned at submission
    pub id: String,

    /// Name of the queue this item belongs to
    pub queue: String,

    /// Opaque payload carried through to the processor
    pub payload: T,

    /// Numeric priority; higher values are dequeued sooner
    pub priority: u8,

    /// When the item was (most recently) enqueued. Refreshed on requeue so
    /// wait-time statistics reflect the current stay in the queue.
    pub enqueued_at: Instant,

    /// Number of times this item has been re-enqueued after a failure
    pub retry_count: u32,
}

impl<T> QueueItem<T> {
    /// Create a fresh item with a generated id and zero retries.
    pub fn new(queue: impl Into<String>, payload: T, priority: u8) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            queue: queue.into(),
            payload,
            priority,
            enqueued_at: Instant::now(),
            retry_count: 0,
        }
    }
}
