//! # Work Queue Module
//!
//! Named, priority-ordered work queues with retry/backoff handling:
//!
//! - `QueueManager`: the queue table, enqueue/dequeue/requeue operations,
//!   per-queue statistics, and the per-queue worker loop
//! - `QueueItem`: a unit of work with priority and retry bookkeeping
//! - `ItemProcessor`: the pluggable processing callback

pub mod item;
pub mod manager;

pub use item::QueueItem;
pub use manager::{ItemProcessor, QueueManager, QueueStats};
