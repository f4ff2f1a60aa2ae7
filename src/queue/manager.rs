//! # Queue Manager
//!
//! Named, priority-ordered work queues with retry handling and per-queue
//! statistics. Each named queue holds its items in descending priority order
//! (ties keep arrival order) and is drained by at most one worker task at a
//! time, so a slow processor serializes processing for that queue while
//! separate queues proceed independently.
//!
//! The manager is cheaply cloneable; clones share the same queue table. All
//! lifecycle transitions are published as [`QueueEvent`]s on a broadcast
//! channel.

use crate::core::config::QueueConfig;
use crate::core::error::{TrafficError, TrafficResult};
use crate::core::events::QueueEvent;
use crate::queue::item::QueueItem;
use async_trait::async_trait;
use dashmap::DashMap;
use metrics::{counter, gauge};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

/// Pluggable item-processing callback invoked by the per-queue worker loop.
///
/// Errors returned here are caught per item: the manager either requeues the
/// item (if retry budget remains) or drops it and emits an `ItemFailed`
/// event. A failure never stops the worker loop.
#[async_trait]
pub trait ItemProcessor<T>: Send + Sync {
    async fn process(&self, item: &QueueItem<T>) -> TrafficResult<()>;
}

/// Per-queue aggregate statistics.
///
/// Reset to zero when the queue is cleared.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueueStats {
    /// Items accepted via enqueue (requeues are not counted again)
    pub total_added: u64,
    /// Items handed out for processing
    pub total_dequeued: u64,
    /// Items processed successfully
    pub total_processed: u64,
    /// Items dropped after exhausting their retry budget
    pub total_failed: u64,
    /// Average observed queue wait time in milliseconds
    pub avg_wait_ms: u64,
    /// Maximum observed queue wait time in milliseconds
    pub max_wait_ms: u64,
    #[serde(skip)]
    total_wait_ms: u64,
}

impl QueueStats {
    fn record_wait(&mut self, wait: Duration) {
        let wait_ms = wait.as_millis() as u64;
        self.total_dequeued += 1;
        self.total_wait_ms += wait_ms;
        self.avg_wait_ms = self.total_wait_ms / self.total_dequeued;
        self.max_wait_ms = self.max_wait_ms.max(wait_ms);
    }
}

/// State of one named queue. Guarded by an async mutex so the worker can
/// hold it only between suspension points, never across a processor call.
struct QueueState<T> {
    items: VecDeque<QueueItem<T>>,
    stats: QueueStats,
    /// Re-entrancy guard: true while a worker task is draining this queue
    worker_active: bool,
}

impl<T> Default for QueueState<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
            stats: QueueStats::default(),
            worker_active: false,
        }
    }
}

struct ManagerInner<T> {
    config: QueueConfig,
    queues: DashMap<String, Arc<Mutex<QueueState<T>>>>,
    processor: Arc<dyn ItemProcessor<T>>,
    events: broadcast::Sender<QueueEvent>,
}

/// Named, priority-ordered work queues with retry/backoff and statistics.
pub struct QueueManager<T> {
    inner: Arc<ManagerInner<T>>,
}

impl<T> Clone for QueueManager<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + 'static> QueueManager<T> {
    /// Create a new queue manager with the given configuration and processor.
    pub fn new(config: QueueConfig, processor: Arc<dyn ItemProcessor<T>>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(ManagerInner {
                config,
                queues: DashMap::new(),
                processor,
                events,
            }),
        }
    }

    /// Subscribe to queue lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.inner.events.subscribe()
    }

    /// Submit a payload to the named queue, creating the queue on first use.
    ///
    /// Returns the generated item id, or [`TrafficError::QueueFull`] if the
    /// queue is at its configured maximum length. A successful enqueue starts
    /// the worker loop for that queue if none is active.
    pub async fn enqueue(&self, queue: &str, payload: T, priority: u8) -> TrafficResult<String> {
        let state = self.inner.queue_state(queue);
        let mut st = state.lock().await;

        if st.items.len() >= self.inner.config.max_queue_size {
            warn!(queue, size = st.items.len(), "queue full, rejecting item");
            counter!("traffic_queue_overflows_total").increment(1);
            self.inner.emit(QueueEvent::Overflow {
                queue: queue.to_string(),
                size: st.items.len(),
            });
            return Err(TrafficError::QueueFull {
                queue: queue.to_string(),
                max_size: self.inner.config.max_queue_size,
            });
        }

        let item = QueueItem::new(queue, payload, priority);
        let item_id = item.id.clone();

        insert_by_priority(&mut st.items, item);
        st.stats.total_added += 1;

        counter!("traffic_queue_items_enqueued_total").increment(1);
        gauge!("traffic_queue_depth", "queue" => queue.to_string()).set(st.items.len() as f64);
        debug!(queue, item_id = %item_id, priority, depth = st.items.len(), "item enqueued");

        self.inner.emit(QueueEvent::Enqueued {
            queue: queue.to_string(),
            item_id: item_id.clone(),
            priority,
        });

        if !st.worker_active {
            st.worker_active = true;
            ManagerInner::spawn_worker(&self.inner, queue);
        }

        Ok(item_id)
    }

    /// Remove and return the highest-priority, oldest-among-ties item.
    ///
    /// Returns `None` if the queue is empty or was never created.
    pub async fn dequeue(&self, queue: &str) -> Option<QueueItem<T>> {
        let state = self.inner.queues.get(queue)?.value().clone();
        let mut st = state.lock().await;
        self.inner.pop_locked(queue, &mut st)
    }

    /// Remove a specific item by id, regardless of its position.
    ///
    /// Returns whether the item was found.
    pub async fn remove(&self, queue: &str, item_id: &str) -> bool {
        let Some(state) = self.inner.queues.get(queue).map(|e| e.value().clone()) else {
            return false;
        };
        let mut st = state.lock().await;
        let Some(pos) = st.items.iter().position(|item| item.id == item_id) else {
            return false;
        };
        st.items.remove(pos);
        gauge!("traffic_queue_depth", "queue" => queue.to_string()).set(st.items.len() as f64);
        debug!(queue, item_id, "item removed");
        self.inner.emit(QueueEvent::Removed {
            queue: queue.to_string(),
            item_id: item_id.to_string(),
        });
        true
    }

    /// Re-enqueue an item after a processing failure.
    ///
    /// Increments the retry count, lowers the priority by one step (floor
    /// zero), and refreshes the enqueue timestamp. If the retry budget is
    /// already exhausted the item is dropped: a `MaxRetriesReached` event is
    /// emitted and [`TrafficError::RetriesExhausted`] returned.
    pub async fn requeue(&self, item: QueueItem<T>) -> TrafficResult<()> {
        let inner = self.inner.clone();
        let queue = item.queue.clone();
        inner.requeue_item(item).await?;

        // The caller-driven retry path may run with no worker active.
        let state = self.inner.queue_state(&queue);
        let mut st = state.lock().await;
        if !st.worker_active {
            st.worker_active = true;
            ManagerInner::spawn_worker(&self.inner, &queue);
        }
        Ok(())
    }

    /// Empty the named queue and reset its statistics.
    pub async fn clear(&self, queue: &str) {
        let Some(state) = self.inner.queues.get(queue).map(|e| e.value().clone()) else {
            return;
        };
        let mut st = state.lock().await;
        st.items.clear();
        st.stats = QueueStats::default();
        gauge!("traffic_queue_depth", "queue" => queue.to_string()).set(0.0);
        debug!(queue, "queue cleared");
        self.inner.emit(QueueEvent::Cleared {
            queue: queue.to_string(),
        });
    }

    /// Statistics for one queue, or `None` if it was never created.
    pub async fn stats(&self, queue: &str) -> Option<QueueStats> {
        let state = self.inner.queues.get(queue)?.value().clone();
        let st = state.lock().await;
        Some(st.stats.clone())
    }

    /// Statistics for all queues.
    pub async fn all_stats(&self) -> HashMap<String, QueueStats> {
        let entries: Vec<_> = self
            .inner
            .queues
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();

        let mut stats = HashMap::new();
        for (name, state) in entries {
            let st = state.lock().await;
            stats.insert(name, st.stats.clone());
        }
        stats
    }

    /// Current number of queued items in the named queue.
    pub async fn len(&self, queue: &str) -> usize {
        match self.inner.queues.get(queue).map(|e| e.value().clone()) {
            Some(state) => state.lock().await.items.len(),
            None => 0,
        }
    }

    /// Wait until the named queue has drained, polling periodically.
    pub async fn wait_for_empty(&self, queue: &str, timeout: Duration) -> TrafficResult<()> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if self.len(queue).await == 0 {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let remaining = self.len(queue).await;
        warn!(queue, remaining, "timeout waiting for queue to drain");
        Err(TrafficError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        })
    }
}

impl<T: Send + 'static> ManagerInner<T> {
    fn emit(&self, event: QueueEvent) {
        let _ = self.events.send(event);
    }

    fn queue_state(&self, queue: &str) -> Arc<Mutex<QueueState<T>>> {
        self.queues
            .entry(queue.to_string())
            .or_default()
            .value()
            .clone()
    }

    /// Pop the front item while the state lock is held, updating wait-time
    /// statistics and emitting the `Dequeued` event.
    fn pop_locked(&self, queue: &str, st: &mut QueueState<T>) -> Option<QueueItem<T>> {
        let item = st.items.pop_front()?;
        let wait = item.enqueued_at.elapsed();
        st.stats.record_wait(wait);

        gauge!("traffic_queue_depth", "queue" => queue.to_string()).set(st.items.len() as f64);
        debug!(queue, item_id = %item.id, wait_ms = wait.as_millis() as u64, "item dequeued");

        self.emit(QueueEvent::Dequeued {
            queue: queue.to_string(),
            item_id: item.id.clone(),
            wait_ms: wait.as_millis() as u64,
        });
        Some(item)
    }

    /// Shared requeue path for both the caller-driven retry API and the
    /// worker's internal retry after a processing failure.
    async fn requeue_item(&self, mut item: QueueItem<T>) -> TrafficResult<()> {
        if item.retry_count >= self.config.max_retries {
            warn!(
                queue = %item.queue,
                item_id = %item.id,
                attempts = item.retry_count,
                "retry budget exhausted, dropping item"
            );
            self.emit(QueueEvent::MaxRetriesReached {
                queue: item.queue.clone(),
                item_id: item.id.clone(),
                attempts: item.retry_count,
            });
            return Err(TrafficError::RetriesExhausted {
                queue: item.queue,
                item_id: item.id,
                attempts: item.retry_count,
            });
        }

        item.retry_count += 1;
        item.priority = item.priority.saturating_sub(1);
        item.enqueued_at = Instant::now();

        let queue = item.queue.clone();
        let item_id = item.id.clone();
        let priority = item.priority;

        // Re-insertion bypasses the capacity check: the item was already
        // admitted once and must not be silently shed on retry.
        let state = self.queue_state(&queue);
        let mut st = state.lock().await;
        insert_by_priority(&mut st.items, item);
        gauge!("traffic_queue_depth", "queue" => queue.clone()).set(st.items.len() as f64);
        debug!(queue = %queue, item_id = %item_id, priority, "item requeued");

        self.emit(QueueEvent::Enqueued {
            queue,
            item_id,
            priority,
        });
        Ok(())
    }

    fn spawn_worker(inner: &Arc<Self>, queue: &str) {
        let inner = Arc::clone(inner);
        let queue = queue.to_string();
        tokio::spawn(async move {
            inner.run_worker(queue).await;
        });
    }

    /// Per-queue processing loop. At most one runs per queue name; the
    /// `worker_active` guard is flipped under the state lock so a racing
    /// enqueue either sees the worker still active or starts a fresh one.
    async fn run_worker(self: Arc<Self>, queue: String) {
        debug!(queue = %queue, "queue worker started");
        loop {
            let item = {
                let state = self.queue_state(&queue);
                let mut st = state.lock().await;
                match self.pop_locked(&queue, &mut st) {
                    Some(item) => item,
                    None => {
                        st.worker_active = false;
                        break;
                    }
                }
            };

            self.emit(QueueEvent::Processing {
                queue: queue.clone(),
                item_id: item.id.clone(),
                attempt: item.retry_count + 1,
            });

            match self.processor.process(&item).await {
                Ok(()) => {
                    counter!("traffic_queue_items_processed_total").increment(1);
                    let state = self.queue_state(&queue);
                    state.lock().await.stats.total_processed += 1;
                }
                Err(err) => {
                    warn!(
                        queue = %queue,
                        item_id = %item.id,
                        error = %err,
                        attempt = item.retry_count + 1,
                        "item processing failed"
                    );
                    let item_id = item.id.clone();
                    if let Err(requeue_err) = self.requeue_item(item).await {
                        counter!("traffic_queue_items_failed_total").increment(1);
                        let state = self.queue_state(&queue);
                        state.lock().await.stats.total_failed += 1;
                        self.emit(QueueEvent::ItemFailed {
                            queue: queue.clone(),
                            item_id,
                            error: requeue_err.to_string(),
                        });
                    }
                }
            }
        }
        debug!(queue = %queue, "queue worker parked");
    }
}

/// Insert keeping descending priority order; equal priorities preserve
/// arrival order (the new item goes after existing equals).
fn insert_by_priority<T>(items: &mut VecDeque<QueueItem<T>>, item: QueueItem<T>) {
    let pos = items
        .iter()
        .position(|existing| existing.priority < item.priority)
        .unwrap_or(items.len());
    items.insert(pos, item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Processor that records processed payloads and can be told to fail.
    struct RecordingProcessor {
        processed: Mutex<Vec<String>>,
        failures_remaining: AtomicUsize,
    }

    impl RecordingProcessor {
        fn new(failures: usize) -> Arc<Self> {
            Arc::new(Self {
                processed: Mutex::new(Vec::new()),
                failures_remaining: AtomicUsize::new(failures),
            })
        }
    }

    #[async_trait]
    impl ItemProcessor<String> for RecordingProcessor {
        async fn process(&self, item: &QueueItem<String>) -> TrafficResult<()> {
            if self
                .failures_remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(TrafficError::processing("simulated failure"));
            }
            self.processed.lock().await.push(item.payload.clone());
            Ok(())
        }
    }

    /// Processor that never completes, so tests can inspect queue contents
    /// without the worker draining them.
    struct BlockingProcessor;

    #[async_trait]
    impl ItemProcessor<String> for BlockingProcessor {
        async fn process(&self, _item: &QueueItem<String>) -> TrafficResult<()> {
            futures::future::pending::<()>().await;
            Ok(())
        }
    }

    fn manager_with(config: QueueConfig, processor: Arc<dyn ItemProcessor<String>>) -> QueueManager<String> {
        QueueManager::new(config, processor)
    }

    #[tokio::test]
    async fn test_enqueue_and_drain() {
        let processor = RecordingProcessor::new(0);
        let manager = manager_with(QueueConfig::default(), processor.clone());

        manager.enqueue("rfq", "a".to_string(), 1).await.unwrap();
        manager.enqueue("rfq", "b".to_string(), 1).await.unwrap();

        manager
            .wait_for_empty("rfq", Duration::from_secs(1))
            .await
            .unwrap();
        // Give the worker a beat to finish the in-flight item.
        tokio::time::sleep(Duration::from_millis(20)).await;

        let processed = processor.processed.lock().await;
        assert_eq!(*processed, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_priority_ordering_with_fifo_ties() {
        let manager = manager_with(QueueConfig::default(), Arc::new(BlockingProcessor));

        // First item is consumed immediately by the worker; the rest stay
        // queued behind the blocked processor.
        manager.enqueue("q", "head".to_string(), 0).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        manager.enqueue("q", "low".to_string(), 1).await.unwrap();
        manager.enqueue("q", "high".to_string(), 9).await.unwrap();
        manager.enqueue("q", "mid-1".to_string(), 5).await.unwrap();
        manager.enqueue("q", "mid-2".to_string(), 5).await.unwrap();

        let order: Vec<String> = vec![
            manager.dequeue("q").await.unwrap().payload,
            manager.dequeue("q").await.unwrap().payload,
            manager.dequeue("q").await.unwrap().payload,
            manager.dequeue("q").await.unwrap().payload,
        ];
        assert_eq!(order, vec!["high", "mid-1", "mid-2", "low"]);
        assert!(manager.dequeue("q").await.is_none());
    }

    #[tokio::test]
    async fn test_queue_full_rejects_and_emits_overflow() {
        let config = QueueConfig {
            max_queue_size: 2,
            max_retries: 3,
        };
        let manager = manager_with(config, Arc::new(BlockingProcessor));
        let mut events = manager.subscribe();

        // Worker consumes the first item, so three fill the queue to 2.
        manager.enqueue("q", "a".to_string(), 0).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        manager.enqueue("q", "b".to_string(), 0).await.unwrap();
        manager.enqueue("q", "c".to_string(), 0).await.unwrap();

        let err = manager.enqueue("q", "d".to_string(), 0).await.unwrap_err();
        assert!(matches!(err, TrafficError::QueueFull { .. }));
        assert_eq!(manager.len("q").await, 2);

        let mut saw_overflow = false;
        while let Ok(event) = events.try_recv() {
            if matches!(event, QueueEvent::Overflow { .. }) {
                saw_overflow = true;
            }
        }
        assert!(saw_overflow);
    }

    #[tokio::test]
    async fn test_requeue_adjusts_priority_and_retries() {
        let manager = manager_with(QueueConfig::default(), Arc::new(BlockingProcessor));

        manager.enqueue("q", "head".to_string(), 0).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        manager.enqueue("q", "retry-me".to_string(), 5).await.unwrap();

        let item = manager.dequeue("q").await.unwrap();
        assert_eq!(item.priority, 5);

        manager.requeue(item).await.unwrap();
        let item = manager.dequeue("q").await.unwrap();
        assert_eq!(item.retry_count, 1);
        assert_eq!(item.priority, 4);
    }

    #[tokio::test]
    async fn test_requeue_priority_floor_is_zero() {
        let manager = manager_with(QueueConfig::default(), Arc::new(BlockingProcessor));

        manager.enqueue("q", "head".to_string(), 0).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        manager.enqueue("q", "floor".to_string(), 0).await.unwrap();

        let item = manager.dequeue("q").await.unwrap();
        manager.requeue(item).await.unwrap();
        let item = manager.dequeue("q").await.unwrap();
        assert_eq!(item.priority, 0);
    }

    #[tokio::test]
    async fn test_requeue_exhausted_budget_fails() {
        let config = QueueConfig {
            max_queue_size: 100,
            max_retries: 1,
        };
        let manager = manager_with(config, Arc::new(BlockingProcessor));
        let mut events = manager.subscribe();

        manager.enqueue("q", "head".to_string(), 0).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        manager.enqueue("q", "doomed".to_string(), 3).await.unwrap();

        let item = manager.dequeue("q").await.unwrap();
        manager.requeue(item).await.unwrap();

        let item = manager.dequeue("q").await.unwrap();
        assert_eq!(item.retry_count, 1);
        let err = manager.requeue(item).await.unwrap_err();
        assert!(matches!(err, TrafficError::RetriesExhausted { attempts: 1, .. }));
        assert_eq!(manager.len("q").await, 0);

        let mut saw_max_retries = false;
        while let Ok(event) = events.try_recv() {
            if matches!(event, QueueEvent::MaxRetriesReached { .. }) {
                saw_max_retries = true;
            }
        }
        assert!(saw_max_retries);
    }

    #[tokio::test]
    async fn test_remove_by_id() {
        let manager = manager_with(QueueConfig::default(), Arc::new(BlockingProcessor));

        manager.enqueue("q", "head".to_string(), 0).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let keep = manager.enqueue("q", "keep".to_string(), 1).await.unwrap();
        let drop = manager.enqueue("q", "drop".to_string(), 1).await.unwrap();

        assert!(manager.remove("q", &drop).await);
        assert!(!manager.remove("q", &drop).await);
        assert_eq!(manager.len("q").await, 1);
        assert_eq!(manager.dequeue("q").await.unwrap().id, keep);
    }

    #[tokio::test]
    async fn test_clear_resets_stats() {
        let manager = manager_with(QueueConfig::default(), Arc::new(BlockingProcessor));

        manager.enqueue("q", "head".to_string(), 0).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        manager.enqueue("q", "a".to_string(), 1).await.unwrap();
        manager.enqueue("q", "b".to_string(), 1).await.unwrap();
        let _ = manager.dequeue("q").await;

        let stats = manager.stats("q").await.unwrap();
        assert!(stats.total_added >= 3);
        assert!(stats.total_dequeued >= 1);

        manager.clear("q").await;
        assert_eq!(manager.len("q").await, 0);
        let stats = manager.stats("q").await.unwrap();
        assert_eq!(stats.total_added, 0);
        assert_eq!(stats.total_dequeued, 0);
        assert_eq!(stats.total_processed, 0);
        assert_eq!(stats.total_failed, 0);
        assert_eq!(stats.avg_wait_ms, 0);
        assert_eq!(stats.max_wait_ms, 0);
    }

    #[tokio::test]
    async fn test_failed_items_are_retried_then_dropped() {
        let config = QueueConfig {
            max_queue_size: 100,
            max_retries: 2,
        };
        // Fails more times than the budget allows: item must be dropped.
        let processor = RecordingProcessor::new(10);
        let manager = manager_with(config, processor.clone());
        let mut events = manager.subscribe();

        manager.enqueue("q", "doomed".to_string(), 5).await.unwrap();
        manager
            .wait_for_empty("q", Duration::from_secs(2))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let stats = manager.stats("q").await.unwrap();
        assert_eq!(stats.total_failed, 1);
        assert_eq!(stats.total_processed, 0);
        // Initial attempt plus two retries.
        assert_eq!(stats.total_dequeued, 3);

        let mut saw_failed = false;
        while let Ok(event) = events.try_recv() {
            if matches!(event, QueueEvent::ItemFailed { .. }) {
                saw_failed = true;
            }
        }
        assert!(saw_failed);
    }

    #[tokio::test]
    async fn test_transient_failure_recovers() {
        let config = QueueConfig {
            max_queue_size: 100,
            max_retries: 3,
        };
        // Fails twice, then succeeds on the third attempt.
        let processor = RecordingProcessor::new(2);
        let manager = manager_with(config, processor.clone());

        manager.enqueue("q", "flaky".to_string(), 5).await.unwrap();
        manager
            .wait_for_empty("q", Duration::from_secs(2))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let stats = manager.stats("q").await.unwrap();
        assert_eq!(stats.total_processed, 1);
        assert_eq!(stats.total_failed, 0);
        assert_eq!(*processor.processed.lock().await, vec!["flaky".to_string()]);
    }

    #[tokio::test]
    async fn test_independent_queues() {
        let processor = RecordingProcessor::new(0);
        let manager = manager_with(QueueConfig::default(), processor.clone());

        manager.enqueue("alpha", "a".to_string(), 1).await.unwrap();
        manager.enqueue("beta", "b".to_string(), 1).await.unwrap();

        manager
            .wait_for_empty("alpha", Duration::from_secs(1))
            .await
            .unwrap();
        manager
            .wait_for_empty("beta", Duration::from_secs(1))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let all = manager.all_stats().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all["alpha"].total_added, 1);
        assert_eq!(all["beta"].total_added, 1);
    }
}
