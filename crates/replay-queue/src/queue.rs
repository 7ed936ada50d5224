use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::metrics::QueueMetrics;
use crate::spill::{write_spill_file, SpillCounter};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a [`Queue::put`] call. `put` never blocks indefinitely and never fails the
/// caller outright: an item that cannot be accepted into the bounded channel is spilled to
/// disk instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The item was accepted into the in-memory queue.
    Accepted,
    /// The item could not be accepted (full or closed) and was written to the spill
    /// directory instead.
    Spilled,
}

struct QueueInner<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
    closed: AtomicBool,
    spill_dir: std::path::PathBuf,
    spill_counter: SpillCounter,
    metrics: QueueMetrics,
}

/// Bounded, multi-producer multi-consumer FIFO with disk spill on overflow.
///
/// Backed by `crossbeam_channel`'s bounded channel, which natively supports
/// timeout-based blocking `send`/`recv` -- the primitive the Historical and Live
/// Replayers need to honor their pacing and shutdown-responsiveness contracts.
pub struct Queue<T> {
    inner: Arc<QueueInner<T>>,
}

impl<T> Queue<T> {
    /// Creates a new queue, creating the spill directory if it does not yet exist.
    pub fn new(config: QueueConfig) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&config.spill_dir)?;
        let (tx, rx) = bounded(config.capacity.max(1));

        Ok(Self {
            inner: Arc::new(QueueInner {
                tx,
                rx,
                closed: AtomicBool::new(false),
                spill_dir: config.spill_dir,
                spill_counter: SpillCounter::new(),
                metrics: QueueMetrics::default(),
            }),
        })
    }

    /// Attempts to enqueue `item`, waiting up to `timeout` for capacity.
    ///
    /// Never propagates a hard error to the caller: a full or closed queue results in the
    /// item being spilled to disk and `PutOutcome::Spilled` returned. If the spill write
    /// itself fails, the failure is logged and the envelope is lost -- this mirrors the
    /// original queue manager's "never raise" contract.
    pub fn put(&self, item: T, timeout: Duration) -> PutOutcome
    where
        T: Serialize,
    {
        if self.inner.closed.load(Ordering::Acquire) {
            self.spill(item);
            return PutOutcome::Spilled;
        }

        match self.inner.tx.send_timeout(item, timeout) {
            Ok(()) => {
                self.inner.metrics.record_accepted();
                PutOutcome::Accepted
            }
            Err(SendTimeoutError::Timeout(item)) => {
                self.spill(item);
                PutOutcome::Spilled
            }
            Err(SendTimeoutError::Disconnected(item)) => {
                self.spill(item);
                PutOutcome::Spilled
            }
        }
    }

    fn spill(&self, item: T)
    where
        T: Serialize,
    {
        self.inner.metrics.record_spilled();
        match write_spill_file(&self.inner.spill_dir, &self.inner.spill_counter, &item) {
            Ok(path) => {
                tracing::warn!(path = %path.display(), "queue full or closed, spilled envelope to disk");
            }
            Err(err) => {
                self.inner.metrics.record_spill_failure();
                tracing::error!(%err, "failed to spill envelope, message lost");
            }
        }
    }

    /// Waits up to `timeout` for an item; returns `None` on timeout or disconnection.
    pub fn get(&self, timeout: Duration) -> Option<T> {
        match self.inner.rx.recv_timeout(timeout) {
            Ok(item) => Some(item),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Best-effort current depth of the in-memory queue.
    pub fn qsize(&self) -> usize {
        self.inner.rx.len()
    }

    /// Closes the queue: further `put` calls spill immediately, and `get` unblocks once
    /// drained.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
    }

    /// Returns `true` once [`Queue::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Returns a reference to accumulated accepted/spilled counters.
    pub fn metrics(&self) -> &QueueMetrics {
        &self.inner.metrics
    }

    /// Returns a handle usable as a `Result`-producing registration point, mirroring the
    /// multi-producer registration contract other queue implementations in this workspace
    /// expose; here every clone shares the same bounded channel so registration cannot
    /// fail.
    pub fn register(&self) -> Result<Self, QueueError> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(QueueError::Closed);
        }
        Ok(self.clone())
    }
}

impl<T> Clone for Queue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
