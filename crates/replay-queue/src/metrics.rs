use std::sync::atomic::{AtomicU64, Ordering};

/// Queue counters.
///
/// All fields use `Ordering::Relaxed`: these are purely statistical, read by an
/// operator-facing supervisor loop, never used to establish happens-before relationships
/// with the data they count. The queue's own correctness comes from `crossbeam_channel`,
/// not from these counters.
#[derive(Debug, Default)]
pub struct QueueMetrics {
    accepted: AtomicU64,
    spilled: AtomicU64,
    spill_failures: AtomicU64,
}

impl QueueMetrics {
    pub(crate) fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_spilled(&self) {
        self.spilled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_spill_failure(&self) {
        self.spill_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn spilled(&self) -> u64 {
        self.spilled.load(Ordering::Relaxed)
    }

    pub fn spill_failures(&self) -> u64 {
        self.spill_failures.load(Ordering::Relaxed)
    }
}
