use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Largest single wait slice a run loop takes before re-checking pause/stop -- bounds how
/// long a control signal can take to be observed.
pub const MAX_SLICE: Duration = Duration::from_millis(500);

/// Shared pause/stop flags for a single producer. `pause`/`resume`/`stop` are idempotent and
/// callable from any thread; the run loop consults them between bounded wait slices.
#[derive(Debug, Default)]
pub struct ReplayControl {
    stopped: AtomicBool,
    paused: AtomicBool,
}

impl ReplayControl {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Clears the stop flag so a fresh run loop can start. Called by the producer's own
    /// `start()`, never by a caller directly.
    pub(crate) fn reset(&self) {
        self.stopped.store(false, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Sleeps in bounded slices while paused, returning early if stopped. Returns `true` if
    /// the caller should proceed (not stopped), `false` if it should exit the run loop.
    pub fn wait_while_paused(&self) -> bool {
        while self.is_paused() {
            if self.is_stopped() {
                return false;
            }
            std::thread::sleep(MAX_SLICE.min(Duration::from_millis(50)));
        }
        !self.is_stopped()
    }
}
