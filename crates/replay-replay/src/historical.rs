use crate::control::{ReplayControl, MAX_SLICE};
use chrono::Duration as ChronoDuration;
use replay_checkpoint::CheckpointStore;
use replay_queue::{PutOutcome, Queue};
use replay_record::{Envelope, Record};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// How long a single `put` may block before the envelope is spilled. Bounded well under the
/// ~1s suspension-point ceiling so a saturated queue never stalls the pacing loop visibly.
const PUT_TIMEOUT: Duration = Duration::from_millis(200);

/// Replays a sorted historical record set, pacing emission against wall-clock time scaled
/// by `1 / time_scale`. See the crate-level wire-format and pacing notes.
///
/// Expects `records` already sorted ascending by `effective_time` with `index` reassigned
/// to the sorted position (see [`crate::source::load_historical`]) -- this type paces
/// against that contract, it doesn't re-establish it.
pub struct HistoricalReplayer {
    records: Vec<Record>,
    queue: Arc<Queue<Envelope>>,
    checkpoint: CheckpointStore,
    time_scale: f64,
    control: Arc<ReplayControl>,
    /// Next record index to emit. Persists across `stop`/`start` cycles within the process
    /// -- the checkpoint file is only consulted once, at construction.
    index: AtomicU64,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl HistoricalReplayer {
    pub fn new(
        records: Vec<Record>,
        queue: Arc<Queue<Envelope>>,
        checkpoint: CheckpointStore,
        time_scale: f64,
    ) -> Self {
        let start_index = match checkpoint.load() {
            Ok(Some(cp)) => {
                tracing::info!(
                    index = cp.last_index + 1,
                    last_effective = %cp.last_effective_time,
                    "resuming historical replay from checkpoint"
                );
                cp.last_index + 1
            }
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load checkpoint, starting from index 0");
                0
            }
        };

        Self {
            records,
            queue,
            checkpoint,
            time_scale,
            control: ReplayControl::new(),
            index: AtomicU64::new(start_index),
            handle: Mutex::new(None),
        }
    }

    pub fn control(&self) -> &Arc<ReplayControl> {
        &self.control
    }

    /// Spawns the pacing loop if it isn't already running. Idempotent: a second call while
    /// a run is in flight is a no-op.
    pub fn start(self: &Arc<Self>) {
        let mut guard = self.handle.lock().unwrap();
        if let Some(handle) = guard.as_ref() {
            if !handle.is_finished() {
                tracing::debug!("historical replayer already running, start() is a no-op");
                return;
            }
        }

        self.control.reset();
        let this = Arc::clone(self);
        *guard = Some(
            std::thread::Builder::new()
                .name("HistoricalRunner".into())
                .spawn(move || this.run())
                .expect("failed to spawn historical runner thread"),
        );
    }

    /// Signals the run loop to stop and blocks until it exits. Bounded by `MAX_SLICE`
    /// because the loop checks the stop flag at every wait-slice boundary.
    pub fn stop(&self) {
        self.control.stop();
        if let Some(handle) = self.handle.lock().unwrap().take() {
            let _ = handle.join();
        }
    }

    pub fn pause(&self) {
        self.control.pause();
        tracing::info!("historical replay paused");
    }

    pub fn resume(&self) {
        self.control.resume();
        tracing::info!("historical replay resumed");
    }

    fn run(self: Arc<Self>) {
        let start = self.index.load(Ordering::SeqCst) as usize;
        if start >= self.records.len() {
            tracing::info!("no historical data to replay (index >= rows)");
            return;
        }

        let t0_wall = Instant::now();
        let t0_effective = self.records[start].effective_time;
        tracing::info!(index = start, effective = %self.records[start].effective_time, "historical replay started");

        let mut i = start;
        while i < self.records.len() {
            if self.control.is_stopped() {
                break;
            }

            let record = &self.records[i];
            let delta = record.effective_time - t0_effective;
            let target_wall = t0_wall + scaled_duration(delta, self.time_scale);

            if !self.wait_until(target_wall) {
                break;
            }

            let envelope = Envelope::historical(i as u64, record.clone());
            let effective_time = envelope.effective_time.clone();
            match self.queue.put(envelope, PUT_TIMEOUT) {
                PutOutcome::Accepted => {
                    tracing::info!(index = i, effective = %effective_time, "historical enqueued");
                }
                PutOutcome::Spilled => {
                    tracing::debug!(index = i, "historical message spilled or not enqueued");
                }
            }

            if let Err(e) = self.checkpoint.save(i as u64, &effective_time) {
                tracing::error!(index = i, error = %e, "failed to save checkpoint");
            }

            self.index.store((i + 1) as u64, Ordering::SeqCst);
            i += 1;
        }

        tracing::info!("historical replay finished or stopped");
    }

    /// Waits until `target`, re-checking pause/stop every `MAX_SLICE`. Returns `false` if
    /// the caller should abandon this record (stopped).
    fn wait_until(&self, target: Instant) -> bool {
        loop {
            if self.control.is_stopped() {
                return false;
            }
            if self.control.is_paused() {
                std::thread::sleep(Duration::from_millis(50).min(MAX_SLICE));
                continue;
            }
            let now = Instant::now();
            if now >= target {
                return true;
            }
            std::thread::sleep((target - now).min(MAX_SLICE));
        }
    }
}

/// No catch-up compression: a record already past its target time returns a zero duration,
/// so it's emitted on the very next loop iteration rather than having its wait shortened to
/// "make up" lost time relative to later records.
fn scaled_duration(delta: ChronoDuration, time_scale: f64) -> Duration {
    let micros = delta.num_microseconds().unwrap_or(i64::MAX).max(0) as f64;
    Duration::from_secs_f64((micros / 1_000_000.0 / time_scale).max(0.0))
}
