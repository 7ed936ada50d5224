use crate::control::ReplayControl;
use replay_queue::{PutOutcome, Queue};
use replay_record::{Envelope, Record};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

const PUT_TIMEOUT: Duration = Duration::from_millis(200);

/// Emits records from a simulated feed at a fixed wall-clock cadence, ignoring embedded
/// timestamps entirely -- pacing is `emit_interval`, not the record's own effective time.
///
/// A real websocket-backed live source is a declared stub; this type only implements the
/// simulation path, which is all the engine ever plugs in today.
pub struct LiveReplayer {
    records: Vec<Record>,
    queue: Arc<Queue<Envelope>>,
    emit_interval: Duration,
    control: Arc<ReplayControl>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl LiveReplayer {
    pub fn new(records: Vec<Record>, queue: Arc<Queue<Envelope>>, emit_interval: Duration) -> Self {
        Self {
            records,
            queue,
            emit_interval,
            control: ReplayControl::new(),
            handle: Mutex::new(None),
        }
    }

    pub fn control(&self) -> &Arc<ReplayControl> {
        &self.control
    }

    pub fn start(self: &Arc<Self>) {
        let mut guard = self.handle.lock().unwrap();
        if let Some(handle) = guard.as_ref() {
            if !handle.is_finished() {
                tracing::debug!("live replayer already running, start() is a no-op");
                return;
            }
        }

        self.control.reset();
        let this = Arc::clone(self);
        *guard = Some(
            std::thread::Builder::new()
                .name("LiveRunner".into())
                .spawn(move || this.run())
                .expect("failed to spawn live runner thread"),
        );
    }

    pub fn stop(&self) {
        self.control.stop();
        if let Some(handle) = self.handle.lock().unwrap().take() {
            let _ = handle.join();
        }
    }

    pub fn pause(&self) {
        self.control.pause();
        tracing::info!("live replay paused");
    }

    pub fn resume(&self) {
        self.control.resume();
        tracing::info!("live replay resumed");
    }

    fn run(self: Arc<Self>) {
        if self.records.is_empty() {
            tracing::error!("no simulation source provided for live mode");
            return;
        }
        tracing::debug!("live simulation starts");

        for (seq, record) in self.records.iter().enumerate() {
            if self.control.is_stopped() {
                break;
            }
            if !self.control.wait_while_paused() {
                break;
            }

            let envelope = Envelope::live(seq as u64, record.clone());
            match self.queue.put(envelope, PUT_TIMEOUT) {
                PutOutcome::Accepted => tracing::debug!(seq, "live simulated enqueued"),
                PutOutcome::Spilled => tracing::debug!(seq, "live message spilled"),
            }

            std::thread::sleep(self.emit_interval);
        }

        tracing::info!("live simulation finished");
    }
}
