use crate::mode::EngineMode;
use replay_replay::{HistoricalReplayer, LiveReplayer};
use std::sync::{Arc, Mutex};

/// Coordinates the historical and live replayers so exactly one of them is ever running,
/// per the mode-transition table: every arrow executes under a single mutex, so concurrent
/// commands from the dispatcher are serialized rather than racing each other's `start`/`stop`.
pub struct ReplayEngine {
    historical: Arc<HistoricalReplayer>,
    live: Arc<LiveReplayer>,
    mode: Mutex<EngineMode>,
}

impl ReplayEngine {
    /// Both replayers are constructed up front (they own their queue/checkpoint handles);
    /// the engine only ever toggles which one is running. Starts in `Idle`.
    pub fn new(historical: Arc<HistoricalReplayer>, live: Arc<LiveReplayer>) -> Self {
        Self {
            historical,
            live,
            mode: Mutex::new(EngineMode::Idle),
        }
    }

    pub fn mode(&self) -> EngineMode {
        *self.mode.lock().unwrap()
    }

    /// Stops whichever producer is running and returns to `Idle`. A no-op from `Idle` or
    /// `Stopped`.
    pub fn enter_idle(&self) {
        let mut mode = self.mode.lock().unwrap();
        match *mode {
            EngineMode::Historical => self.historical.stop(),
            EngineMode::Live => self.live.stop(),
            EngineMode::Idle | EngineMode::Stopped => return,
        }
        *mode = EngineMode::Idle;
        tracing::info!("engine entered idle");
    }

    /// Starts historical replay. Stops live first if it was running; a no-op if historical
    /// is already the active mode. Ignored from `Stopped` (terminal).
    pub fn enter_historical(&self) {
        let mut mode = self.mode.lock().unwrap();
        match *mode {
            EngineMode::Historical => {
                tracing::debug!("already in historical mode, no-op");
                return;
            }
            EngineMode::Live => self.live.stop(),
            EngineMode::Idle => {}
            EngineMode::Stopped => {
                tracing::warn!("engine is stopped, ignoring historical command");
                return;
            }
        }
        self.historical.start();
        *mode = EngineMode::Historical;
        tracing::info!("engine entered historical mode");
    }

    /// Starts live replay. Stops historical first if it was running; a no-op if live is
    /// already the active mode. Ignored from `Stopped` (terminal).
    pub fn enter_live(&self) {
        let mut mode = self.mode.lock().unwrap();
        match *mode {
            EngineMode::Live => {
                tracing::debug!("already in live mode, no-op");
                return;
            }
            EngineMode::Historical => self.historical.stop(),
            EngineMode::Idle => {}
            EngineMode::Stopped => {
                tracing::warn!("engine is stopped, ignoring live command");
                return;
            }
        }
        self.live.start();
        *mode = EngineMode::Live;
        tracing::info!("engine entered live mode");
    }

    /// Stops whichever producer is active and moves to the terminal `Stopped` mode.
    /// Idempotent, safe to call from any thread (including a second time after the engine
    /// is already stopped).
    pub fn stop_all(&self) {
        let mut mode = self.mode.lock().unwrap();
        match *mode {
            EngineMode::Historical => self.historical.stop(),
            EngineMode::Live => self.live.stop(),
            EngineMode::Idle | EngineMode::Stopped => {}
        }
        *mode = EngineMode::Stopped;
        tracing::info!("engine stopped");
    }

    /// Dispatched to whichever producer matches the current mode; a no-op in `Idle` or
    /// `Stopped`.
    pub fn pause(&self) {
        match self.mode() {
            EngineMode::Historical => self.historical.pause(),
            EngineMode::Live => self.live.pause(),
            EngineMode::Idle | EngineMode::Stopped => {}
        }
    }

    /// Dispatched to whichever producer matches the current mode; a no-op in `Idle` or
    /// `Stopped`.
    pub fn resume(&self) {
        match self.mode() {
            EngineMode::Historical => self.historical.resume(),
            EngineMode::Live => self.live.resume(),
            EngineMode::Idle | EngineMode::Stopped => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use replay_checkpoint::CheckpointStore;
    use replay_queue::{Queue, QueueConfig};
    use replay_record::Record;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn record(i: u64, secs: u32) -> Record {
        let ts = NaiveDateTime::parse_from_str(&format!("2024-01-01 00:00:{secs:02}.000000"), "%Y-%m-%d %H:%M:%S%.f").unwrap();
        Record::new(i, ts, 0.0, Some(1.0), Some(2.0), BTreeMap::new())
    }

    fn make_engine(dir: &std::path::Path) -> (ReplayEngine, Arc<Queue<replay_record::Envelope>>) {
        let queue = Arc::new(Queue::new(QueueConfig::new(100, dir.join("spill"))).unwrap());
        let records: Vec<_> = (0..5).map(|i| record(i, i as u32)).collect();
        let checkpoint = CheckpointStore::new(dir.join("hist.checkpoint"));
        let historical = Arc::new(HistoricalReplayer::new(records.clone(), Arc::clone(&queue), checkpoint, 1000.0));
        let live = Arc::new(LiveReplayer::new(records, Arc::clone(&queue), Duration::from_millis(5)));
        (ReplayEngine::new(historical, live), queue)
    }

    #[test]
    fn starts_idle() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _queue) = make_engine(dir.path());
        assert_eq!(engine.mode(), EngineMode::Idle);
    }

    #[test]
    fn idle_to_historical_to_live_stops_historical_first() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, queue) = make_engine(dir.path());

        engine.enter_historical();
        assert_eq!(engine.mode(), EngineMode::Historical);
        queue.get(Duration::from_secs(2)).expect("historical envelope");

        engine.enter_live();
        assert_eq!(engine.mode(), EngineMode::Live);
        queue.get(Duration::from_secs(2)).expect("live envelope");

        engine.stop_all();
    }

    #[test]
    fn stop_all_is_terminal_and_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _queue) = make_engine(dir.path());

        engine.enter_historical();
        engine.stop_all();
        assert_eq!(engine.mode(), EngineMode::Stopped);

        engine.enter_historical();
        assert_eq!(engine.mode(), EngineMode::Stopped, "stopped is terminal");

        engine.stop_all();
        assert_eq!(engine.mode(), EngineMode::Stopped);
    }

    #[test]
    fn pause_resume_are_noops_outside_an_active_mode() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _queue) = make_engine(dir.path());

        engine.pause();
        engine.resume();
        assert_eq!(engine.mode(), EngineMode::Idle);
    }
}
