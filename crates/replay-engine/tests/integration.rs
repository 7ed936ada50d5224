use chrono::NaiveDateTime;
use replay_checkpoint::CheckpointStore;
use replay_engine::{EngineMode, ReplayEngine};
use replay_queue::{Queue, QueueConfig};
use replay_record::{Mode, Record};
use replay_replay::{HistoricalReplayer, LiveReplayer};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

fn record(i: u64, secs: u32) -> Record {
    let ts = NaiveDateTime::parse_from_str(&format!("2024-01-01 00:00:{secs:02}.000000"), "%Y-%m-%d %H:%M:%S%.f").unwrap();
    Record::new(i, ts, 0.0, Some(i as f64), Some(i as f64 + 1.0), BTreeMap::new())
}

/// Scenario S5 from the spec: switching from historical to live after a couple of envelopes
/// stops the historical producer and starts the live one, with no historical envelopes
/// observed past the switch point.
#[test]
fn mode_switch_stops_historical_and_starts_live() {
    let dir = tempfile::tempdir().unwrap();
    let queue = Arc::new(Queue::new(QueueConfig::new(100, dir.path().join("spill"))).unwrap());

    let historical_records: Vec<_> = (0..20).map(|i| record(i, i as u32)).collect();
    let checkpoint = CheckpointStore::new(dir.path().join("hist.checkpoint"));
    let historical = Arc::new(HistoricalReplayer::new(
        historical_records,
        Arc::clone(&queue),
        checkpoint,
        1000.0,
    ));

    let live_records: Vec<_> = (0..5).map(|i| record(100 + i, 0)).collect();
    let live = Arc::new(LiveReplayer::new(live_records, Arc::clone(&queue), Duration::from_millis(10)));

    let engine = ReplayEngine::new(historical, live);

    engine.enter_historical();
    assert_eq!(engine.mode(), EngineMode::Historical);

    let first = queue.get(Duration::from_secs(2)).expect("first historical envelope");
    let second = queue.get(Duration::from_secs(2)).expect("second historical envelope");
    assert_eq!(first.mode, Mode::Historical);
    assert_eq!(second.mode, Mode::Historical);

    engine.enter_live();
    assert_eq!(engine.mode(), EngineMode::Live);

    let after_switch = queue.get(Duration::from_secs(2)).expect("envelope after switch");
    assert_eq!(after_switch.mode, Mode::Live, "no further historical envelopes after the switch point");

    engine.stop_all();
    assert_eq!(engine.mode(), EngineMode::Stopped);
}
