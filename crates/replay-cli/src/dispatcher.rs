//! Command Dispatcher (C7): maps single-letter operator commands to engine operations.
//!
//! A thin façade with no internal state of its own -- it never touches the queue or
//! consumers directly, only `ReplayEngine`. Split from the stdin-reading loop so the
//! mapping itself is unit-testable without a terminal.

use replay_engine::ReplayEngine;

/// Result of dispatching one line of operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The command was recognized and applied.
    Handled,
    /// `q` was received: the caller should stop producers, signal consumers, and exit.
    Quit,
    /// The line didn't match any known command.
    Unknown,
}

/// Applies a single command line to `engine`. Blank lines are treated as unknown rather
/// than silently ignored, matching the spec's "unknown input is warned and ignored" rule.
pub fn dispatch(engine: &ReplayEngine, line: &str) -> DispatchOutcome {
    match line.trim() {
        "h" => {
            engine.enter_historical();
            DispatchOutcome::Handled
        }
        "l" => {
            engine.enter_live();
            DispatchOutcome::Handled
        }
        "p" => {
            engine.pause();
            DispatchOutcome::Handled
        }
        "r" => {
            engine.resume();
            DispatchOutcome::Handled
        }
        "q" => {
            engine.stop_all();
            DispatchOutcome::Quit
        }
        other => {
            tracing::warn!(command = %other, "unrecognized command, ignoring");
            DispatchOutcome::Unknown
        }
    }
}

/// Reads commands from `reader` line by line, dispatching each to `engine`, until `q` is
/// received or the stream is exhausted (EOF is treated the same as an explicit `q`).
pub fn run_loop<R: std::io::BufRead>(engine: &ReplayEngine, reader: R) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "error reading operator command, stopping");
                engine.stop_all();
                return;
            }
        };
        if dispatch(engine, &line) == DispatchOutcome::Quit {
            return;
        }
    }
    tracing::info!("command input closed (EOF), stopping engine");
    engine.stop_all();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use replay_checkpoint::CheckpointStore;
    use replay_queue::{Queue, QueueConfig};
    use replay_record::{Envelope, Record};
    use replay_replay::{HistoricalReplayer, LiveReplayer};
    use std::collections::BTreeMap;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::time::Duration;

    fn record(i: u64) -> Record {
        let ts = NaiveDateTime::parse_from_str("2024-01-01 00:00:00.000000", "%Y-%m-%d %H:%M:%S%.f").unwrap();
        Record::new(i, ts, 0.0, Some(1.0), Some(2.0), BTreeMap::new())
    }

    fn make_engine(dir: &std::path::Path) -> (ReplayEngine, Arc<Queue<Envelope>>) {
        let queue = Arc::new(Queue::new(QueueConfig::new(100, dir.join("spill"))).unwrap());
        let records: Vec<_> = (0..3).map(record).collect();
        let checkpoint = CheckpointStore::new(dir.join("hist.checkpoint"));
        let historical = Arc::new(HistoricalReplayer::new(records.clone(), Arc::clone(&queue), checkpoint, 1000.0));
        let live = Arc::new(LiveReplayer::new(records, Arc::clone(&queue), Duration::from_millis(5)));
        (ReplayEngine::new(historical, live), queue)
    }

    #[test]
    fn h_starts_historical_mode() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _queue) = make_engine(dir.path());

        assert_eq!(dispatch(&engine, "h"), DispatchOutcome::Handled);
        assert_eq!(engine.mode(), replay_engine::EngineMode::Historical);
        engine.stop_all();
    }

    #[test]
    fn q_stops_and_signals_quit() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _queue) = make_engine(dir.path());

        engine.enter_historical();
        assert_eq!(dispatch(&engine, "q"), DispatchOutcome::Quit);
        assert_eq!(engine.mode(), replay_engine::EngineMode::Stopped);
    }

    #[test]
    fn unknown_command_is_ignored_and_mode_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _queue) = make_engine(dir.path());

        assert_eq!(dispatch(&engine, "z"), DispatchOutcome::Unknown);
        assert_eq!(engine.mode(), replay_engine::EngineMode::Idle);
        engine.stop_all();
    }

    #[test]
    fn run_loop_stops_on_q() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _queue) = make_engine(dir.path());

        let input = Cursor::new(b"h\np\nr\nq\n".to_vec());
        run_loop(&engine, input);

        assert_eq!(engine.mode(), replay_engine::EngineMode::Stopped);
    }

    #[test]
    fn run_loop_stops_at_eof_without_explicit_quit() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _queue) = make_engine(dir.path());

        let input = Cursor::new(b"h\n".to_vec());
        run_loop(&engine, input);

        assert_eq!(engine.mode(), replay_engine::EngineMode::Stopped);
    }
}
