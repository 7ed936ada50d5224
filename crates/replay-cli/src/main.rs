//! Binary entry point: parses CLI flags, wires the queue/checkpoint/replayers/engine/consumers
//! together, drives the operator command loop on stdin, and performs an orderly shutdown.
//!
//! This is the out-of-core façade the spec calls the Command Dispatcher's home (C7) --
//! everything with interesting internal state lives in a library crate; `main` only
//! constructs and connects them.

mod args;
mod dispatcher;

use anyhow::Context;
use args::Args;
use clap::Parser;
use replay_checkpoint::CheckpointStore;
use replay_consumer::{ConsumerConfig, MidPriceConsumer};
use replay_engine::ReplayEngine;
use replay_queue::{Queue, QueueConfig};
use replay_record::Envelope;
use replay_replay::{load_historical, load_live, HistoricalReplayer, LiveReplayer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Main joins consumer threads with this much grace before giving up and logging a warning;
/// each consumer's own `get` timeout keeps real exit latency far below it.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    tracing::info!(historical = %args.historical.display(), consumers = args.consumers, "starting replay engine");

    let historical_records = load_historical(&args.historical)
        .with_context(|| format!("failed to load historical source {}", args.historical.display()))?;

    let live_records = match &args.live {
        Some(path) => load_live(path).with_context(|| format!("failed to load live source {}", path.display()))?,
        None => Vec::new(),
    };

    let queue = Arc::new(
        Queue::<Envelope>::new(QueueConfig::new(args.maxqueue, args.spill_dir.clone()))
            .with_context(|| format!("failed to create spill directory {}", args.spill_dir.display()))?,
    );

    let checkpoint = CheckpointStore::new(args.checkpoint.clone());
    let historical = Arc::new(HistoricalReplayer::new(historical_records, Arc::clone(&queue), checkpoint, args.time_scale));
    let live = Arc::new(LiveReplayer::new(live_records, Arc::clone(&queue), Duration::from_millis(args.live_interval_ms)));

    let engine = ReplayEngine::new(Arc::clone(&historical), Arc::clone(&live));

    let shutdown = Arc::new(AtomicBool::new(false));
    let consumer_config = ConsumerConfig {
        latency_threshold_ms: args.latency_threshold,
        buffer_size: args.buffer_size,
        mid_log_path: args.mid_log.clone(),
        error_log_path: args.error_log.clone(),
    };

    let consumer_handles: Vec<_> = (0..args.consumers.max(1))
        .map(|id| {
            let queue = Arc::clone(&queue);
            let shutdown = Arc::clone(&shutdown);
            let config = consumer_config.clone();
            std::thread::Builder::new()
                .name(format!("MidPriceConsumer-{id}"))
                .spawn(move || {
                    let mut consumer = MidPriceConsumer::new(queue, shutdown, config);
                    consumer.run();
                })
                .expect("failed to spawn consumer thread")
        })
        .collect();

    // --historical is required, so historical replay is the engine's default activity --
    // the operator can still switch to live or pause from here via stdin commands.
    engine.enter_historical();

    let stdin = std::io::stdin();
    dispatcher::run_loop(&engine, stdin.lock());

    shutdown.store(true, Ordering::Relaxed);
    queue.close();
    join_with_grace(consumer_handles, SHUTDOWN_GRACE);

    tracing::info!("replay engine exited cleanly");
    Ok(())
}

fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Joins each consumer thread, logging (rather than panicking) if the combined wait exceeds
/// `grace` -- a stuck consumer shouldn't prevent the rest of the process from reporting exit.
fn join_with_grace(handles: Vec<std::thread::JoinHandle<()>>, grace: Duration) {
    let expected = handles.len();
    let (tx, rx) = mpsc::channel();
    for handle in handles {
        let tx = tx.clone();
        std::thread::spawn(move || {
            let _ = handle.join();
            let _ = tx.send(());
        });
    }
    drop(tx);

    let deadline = std::time::Instant::now() + grace;
    for _ in 0..expected {
        let remaining = deadline.saturating_duration_since(std::time::Instant::now());
        if rx.recv_timeout(remaining).is_err() {
            tracing::warn!("consumer shutdown exceeded grace period, proceeding anyway");
            return;
        }
    }
}
