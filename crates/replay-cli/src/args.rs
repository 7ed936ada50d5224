use clap::Parser;
use std::path::PathBuf;

/// Market-data replay engine: drives a mid-price consumer pool from a paced historical CSV
/// and/or a fixed-cadence simulated live feed, under interactive operator control.
#[derive(Parser, Debug)]
#[command(name = "replay-cli", about, version)]
pub struct Args {
    /// Historical record source, sorted and paced by effective time.
    #[arg(long)]
    pub historical: PathBuf,

    /// Simulated live record source, emitted at a fixed cadence ignoring embedded timestamps.
    #[arg(long)]
    pub live: Option<PathBuf>,

    /// Bounded in-memory queue capacity before envelopes spill to disk.
    #[arg(long, default_value_t = 10_000)]
    pub maxqueue: usize,

    /// Number of mid-price consumer workers to run.
    #[arg(long, default_value_t = 2)]
    pub consumers: usize,

    /// Historical pacing divisor: wall-clock gaps are effective-time gaps divided by this.
    #[arg(long = "time-scale", default_value_t = 1.0)]
    pub time_scale: f64,

    /// Fixed wall-clock cadence between live envelopes, in milliseconds.
    #[arg(long = "live-interval-ms", default_value_t = 100)]
    pub live_interval_ms: u64,

    /// Historical checkpoint file; resumed from on startup if present.
    #[arg(long, default_value = "hist.checkpoint")]
    pub checkpoint: PathBuf,

    /// Directory spilled envelopes are written into.
    #[arg(long = "spill-dir", default_value = "./spill")]
    pub spill_dir: PathBuf,

    /// Mid-price output log.
    #[arg(long = "mid-log", default_value = "mid_prices.log")]
    pub mid_log: PathBuf,

    /// Error (latency-diversion) output log.
    #[arg(long = "error-log", default_value = "errors.log")]
    pub error_log: PathBuf,

    /// Historical envelopes with latency above this (in ms) divert to the error log.
    #[arg(long = "latency-threshold", default_value_t = 20)]
    pub latency_threshold: u32,

    /// Number of buffered lines before a consumer flushes a sink.
    #[arg(long = "buffer-size", default_value_t = 50)]
    pub buffer_size: usize,

    /// `tracing_subscriber::EnvFilter` directive, overridable by `RUST_LOG`.
    #[arg(long = "log-level", default_value = "info")]
    pub log_level: String,
}
