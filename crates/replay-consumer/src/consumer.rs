use crate::{ConsumerConfig, ConsumerError};
use replay_queue::Queue;
use replay_record::{Envelope, Mode};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Bounded so the shutdown flag is observed within ~1s of it being set, matching the
/// engine's shutdown grace window.
const GET_TIMEOUT: Duration = Duration::from_secs(1);

/// Drains envelopes from the queue, computes mid-prices, and diverts latency-breaching
/// historical messages to the error log. Buffers both sinks locally and flushes in batches;
/// multiple consumers may run concurrently against the same two output files, relying on
/// append-mode opens for write-call atomicity (see the crate README).
pub struct MidPriceConsumer {
    queue: Arc<Queue<Envelope>>,
    shutdown: Arc<AtomicBool>,
    config: ConsumerConfig,
    mid_buffer: Vec<String>,
    error_buffer: Vec<String>,
}

impl MidPriceConsumer {
    pub fn new(queue: Arc<Queue<Envelope>>, shutdown: Arc<AtomicBool>, config: ConsumerConfig) -> Self {
        Self {
            queue,
            shutdown,
            config,
            mid_buffer: Vec::new(),
            error_buffer: Vec::new(),
        }
    }

    /// Runs until the shutdown flag is set, then flushes both buffers unconditionally.
    pub fn run(&mut self) {
        tracing::info!("mid-price consumer started");
        while !self.shutdown.load(Ordering::Relaxed) {
            match self.queue.get(GET_TIMEOUT) {
                Some(envelope) => self.process(envelope),
                None => continue,
            }
        }

        self.flush_mid();
        self.flush_errors();
        tracing::info!("mid-price consumer exiting");
    }

    /// Processes a single envelope, mirroring the spec's five-step recipe. Exposed for
    /// tests; `run` is the production entry point.
    pub fn process(&mut self, envelope: Envelope) {
        let record = &envelope.record;
        let timestamp = record.timestamp_iso();

        let (bid, ask) = match (record.bid_price, record.ask_price) {
            (Some(bid), Some(ask)) => (bid, ask),
            _ => {
                tracing::warn!(index = envelope.index, "skipping envelope with missing bid/ask");
                return;
            }
        };

        if envelope.mode == Mode::Historical && record.latency_ms > f64::from(self.config.latency_threshold_ms) {
            self.error_buffer.push(format!(
                "No mid price at {timestamp} as latency {:?}ms is bigger than {}ms\n",
                record.latency_ms, self.config.latency_threshold_ms
            ));
        } else {
            let mid_price = 0.5 * (bid + ask);
            self.mid_buffer.push(format!("{timestamp},{mid_price:?}\n"));
        }

        if self.mid_buffer.len() >= self.config.buffer_size {
            self.flush_mid();
        }
        if self.error_buffer.len() >= self.config.buffer_size {
            self.flush_errors();
        }
    }

    fn flush_mid(&mut self) {
        if self.mid_buffer.is_empty() {
            return;
        }
        match append_lines(&self.config.mid_log_path, &self.mid_buffer) {
            Ok(()) => self.mid_buffer.clear(),
            Err(e) => tracing::error!(error = %e, "failed to flush mid prices, retaining buffer"),
        }
    }

    fn flush_errors(&mut self) {
        if self.error_buffer.is_empty() {
            return;
        }
        match append_lines(&self.config.error_log_path, &self.error_buffer) {
            Ok(()) => self.error_buffer.clear(),
            Err(e) => tracing::error!(error = %e, "failed to flush errors, retaining buffer"),
        }
    }
}

/// Opens `path` in append mode and writes `lines` as a single `write_all` call -- the unit
/// of atomicity POSIX guarantees for `O_APPEND` writes.
fn append_lines(path: &Path, lines: &[String]) -> Result<(), ConsumerError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|source| ConsumerError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ConsumerError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let joined = lines.concat();
    file.write_all(joined.as_bytes()).map_err(|source| ConsumerError::Io {
        path: path.to_path_buf(),
        source,
    })
}
