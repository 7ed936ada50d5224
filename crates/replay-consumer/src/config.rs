use std::path::PathBuf;

/// Tunables for [`crate::MidPriceConsumer`]. Defaults mirror the source's module-level
/// constants.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Historical envelopes with `latency_ms` above this are diverted to the error log.
    pub latency_threshold_ms: u32,
    /// Number of buffered lines before a sink is flushed.
    pub buffer_size: usize,
    pub mid_log_path: PathBuf,
    pub error_log_path: PathBuf,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            latency_threshold_ms: 20,
            buffer_size: 50,
            mid_log_path: PathBuf::from("mid_prices.log"),
            error_log_path: PathBuf::from("errors.log"),
        }
    }
}
