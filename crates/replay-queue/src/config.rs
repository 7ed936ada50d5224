use std::path::PathBuf;

/// Configuration for a [`crate::Queue`].
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Maximum number of envelopes held in memory before `put` spills to disk.
    pub capacity: usize,
    /// Directory spilled envelopes are written into. Created on first use if absent.
    pub spill_dir: PathBuf,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            spill_dir: PathBuf::from("./spill"),
        }
    }
}

impl QueueConfig {
    pub fn new(capacity: usize, spill_dir: impl Into<PathBuf>) -> Self {
        Self {
            capacity,
            spill_dir: spill_dir.into(),
        }
    }
}
