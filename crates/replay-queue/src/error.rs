use thiserror::Error;

/// Error types for queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Queue is closed; no further producers may register.
    #[error("queue is closed")]
    Closed,
}

/// Error types for the spill-to-disk fallback path.
#[derive(Debug, Error)]
pub enum SpillError {
    /// Writing the spill file failed at the filesystem layer.
    #[error("failed to write spill file {path}: {source}")]
    Io {
        /// Path of the spill file that failed to write.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The item could not be serialized into the wire format.
    #[error("failed to encode spilled item: {0}")]
    Encode(#[from] bincode::Error),
}
