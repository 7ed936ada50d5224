use thiserror::Error;

/// Error types for checkpoint persistence.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Filesystem failure writing or renaming the checkpoint file.
    #[error("checkpoint io error: {0}")]
    Io(#[from] std::io::Error),
    /// The on-disk payload failed its magic/version/crc check.
    #[error("checkpoint corrupt: {reason}")]
    Corrupt { reason: String },
}
