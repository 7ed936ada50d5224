use thiserror::Error;

/// Error types for the mid-price consumer's output sinks.
#[derive(Debug, Error)]
pub enum ConsumerError {
    #[error("io error writing {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
