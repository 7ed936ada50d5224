use thiserror::Error;

/// Error types for loading a record source.
#[derive(Debug, Error)]
pub enum RecordSourceError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error reading {path}: {source}")]
    Csv {
        path: std::path::PathBuf,
        #[source]
        source: csv::Error,
    },
    /// Neither `timestamp` nor `time` is present in the header row.
    #[error("missing required column {column:?} in {path}")]
    MissingHeader {
        path: std::path::PathBuf,
        column: &'static str,
    },
}
