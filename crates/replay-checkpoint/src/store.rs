//! Self-describing checkpoint file: `[magic b"RPCK"][version u8][len u32 LE][bincode
//! payload][crc32 u32 LE]`. Writes go to a temp file in the same directory, `fsync`, then
//! `rename` over the target -- rename is atomic on the same filesystem, so a crash mid-write
//! never corrupts the checkpoint a reader would otherwise observe.

use crate::{Checkpoint, CheckpointError};
use std::io::Write;
use std::path::{Path, PathBuf};

const CHECKPOINT_MAGIC: &[u8; 4] = b"RPCK";
const CHECKPOINT_VERSION: u8 = 1;

/// Single-writer, single-reader-at-startup store for the historical replayer's checkpoint.
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the checkpoint, if any.
    ///
    /// Returns `Ok(None)` both when the file is absent (fresh start) and when it exists but
    /// fails to decode (corruption) -- the caller only needs to distinguish "error I should
    /// abort on" from "no prior checkpoint", and corruption is never the former.
    pub fn load(&self) -> Result<Option<Checkpoint>, CheckpointError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CheckpointError::Io(e)),
        };

        match decode(&bytes) {
            Ok(checkpoint) => Ok(Some(checkpoint)),
            Err(CheckpointError::Corrupt { reason }) => {
                tracing::warn!(path = %self.path.display(), %reason, "checkpoint corrupt, starting fresh");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Crash-atomically persists `(last_index, last_effective_time)`.
    pub fn save(&self, last_index: u64, last_effective_time: &str) -> Result<(), CheckpointError> {
        let checkpoint = Checkpoint {
            last_index,
            last_effective_time: last_effective_time.to_string(),
        };
        let bytes = encode(&checkpoint)?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;
        let tmp_path = dir.join(format!(
            ".{}.tmp",
            self.path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("checkpoint")
        ));

        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

fn encode(checkpoint: &Checkpoint) -> Result<Vec<u8>, CheckpointError> {
    let payload = bincode::serialize(checkpoint)
        .map_err(|e| CheckpointError::Corrupt { reason: e.to_string() })?;
    let checksum = crc32fast::hash(&payload);

    let mut out = Vec::with_capacity(4 + 1 + 4 + payload.len() + 4);
    out.extend_from_slice(CHECKPOINT_MAGIC);
    out.push(CHECKPOINT_VERSION);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&checksum.to_le_bytes());
    Ok(out)
}

fn decode(bytes: &[u8]) -> Result<Checkpoint, CheckpointError> {
    if bytes.len() < 4 + 1 + 4 + 4 || &bytes[0..4] != CHECKPOINT_MAGIC {
        return Err(CheckpointError::Corrupt {
            reason: "bad magic or truncated header".into(),
        });
    }
    let version = bytes[4];
    if version != CHECKPOINT_VERSION {
        return Err(CheckpointError::Corrupt {
            reason: format!("unsupported version {version}"),
        });
    }

    let len = u32::from_le_bytes(bytes[5..9].try_into().unwrap()) as usize;
    let payload_start = 9;
    let payload_end = payload_start
        .checked_add(len)
        .filter(|&end| end + 4 <= bytes.len())
        .ok_or_else(|| CheckpointError::Corrupt {
            reason: "length prefix out of range".into(),
        })?;

    let payload = &bytes[payload_start..payload_end];
    let stored_crc = u32::from_le_bytes(bytes[payload_end..payload_end + 4].try_into().unwrap());
    if crc32fast::hash(payload) != stored_crc {
        return Err(CheckpointError::Corrupt {
            reason: "crc mismatch".into(),
        });
    }

    bincode::deserialize(payload).map_err(|e| CheckpointError::Corrupt { reason: e.to_string() })
}
