//! On-disk spill format used when the bounded queue rejects an item.
//!
//! One envelope per file: `[magic b"RPSP"][version u8][len u32 LE][payload][crc32 u32 LE]`.
//! The payload is the item encoded with `bincode`. Files are named
//! `spill_<unix_epoch_seconds>_<counter>.bin` so that multiple producers writing into the
//! same directory never collide.

use crate::error::SpillError;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const SPILL_MAGIC: &[u8; 4] = b"RPSP";
const SPILL_VERSION: u8 = 1;

/// Monotone, process-wide unique counter used to build spill file names.
#[derive(Debug, Default)]
pub struct SpillCounter(AtomicU64);

impl SpillCounter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// Serializes `item` and writes it to a new file under `dir`, returning the path written.
pub fn write_spill_file<T: Serialize>(
    dir: &Path,
    counter: &SpillCounter,
    item: &T,
) -> Result<PathBuf, SpillError> {
    let payload = bincode::serialize(item)?;
    let checksum = crc32fast::hash(&payload);

    let unix_ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let path = dir.join(format!("spill_{unix_ts}_{}.bin", counter.next()));

    write_envelope(&path, &payload, checksum).map_err(|source| SpillError::Io {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

fn write_envelope(path: &Path, payload: &[u8], checksum: u32) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(SPILL_MAGIC)?;
    file.write_all(&[SPILL_VERSION])?;
    file.write_all(&(payload.len() as u32).to_le_bytes())?;
    file.write_all(payload)?;
    file.write_all(&checksum.to_le_bytes())?;
    file.sync_all()
}

/// Reads back a spill file written by [`write_spill_file`], verifying its checksum.
///
/// Exposed for forensic tooling and tests; the replay engine itself never replays spill
/// files automatically.
pub fn read_spill_file<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<T, SpillError> {
    let bytes = std::fs::read(path).map_err(|source| SpillError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.len() < 4 + 1 + 4 + 4 || &bytes[0..4] != SPILL_MAGIC {
        return Err(SpillError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "bad spill magic"),
        });
    }
    let payload_len = u32::from_le_bytes(bytes[5..9].try_into().unwrap()) as usize;
    let payload_start = 9;
    let payload_end = payload_start + payload_len;
    let payload = &bytes[payload_start..payload_end];
    let stored_crc = u32::from_le_bytes(bytes[payload_end..payload_end + 4].try_into().unwrap());

    if crc32fast::hash(payload) != stored_crc {
        return Err(SpillError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "spill checksum mismatch"),
        });
    }

    bincode::deserialize(payload).map_err(SpillError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Item {
        a: u64,
        b: String,
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let counter = SpillCounter::new();
        let item = Item { a: 42, b: "hello".into() };

        let path = write_spill_file(dir.path(), &counter, &item).unwrap();
        let restored: Item = read_spill_file(&path).unwrap();

        assert_eq!(item, restored);
    }

    #[test]
    fn filenames_are_unique_per_counter_tick() {
        let dir = tempfile::tempdir().unwrap();
        let counter = SpillCounter::new();

        let p1 = write_spill_file(dir.path(), &counter, &1u64).unwrap();
        let p2 = write_spill_file(dir.path(), &counter, &2u64).unwrap();

        assert_ne!(p1, p2);
    }

    #[test]
    fn rejects_corrupted_payload() {
        let dir = tempfile::tempdir().unwrap();
        let counter = SpillCounter::new();
        let path = write_spill_file(dir.path(), &counter, &7u64).unwrap();

        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        std::fs::write(&path, bytes).unwrap();

        let result: Result<u64, _> = read_spill_file(&path);
        assert!(result.is_err());
    }
}
