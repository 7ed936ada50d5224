use serde::{Deserialize, Serialize};

/// The durable marker of the last successfully emitted historical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub last_index: u64,
    /// ISO-8601, matching the `effective_time` carried on the emitted envelope.
    pub last_effective_time: String,
}
