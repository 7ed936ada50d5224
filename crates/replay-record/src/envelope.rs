use crate::{Mode, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The wire object placed on the [`replay_queue::Queue`]: a `Record` plus the metadata a
/// consumer needs without looking inside the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub mode: Mode,
    /// Producer-local monotone counter -- unique per producer, not globally.
    pub sequence: u64,
    /// Index of the underlying record.
    pub index: u64,
    /// ISO-8601 for cross-process portability (the record's `effective_time` restated as
    /// a string, matching what the spill file and consumer both expect to read).
    pub effective_time: String,
    /// Wall time of enqueue; only set for live envelopes.
    pub received_at: Option<DateTime<Utc>>,
    pub record: Record,
}

impl Envelope {
    pub fn historical(sequence: u64, record: Record) -> Self {
        let effective_time = record.effective_time.format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
        Self {
            mode: Mode::Historical,
            sequence,
            index: record.index,
            effective_time,
            received_at: None,
            record,
        }
    }

    pub fn live(sequence: u64, record: Record) -> Self {
        let effective_time = record.effective_time.format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
        Self {
            mode: Mode::Live,
            sequence,
            index: record.index,
            effective_time,
            received_at: Some(Utc::now()),
            record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;
    use chrono::NaiveDateTime;
    use std::collections::BTreeMap;

    fn sample_record() -> Record {
        let ts = NaiveDateTime::parse_from_str("2024-01-01 00:00:00.000000", "%Y-%m-%d %H:%M:%S%.f").unwrap();
        Record::new(3, ts, 5.0, Some(100.0), Some(102.0), BTreeMap::new())
    }

    #[test]
    fn historical_envelope_has_no_received_at() {
        let envelope = Envelope::historical(0, sample_record());
        assert_eq!(envelope.mode, Mode::Historical);
        assert!(envelope.received_at.is_none());
        assert_eq!(envelope.index, 3);
    }

    #[test]
    fn live_envelope_stamps_received_at() {
        let envelope = Envelope::live(0, sample_record());
        assert_eq!(envelope.mode, Mode::Live);
        assert!(envelope.received_at.is_some());
    }

    #[test]
    fn round_trips_through_json() {
        let envelope = Envelope::historical(7, sample_record());
        let json = serde_json::to_string(&envelope).unwrap();
        let restored: Envelope = serde_json::from_str(&json).unwrap();
        assert_eq!(envelope, restored);
    }
}
