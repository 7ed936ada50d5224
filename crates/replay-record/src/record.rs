use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single market-data row, immutable once produced.
///
/// Timestamps are naive (no timezone) because the CSV wire format carries none --
/// `YYYY-MM-DD HH:MM:SS.ffffff` is origin-local wall time. `effective_time` is derived once
/// at construction from `source_timestamp + latency_ms` and then carried as plain data --
/// the historical replayer sorts on this field, so it must never change after a `Record` is
/// built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Assigned by the record source; reflects post-sort order for historical records.
    pub index: u64,
    /// Wall time at origin, microsecond precision.
    pub source_timestamp: NaiveDateTime,
    /// Source-reported transit delay, in milliseconds. Non-negative.
    pub latency_ms: f64,
    /// `source_timestamp + latency_ms`.
    pub effective_time: NaiveDateTime,
    /// Absence is legal -- a row with no quote still replays, it just can't produce a
    /// mid-price.
    pub bid_price: Option<f64>,
    pub ask_price: Option<f64>,
    /// Any CSV column not recognized by the loader, preserved verbatim.
    pub attributes: BTreeMap<String, String>,
}

impl Record {
    pub fn new(
        index: u64,
        source_timestamp: NaiveDateTime,
        latency_ms: f64,
        bid_price: Option<f64>,
        ask_price: Option<f64>,
        attributes: BTreeMap<String, String>,
    ) -> Self {
        let effective_time = source_timestamp + latency_micros(latency_ms);
        Self {
            index,
            source_timestamp,
            latency_ms,
            effective_time,
            bid_price,
            ask_price,
            attributes,
        }
    }

    /// ISO-8601 rendering of `source_timestamp`, used verbatim in the mid-price and error
    /// log lines.
    pub fn timestamp_iso(&self) -> String {
        self.source_timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

fn latency_micros(latency_ms: f64) -> Duration {
    Duration::microseconds((latency_ms * 1000.0).round() as i64)
}
