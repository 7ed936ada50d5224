//! CSV record sources.
//!
//! Historical rows are sorted ascending by effective time and re-indexed to their sorted
//! position; live rows keep CSV order and are indexed by their position in the file. Both
//! loaders tolerate a malformed row by dropping it with a warning -- one bad timestamp must
//! not abort replay of the rest of the file.

use crate::error::RecordSourceError;
use chrono::NaiveDateTime;
use replay_record::Record;
use std::collections::BTreeMap;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Loads a historical CSV, sorts by effective time, and re-assigns `index` to reflect that
/// sorted order -- matching the data model's invariant that `index` is post-sort.
pub fn load_historical(path: &Path) -> Result<Vec<Record>, RecordSourceError> {
    let mut records = load_rows(path)?;
    records.sort_by(|a, b| a.effective_time.cmp(&b.effective_time));
    for (i, record) in records.iter_mut().enumerate() {
        record.index = i as u64;
    }
    tracing::info!(path = %path.display(), count = records.len(), "loaded historical rows");
    Ok(records)
}

/// Loads the simulated live feed in file order, ignoring embedded timestamps for pacing
/// purposes (the live replayer paces on a fixed `emit_interval` instead).
pub fn load_live(path: &Path) -> Result<Vec<Record>, RecordSourceError> {
    let records = load_rows(path)?;
    tracing::info!(path = %path.display(), count = records.len(), "loaded live simulation rows");
    Ok(records)
}

fn load_rows(path: &Path) -> Result<Vec<Record>, RecordSourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| to_source_error(path, source))?;

    let headers = reader.headers().map_err(|source| to_source_error(path, source))?.clone();
    if !headers.iter().any(|h| h == "timestamp" || h == "time") {
        return Err(RecordSourceError::MissingHeader {
            path: path.to_path_buf(),
            column: "timestamp",
        });
    }

    let mut records = Vec::new();
    for (row_num, result) in reader.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(path = %path.display(), row = row_num, error = %e, "dropping unreadable row");
                continue;
            }
        };

        let mut fields: BTreeMap<String, String> = BTreeMap::new();
        for (header, value) in headers.iter().zip(row.iter()) {
            fields.insert(header.to_string(), value.to_string());
        }

        match build_record(row_num as u64, &fields) {
            Some(record) => records.push(record),
            None => continue,
        }
    }

    Ok(records)
}

fn build_record(index: u64, fields: &BTreeMap<String, String>) -> Option<Record> {
    let ts_raw = fields.get("timestamp").or_else(|| fields.get("time"))?;
    let source_timestamp = match NaiveDateTime::parse_from_str(ts_raw, TIMESTAMP_FORMAT) {
        Ok(ts) => ts,
        Err(e) => {
            tracing::warn!(row = index, raw = %ts_raw, error = %e, "dropping row with unparseable timestamp");
            return None;
        }
    };

    let latency_ms = match fields.get("latency_ms").or_else(|| fields.get("latency")) {
        None => 0.0,
        Some(raw) if raw.is_empty() => 0.0,
        Some(raw) => match raw.parse::<f64>() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(row = index, raw = %raw, error = %e, "dropping row with unparseable latency");
                return None;
            }
        },
    };

    let bid_price = parse_optional_price(fields.get("bid_price"), index, "bid_price");
    let ask_price = parse_optional_price(fields.get("ask_price"), index, "ask_price");

    let mut attributes = fields.clone();
    attributes.remove("timestamp");
    attributes.remove("time");
    attributes.remove("latency_ms");
    attributes.remove("latency");
    attributes.remove("bid_price");
    attributes.remove("ask_price");

    Some(Record::new(index, source_timestamp, latency_ms, bid_price, ask_price, attributes))
}

/// A missing column and an unparseable value both resolve to "no price" -- the consumer's
/// skip-on-missing path already handles both identically.
fn parse_optional_price(raw: Option<&String>, row: u64, column: &str) -> Option<f64> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(row, column, raw = %raw, error = %e, "unparseable price, treating as absent");
            None
        }
    }
}

fn to_source_error(path: &Path, source: csv::Error) -> RecordSourceError {
    match source.kind() {
        csv::ErrorKind::Io(_) => RecordSourceError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::Other, source.to_string()),
        },
        _ => RecordSourceError::Csv {
            path: path.to_path_buf(),
            source,
        },
    }
}
