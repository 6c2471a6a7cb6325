//! CSV decoding for utilization series
//!
//! Expects a header row with `timestamp` and `value` columns; any other
//! columns are ignored.

use crate::error::SourceError;
use crate::models::{Observation, ObservationSeries};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::io::Read;

const TIMESTAMP_COLUMN: &str = "timestamp";
const VALUE_COLUMN: &str = "value";

/// Naive layouts tried after RFC 3339, interpreted as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp in RFC 3339 or one of the common naive layouts
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Decode a CSV document into a series sorted by timestamp
pub fn parse_series<R: Read>(reader: R) -> Result<ObservationSeries, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(SourceError::MissingColumn(name))
    };
    let ts_idx = column(TIMESTAMP_COLUMN)?;
    let value_idx = column(VALUE_COLUMN)?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        // Header is line 1
        let line = i + 2;

        let raw_ts = row.get(ts_idx).unwrap_or_default();
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| SourceError::InvalidTimestamp {
            row: line,
            value: raw_ts.to_string(),
        })?;

        let raw_value = row.get(value_idx).unwrap_or_default();
        let value = raw_value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| SourceError::InvalidValue {
                row: line,
                value: raw_value.to_string(),
            })?;

        records.push(Observation::new(timestamp, value));
    }

    Ok(ObservationSeries::from_unsorted(records))
}
