//! Core data models for the threshold analysis

use crate::error::SeriesError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single utilization measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Observations sorted ascending by timestamp
///
/// Window computations depend on neighbourhood order, so a series can only
/// be constructed in sorted form. Equal timestamps are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSeries {
    records: Vec<Observation>,
}

impl ObservationSeries {
    /// Wrap observations that are already sorted by timestamp
    pub fn new(records: Vec<Observation>) -> Result<Self, SeriesError> {
        if let Some(index) = records
            .windows(2)
            .position(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(SeriesError::Unsorted { index: index + 1 });
        }
        Ok(Self { records })
    }

    /// Sort observations by timestamp, keeping the input order of ties
    pub fn from_unsorted(mut records: Vec<Observation>) -> Self {
        records.sort_by_key(|r| r.timestamp);
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.records
    }

    /// Earliest and latest timestamps, if any
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.records.first()?.timestamp, self.records.last()?.timestamp))
    }
}

/// An observation augmented with its rolling baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub rolling_mean: Option<f64>,
    pub rolling_std: Option<f64>,
    pub dynamic_threshold: Option<f64>,
}

impl EnrichedRecord {
    /// Whether the value breaches a fixed threshold
    pub fn is_static_alert(&self, threshold: f64) -> bool {
        self.value > threshold
    }

    /// Whether the value breaches the adaptive threshold.
    /// Always false where the baseline is still warming up.
    pub fn is_dynamic_alert(&self) -> bool {
        self.dynamic_threshold
            .map(|threshold| self.value > threshold)
            .unwrap_or(false)
    }
}

/// The observation series with baseline columns, in the same order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSeries {
    pub window_size: usize,
    pub z_multiplier: f64,
    pub records: Vec<EnrichedRecord>,
}

impl EnrichedSeries {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnrichedRecord> {
        self.records.iter()
    }

    /// Records whose baseline is defined
    pub fn defined_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.dynamic_threshold.is_some())
            .count()
    }

    /// Records flagged by the adaptive threshold
    pub fn dynamic_alerts(&self) -> impl Iterator<Item = &EnrichedRecord> {
        self.records.iter().filter(|r| r.is_dynamic_alert())
    }
}

/// Outcome of comparing the static and dynamic alert policies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub static_count: u64,
    pub dynamic_count: u64,
    /// Signed: negative when the adaptive policy raises more alerts
    pub reduction_pct: f64,
}

impl SimulationResult {
    pub fn new(static_count: u64, dynamic_count: u64) -> Self {
        let reduction_pct = if static_count > 0 {
            (static_count as f64 - dynamic_count as f64) / static_count as f64 * 100.0
        } else {
            0.0
        };

        Self {
            static_count,
            dynamic_count,
            reduction_pct,
        }
    }

    /// Alerts avoided by switching policies (negative when alerts increase)
    pub fn suppressed_alerts(&self) -> i64 {
        self.static_count as i64 - self.dynamic_count as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_392_388_200 + minute * 60, 0).unwrap()
    }

    #[test]
    fn test_new_rejects_unsorted() {
        let records = vec![
            Observation::new(at(0), 1.0),
            Observation::new(at(10), 2.0),
            Observation::new(at(5), 3.0),
        ];

        assert_eq!(
            ObservationSeries::new(records),
            Err(SeriesError::Unsorted { index: 2 })
        );
    }

    #[test]
    fn test_new_accepts_ties() {
        let records = vec![Observation::new(at(0), 1.0), Observation::new(at(0), 2.0)];
        assert_eq!(ObservationSeries::new(records).unwrap().len(), 2);
    }

    #[test]
    fn test_from_unsorted_is_stable() {
        let series = ObservationSeries::from_unsorted(vec![
            Observation::new(at(10), 1.0),
            Observation::new(at(5), 2.0),
            Observation::new(at(5), 3.0),
        ]);

        let values: Vec<f64> = series.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![2.0, 3.0, 1.0]);
        assert_eq!(series.time_span(), Some((at(5), at(10))));
    }

    #[test]
    fn test_dynamic_alert_requires_threshold() {
        let record = EnrichedRecord {
            timestamp: at(0),
            value: 1_000.0,
            rolling_mean: None,
            rolling_std: None,
            dynamic_threshold: None,
        };

        assert!(!record.is_dynamic_alert());
        assert!(record.is_static_alert(40.0));
    }

    #[test]
    fn test_reduction_sign() {
        assert_eq!(SimulationResult::new(0, 0).reduction_pct, 0.0);
        assert_eq!(SimulationResult::new(4, 1).reduction_pct, 75.0);

        let worse = SimulationResult::new(2, 3);
        assert!(worse.reduction_pct < 0.0);
        assert_eq!(worse.suppressed_alerts(), -1);
    }
}
