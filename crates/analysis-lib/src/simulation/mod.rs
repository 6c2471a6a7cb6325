//! Static vs. adaptive alert simulation
//!
//! Classifies every enriched record under two alerting policies and
//! aggregates the alert volume each would have produced.

use crate::models::{EnrichedRecord, EnrichedSeries, SimulationResult};

/// An alerting rule evaluated per record
pub trait AlertPolicy {
    /// Human-readable name for this policy
    fn name(&self) -> &str;

    /// Whether the record would page someone under this policy
    fn fires(&self, record: &EnrichedRecord) -> bool;
}

/// Fires when the value strictly exceeds a fixed boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticThreshold(pub f64);

impl AlertPolicy for StaticThreshold {
    fn name(&self) -> &str {
        "static"
    }

    fn fires(&self, record: &EnrichedRecord) -> bool {
        record.is_static_alert(self.0)
    }
}

/// Fires when the value exceeds the record's rolling threshold
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DynamicThreshold;

impl AlertPolicy for DynamicThreshold {
    fn name(&self) -> &str {
        "dynamic"
    }

    fn fires(&self, record: &EnrichedRecord) -> bool {
        record.is_dynamic_alert()
    }
}

/// Count the records a policy fires on
pub fn count_alerts<P: AlertPolicy + ?Sized>(series: &EnrichedSeries, policy: &P) -> u64 {
    series.iter().filter(|r| policy.fires(r)).count() as u64
}

/// Compare a fixed threshold against the adaptive one
pub fn simulate(series: &EnrichedSeries, static_threshold: f64) -> SimulationResult {
    let legacy = StaticThreshold(static_threshold);
    let adaptive = DynamicThreshold;

    let static_count = count_alerts(series, &legacy);
    let dynamic_count = count_alerts(series, &adaptive);

    tracing::debug!(
        static_policy = legacy.name(),
        dynamic_policy = adaptive.name(),
        static_count,
        dynamic_count,
        "Classified records"
    );

    SimulationResult::new(static_count, dynamic_count)
}
