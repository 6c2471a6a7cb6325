//! Observability for pipeline runs
//!
//! Provides:
//! - Prometheus run metrics written as a textfile for batch collection
//! - Structured logging of pipeline events with tracing

use crate::error::MetricsError;
use crate::models::SimulationResult;
use crate::report::ImpactSummary;
use prometheus::{Encoder, Gauge, HistogramOpts, HistogramVec, IntGauge, Registry, TextEncoder};
use std::path::Path;
use tracing::{info, warn};

/// Histogram buckets for stage durations (in seconds)
const STAGE_BUCKETS: &[f64] = &[0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0];

/// Metrics for a single pipeline run
///
/// Each instance owns its registry, so several runs in one process do not
/// collide.
#[derive(Clone)]
pub struct PipelineMetrics {
    registry: Registry,
    observations: IntGauge,
    baseline_defined: IntGauge,
    static_alerts: IntGauge,
    dynamic_alerts: IntGauge,
    reduction_percent: Gauge,
    hours_saved: IntGauge,
    stage_duration_seconds: HistogramVec,
}

impl PipelineMetrics {
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let observations = IntGauge::new(
            "smartalert_observations",
            "Number of observations in the analyzed series",
        )?;
        let baseline_defined = IntGauge::new(
            "smartalert_baseline_defined_observations",
            "Observations with a full rolling window",
        )?;
        let static_alerts = IntGauge::new(
            "smartalert_static_alerts",
            "Alerts raised by the static threshold",
        )?;
        let dynamic_alerts = IntGauge::new(
            "smartalert_dynamic_alerts",
            "Alerts raised by the adaptive threshold",
        )?;
        let reduction_percent = Gauge::new(
            "smartalert_alert_reduction_percent",
            "Signed alert volume reduction from static to adaptive",
        )?;
        let hours_saved = IntGauge::new(
            "smartalert_estimated_hours_saved",
            "Estimated triage hours saved per week",
        )?;
        let stage_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "smartalert_stage_duration_seconds",
                "Time spent in each pipeline stage",
            )
            .buckets(STAGE_BUCKETS.to_vec()),
            &["stage"],
        )?;

        registry.register(Box::new(observations.clone()))?;
        registry.register(Box::new(baseline_defined.clone()))?;
        registry.register(Box::new(static_alerts.clone()))?;
        registry.register(Box::new(dynamic_alerts.clone()))?;
        registry.register(Box::new(reduction_percent.clone()))?;
        registry.register(Box::new(hours_saved.clone()))?;
        registry.register(Box::new(stage_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            observations,
            baseline_defined,
            static_alerts,
            dynamic_alerts,
            reduction_percent,
            hours_saved,
            stage_duration_seconds,
        })
    }

    /// Record how long a stage took
    pub fn observe_stage(&self, stage: &str, duration_secs: f64) {
        self.stage_duration_seconds
            .with_label_values(&[stage])
            .observe(duration_secs);
    }

    /// Record the series and baseline coverage
    pub fn set_series(&self, observations: usize, baseline_defined: usize) {
        self.observations.set(observations as i64);
        self.baseline_defined.set(baseline_defined as i64);
    }

    /// Record the simulation outcome
    pub fn set_outcome(&self, result: &SimulationResult, summary: &ImpactSummary) {
        self.static_alerts.set(result.static_count as i64);
        self.dynamic_alerts.set(result.dynamic_count as i64);
        self.reduction_percent.set(result.reduction_pct);
        self.hours_saved.set(summary.hours_saved);
    }

    /// Render all metrics in Prometheus text exposition format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Write the exposition to `path`, creating its directory if needed
    pub fn write_textfile(&self, path: &Path) -> Result<(), MetricsError> {
        let body = self.encode()?;
        let io_error = |source: std::io::Error| MetricsError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, body).map_err(io_error)
    }
}

/// Structured logger for pipeline events
///
/// Provides consistent field names for every stage of a run.
#[derive(Clone)]
pub struct StructuredLogger {
    run_id: String,
}

impl StructuredLogger {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Log the start of a run
    pub fn log_run_started(
        &self,
        source: &str,
        window_size: usize,
        z_multiplier: f64,
        static_threshold: f64,
    ) {
        info!(
            event = "run_started",
            run_id = %self.run_id,
            source = %source,
            window_size = window_size,
            z_multiplier = z_multiplier,
            static_threshold = static_threshold,
            "Threshold analysis started"
        );
    }

    /// Log the loaded series
    pub fn log_series_loaded(&self, observations: usize, span: Option<(String, String)>) {
        if observations == 0 {
            warn!(
                event = "series_loaded",
                run_id = %self.run_id,
                observations = 0,
                "Series is empty, report will show zero counts"
            );
            return;
        }

        let (first, last) = span.unwrap_or_default();
        info!(
            event = "series_loaded",
            run_id = %self.run_id,
            observations = observations,
            first = %first,
            last = %last,
            "Loaded utilization series"
        );
    }

    /// Log baseline coverage
    pub fn log_baseline_computed(&self, observations: usize, defined: usize, window_size: usize) {
        if defined == 0 && observations > 0 {
            warn!(
                event = "baseline_computed",
                run_id = %self.run_id,
                observations = observations,
                window_size = window_size,
                "Series is shorter than the window, no adaptive threshold available"
            );
        } else {
            info!(
                event = "baseline_computed",
                run_id = %self.run_id,
                observations = observations,
                defined = defined,
                window_size = window_size,
                "Computed rolling baseline"
            );
        }
    }

    /// Log the alert comparison
    pub fn log_simulation(&self, result: &SimulationResult, static_threshold: f64) {
        info!(
            event = "simulation_completed",
            run_id = %self.run_id,
            static_threshold = static_threshold,
            static_alerts = result.static_count,
            dynamic_alerts = result.dynamic_count,
            reduction_pct = result.reduction_pct,
            "Compared static and adaptive alerting"
        );
    }

    /// Log the written report
    pub fn log_report_written(&self, path: &Path, hours_saved: i64) {
        info!(
            event = "report_written",
            run_id = %self.run_id,
            path = %path.display(),
            hours_saved = hours_saved,
            "Report saved"
        );
    }

    /// Log the written metrics textfile
    pub fn log_metrics_written(&self, path: &Path) {
        info!(
            event = "metrics_written",
            run_id = %self.run_id,
            path = %path.display(),
            "Run metrics exported"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_metrics_encode() {
        let metrics = PipelineMetrics::new().unwrap();
        let result = SimulationResult::new(40, 10);

        metrics.set_series(2016, 2005);
        metrics.set_outcome(&result, &ImpactSummary::new(&result, 5));
        metrics.observe_stage("baseline", 0.002);

        let text = metrics.encode().unwrap();
        assert!(text.contains("smartalert_observations 2016"));
        assert!(text.contains("smartalert_static_alerts 40"));
        assert!(text.contains("smartalert_dynamic_alerts 10"));
        assert!(text.contains("smartalert_alert_reduction_percent 75"));
        assert!(text.contains("smartalert_estimated_hours_saved 2"));
        assert!(text.contains("smartalert_stage_duration_seconds_count{stage=\"baseline\"} 1"));
    }

    #[test]
    fn test_independent_registries() {
        // Two runs in one process must not clash on registration
        let first = PipelineMetrics::new().unwrap();
        let second = PipelineMetrics::new().unwrap();
        first.set_series(1, 0);

        assert!(second.encode().unwrap().contains("smartalert_observations 0"));
    }

    #[test]
    fn test_write_textfile() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("textfile").join("smartalert.prom");

        PipelineMetrics::new().unwrap().write_textfile(&path).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("# TYPE smartalert_static_alerts gauge"));
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("run-1");
        assert_eq!(logger.run_id(), "run-1");
    }
}
