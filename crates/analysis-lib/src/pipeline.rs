//! End-to-end threshold analysis run
//!
//! Fetch → baseline → simulation → report, each stage fully materialized
//! before the next one starts.

use crate::baseline::{BaselineEstimator, DEFAULT_WINDOW_SIZE, DEFAULT_Z_MULTIPLIER};
use crate::error::PipelineError;
use crate::models::{ObservationSeries, SimulationResult};
use crate::observability::{PipelineMetrics, StructuredLogger};
use crate::report::{ChartOptions, ImpactSummary, ReportRenderer, DEFAULT_OUTPUT_PATH};
use crate::simulation::simulate;
use crate::source::SeriesSource;
use chrono::Utc;
use std::path::PathBuf;
use std::time::Instant;

/// Static threshold used when none is given
pub const DEFAULT_STATIC_THRESHOLD: f64 = 40.0;

/// Parameters of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub window_size: usize,
    pub z_multiplier: f64,
    pub static_threshold: f64,
    pub output_path: PathBuf,
    pub chart: ChartOptions,
    /// Optional Prometheus textfile destination
    pub metrics_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            z_multiplier: DEFAULT_Z_MULTIPLIER,
            static_threshold: DEFAULT_STATIC_THRESHOLD,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            chart: ChartOptions::default(),
            metrics_path: None,
        }
    }
}

/// What a completed run produced
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub observations: usize,
    pub result: SimulationResult,
    pub summary: ImpactSummary,
    pub report_path: PathBuf,
    pub metrics_path: Option<PathBuf>,
}

/// A configured analysis run
pub struct Pipeline {
    config: PipelineConfig,
    estimator: BaselineEstimator,
    renderer: ReportRenderer,
    logger: StructuredLogger,
}

impl Pipeline {
    /// Validate the configuration and build the stages
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let estimator = BaselineEstimator::new(config.window_size, config.z_multiplier)?;
        let renderer = ReportRenderer::new(config.chart);
        let logger = StructuredLogger::new(Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string());

        Ok(Self {
            config,
            estimator,
            renderer,
            logger,
        })
    }

    /// Fetch the series from `source` and run every stage on it
    pub async fn run(&self, source: &dyn SeriesSource) -> Result<PipelineOutcome, PipelineError> {
        self.logger.log_run_started(
            &source.describe(),
            self.config.window_size,
            self.config.z_multiplier,
            self.config.static_threshold,
        );

        let metrics = PipelineMetrics::new()?;
        let started = Instant::now();
        let series = source.fetch().await?;
        metrics.observe_stage("fetch", started.elapsed().as_secs_f64());

        self.process(series, metrics)
    }

    /// Run every stage on an already loaded series
    pub fn run_on_series(&self, series: ObservationSeries) -> Result<PipelineOutcome, PipelineError> {
        self.logger.log_run_started(
            "in-memory",
            self.config.window_size,
            self.config.z_multiplier,
            self.config.static_threshold,
        );

        self.process(series, PipelineMetrics::new()?)
    }

    fn process(
        &self,
        series: ObservationSeries,
        metrics: PipelineMetrics,
    ) -> Result<PipelineOutcome, PipelineError> {
        let span = series
            .time_span()
            .map(|(first, last)| (first.to_rfc3339(), last.to_rfc3339()));
        self.logger.log_series_loaded(series.len(), span);

        let started = Instant::now();
        let enriched = self.estimator.analyze(&series);
        metrics.observe_stage("baseline", started.elapsed().as_secs_f64());
        metrics.set_series(enriched.len(), enriched.defined_count());
        self.logger.log_baseline_computed(
            enriched.len(),
            enriched.defined_count(),
            self.estimator.window_size(),
        );

        let started = Instant::now();
        let result = simulate(&enriched, self.config.static_threshold);
        metrics.observe_stage("simulate", started.elapsed().as_secs_f64());
        self.logger.log_simulation(&result, self.config.static_threshold);

        let summary = ImpactSummary::new(&result, self.config.chart.minutes_per_alert);
        metrics.set_outcome(&result, &summary);

        let started = Instant::now();
        let report_path = self
            .renderer
            .render(&enriched, &result, &self.config.output_path)?;
        metrics.observe_stage("render", started.elapsed().as_secs_f64());
        self.logger.log_report_written(&report_path, summary.hours_saved);

        if let Some(path) = &self.config.metrics_path {
            metrics.write_textfile(path)?;
            self.logger.log_metrics_written(path);
        }

        Ok(PipelineOutcome {
            observations: series.len(),
            result,
            summary,
            report_path,
            metrics_path: self.config.metrics_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BaselineError, ReportError};
    use crate::models::Observation;
    use crate::source::FileCsvSource;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir, file_name: &str) -> PipelineConfig {
        PipelineConfig {
            static_threshold: 5.0,
            output_path: temp_dir.path().join("reports").join(file_name),
            chart: ChartOptions {
                width: 480,
                height: 240,
                ..ChartOptions::default()
            },
            ..PipelineConfig::default()
        }
    }

    fn flat_series(len: i64, value: f64) -> ObservationSeries {
        let records = (0..len)
            .map(|i| {
                let timestamp = Utc.timestamp_opt(1_392_388_200 + i * 300, 0).unwrap();
                Observation::new(timestamp, value)
            })
            .collect();
        ObservationSeries::new(records).unwrap()
    }

    #[test]
    fn test_invalid_window_rejected() {
        let config = PipelineConfig {
            window_size: 0,
            ..PipelineConfig::default()
        };

        assert!(matches!(
            Pipeline::new(config),
            Err(PipelineError::Baseline(BaselineError::ZeroWindow))
        ));
    }

    #[test]
    fn test_flat_series_run() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = Pipeline::new(test_config(&temp_dir, "impact.svg")).unwrap();

        let outcome = pipeline.run_on_series(flat_series(24, 10.0)).unwrap();

        assert_eq!(outcome.observations, 24);
        assert_eq!(outcome.result.static_count, 24);
        assert_eq!(outcome.result.dynamic_count, 0);
        assert_eq!(outcome.result.reduction_pct, 100.0);
        assert_eq!(outcome.summary.hours_saved, 2);
        assert!(outcome.report_path.exists());
    }

    #[test]
    fn test_empty_series_still_reports() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = Pipeline::new(test_config(&temp_dir, "empty.png")).unwrap();

        let outcome = pipeline.run_on_series(ObservationSeries::default()).unwrap();

        assert_eq!(outcome.result, SimulationResult::new(0, 0));
        assert_eq!(outcome.summary.hours_saved, 0);
        assert!(outcome.report_path.exists());
    }

    #[test]
    fn test_unsupported_output_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = Pipeline::new(test_config(&temp_dir, "impact.gif")).unwrap();

        assert!(matches!(
            pipeline.run_on_series(flat_series(3, 1.0)),
            Err(PipelineError::Report(ReportError::UnsupportedFormat(_)))
        ));
    }

    #[tokio::test]
    async fn test_run_from_file_with_metrics() {
        let temp_dir = TempDir::new().unwrap();
        let csv_path = temp_dir.path().join("cpu.csv");

        let mut csv = String::from("timestamp,value\n");
        for i in 0..36 {
            let value = if i == 30 { 95.0 } else { 20.0 + (i % 3) as f64 };
            csv.push_str(&format!(
                "2014-02-14 {:02}:{:02}:00,{}\n",
                10 + i / 12,
                (i % 12) * 5,
                value
            ));
        }
        tokio::fs::write(&csv_path, csv).await.unwrap();

        let mut config = test_config(&temp_dir, "impact.png");
        config.static_threshold = 40.0;
        config.metrics_path = Some(temp_dir.path().join("metrics").join("run.prom"));
        let pipeline = Pipeline::new(config).unwrap();

        let outcome = pipeline.run(&FileCsvSource::new(&csv_path)).await.unwrap();

        assert_eq!(outcome.observations, 36);
        assert_eq!(outcome.result.static_count, 1);
        assert!(outcome.result.dynamic_count >= 1);

        let metrics = std::fs::read_to_string(outcome.metrics_path.unwrap()).unwrap();
        assert!(metrics.contains("smartalert_observations 36"));
        assert!(metrics.contains("stage=\"fetch\""));
    }
}
