//! Report configuration
//!
//! Layered from serde defaults, an optional config file, `SMARTALERT_*`
//! environment variables and finally command-line flags.

use crate::Cli;
use analysis_lib::baseline::{DEFAULT_WINDOW_SIZE, DEFAULT_Z_MULTIPLIER};
use analysis_lib::pipeline::DEFAULT_STATIC_THRESHOLD;
use analysis_lib::report::{DEFAULT_MINUTES_PER_ALERT, DEFAULT_OUTPUT_PATH};
use analysis_lib::source::DEFAULT_SOURCE_URL;
use analysis_lib::{ChartOptions, PipelineConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Report configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// CSV location: http(s) URL, file:// URL or local path
    #[serde(default = "default_source")]
    pub source: String,

    /// Rolling window length in samples
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Standard deviations above the rolling mean
    #[serde(default = "default_z_multiplier")]
    pub z_multiplier: f64,

    /// Fixed threshold of the legacy alert rule
    #[serde(default = "default_static_threshold")]
    pub static_threshold: f64,

    /// Chart destination; the extension picks the image format
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Triage minutes attributed to each alert
    #[serde(default = "default_minutes_per_alert")]
    pub minutes_per_alert: u32,

    #[serde(default = "default_chart_width")]
    pub chart_width: u32,

    #[serde(default = "default_chart_height")]
    pub chart_height: u32,

    /// Prometheus textfile destination, disabled when unset
    #[serde(default)]
    pub metrics_path: Option<PathBuf>,

    /// Timeout for remote sources in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

fn default_source() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_z_multiplier() -> f64 {
    DEFAULT_Z_MULTIPLIER
}

fn default_static_threshold() -> f64 {
    DEFAULT_STATIC_THRESHOLD
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_minutes_per_alert() -> u32 {
    DEFAULT_MINUTES_PER_ALERT
}

fn default_chart_width() -> u32 {
    ChartOptions::default().width
}

fn default_chart_height() -> u32 {
    ChartOptions::default().height
}

fn default_http_timeout() -> u64 {
    30
}

impl ReportConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix("SMARTALERT").try_parsing(true))
            .build()
            .context("Failed to load configuration")?;

        config
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Apply flags given on the command line
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(source) = &cli.source {
            self.source = source.clone();
        }
        if let Some(output) = &cli.output {
            self.output_path = output.clone();
        }
        if let Some(threshold) = cli.static_threshold {
            self.static_threshold = threshold;
        }
        if let Some(window) = cli.window {
            self.window_size = window;
        }
        if let Some(z) = cli.z_multiplier {
            self.z_multiplier = z;
        }
        if let Some(path) = &cli.metrics_path {
            self.metrics_path = Some(path.clone());
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            window_size: self.window_size,
            z_multiplier: self.z_multiplier,
            static_threshold: self.static_threshold,
            output_path: self.output_path.clone(),
            chart: ChartOptions {
                width: self.chart_width,
                height: self.chart_height,
                minutes_per_alert: self.minutes_per_alert,
            },
            metrics_path: self.metrics_path.clone(),
        }
    }
}
