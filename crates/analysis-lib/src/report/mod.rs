//! Business impact report
//!
//! Turns the enriched series and simulation result into a chart with an
//! annotated summary panel and writes it to disk.

mod chart;

use crate::error::ReportError;
use crate::models::{EnrichedSeries, SimulationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Minutes an on-call engineer spends triaging one alert
pub const DEFAULT_MINUTES_PER_ALERT: u32 = 5;

/// Default report location, relative to the working directory
pub const DEFAULT_OUTPUT_PATH: &str = "reports/optimization_impact.png";

/// Chart geometry and the triage-cost heuristic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    /// Width in pixels (default: 14in at 300dpi)
    pub width: u32,
    /// Height in pixels (default: 7in at 300dpi)
    pub height: u32,
    pub minutes_per_alert: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 4200,
            height: 2100,
            minutes_per_alert: DEFAULT_MINUTES_PER_ALERT,
        }
    }
}

/// Headline numbers shown in the report panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub legacy_alerts: u64,
    pub optimized_alerts: u64,
    pub reduction_pct: f64,
    /// Whole hours per week, truncated toward zero
    pub hours_saved: i64,
}

impl ImpactSummary {
    pub fn new(result: &SimulationResult, minutes_per_alert: u32) -> Self {
        Self {
            legacy_alerts: result.static_count,
            optimized_alerts: result.dynamic_count,
            reduction_pct: result.reduction_pct,
            hours_saved: result.suppressed_alerts() * i64::from(minutes_per_alert) / 60,
        }
    }

    /// Panel text, one entry per line
    pub fn lines(&self) -> Vec<String> {
        vec![
            "BUSINESS IMPACT REPORT".to_string(),
            "--------------------------".to_string(),
            format!("Legacy Alerts (Static): {}", self.legacy_alerts),
            format!("Optimized Alerts (Smart): {}", self.optimized_alerts),
            format!("Alert Noise Reduction: {:.1}%", self.reduction_pct),
            format!("Estimated Time Saved: ~{} hours/week", self.hours_saved),
        ]
    }
}

impl fmt::Display for ImpactSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

/// Output encodings, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Bitmap,
    Svg,
}

impl ChartFormat {
    pub fn from_path(path: &Path) -> Result<Self, ReportError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("png") | Some("jpg") | Some("jpeg") | Some("bmp") => Ok(Self::Bitmap),
            Some("svg") => Ok(Self::Svg),
            _ => Err(ReportError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Renders the impact chart to an image file
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    options: ChartOptions,
}

impl ReportRenderer {
    pub fn new(options: ChartOptions) -> Self {
        Self { options }
    }

    /// Draw the chart and write it to `output_path`, returning the path
    pub fn render(
        &self,
        series: &EnrichedSeries,
        result: &SimulationResult,
        output_path: &Path,
    ) -> Result<PathBuf, ReportError> {
        let format = ChartFormat::from_path(output_path)?;
        ensure_parent_dir(output_path)?;

        let summary = ImpactSummary::new(result, self.options.minutes_per_alert);
        debug!(path = %output_path.display(), ?format, "Rendering report chart");

        chart::register_fonts()?;
        chart::draw(format, output_path, series, &summary, &self.options).map_err(|source| {
            ReportError::Render {
                path: output_path.to_path_buf(),
                source,
            }
        })?;

        Ok(output_path.to_path_buf())
    }
}

/// Render with default chart options from the raw counts
pub fn render(
    series: &EnrichedSeries,
    static_count: u64,
    dynamic_count: u64,
    reduction_pct: f64,
    output_path: &Path,
) -> Result<PathBuf, ReportError> {
    let result = SimulationResult {
        static_count,
        dynamic_count,
        reduction_pct,
    };
    ReportRenderer::default().render(series, &result, output_path)
}

/// Create the directory that will hold `path`; a no-op when it exists
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), ReportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| ReportError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
