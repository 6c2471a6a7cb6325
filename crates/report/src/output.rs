//! Output formatting utilities

use analysis_lib::PipelineOutcome;
use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for the run summary
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Machine-readable run summary
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub observations: usize,
    pub legacy_alerts: u64,
    pub optimized_alerts: u64,
    pub reduction_pct: f64,
    pub hours_saved: i64,
    pub report_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_path: Option<String>,
}

impl From<&PipelineOutcome> for SummaryReport {
    fn from(outcome: &PipelineOutcome) -> Self {
        Self {
            observations: outcome.observations,
            legacy_alerts: outcome.summary.legacy_alerts,
            optimized_alerts: outcome.summary.optimized_alerts,
            reduction_pct: outcome.summary.reduction_pct,
            hours_saved: outcome.summary.hours_saved,
            report_path: outcome.report_path.display().to_string(),
            metrics_path: outcome
                .metrics_path
                .as_ref()
                .map(|p| p.display().to_string()),
        }
    }
}

/// Print the impact summary of a completed run
pub fn print_summary(outcome: &PipelineOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let summary = &outcome.summary;
            let rows = vec![
                SummaryRow {
                    metric: "Observations",
                    value: outcome.observations.to_string(),
                },
                SummaryRow {
                    metric: "Legacy Alerts (Static)",
                    value: summary.legacy_alerts.to_string(),
                },
                SummaryRow {
                    metric: "Optimized Alerts (Smart)",
                    value: summary.optimized_alerts.to_string(),
                },
                SummaryRow {
                    metric: "Alert Noise Reduction",
                    value: color_reduction(summary.reduction_pct),
                },
                SummaryRow {
                    metric: "Estimated Time Saved",
                    value: format!("~{} hours/week", summary.hours_saved),
                },
            ];

            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&SummaryReport::from(outcome))
                .context("Failed to serialize summary")?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Format a reduction percentage, red when alert volume grew
pub fn color_reduction(reduction_pct: f64) -> String {
    let formatted = format!("{:.1}%", reduction_pct);
    if reduction_pct > 0.0 {
        formatted.green().to_string()
    } else if reduction_pct < 0.0 {
        formatted.red().to_string()
    } else {
        formatted
    }
}
