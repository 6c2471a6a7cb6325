//! SmartAlert - static vs. adaptive alert threshold report
//!
//! Loads a utilization series, derives a rolling adaptive threshold,
//! compares its alert volume with a fixed threshold and saves an impact
//! chart.

use analysis_lib::{create_source, Pipeline};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod output;

/// SmartAlert threshold optimizer
#[derive(Parser)]
#[command(name = "smartalert")]
#[command(author, version, about = "SmartAlert threshold optimization report", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// CSV source: http(s) URL, file:// URL or local path
    #[arg(long, short)]
    pub source: Option<String>,

    /// Report image path (.png, .jpg, .bmp or .svg)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Fixed threshold of the legacy alert rule
    #[arg(long)]
    pub static_threshold: Option<f64>,

    /// Rolling window length in samples
    #[arg(long)]
    pub window: Option<usize>,

    /// Standard deviations above the rolling mean
    #[arg(long)]
    pub z_multiplier: Option<f64>,

    /// Write run metrics in Prometheus text format to this file
    #[arg(long)]
    pub metrics_path: Option<PathBuf>,

    /// Summary output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // JSON logs on stderr keep stdout for the summary
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();

    let mut config = config::ReportConfig::load(cli.config.as_deref())?;
    config.apply_overrides(&cli);
    info!(
        source = %config.source,
        output = %config.output_path.display(),
        "Report configured"
    );

    let source = create_source(&config.source, config.http_timeout())
        .context("Invalid series source")?;
    let pipeline =
        Pipeline::new(config.pipeline_config()).context("Invalid analysis parameters")?;

    let outcome = pipeline
        .run(source.as_ref())
        .await
        .context("Threshold analysis failed")?;

    output::print_summary(&outcome, cli.format)?;
    if matches!(cli.format, output::OutputFormat::Table) {
        output::print_success(&format!(
            "Report saved to: {}",
            outcome.report_path.display()
        ));
    }

    Ok(())
}
