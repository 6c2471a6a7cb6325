//! Error types for each pipeline stage

use std::path::PathBuf;
use thiserror::Error;

/// Violations of the observation series ordering invariant
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("observation {index} is older than its predecessor")]
    Unsorted { index: usize },
}

/// Failures while acquiring or parsing the input series
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV header is missing the `{0}` column")]
    MissingColumn(&'static str),

    #[error("row {row}: cannot parse timestamp `{value}`")]
    InvalidTimestamp { row: usize, value: String },

    #[error("row {row}: cannot parse value `{value}`")]
    InvalidValue { row: usize, value: String },

    #[error("unsupported source location `{0}`")]
    UnsupportedLocation(String),
}

/// Invalid baseline parameters
#[derive(Debug, Error, PartialEq)]
pub enum BaselineError {
    #[error("window size must be at least 1")]
    ZeroWindow,

    #[error("z multiplier must be finite, got {0}")]
    InvalidMultiplier(f64),
}

/// Failures while rendering or persisting the report chart
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create report directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported report format for {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("bundled `{0}` font could not be loaded")]
    Font(&'static str),

    #[error("failed to draw {}: {source}", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Failures while exporting run metrics
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metrics registry error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("failed to write metrics to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure of a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Baseline(#[from] BaselineError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),
}
