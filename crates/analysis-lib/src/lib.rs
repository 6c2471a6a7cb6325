//! Analysis library for the SmartAlert threshold optimizer
//!
//! This crate provides the core functionality for:
//! - Loading a utilization series from a CSV source
//! - Rolling baseline estimation and adaptive thresholds
//! - Static vs. dynamic alert simulation
//! - Business impact report rendering
//! - Structured logging and run metrics

pub mod baseline;
pub mod error;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod report;
pub mod simulation;
pub mod source;

pub use baseline::{analyze, BaselineEstimator};
pub use error::{
    BaselineError, MetricsError, PipelineError, ReportError, SeriesError, SourceError,
};
pub use models::*;
pub use observability::{PipelineMetrics, StructuredLogger};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutcome};
pub use report::{render, ChartOptions, ImpactSummary, ReportRenderer};
pub use simulation::{simulate, AlertPolicy, DynamicThreshold, StaticThreshold};
pub use source::{create_source, FileCsvSource, HttpCsvSource, SeriesSource};
