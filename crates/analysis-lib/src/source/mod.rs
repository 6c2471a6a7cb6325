//! Input series acquisition
//!
//! A source fetches a CSV document from a local file or a remote URL and
//! hands back an `ObservationSeries` sorted by timestamp. The analysis does
//! not care where the series came from.

mod decode;
mod file;
mod http;


pub use decode::{parse_series, parse_timestamp};
pub use file::FileCsvSource;
pub use http::HttpCsvSource;

use crate::error::SourceError;
use crate::models::ObservationSeries;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// NAB realAWSCloudwatch EC2 CPU utilization sample (5-minute interval)
pub const DEFAULT_SOURCE_URL: &str = "https://raw.githubusercontent.com/numenta/NAB/master/data/realAWSCloudwatch/ec2_cpu_utilization_5f5533.csv";

/// Default timeout for remote sources
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for series acquisition implementations
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Where the series is read from, for logs
    fn describe(&self) -> String;

    /// Fetch and decode the full series
    async fn fetch(&self) -> Result<ObservationSeries, SourceError>;
}

/// Create the appropriate source for a URL or filesystem path
pub fn create_source(
    location: &str,
    http_timeout: Duration,
) -> Result<Arc<dyn SeriesSource>, SourceError> {
    match Url::parse(location) {
        Ok(url) => match url.scheme() {
            "http" | "https" => {
                tracing::info!(url = %url, "Using HTTP series source");
                Ok(Arc::new(HttpCsvSource::new(url, http_timeout)?))
            }
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| SourceError::UnsupportedLocation(location.to_string()))?;
                tracing::info!(path = %path.display(), "Using file series source");
                Ok(Arc::new(FileCsvSource::new(path)))
            }
            _ => Err(SourceError::UnsupportedLocation(location.to_string())),
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            tracing::info!(path = %location, "Using file series source");
            Ok(Arc::new(FileCsvSource::new(location)))
        }
        Err(_) => Err(SourceError::UnsupportedLocation(location.to_string())),
    }
}
