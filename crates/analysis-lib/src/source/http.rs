//! Remote CSV source over HTTP(S)

use super::{decode, SeriesSource};
use crate::error::SourceError;
use crate::models::ObservationSeries;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Downloads the series from a URL
pub struct HttpCsvSource {
    client: Client,
    url: Url,
}

impl HttpCsvSource {
    /// Create a source with its own HTTP client
    pub fn new(url: Url, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| SourceError::Http {
                url: url.to_string(),
                source,
            })?;

        Ok(Self { client, url })
    }

    fn request_error(&self, source: reqwest::Error) -> SourceError {
        SourceError::Http {
            url: self.url.to_string(),
            source,
        }
    }
}

#[async_trait]
impl SeriesSource for HttpCsvSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<ObservationSeries, SourceError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(|e| self.request_error(e))?;
        debug!(url = %self.url, bytes = body.len(), "Downloaded series");

        decode::parse_series(body.as_ref())
    }
}
