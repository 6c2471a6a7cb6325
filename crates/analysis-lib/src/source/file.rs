//! Local CSV file source

use super::{decode, SeriesSource};
use crate::error::SourceError;
use crate::models::ObservationSeries;
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads the series from a CSV file on disk
#[derive(Debug, Clone)]
pub struct FileCsvSource {
    path: PathBuf,
}

impl FileCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeriesSource for FileCsvSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<ObservationSeries, SourceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;

        decode::parse_series(bytes.as_slice())
    }
}
