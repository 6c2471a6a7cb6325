//! Rolling baseline estimation
//!
//! Computes a trailing-window mean and standard deviation for every
//! observation and derives the adaptive threshold `mean + k * std`.

mod rolling;

pub use rolling::{RollingWindow, WindowStats};

use crate::error::BaselineError;
use crate::models::{EnrichedRecord, EnrichedSeries, ObservationSeries};

/// Default window: one hour of 5-minute samples
pub const DEFAULT_WINDOW_SIZE: usize = 12;

/// Default number of standard deviations above the mean
pub const DEFAULT_Z_MULTIPLIER: f64 = 1.0;

/// Derives the rolling baseline and adaptive threshold of a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineEstimator {
    window_size: usize,
    z_multiplier: f64,
}

impl BaselineEstimator {
    pub fn new(window_size: usize, z_multiplier: f64) -> Result<Self, BaselineError> {
        if window_size == 0 {
            return Err(BaselineError::ZeroWindow);
        }
        if !z_multiplier.is_finite() {
            return Err(BaselineError::InvalidMultiplier(z_multiplier));
        }

        Ok(Self {
            window_size,
            z_multiplier,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn z_multiplier(&self) -> f64 {
        self.z_multiplier
    }

    /// Enrich every observation with its trailing-window baseline.
    ///
    /// The first `window_size - 1` records have no baseline. The input is
    /// left untouched.
    pub fn analyze(&self, series: &ObservationSeries) -> EnrichedSeries {
        let mut window = RollingWindow::new(self.window_size);

        let records = series
            .iter()
            .map(|obs| {
                window.push(obs.value);
                let stats = window.stats();

                EnrichedRecord {
                    timestamp: obs.timestamp,
                    value: obs.value,
                    rolling_mean: stats.map(|s| s.mean),
                    rolling_std: stats.map(|s| s.std_dev),
                    dynamic_threshold: stats.map(|s| s.mean + self.z_multiplier * s.std_dev),
                }
            })
            .collect();

        EnrichedSeries {
            window_size: self.window_size,
            z_multiplier: self.z_multiplier,
            records,
        }
    }
}

impl Default for BaselineEstimator {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            z_multiplier: DEFAULT_Z_MULTIPLIER,
        }
    }
}

/// Enrich a series using the default multiplier and the given window
pub fn analyze(
    series: &ObservationSeries,
    window_size: usize,
) -> Result<EnrichedSeries, BaselineError> {
    Ok(BaselineEstimator::new(window_size, DEFAULT_Z_MULTIPLIER)?.analyze(series))
}
