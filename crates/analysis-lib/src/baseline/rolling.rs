//! Fixed-size trailing window statistics
//!
//! Holds the most recent `capacity` samples and reports mean and sample
//! standard deviation once the window is full.

use std::collections::VecDeque;

/// Mean and spread of a full window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Count-based rolling window
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl RollingWindow {
    /// Create a window holding `capacity` samples (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Push a sample, evicting the oldest once the window is full
    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Statistics of the current window.
    ///
    /// `None` until the window is full or while it holds a non-finite sample.
    pub fn stats(&self) -> Option<WindowStats> {
        if !self.is_full() || self.samples.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let count = self.samples.len();
        let mean = self.samples.iter().sum::<f64>() / count as f64;

        // Two-pass variance; a single sample has no spread
        let std_dev = if count > 1 {
            let variance = self
                .samples
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>()
                / (count - 1) as f64; // Bessel's correction
            variance.sqrt()
        } else {
            0.0
        };

        Some(WindowStats { mean, std_dev })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_full_has_no_stats() {
        let mut window = RollingWindow::new(3);
        window.push(1.0);
        window.push(2.0);

        assert!(!window.is_full());
        assert!(window.stats().is_none());
    }

    #[test]
    fn test_sample_standard_deviation() {
        let mut window = RollingWindow::new(5);
        for v in [2.0, 4.0, 4.0, 4.0, 6.0] {
            window.push(v);
        }

        let stats = window.stats().unwrap();
        assert!((stats.mean - 4.0).abs() < 1e-12);
        // Sum of squares 8 over n-1 = 4
        assert!((stats.std_dev - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_eviction_keeps_latest() {
        let mut window = RollingWindow::new(2);
        for v in [100.0, 1.0, 3.0] {
            window.push(v);
        }

        assert!(window.is_full());
        assert!((window.stats().unwrap().mean - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_window() {
        let mut window = RollingWindow::new(1);
        window.push(7.5);

        let stats = window.stats().unwrap();
        assert_eq!(stats.mean, 7.5);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_non_finite_sample_poisons_window() {
        let mut window = RollingWindow::new(2);
        window.push(f64::NAN);
        window.push(1.0);
        assert!(window.stats().is_none());

        window.push(3.0);
        assert!(window.stats().is_some());
    }
}
