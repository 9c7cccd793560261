//! Trailing-window smoothing (despike, set2mean, set2median)
//!
//! Each valid sample is replaced by a rolling statistic of the valid samples
//! in the trailing `period` seconds, itself included. Gaps stay gaps and are
//! not fed to the window.

use crate::buffer::{to_sample, SampleBuffer};
use crate::error::{Error, Result};
use crate::stats::NO_DATA;
use std::collections::VecDeque;
use tracing::debug;
use wave_rolling::{Meaner, Medianer, RollingStatistic};

/// Number of samples in a trailing window of `period` seconds
///
/// At least one sample, so the window always holds the current sample.
///
/// # Errors
/// Returns `Error::InvalidParameter` for a non-positive or non-finite
/// period or sampling rate.
pub fn window_length(period: f64, sampling_rate: f64) -> Result<usize> {
    if period <= 0.0 || !period.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "smoothing period must be positive, got {period}"
        )));
    }
    if sampling_rate <= 0.0 || !sampling_rate.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "sampling rate must be positive, got {sampling_rate}"
        )));
    }
    Ok(((period * sampling_rate).floor() as usize).max(1))
}

impl SampleBuffer {
    /// Suppress short spikes with a trailing rolling median
    pub fn despike(&mut self, period: f64) -> Result<()> {
        self.set2median(period)
    }

    /// Replace each sample with the mean of its trailing window
    pub fn set2mean(&mut self, period: f64) -> Result<()> {
        self.smooth_with(Meaner::new(), period)
    }

    /// Replace each sample with the median of its trailing window
    pub fn set2median(&mut self, period: f64) -> Result<()> {
        self.smooth_with(Medianer::new(), period)
    }

    /// Drive `stat` across the buffer with a trailing window of `period`
    ///
    /// `stat` is cleared first; only this buffer's samples enter the window.
    pub fn smooth_with<S: RollingStatistic>(&mut self, mut stat: S, period: f64) -> Result<()> {
        let window = window_length(period, self.sampling_rate)?;
        debug!(window, period, "smoothing with trailing window");
        stat.clear();

        // Indices of the samples currently held by `stat`, oldest first
        let mut held: VecDeque<usize> = VecDeque::with_capacity(window.min(self.samples.len()));
        for i in 0..self.samples.len() {
            let sample = self.samples[i];
            if sample == NO_DATA {
                continue;
            }
            stat.add(f64::from(sample));
            held.push_back(i);
            while let Some(&oldest) = held.front() {
                if i - oldest < window {
                    break;
                }
                held.pop_front();
                stat.remove_oldest();
            }
            if let Some(value) = stat.avg() {
                self.samples[i] = to_sample(value);
            }
        }

        self.stats.invalidate();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_length() {
        assert_eq!(window_length(1.0, 100.0).unwrap(), 100);
        assert_eq!(window_length(0.001, 100.0).unwrap(), 1);
        assert!(window_length(0.0, 100.0).is_err());
        assert!(window_length(1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_despike_removes_isolated_spike() {
        let mut buffer = SampleBuffer::new(vec![10, 10, 10, 5000, 10, 10, 10], 0.0, 1.0);
        buffer.despike(3.0).unwrap();
        assert_eq!(buffer.samples(), &[10; 7]);
        assert_eq!(buffer.max(), 10);
    }

    #[test]
    fn test_set2median_running_values() {
        let mut buffer = SampleBuffer::new(vec![5, 1, 4, 2, 8], 0.0, 1.0);
        buffer.set2median(10.0).unwrap();
        assert_eq!(buffer.samples(), &[5, 3, 4, 3, 4]);
    }

    #[test]
    fn test_set2mean_trailing_window() {
        let mut buffer = SampleBuffer::new(vec![0, 3, 6, 9, 12], 0.0, 2.0);
        // 1 second at 2 Hz: window of two samples
        buffer.set2mean(1.0).unwrap();
        assert_eq!(buffer.samples(), &[0, 2, 5, 8, 11]);
    }

    #[test]
    fn test_smoothing_skips_gaps() {
        let mut buffer = SampleBuffer::new(vec![2, NO_DATA, 4, NO_DATA], 0.0, 1.0);
        buffer.set2mean(3.0).unwrap();
        assert_eq!(buffer.samples(), &[2, NO_DATA, 3, NO_DATA]);
    }

    #[test]
    fn test_smooth_with_ignores_prior_contents() {
        let mut stale = Meaner::new();
        stale.add(1000.0);
        stale.add(1000.0);
        let mut buffer = SampleBuffer::new(vec![1, 2, 3], 0.0, 1.0);
        buffer.smooth_with(stale, 1.0).unwrap();
        assert_eq!(buffer.samples(), &[1, 2, 3]);

        let mut stale = Medianer::new();
        stale.add(-50.0);
        let mut buffer = SampleBuffer::new(vec![4, 6, 8], 0.0, 1.0);
        buffer.smooth_with(stale, 2.0).unwrap();
        assert_eq!(buffer.samples(), &[4, 5, 7]);
    }

    #[test]
    fn test_smoothing_rejects_bad_period() {
        let mut buffer = SampleBuffer::new(vec![1, 2, 3], 0.0, 1.0);
        assert!(buffer.set2mean(-1.0).is_err());
        assert_eq!(buffer.samples(), &[1, 2, 3]);
    }
}
