//! In-place transforms: decimation, truncation, offset removal, detrending
//!
//! Every transform here writes into the buffer's existing storage (or a
//! shortened view of it) and leaves the statistics cache stale.

use crate::buffer::{to_sample, SampleBuffer};
use crate::error::{Error, Result};
use crate::stats::NO_DATA;

impl SampleBuffer {
    /// Keep every `factor`-th sample and divide the sampling rate by `factor`
    ///
    /// Any trailing remainder shorter than `factor` is dropped, so the result
    /// holds `len / factor` samples and sample `i` is former sample
    /// `i * factor`.
    pub fn decimate(&mut self, factor: usize) -> Result<()> {
        if factor == 0 {
            return Err(Error::InvalidParameter(
                "decimation factor must be at least 1".to_string(),
            ));
        }
        if factor == 1 {
            return Ok(());
        }
        let kept = self.samples.len() / factor;
        for i in 0..kept {
            self.samples[i] = self.samples[i * factor];
        }
        self.samples.truncate(kept);
        self.sampling_rate /= factor as f64;
        self.stats.invalidate();
        Ok(())
    }

    /// Keep only the first `n` samples
    pub fn trunc(&mut self, n: usize) {
        if n < self.samples.len() {
            self.samples.truncate(n);
            self.stats.invalidate();
        }
    }

    /// Subtract `value` from every valid sample
    pub fn subtract(&mut self, value: i32) {
        for s in self.samples.iter_mut().filter(|s| **s != NO_DATA) {
            *s = to_sample(f64::from(*s) - f64::from(value));
        }
        self.stats.invalidate();
    }

    /// Subtract the rounded mean from every valid sample
    pub fn remove_mean(&mut self) {
        let mean = to_sample(self.mean());
        self.subtract(mean);
    }

    /// Remove the least-squares linear trend against sample index
    ///
    /// The fit uses `x̄ = n / 2` and the mean of valid samples; each valid
    /// sample then has the fitted line at its index subtracted from its
    /// current value and is rounded. Gaps are untouched.
    pub fn detrend(&mut self) {
        let n = self.samples.len();
        if n < 2 {
            return;
        }
        let xm = n as f64 / 2.0;
        let ym = self.mean();

        let mut ssxx = 0.0;
        let mut ssxy = 0.0;
        for (i, &s) in self.samples.iter().enumerate() {
            if s != NO_DATA {
                let dx = i as f64 - xm;
                ssxy += dx * (f64::from(s) - ym);
                ssxx += dx * dx;
            }
        }
        if ssxx == 0.0 {
            return;
        }

        let slope = ssxy / ssxx;
        let intercept = ym - slope * xm;
        for (i, s) in self.samples.iter_mut().enumerate() {
            if *s != NO_DATA {
                *s = to_sample(f64::from(*s) - (i as f64 * slope + intercept));
            }
        }
        self.stats.invalidate();
    }
}
