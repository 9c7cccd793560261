//! Spectrogram configuration

use serde::{Deserialize, Serialize};
use wave_core::{Error, Result};

/// Sampling rate below which an automatic FFT length equals the bin size
pub const AUTO_NFFT_RATE_THRESHOLD: f64 = 100.0;

/// Parameters for [`to_spectrogram`](crate::SpectralAnalysis::to_spectrogram)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramParams {
    /// Samples per frame
    pub bin_size: usize,
    /// FFT length per frame; 0 selects it from the sampling rate
    pub nfft: usize,
    /// Report `20·log10(magnitude)` instead of raw magnitude
    pub log_power: bool,
    /// Fraction of each frame shared with the next, in `[0, 1)`
    pub overlap: f64,
}

impl Default for SpectrogramParams {
    fn default() -> Self {
        Self {
            bin_size: 256,
            nfft: 0,
            log_power: true,
            overlap: 0.859375,
        }
    }
}

impl SpectrogramParams {
    /// Create parameters with the default overlap
    pub fn new(bin_size: usize, nfft: usize, log_power: bool) -> Self {
        Self {
            bin_size,
            nfft,
            log_power,
            ..Self::default()
        }
    }

    /// Builder-style overlap
    pub fn with_overlap(mut self, overlap: f64) -> Self {
        self.overlap = overlap;
        self
    }

    /// Check the parameters are usable
    ///
    /// # Errors
    /// Returns `Error::InvalidParameter` for a zero bin size, an overlap
    /// outside `[0, 1)`, or an explicit FFT length shorter than a frame.
    pub fn validate(&self) -> Result<()> {
        if self.bin_size == 0 {
            return Err(Error::InvalidParameter(
                "spectrogram bin size must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.overlap) {
            return Err(Error::InvalidParameter(format!(
                "overlap must be in [0, 1), got {}",
                self.overlap
            )));
        }
        if self.nfft != 0 && self.nfft < self.bin_size {
            return Err(Error::InvalidParameter(format!(
                "nfft {} is shorter than bin size {}",
                self.nfft, self.bin_size
            )));
        }
        Ok(())
    }

    /// FFT length to use at `sampling_rate`
    ///
    /// An explicit `nfft` wins. Otherwise slow-rate data uses the bin size
    /// and data at or above 100 Hz uses twice the bin size.
    pub fn resolve_nfft(&self, sampling_rate: f64) -> usize {
        match self.nfft {
            0 if sampling_rate < AUTO_NFFT_RATE_THRESHOLD => self.bin_size,
            0 => 2 * self.bin_size,
            nfft => nfft,
        }
    }

    /// Distance between frame starts in samples, at least one
    pub fn step(&self) -> usize {
        ((self.bin_size as f64 * (1.0 - self.overlap)).round() as usize).max(1)
    }
}
