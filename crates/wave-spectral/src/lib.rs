//! Spectral analysis of gap-tolerant waveforms
//!
//! FFTs and spectrograms over anything implementing
//! [`SampleSource`], so a whole [`SampleBuffer`](wave_core::SampleBuffer)
//! and a [`SliceView`](wave_core::SliceView) window are analysed the same
//! way. Gaps are replaced by the source's mean before transforming.
//!
//! Padding differs between the two FFT entry points:
//! - [`fft`](SpectralAnalysis::fft) pads **up** to the next power of two
//! - [`fast_fft`](SpectralAnalysis::fast_fft) truncates **down** to the
//!   previous power of two, discarding trailing samples
//!
//! # Example
//!
//! ```rust
//! use wave_core::SampleBuffer;
//! use wave_spectral::SpectralAnalysis;
//!
//! let buffer = SampleBuffer::new((0..100).collect(), 0.0, 10.0);
//! assert_eq!(buffer.fft().len(), 128);
//! assert_eq!(buffer.fast_fft().len(), 2 * 64);
//! ```

pub mod analyzer;
pub mod params;

pub use analyzer::{hann_window, padded_down, padded_up, SpectralAnalyzer, Spectrogram};
pub use params::SpectrogramParams;

use num_complex::Complex;
use wave_core::{Result, SampleSource};

/// FFT and spectrogram methods for every [`SampleSource`]
///
/// Each call plans its FFT afresh; hold a [`SpectralAnalyzer`] to reuse plans
/// across many calls of the same length.
pub trait SpectralAnalysis: SampleSource {
    /// Complex spectrum padded up to a power of two
    fn fft(&self) -> Vec<Complex<f64>> {
        SpectralAnalyzer::new().fft(self)
    }

    /// Interleaved spectrum truncated down to a power of two
    fn fast_fft(&self) -> Vec<f64> {
        SpectralAnalyzer::new().fast_fft(self)
    }

    /// Sliding-window magnitude spectrogram
    fn to_spectrogram(&self, params: &SpectrogramParams) -> Result<Spectrogram> {
        SpectralAnalyzer::new().spectrogram(self, params)
    }
}

impl<S: SampleSource + ?Sized> SpectralAnalysis for S {}
