//! Gap-tolerant sampled waveform engine
//!
//! Umbrella crate re-exporting the workspace:
//!
//! - [`core`]: [`SampleBuffer`], [`SliceView`], buffer algebra, smoothing,
//!   IIR application and the binary codec
//! - [`rolling`]: exact rolling mean and median windows
//! - [`spectral`]: padded FFTs and spectrograms
//! - [`filter`]: Butterworth design and zero-phase filtering
//!
//! # Example
//!
//! ```rust
//! use wavekit::prelude::*;
//!
//! let raw = vec![12, 11, NO_DATA, 13, 900, 12, 11, 12];
//! let mut buffer = SampleBuffer::new(raw, 1_700_000_000.0, 1.0);
//! buffer.despike(3.0).unwrap();
//! assert!(buffer.max() < 900);
//!
//! let bytes = buffer.to_bytes().unwrap();
//! let decoded = SampleBuffer::from_bytes(&bytes).unwrap();
//! assert_eq!(decoded.samples(), buffer.samples());
//! ```

pub use wave_core as core;
pub use wave_filter as filter;
pub use wave_rolling as rolling;
pub use wave_spectral as spectral;

pub use wave_core::{
    BinaryCodec, DataType, EraseOutcome, Error, IirCoefficients, IirDesign, RangeOutcome, Result,
    SampleBuffer, SampleSource, SliceView, Statistics, NO_DATA,
};
pub use wave_core::write_text;
pub use wave_filter::{Butterworth, ButterworthSettings, FilterType, StreamFilter};
pub use wave_rolling::{Meaner, Medianer, RollingStatistic};
pub use wave_spectral::{SpectralAnalysis, SpectralAnalyzer, Spectrogram, SpectrogramParams};

/// Common imports for waveform processing
pub mod prelude {
    pub use wave_core::{
        IirDesign, RangeOutcome, Result, SampleBuffer, SampleSource, SliceView, NO_DATA,
    };
    pub use wave_filter::{Butterworth, StreamFilter};
    pub use wave_spectral::{SpectralAnalysis, SpectrogramParams};
}
