//! Butterworth filtering for waveform buffers
//!
//! A [`Butterworth`] holds a band shape, order and corner frequencies in Hz
//! and designs [`IirCoefficients`](wave_core::IirCoefficients) for whatever
//! sampling rate it is asked for. A [`StreamFilter`] pairs a design with
//! forward-only or zero-phase application.
//!
//! Filtering pads the buffer with its mean before running the recursion,
//! so output length always equals input length and no padding reaches the
//! result.
//!
//! # Example
//!
//! ```rust
//! use wave_core::SampleBuffer;
//! use wave_filter::{Butterworth, StreamFilter};
//!
//! let mut buffer = SampleBuffer::new(vec![100; 64], 0.0, 10.0);
//! let filter = StreamFilter::new(Butterworth::lowpass(2, 1.0)).zero_phase(true);
//! filter.apply(&mut buffer).unwrap();
//! assert_eq!(buffer.len(), 64);
//! ```

pub mod butterworth;
pub mod stream;
pub mod types;

pub use butterworth::{Butterworth, MAX_ORDER};
pub use stream::StreamFilter;
pub use types::{ButterworthSettings, FilterType};
