//! Gap-tolerant sampled waveform buffers
//!
//! This crate provides the in-memory representation used by every
//! waveform-bearing data path:
//!
//! - [`SampleBuffer`]: owned `i32` samples on a regular time grid, with
//!   lazily cached statistics that skip [`NO_DATA`] gaps
//! - [`SliceView`]: a borrowed `[position, limit)` window with its own
//!   statistics cache and a sequential read cursor
//! - Buffer algebra: split, chunk, subset, erase, combine and join
//! - In-place transforms: decimate, detrend, smoothing and IIR filtering
//! - [`BinaryCodec`]: the fixed big-endian byte layout
//!
//! Everything here is synchronous and single-threaded. A buffer is not
//! `Sync`-safe to populate statistics from several threads; callers that
//! share buffers serialize access themselves.
//!
//! # Example
//!
//! ```rust
//! use wave_core::{SampleBuffer, NO_DATA};
//!
//! let a = SampleBuffer::new(vec![1, 2, NO_DATA, 4], 100.0, 2.0);
//! let b = SampleBuffer::new(vec![5, 6], 102.0, 2.0);
//!
//! assert!(a.adjacent(&b));
//! assert_eq!(a.mean(), 7.0 / 3.0);
//!
//! let joined = SampleBuffer::join(&[a, b]).unwrap();
//! assert_eq!(joined.samples(), &[1, 2, NO_DATA, 4, 5, 6]);
//! assert_eq!(joined.end_time(), 103.0);
//! ```

pub mod algebra;
pub mod buffer;
pub mod codec;
pub mod error;
pub mod export;
pub mod iir;
pub mod policy;
pub mod slice;
pub mod smoothing;
pub mod source;
pub mod stats;
pub mod timing;
pub mod transform;

pub use algebra::Chunks;
pub use buffer::{DataType, SampleBuffer};
pub use codec::BinaryCodec;
pub use error::{Error, Result};
pub use export::write_text;
pub use iir::{IirCoefficients, IirDesign};
pub use policy::{EraseOutcome, RangeOutcome};
pub use slice::SliceView;
pub use smoothing::window_length;
pub use source::SampleSource;
pub use stats::{Statistics, NO_DATA};
