//! Read-only access shared by buffers and slices

use crate::buffer::SampleBuffer;
use crate::slice::SliceView;
use crate::stats::{fill_gaps, Statistics};

/// Anything exposing regularly sampled data with cached statistics
///
/// Implemented by [`SampleBuffer`] and [`SliceView`] so analysis code can run
/// on a whole buffer or a window of it without copying.
pub trait SampleSource {
    /// Samples, [`NO_DATA`](crate::NO_DATA) marking gaps
    fn samples(&self) -> &[i32];

    /// Time of the first sample
    fn start_time(&self) -> f64;

    /// Samples per second
    fn sampling_rate(&self) -> f64;

    /// Statistics over the valid samples
    fn statistics(&self) -> &Statistics;

    /// Samples as `f64` with gaps replaced by the mean
    fn signal(&self) -> Vec<f64> {
        fill_gaps(self.samples(), self.statistics().mean)
    }
}

impl SampleSource for SampleBuffer {
    fn samples(&self) -> &[i32] {
        SampleBuffer::samples(self)
    }

    fn start_time(&self) -> f64 {
        SampleBuffer::start_time(self)
    }

    fn sampling_rate(&self) -> f64 {
        SampleBuffer::sampling_rate(self)
    }

    fn statistics(&self) -> &Statistics {
        SampleBuffer::statistics(self)
    }
}

impl SampleSource for SliceView<'_> {
    fn samples(&self) -> &[i32] {
        SliceView::samples(self)
    }

    fn start_time(&self) -> f64 {
        SliceView::start_time(self)
    }

    fn sampling_rate(&self) -> f64 {
        SliceView::sampling_rate(self)
    }

    fn statistics(&self) -> &Statistics {
        SliceView::statistics(self)
    }
}
