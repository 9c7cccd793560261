//! Non-owning, boundable windows over a [`SampleBuffer`]
//!
//! A [`SliceView`] borrows its buffer, so the buffer cannot be mutated while
//! the view is alive. The view keeps its own statistics cache, independent
//! of the buffer's, and a sequential read cursor for exporters.

use crate::buffer::SampleBuffer;
use crate::policy::RangeOutcome;
use crate::stats::{fill_gaps, Statistics, StatsCache};
use crate::timing;
use std::fmt;

/// Window `[position, limit)` over a borrowed [`SampleBuffer`]
///
/// [`next`](SliceView::next) reads samples from the cursor onward;
/// [`reset`](SliceView::reset) rewinds the cursor to `position`.
#[derive(Debug, Clone)]
pub struct SliceView<'a> {
    buffer: &'a SampleBuffer,
    position: usize,
    limit: usize,
    read_position: usize,
    stats: StatsCache,
}

impl<'a> SliceView<'a> {
    /// View covering the whole buffer
    pub fn new(buffer: &'a SampleBuffer) -> Self {
        Self {
            buffer,
            position: 0,
            limit: buffer.len(),
            read_position: 0,
            stats: StatsCache::new(),
        }
    }

    /// The buffer this view reads from
    pub fn buffer(&self) -> &'a SampleBuffer {
        self.buffer
    }

    /// Bound the view to the samples covering `[t1, t2)`
    ///
    /// Indices are `round((t - start) · rate)`. Ranges outside the buffer or
    /// with `t1 >= t2` leave the view unchanged and report
    /// [`RangeOutcome::Ignored`].
    pub fn set_slice(&mut self, t1: f64, t2: f64) -> RangeOutcome {
        let start = self.buffer.start_time();
        if t1 < start || t2 > self.buffer.end_time() || t1 >= t2 {
            return RangeOutcome::Ignored;
        }
        let rate = self.buffer.sampling_rate();
        let len = self.buffer.len();
        let to_index = |t: f64| {
            usize::try_from(timing::samples_in(t - start, rate).max(0)).map_or(len, |i| i.min(len))
        };
        self.bind(to_index(t1), to_index(t2));
        RangeOutcome::Applied
    }

    /// Bound the view to buffer indices `[position, limit)`
    ///
    /// Requires `position <= limit <= buffer.len()`; anything else leaves the
    /// view unchanged and reports [`RangeOutcome::Ignored`].
    pub fn set_bounds(&mut self, position: usize, limit: usize) -> RangeOutcome {
        if position > limit || limit > self.buffer.len() {
            return RangeOutcome::Ignored;
        }
        self.bind(position, limit);
        RangeOutcome::Applied
    }

    fn bind(&mut self, position: usize, limit: usize) {
        self.position = position;
        self.limit = limit;
        self.read_position = position;
        self.stats.invalidate();
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Samples inside the view
    pub fn samples(&self) -> &'a [i32] {
        &self.buffer.samples()[self.position..self.limit]
    }

    /// Sample `index` relative to the start of the view
    pub fn get(&self, index: usize) -> Option<i32> {
        self.samples().get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.limit - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.limit == self.position
    }

    pub fn sampling_rate(&self) -> f64 {
        self.buffer.sampling_rate()
    }

    /// Time of the first sample in the view
    pub fn start_time(&self) -> f64 {
        self.buffer.start_time() + self.position as f64 / self.buffer.sampling_rate()
    }

    /// Time just past the last sample in the view
    pub fn end_time(&self) -> f64 {
        self.buffer.start_time() + self.limit as f64 / self.buffer.sampling_rate()
    }

    /// Statistics over the view's samples, cached per view
    pub fn statistics(&self) -> &Statistics {
        self.stats.get_or_derive(self.samples())
    }

    pub fn mean(&self) -> f64 {
        self.statistics().mean
    }

    pub fn rsam(&self) -> f64 {
        self.statistics().rsam
    }

    pub fn min(&self) -> i32 {
        self.statistics().min
    }

    pub fn max(&self) -> i32 {
        self.statistics().max
    }

    pub fn first(&self) -> i32 {
        self.statistics().first
    }

    /// View samples as `f64` with gaps replaced by the view's mean
    pub fn signal(&self) -> Vec<f64> {
        fill_gaps(self.samples(), self.mean())
    }

    /// Copy the view into a new buffer
    pub fn to_buffer(&self) -> SampleBuffer {
        self.buffer.derive_with(self.samples().to_vec(), self.start_time())
    }

    /// Rewind the read cursor to `position`
    pub fn reset(&mut self) {
        self.read_position = self.position;
    }

    /// Whether the read cursor has samples left
    pub fn has_next(&self) -> bool {
        self.read_position < self.limit
    }

    /// Sample under the read cursor, advancing the cursor
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<i32> {
        if !self.has_next() {
            return None;
        }
        let sample = self.buffer.samples()[self.read_position];
        self.read_position += 1;
        Some(sample)
    }

    /// Time of the sample under the read cursor
    pub fn cursor_time(&self) -> f64 {
        self.buffer.start_time() + self.read_position as f64 / self.buffer.sampling_rate()
    }

    /// Iterate the view's samples without touching the read cursor
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'a, i32>> {
        self.samples().iter().copied()
    }
}

impl fmt::Display for SliceView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SliceView: [{}, {}) start={:.3}, end={:.3}, rate={} Hz",
            self.position,
            self.limit,
            self.start_time(),
            self.end_time(),
            self.sampling_rate()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::NO_DATA;
    use approx::assert_relative_eq;

    fn buffer() -> SampleBuffer {
        SampleBuffer::new((0..100).collect(), 50.0, 10.0)
    }

    #[test]
    fn test_full_view() {
        let buffer = buffer();
        let view = buffer.view();
        assert_eq!(view.len(), 100);
        assert_relative_eq!(view.start_time(), 50.0);
        assert_relative_eq!(view.end_time(), 60.0);
        assert_relative_eq!(view.mean(), buffer.mean());
    }

    #[test]
    fn test_set_slice_by_time() {
        let buffer = buffer();
        let mut view = SliceView::new(&buffer);
        assert_eq!(view.set_slice(51.0, 52.5), RangeOutcome::Applied);
        assert_eq!(view.position(), 10);
        assert_eq!(view.limit(), 25);
        assert_eq!(view.samples(), &buffer.samples()[10..25]);
        assert_relative_eq!(view.start_time(), 51.0);
        assert_relative_eq!(view.mean(), 17.0);
        assert_eq!(view.min(), 10);
        assert_eq!(view.max(), 24);
    }

    #[test]
    fn test_set_slice_ignores_bad_ranges() {
        let buffer = buffer();
        let mut view = SliceView::new(&buffer);
        view.set_slice(51.0, 52.0);
        assert_eq!(view.set_slice(49.0, 52.0), RangeOutcome::Ignored);
        assert_eq!(view.set_slice(51.0, 61.0), RangeOutcome::Ignored);
        assert_eq!(view.set_slice(52.0, 52.0), RangeOutcome::Ignored);
        assert_eq!((view.position(), view.limit()), (10, 20));
    }

    #[test]
    fn test_set_bounds() {
        let buffer = buffer();
        let mut view = buffer.view();
        assert_eq!(view.set_bounds(5, 8), RangeOutcome::Applied);
        assert_eq!(view.samples(), &[5, 6, 7]);
        assert_eq!(view.get(1), Some(6));
        assert_eq!(view.get(3), None);
        assert_eq!(view.set_bounds(8, 5), RangeOutcome::Ignored);
        assert_eq!(view.set_bounds(0, 101), RangeOutcome::Ignored);
        assert_eq!(view.set_bounds(100, 100), RangeOutcome::Applied);
        assert!(view.is_empty());
        assert_eq!(view.mean(), 0.0);
    }

    #[test]
    fn test_statistics_are_independent_of_buffer() {
        let buffer = SampleBuffer::new(vec![1, NO_DATA, 3, 100], 0.0, 1.0);
        let mut view = buffer.view();
        view.set_bounds(0, 3);
        assert_relative_eq!(view.mean(), 2.0);
        assert_relative_eq!(buffer.mean(), 104.0 / 3.0);
        view.set_bounds(3, 4);
        assert_relative_eq!(view.mean(), 100.0);
        assert_eq!(view.signal(), vec![100.0]);
    }

    #[test]
    fn test_read_cursor() {
        let buffer = buffer();
        let mut view = buffer.view();
        view.set_bounds(3, 6);
        assert!(view.has_next());
        assert_relative_eq!(view.cursor_time(), 50.3);
        assert_eq!(view.next(), Some(3));
        assert_eq!(view.next(), Some(4));
        assert_eq!(view.next(), Some(5));
        assert!(!view.has_next());
        assert_eq!(view.next(), None);
        view.reset();
        assert_eq!(view.len(), 3);
        let mut read = Vec::new();
        while let Some(s) = view.next() {
            read.push(s);
        }
        assert_eq!(read, vec![3, 4, 5]);
        assert_eq!(view.iter().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn test_to_buffer_copies() {
        let buffer = buffer();
        let mut view = buffer.view();
        view.set_bounds(20, 30);
        let copy = view.to_buffer();
        assert_eq!(copy.samples(), view.samples());
        assert_relative_eq!(copy.start_time(), 52.0);
        assert_relative_eq!(copy.sampling_rate(), 10.0);
    }
}
