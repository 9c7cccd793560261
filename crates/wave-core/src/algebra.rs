//! Buffer algebra: splitting, sub-ranges, erasure, and merging segments
//!
//! Every operation that returns a buffer allocates fresh sample storage.
//! Splice offsets between segments are `round(Δt · rate)` and all time
//! comparisons go through [`crate::timing`].

use crate::buffer::SampleBuffer;
use crate::error::{Error, Result};
use crate::policy::{EraseOutcome, RangeOutcome};
use crate::stats::NO_DATA;
use crate::timing;
use std::iter::FusedIterator;
use tracing::{debug, instrument};

impl SampleBuffer {
    /// Halve into two contiguous buffers
    ///
    /// The first half holds `len / 2` samples; the second starts where the
    /// first ends.
    pub fn split(&self) -> (SampleBuffer, SampleBuffer) {
        let half = self.samples.len() / 2;
        let first = self.derive_with(self.samples[..half].to_vec(), self.start_time);
        let second = self.derive_with(
            self.samples[half..].to_vec(),
            self.start_time + half as f64 / self.sampling_rate,
        );
        (first, second)
    }

    /// Lazily cut the buffer into contiguous pieces of at most `max_samples`
    ///
    /// # Errors
    /// Returns `Error::InvalidParameter` when `max_samples` is zero.
    pub fn chunks(&self, max_samples: usize) -> Result<Chunks<'_>> {
        if max_samples == 0 {
            return Err(Error::InvalidParameter(
                "chunk size must be at least 1 sample".to_string(),
            ));
        }
        Ok(Chunks {
            source: self,
            max_samples,
            next: 0,
        })
    }

    /// Classify a `[t1, t2]` request against this buffer's extent
    ///
    /// Out-of-range (`t1 < start`, `t2 > end`) or inverted (`t2 < t1`)
    /// requests are [`RangeOutcome::Ignored`].
    pub fn range_policy(&self, t1: f64, t2: f64) -> RangeOutcome {
        if t1 < self.start_time || t2 > self.end_time() || t2 < t1 {
            RangeOutcome::Ignored
        } else {
            RangeOutcome::Applied
        }
    }

    /// Copy the samples covering `[t1, t2)`
    ///
    /// The copy starts at index `floor((t1 - start) · rate)` and holds
    /// `floor((t2 - t1) · rate)` samples. When [`range_policy`] ignores the
    /// range the result is an unchanged copy of the whole buffer.
    ///
    /// [`range_policy`]: SampleBuffer::range_policy
    pub fn subset(&self, t1: f64, t2: f64) -> SampleBuffer {
        if !self.range_policy(t1, t2).is_applied() {
            return self.clone();
        }
        let len = self.samples.len();
        let offset = clamp_index(
            timing::whole_samples_in(t1 - self.start_time, self.sampling_rate),
            len,
        );
        let count = clamp_index(
            timing::whole_samples_in(t2 - t1, self.sampling_rate),
            len - offset,
        );
        self.derive_with(
            self.samples[offset..offset + count].to_vec(),
            self.start_time + offset as f64 / self.sampling_rate,
        )
    }

    /// Remove a leading, trailing, or complete time range
    ///
    /// Ranges strictly inside the buffer are not supported and leave it
    /// untouched; the returned outcome says which case applied.
    pub fn erase(&mut self, t1: f64, t2: f64) -> EraseOutcome {
        let start = self.start_time;
        let end = self.end_time();
        let len = self.samples.len();

        if t2 <= start || t1 >= end || t2 < t1 {
            return EraseOutcome::Disjoint;
        }

        let outcome = if t1 <= start && t2 >= end {
            self.samples.clear();
            EraseOutcome::Cleared { removed: len }
        } else if t1 <= start {
            let removed = clamp_index(timing::samples_in(t2 - start, self.sampling_rate), len);
            self.samples.drain(..removed);
            self.start_time += removed as f64 / self.sampling_rate;
            EraseOutcome::Prefix { removed }
        } else if t2 >= end {
            let kept = clamp_index(timing::samples_in(t1 - start, self.sampling_rate), len);
            self.samples.truncate(kept);
            EraseOutcome::Suffix {
                removed: len - kept,
            }
        } else {
            return EraseOutcome::Unsupported;
        };

        self.stats.invalidate();
        outcome
    }

    /// Merge with another buffer of the same sampling rate
    ///
    /// - If one interval contains the other, the containing buffer is
    ///   returned (this buffer wins when the intervals are identical).
    /// - Otherwise the earlier-starting buffer is copied first and the
    ///   later one contributes the samples past its end. A gap between
    ///   the two is filled with [`NO_DATA`].
    ///
    /// # Errors
    /// Returns `Error::IncompatibleRate` if the sampling rates differ;
    /// neither input is modified.
    #[instrument(skip(self, other), level = "debug")]
    pub fn combine(&self, other: &SampleBuffer) -> Result<SampleBuffer> {
        if !timing::same_rate(self.sampling_rate, other.sampling_rate) {
            return Err(Error::rate_mismatch(self.sampling_rate, other.sampling_rate));
        }

        let (s1, e1) = (self.start_time, self.end_time());
        let (s2, e2) = (other.start_time, other.end_time());

        if timing::contains(s1, e1, s2, e2) {
            debug!("combine: left interval contains right");
            return Ok(self.clone());
        }
        if timing::contains(s2, e2, s1, e1) {
            debug!("combine: right interval contains left");
            return Ok(other.clone());
        }

        let merged = if s1 <= s2 {
            splice(self, other)
        } else {
            splice(other, self)
        };
        debug!(samples = merged.len(), "combine: spliced segments");
        Ok(merged)
    }

    /// Join buffers into one spanning `[min start, max end)`
    ///
    /// The result starts filled with [`NO_DATA`]; each input is copied at
    /// `round((start_i - span_start) · rate)` in list order, so later inputs
    /// overwrite earlier ones where they overlap.
    ///
    /// # Errors
    /// - `Error::InsufficientData` for an empty list
    /// - `Error::IncompatibleRate` if the inputs disagree on sampling rate
    pub fn join(buffers: &[SampleBuffer]) -> Result<SampleBuffer> {
        let rate = common_rate(buffers)?;
        let t1 = buffers
            .iter()
            .map(|b| b.start_time)
            .fold(f64::INFINITY, f64::min);
        let t2 = buffers
            .iter()
            .map(SampleBuffer::end_time)
            .fold(f64::NEG_INFINITY, f64::max);
        Ok(assemble(buffers, rate, t1, t2))
    }

    /// Join buffers into one spanning exactly `[t1, t2)`
    ///
    /// Like [`join`](SampleBuffer::join) but with an explicit extent, so the
    /// result does not depend on which inputs happen to be present. Input
    /// samples outside the span are dropped.
    ///
    /// # Errors
    /// As [`join`](SampleBuffer::join), plus `Error::InvalidParameter` when
    /// `t2 < t1`.
    pub fn join_span(buffers: &[SampleBuffer], t1: f64, t2: f64) -> Result<SampleBuffer> {
        let rate = common_rate(buffers)?;
        if t2 < t1 {
            return Err(Error::InvalidParameter(format!(
                "join span end {t2} precedes start {t1}"
            )));
        }
        Ok(assemble(buffers, rate, t1, t2))
    }
}

/// Iterator returned by [`SampleBuffer::chunks`]
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    source: &'a SampleBuffer,
    max_samples: usize,
    next: usize,
}

impl Iterator for Chunks<'_> {
    type Item = SampleBuffer;

    fn next(&mut self) -> Option<SampleBuffer> {
        let len = self.source.samples.len();
        if self.next >= len {
            return None;
        }
        let from = self.next;
        let to = (from + self.max_samples).min(len);
        self.next = to;
        Some(self.source.derive_with(
            self.source.samples[from..to].to_vec(),
            self.source.start_time + from as f64 / self.source.sampling_rate,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.source.samples.len().saturating_sub(self.next);
        let chunks = remaining.div_ceil(self.max_samples);
        (chunks, Some(chunks))
    }
}

impl ExactSizeIterator for Chunks<'_> {}

impl FusedIterator for Chunks<'_> {}

fn clamp_index(value: i64, upper: usize) -> usize {
    usize::try_from(value.max(0)).map_or(upper, |v| v.min(upper))
}

fn common_rate(buffers: &[SampleBuffer]) -> Result<f64> {
    let first = buffers.first().ok_or_else(Error::empty_input)?;
    let rate = first.sampling_rate;
    if let Some(odd) = buffers
        .iter()
        .find(|b| !timing::same_rate(b.sampling_rate, rate))
    {
        return Err(Error::rate_mismatch(rate, odd.sampling_rate));
    }
    Ok(rate)
}

/// Copy `right` after `left`, where `left` starts no later than `right`
fn splice(left: &SampleBuffer, right: &SampleBuffer) -> SampleBuffer {
    let rate = left.sampling_rate;
    let left_len = left.samples.len();
    let total = clamp_index(
        timing::samples_in(right.end_time() - left.start_time, rate),
        usize::MAX,
    )
    .max(left_len);

    let mut merged = vec![NO_DATA; total];
    merged[..left_len].copy_from_slice(&left.samples);

    // Index in `right` lining up with the end of `left`
    let skip = timing::samples_in(left.end_time() - right.start_time, rate);
    if skip >= 0 {
        let skip = clamp_index(skip, right.samples.len());
        let tail = &right.samples[skip..];
        let n = tail.len().min(total - left_len);
        merged[left_len..left_len + n].copy_from_slice(&tail[..n]);
    } else {
        let offset = clamp_index(timing::samples_in(right.start_time - left.start_time, rate), total);
        let n = right.samples.len().min(total - offset);
        merged[offset..offset + n].copy_from_slice(&right.samples[..n]);
    }

    left.derive_with(merged, left.start_time)
}

#[instrument(skip(buffers), fields(count = buffers.len()), level = "debug")]
fn assemble(buffers: &[SampleBuffer], rate: f64, t1: f64, t2: f64) -> SampleBuffer {
    let total = clamp_index(timing::samples_in(t2 - t1, rate), usize::MAX);
    let mut joined = vec![NO_DATA; total];

    for buffer in buffers {
        let offset = timing::samples_in(buffer.start_time - t1, rate);
        let src_from = clamp_index(-offset, buffer.samples.len());
        let dst_from = clamp_index(offset, total);
        let n = (buffer.samples.len() - src_from).min(total - dst_from);
        joined[dst_from..dst_from + n].copy_from_slice(&buffer.samples[src_from..src_from + n]);
    }

    debug!(samples = total, "joined buffers");
    let mut result = SampleBuffer::new(joined, t1, rate);
    result.data_type = buffers.first().and_then(|b| b.data_type.clone());
    result
}
