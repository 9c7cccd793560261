//! The owned, regularly sampled waveform buffer

use crate::error::{Error, Result};
use crate::slice::SliceView;
use crate::stats::{fill_gaps, Statistics, StatsCache, NO_DATA};
use crate::timing;
use std::fmt;

/// Short tag describing how samples were produced (at most two characters)
///
/// Opaque to every operation except the binary codec, which stores it as two
/// UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataType(String);

impl DataType {
    /// Create a tag of one or two UTF-16 units
    ///
    /// An empty tag is rejected: the codec stores "no tag" as zero units.
    pub fn new(tag: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        let fits = (1..=2).contains(&tag.chars().count())
            && tag.chars().all(|c| c != '\0' && c.len_utf16() == 1);
        if fits {
            Ok(Self(tag))
        } else {
            Err(Error::InvalidDataType(tag))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encode as two code units, zero padded
    pub(crate) fn to_units(&self) -> [u16; 2] {
        let mut units = [0u16; 2];
        for (slot, unit) in units.iter_mut().zip(self.0.encode_utf16()) {
            *slot = unit;
        }
        units
    }

    /// Decode two code units; zero units terminate the tag
    pub(crate) fn from_units(units: [u16; 2]) -> Option<Self> {
        let tag: String = units
            .iter()
            .take_while(|&&u| u != 0)
            .filter_map(|&u| char::from_u32(u32::from(u)))
            .collect();
        if tag.is_empty() {
            None
        } else {
            Some(Self(tag))
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A gap-tolerant sequence of integer samples on a regular time grid
///
/// Sample `i` sits at `start_time + i / sampling_rate`. Missing samples hold
/// [`NO_DATA`] and are skipped by every statistic.
///
/// Statistics are derived on first use and cached; any path that hands out
/// mutable access to the samples marks the cache stale first. Cloning copies
/// samples and metadata but starts with an empty cache.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    pub(crate) samples: Vec<i32>,
    pub(crate) start_time: f64,
    pub(crate) sampling_rate: f64,
    pub(crate) registration_offset: Option<f64>,
    pub(crate) data_type: Option<DataType>,
    pub(crate) stats: StatsCache,
}

impl SampleBuffer {
    /// Create a buffer from raw samples
    ///
    /// # Arguments
    /// * `samples` - Sample values, [`NO_DATA`] marking gaps
    /// * `start_time` - Time of sample 0 in seconds since the reference epoch
    /// * `sampling_rate` - Samples per second
    pub fn new(samples: Vec<i32>, start_time: f64, sampling_rate: f64) -> Self {
        Self {
            samples,
            start_time,
            sampling_rate,
            registration_offset: None,
            data_type: None,
            stats: StatsCache::new(),
        }
    }

    /// Builder-style data type tag
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// New buffer sharing this buffer's rate, tag and registration
    pub(crate) fn derive_with(&self, samples: Vec<i32>, start_time: f64) -> Self {
        Self {
            samples,
            start_time,
            sampling_rate: self.sampling_rate,
            registration_offset: self.registration_offset,
            data_type: self.data_type.clone(),
            stats: StatsCache::new(),
        }
    }

    // ----- samples -----

    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    /// Mutable access to the samples; marks cached statistics stale
    pub fn samples_mut(&mut self) -> &mut [i32] {
        self.stats.invalidate();
        &mut self.samples
    }

    /// Replace every sample, keeping timing metadata
    pub fn set_samples(&mut self, samples: Vec<i32>) {
        self.samples = samples;
        self.stats.invalidate();
    }

    pub fn into_samples(self) -> Vec<i32> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of [`NO_DATA`] samples
    pub fn no_data_count(&self) -> usize {
        self.samples.iter().filter(|&&s| s == NO_DATA).count()
    }

    /// Samples as `f64` with gaps replaced by the mean
    pub fn signal(&self) -> Vec<f64> {
        fill_gaps(&self.samples, self.mean())
    }

    // ----- timing -----

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn set_start_time(&mut self, start_time: f64) {
        self.start_time = start_time;
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    pub fn set_sampling_rate(&mut self, sampling_rate: f64) {
        self.sampling_rate = sampling_rate;
    }

    /// Seconds between consecutive samples
    pub fn sampling_period(&self) -> f64 {
        1.0 / self.sampling_rate
    }

    /// Time just past the last sample
    pub fn end_time(&self) -> f64 {
        self.start_time + self.samples.len() as f64 / self.sampling_rate
    }

    pub fn registration_offset(&self) -> Option<f64> {
        self.registration_offset
    }

    pub fn set_registration_offset(&mut self, offset: Option<f64>) {
        self.registration_offset = offset;
    }

    pub fn data_type(&self) -> Option<&DataType> {
        self.data_type.as_ref()
    }

    pub fn set_data_type(&mut self, data_type: Option<DataType>) {
        self.data_type = data_type;
    }

    /// Whether one buffer ends exactly where the other starts
    pub fn adjacent(&self, other: &SampleBuffer) -> bool {
        timing::same_instant(self.end_time(), other.start_time)
            || timing::same_instant(self.start_time, other.end_time())
    }

    /// Whether the half-open intervals of the two buffers intersect
    pub fn overlaps(&self, other: &SampleBuffer) -> bool {
        self.overlaps_range(other.start_time, other.end_time())
    }

    /// Whether `[t1, t2)` intersects this buffer's interval
    pub fn overlaps_range(&self, t1: f64, t2: f64) -> bool {
        timing::intervals_overlap(self.start_time, self.end_time(), t1, t2)
    }

    /// Snap the start time onto the sample grid and record the correction
    ///
    /// Returns the applied offset, or `None` when the sampling rate is not
    /// a positive finite number.
    pub fn register(&mut self) -> Option<f64> {
        let offset = timing::registration_offset(self.start_time, self.sampling_rate)?;
        self.start_time += offset;
        self.registration_offset = Some(offset);
        Some(offset)
    }

    // ----- statistics -----

    /// All cached statistics, derived on first use
    pub fn statistics(&self) -> &Statistics {
        self.stats.get_or_derive(&self.samples)
    }

    /// Mean of valid samples (0 when there are none)
    pub fn mean(&self) -> f64 {
        self.statistics().mean
    }

    /// Mean absolute value of valid samples
    pub fn rsam(&self) -> f64 {
        self.statistics().rsam
    }

    pub fn min(&self) -> i32 {
        self.statistics().min
    }

    pub fn max(&self) -> i32 {
        self.statistics().max
    }

    /// First valid sample in index order
    pub fn first(&self) -> i32 {
        self.statistics().first
    }

    /// `(min, max)` of valid samples
    pub fn data_range(&self) -> (i32, i32) {
        let stats = self.statistics();
        (stats.min, stats.max)
    }

    /// Drop cached statistics so the next read rescans
    pub fn invalidate_statistics(&mut self) {
        self.stats.invalidate();
    }

    /// Whether statistics will be rescanned on the next read
    pub fn statistics_stale(&self) -> bool {
        self.stats.is_stale()
    }

    /// Read-only window over the whole buffer
    pub fn view(&self) -> SliceView<'_> {
        SliceView::new(self)
    }
}

/// Round to the nearest representable sample, never producing [`NO_DATA`]
pub(crate) fn to_sample(value: f64) -> i32 {
    let rounded = value.round();
    if rounded >= f64::from(i32::MAX) {
        i32::MAX
    } else if rounded <= f64::from(NO_DATA + 1) {
        NO_DATA + 1
    } else {
        // NaN lands here and becomes 0
        rounded as i32
    }
}

impl fmt::Display for SampleBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SampleBuffer: start={:.3}, end={:.3}, rate={} Hz, samples={}",
            self.start_time,
            self.end_time(),
            self.sampling_rate,
            self.samples.len()
        )?;
        if let Some(data_type) = &self.data_type {
            write!(f, ", type={data_type}")?;
        }
        Ok(())
    }
}
