//! Lazily derived scalar statistics over gap-tolerant samples

use std::cell::OnceCell;

/// Sentinel marking a missing sample
///
/// Never treated as a real value by any aggregate.
pub const NO_DATA: i32 = i32::MIN;

/// Scalar statistics over the valid (non-[`NO_DATA`]) samples of a range
///
/// An empty or all-gap range reports 0 for every field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Statistics {
    /// Mean of valid samples
    pub mean: f64,
    /// Mean of absolute values of valid samples
    pub rsam: f64,
    /// Smallest valid sample
    pub min: i32,
    /// Largest valid sample
    pub max: i32,
    /// First valid sample in index order
    pub first: i32,
    /// Number of valid samples
    pub valid: usize,
}

impl Statistics {
    /// Scan `samples` once, skipping gaps
    pub fn derive(samples: &[i32]) -> Self {
        let mut sum: i64 = 0;
        let mut abs_sum: i64 = 0;
        let mut min = i32::MAX;
        let mut max = i32::MIN;
        let mut first = None;
        let mut valid = 0usize;

        for &s in samples.iter().filter(|&&s| s != NO_DATA) {
            first.get_or_insert(s);
            sum += i64::from(s);
            abs_sum += i64::from(s).abs();
            min = min.min(s);
            max = max.max(s);
            valid += 1;
        }

        if valid == 0 {
            return Self::default();
        }

        Self {
            mean: sum as f64 / valid as f64,
            rsam: abs_sum as f64 / valid as f64,
            min,
            max,
            first: first.unwrap_or(0),
            valid,
        }
    }
}

/// Cache holding one [`Statistics`] value until the owner invalidates it
///
/// Population goes through a shared reference, so a cache is never `Sync`.
/// Cloning yields an empty cache.
#[derive(Debug, Default)]
pub struct StatsCache {
    cell: OnceCell<Statistics>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached statistics, deriving them from `samples` if stale
    pub fn get_or_derive(&self, samples: &[i32]) -> &Statistics {
        self.cell.get_or_init(|| Statistics::derive(samples))
    }

    /// Mark the cache stale
    pub fn invalidate(&mut self) {
        self.cell.take();
    }

    pub fn is_stale(&self) -> bool {
        self.cell.get().is_none()
    }
}

impl Clone for StatsCache {
    fn clone(&self) -> Self {
        Self::default()
    }
}

/// Replace gaps with `fill` and widen to `f64`
pub(crate) fn fill_gaps(samples: &[i32], fill: f64) -> Vec<f64> {
    samples
        .iter()
        .map(|&s| if s == NO_DATA { fill } else { f64::from(s) })
        .collect()
}
