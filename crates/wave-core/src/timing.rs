//! Time and rate comparisons shared by every buffer operation
//!
//! All equality checks on timestamps and sampling rates go through this
//! module. Comparisons are exact: buffers are assumed to sit on a strict
//! sample grid, so two segments are adjacent only when the end of one is
//! bit-for-bit the start of the other.

/// Whether two instants are the same
#[inline]
pub fn same_instant(a: f64, b: f64) -> bool {
    a == b
}

/// Whether two sampling rates are the same
#[inline]
pub fn same_rate(a: f64, b: f64) -> bool {
    a == b
}

/// Whether half-open intervals `[s1, e1)` and `[s2, e2)` intersect
///
/// Touching intervals do not overlap.
#[inline]
pub fn intervals_overlap(s1: f64, e1: f64, s2: f64, e2: f64) -> bool {
    !(e1 <= s2 || s1 >= e2)
}

/// Whether `[outer_start, outer_end]` contains `[inner_start, inner_end]`
#[inline]
pub fn contains(outer_start: f64, outer_end: f64, inner_start: f64, inner_end: f64) -> bool {
    outer_start <= inner_start && outer_end >= inner_end
}

/// Number of samples spanned by `dt` seconds, rounded to the nearest sample
///
/// Negative spans round towards the nearest negative count.
#[inline]
pub fn samples_in(dt: f64, sampling_rate: f64) -> i64 {
    (dt * sampling_rate).round() as i64
}

/// Number of whole samples that fit in `dt` seconds
#[inline]
pub fn whole_samples_in(dt: f64, sampling_rate: f64) -> i64 {
    (dt * sampling_rate).floor() as i64
}

/// Correction that snaps `start_time` onto the grid of the sampling period
///
/// Returns the signed offset to add to `start_time`: forward to the next
/// grid point when the remainder is at least half a period, otherwise back
/// to the previous one. The remainder is measured upward from the grid point
/// below, so times before zero snap the same way. `None` for non-positive or non-finite rates.
pub fn registration_offset(start_time: f64, sampling_rate: f64) -> Option<f64> {
    if sampling_rate <= 0.0 || !sampling_rate.is_finite() {
        return None;
    }
    let period = 1.0 / sampling_rate;
    let remainder = start_time.rem_euclid(period);
    if remainder >= period / 2.0 {
        Some(period - remainder)
    } else {
        Some(-remainder)
    }
}
