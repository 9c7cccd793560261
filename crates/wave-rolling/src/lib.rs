//! Exact rolling statistics over FIFO windows
//!
//! This crate provides the order-statistic structures used to smooth
//! waveforms with a trailing time window:
//! - [`Meaner`]: running mean over a FIFO of values
//! - [`Medianer`]: exact running median with O(log n) insert and
//!   removal of the oldest element, duplicates included
//!
//! Both types only see the values they are fed. Mapping a time period to a
//! window length and deciding when to evict is left to the caller.
//!
//! # Example
//!
//! ```rust
//! use wave_rolling::{Medianer, RollingStatistic};
//!
//! let mut median = Medianer::new();
//! let mut running = Vec::new();
//! for v in [5.0, 1.0, 4.0, 2.0, 8.0] {
//!     median.add(v);
//!     running.push(median.avg().unwrap());
//! }
//! assert_eq!(running, vec![5.0, 3.0, 4.0, 3.0, 4.0]);
//! ```

pub mod meaner;
pub mod medianer;

pub use meaner::Meaner;
pub use medianer::Medianer;

/// A statistic maintained over a first-in first-out window of values
///
/// Values enter at the back with [`add`](RollingStatistic::add) and leave
/// from the front with [`remove_oldest`](RollingStatistic::remove_oldest).
pub trait RollingStatistic {
    /// Append a value as the newest element of the window
    fn add(&mut self, value: f64);

    /// Remove the oldest element, returning its value
    fn remove_oldest(&mut self) -> Option<f64>;

    /// Current value of the statistic, `None` for an empty window
    fn avg(&self) -> Option<f64>;

    /// Number of values in the window
    fn len(&self) -> usize;

    /// Whether the window holds no values
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every value
    fn clear(&mut self);
}
