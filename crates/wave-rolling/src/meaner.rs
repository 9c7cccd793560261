//! Running mean over a FIFO window

use crate::RollingStatistic;
use std::collections::VecDeque;

/// Rolling mean backed by a FIFO and a running sum
#[derive(Debug, Clone, Default)]
pub struct Meaner {
    window: VecDeque<f64>,
    sum: f64,
}

impl Meaner {
    /// Create an empty meaner
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty meaner with room for `capacity` values
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity),
            sum: 0.0,
        }
    }

    /// Sum of the values currently in the window
    pub fn sum(&self) -> f64 {
        self.sum
    }
}

impl RollingStatistic for Meaner {
    fn add(&mut self, value: f64) {
        self.window.push_back(value);
        self.sum += value;
    }

    fn remove_oldest(&mut self) -> Option<f64> {
        let value = self.window.pop_front()?;
        self.sum -= value;
        if self.window.is_empty() {
            // Reset so floating point residue does not accumulate across refills
            self.sum = 0.0;
        }
        Some(value)
    }

    fn avg(&self) -> Option<f64> {
        if self.window.is_empty() {
            None
        } else {
            Some(self.sum / self.window.len() as f64)
        }
    }

    fn len(&self) -> usize {
        self.window.len()
    }

    fn clear(&mut self) {
        self.window.clear();
        self.sum = 0.0;
    }
}
