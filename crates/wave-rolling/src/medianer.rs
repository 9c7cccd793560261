//! Exact running median with removal of the oldest element
//!
//! The window is split into a lower and an upper half, each an ordered map
//! from value to the set of synthetic FIFO indices holding that value.
//! Keeping indices per value lets the oldest element be removed even when
//! several window entries share its value.
//!
//! Invariants after every operation:
//! - `lower_len - upper_len` is 0 or 1
//! - every value in `lower` is <= every value in `upper`

use crate::RollingStatistic;
use ordered_float::OrderedFloat;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

type Key = OrderedFloat<f64>;
type Half = BTreeMap<Key, BTreeSet<u64>>;

/// Rolling median over a FIFO window
#[derive(Debug, Clone, Default)]
pub struct Medianer {
    lower: Half,
    upper: Half,
    lower_len: usize,
    upper_len: usize,
    /// Insertion order: synthetic index and value of every live element
    fifo: VecDeque<(u64, Key)>,
    next_index: u64,
}

impl Medianer {
    /// Create an empty medianer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty medianer with FIFO room for `capacity` values
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fifo: VecDeque::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Sizes of the lower and upper halves
    pub fn half_sizes(&self) -> (usize, usize) {
        (self.lower_len, self.upper_len)
    }

    fn rebalance(&mut self) {
        while self.lower_len > self.upper_len + 1 {
            match pop_max(&mut self.lower) {
                Some((key, index)) => {
                    insert(&mut self.upper, key, index);
                    self.lower_len -= 1;
                    self.upper_len += 1;
                }
                None => break,
            }
        }
        while self.upper_len > self.lower_len {
            match pop_min(&mut self.upper) {
                Some((key, index)) => {
                    insert(&mut self.lower, key, index);
                    self.upper_len -= 1;
                    self.lower_len += 1;
                }
                None => break,
            }
        }
    }
}

impl RollingStatistic for Medianer {
    fn add(&mut self, value: f64) {
        let index = self.next_index;
        self.next_index += 1;
        let key = OrderedFloat(value);
        self.fifo.push_back((index, key));

        let goes_upper = matches!(self.lower.last_key_value(), Some((max, _)) if key > *max);
        if goes_upper {
            insert(&mut self.upper, key, index);
            self.upper_len += 1;
        } else {
            insert(&mut self.lower, key, index);
            self.lower_len += 1;
        }
        self.rebalance();
    }

    fn remove_oldest(&mut self) -> Option<f64> {
        let (index, key) = self.fifo.pop_front()?;
        if remove(&mut self.lower, key, index) {
            self.lower_len -= 1;
        } else if remove(&mut self.upper, key, index) {
            self.upper_len -= 1;
        }
        self.rebalance();
        Some(key.into_inner())
    }

    fn avg(&self) -> Option<f64> {
        let (low, _) = self.lower.last_key_value()?;
        if self.lower_len > self.upper_len {
            return Some(low.into_inner());
        }
        let (high, _) = self.upper.first_key_value()?;
        Some((low.into_inner() + high.into_inner()) / 2.0)
    }

    fn len(&self) -> usize {
        self.fifo.len()
    }

    fn clear(&mut self) {
        self.lower.clear();
        self.upper.clear();
        self.lower_len = 0;
        self.upper_len = 0;
        self.fifo.clear();
    }
}

fn insert(half: &mut Half, key: Key, index: u64) {
    half.entry(key).or_default().insert(index);
}

fn remove(half: &mut Half, key: Key, index: u64) -> bool {
    let Some(indices) = half.get_mut(&key) else {
        return false;
    };
    if !indices.remove(&index) {
        return false;
    }
    if indices.is_empty() {
        half.remove(&key);
    }
    true
}

fn pop_max(half: &mut Half) -> Option<(Key, u64)> {
    let mut entry = half.last_entry()?;
    let key = *entry.key();
    let index = entry.get_mut().pop_last()?;
    if entry.get().is_empty() {
        entry.remove();
    }
    Some((key, index))
}

fn pop_min(half: &mut Half) -> Option<(Key, u64)> {
    let mut entry = half.first_entry()?;
    let key = *entry.key();
    let index = entry.get_mut().pop_first()?;
    if entry.get().is_empty() {
        entry.remove();
    }
    Some((key, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_medians(values: &[f64]) -> Vec<f64> {
        let mut medianer = Medianer::new();
        values
            .iter()
            .map(|&v| {
                medianer.add(v);
                medianer.avg().unwrap()
            })
            .collect()
    }

    #[test]
    fn test_running_median_sequence() {
        assert_eq!(
            running_medians(&[5.0, 1.0, 4.0, 2.0, 8.0]),
            vec![5.0, 3.0, 4.0, 3.0, 4.0]
        );
    }

    #[test]
    fn test_empty_medianer() {
        let mut medianer = Medianer::new();
        assert_eq!(medianer.avg(), None);
        assert_eq!(medianer.remove_oldest(), None);
        assert!(medianer.is_empty());
    }

    #[test]
    fn test_half_sizes_stay_balanced() {
        let mut medianer = Medianer::new();
        for v in [9.0, 3.0, 7.0, 1.0, 5.0, 5.0, 2.0, 8.0] {
            medianer.add(v);
            let (lower, upper) = medianer.half_sizes();
            assert!(lower == upper || lower == upper + 1);
        }
        while medianer.remove_oldest().is_some() {
            let (lower, upper) = medianer.half_sizes();
            assert!(lower == upper || lower == upper + 1);
        }
        assert_eq!(medianer.half_sizes(), (0, 0));
    }

    #[test]
    fn test_remove_oldest_with_duplicates() {
        let mut medianer = Medianer::new();
        for v in [4.0, 4.0, 4.0, 1.0, 9.0] {
            medianer.add(v);
        }
        assert_eq!(medianer.avg(), Some(4.0));

        // Oldest three are all 4.0; each removal must take exactly one copy
        assert_eq!(medianer.remove_oldest(), Some(4.0));
        assert_eq!(medianer.len(), 4);
        assert_eq!(medianer.avg(), Some(4.0));
        assert_eq!(medianer.remove_oldest(), Some(4.0));
        assert_eq!(medianer.avg(), Some(4.0));
        assert_eq!(medianer.remove_oldest(), Some(4.0));
        assert_eq!(medianer.avg(), Some(5.0));
        assert_eq!(medianer.remove_oldest(), Some(1.0));
        assert_eq!(medianer.avg(), Some(9.0));
    }

    #[test]
    fn test_sliding_window_median() {
        let mut medianer = Medianer::with_capacity(3);
        let mut medians = Vec::new();
        for v in [1.0, 100.0, 2.0, 3.0, -50.0, 4.0] {
            medianer.add(v);
            if medianer.len() > 3 {
                medianer.remove_oldest();
            }
            medians.push(medianer.avg().unwrap());
        }
        assert_eq!(medians, vec![1.0, 50.5, 2.0, 3.0, 2.0, 3.0]);
    }

    #[test]
    fn test_clear() {
        let mut medianer = Medianer::new();
        medianer.add(1.0);
        medianer.add(2.0);
        medianer.clear();
        assert!(medianer.is_empty());
        medianer.add(7.0);
        assert_eq!(medianer.avg(), Some(7.0));
    }
}
