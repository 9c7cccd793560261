//! Property tests comparing the rolling structures against naive references

use approx::assert_relative_eq;
use proptest::prelude::*;
use wave_rolling::{Meaner, Medianer, RollingStatistic};

fn naive_median(window: &[f64]) -> f64 {
    let mut sorted = window.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

fn naive_mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

proptest! {
    #[test]
    fn prop_median_matches_sorted_window(
        values in prop::collection::vec(-50i32..50, 1..300),
        window in 1usize..40,
    ) {
        // Small value range forces plenty of duplicates
        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        let mut medianer = Medianer::new();
        for (i, &v) in values.iter().enumerate() {
            medianer.add(v);
            if medianer.len() > window {
                medianer.remove_oldest();
            }
            let start = (i + 1).saturating_sub(window);
            prop_assert_eq!(medianer.avg().unwrap(), naive_median(&values[start..=i]));
            let (lower, upper) = medianer.half_sizes();
            prop_assert!(lower == upper || lower == upper + 1);
        }
    }

    #[test]
    fn prop_mean_matches_window(
        values in prop::collection::vec(-10_000i32..10_000, 1..300),
        window in 1usize..40,
    ) {
        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        let mut meaner = Meaner::new();
        for (i, &v) in values.iter().enumerate() {
            meaner.add(v);
            if meaner.len() > window {
                meaner.remove_oldest();
            }
            let start = (i + 1).saturating_sub(window);
            assert_relative_eq!(
                meaner.avg().unwrap(),
                naive_mean(&values[start..=i]),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn prop_draining_returns_insertion_order(
        values in prop::collection::vec(-5i32..5, 0..100),
    ) {
        let mut medianer = Medianer::new();
        for &v in &values {
            medianer.add(f64::from(v));
        }
        let drained: Vec<f64> = std::iter::from_fn(|| medianer.remove_oldest()).collect();
        let expected: Vec<f64> = values.iter().map(|&v| f64::from(v)).collect();
        prop_assert_eq!(drained, expected);
        prop_assert!(medianer.avg().is_none());
    }
}

#[test]
fn test_random_window_against_reference() {
    let values: Vec<f64> = (0..2_000)
        .map(|_| (rand::random::<f64>() * 20.0).floor())
        .collect();
    let mut medianer = Medianer::with_capacity(101);
    for (i, &v) in values.iter().enumerate() {
        medianer.add(v);
        if medianer.len() > 101 {
            medianer.remove_oldest();
        }
        let start = (i + 1).saturating_sub(101);
        assert_eq!(medianer.avg().unwrap(), naive_median(&values[start..=i]));
    }
}
