//! Mathematical utility functions for the grid generator
//!
//! This module provides the small numeric helpers used throughout the
//! index-space and coordinate-space computations.

/// Assert that the deviation between two values is less than a threshold
///
/// This macro combines deviation calculation with assertion for cleaner test code.
/// It calculates the percentage deviation between `actual` and `expected`, then
/// asserts that this deviation is less than the specified `max_deviation`.
#[macro_export]
macro_rules! assert_deviation {
    ($actual:expr, $expected:expr, $max_deviation:expr) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.2}% >= {:.2}%\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, actual_val, expected_val
                );
            }
        }
    };
    ($actual:expr, $expected:expr, $max_deviation:expr, $($arg:tt)+) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.2}% >= {:.2}%: {}\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, format_args!($($arg)+), actual_val, expected_val
                );
            }
        }
    };
}

/// Clamp a value between minimum and maximum bounds
///
/// # Examples
/// ```
/// use sugarcube_grid::math_utils::clamp;
///
/// assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
/// assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
/// assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
/// ```
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Cumulative sum of per-cell sizes into boundary coordinates.
///
/// Returns a vector one element longer than the input, starting at 0.0,
/// where element `i+1` is the running sum of the first `i+1` sizes. The last
/// element is the total extent.
///
/// # Examples
/// ```
/// use sugarcube_grid::math_utils::cumulative_sum;
///
/// assert_eq!(cumulative_sum(&[1.0, 2.0, 3.0]), vec![0.0, 1.0, 3.0, 6.0]);
/// ```
pub fn cumulative_sum(sizes: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(sizes.len() + 1);
    let mut acc = 0.0;
    out.push(acc);
    for s in sizes {
        acc += s;
        out.push(acc);
    }
    out
}

/// Index of the coordinate closest to `target` by absolute difference.
///
/// Ties resolve to the lower index. The slice must be non-empty.
pub fn nearest_index(coords: &[f64], target: f64) -> usize {
    let mut best = 0;
    let mut best_diff = f64::INFINITY;
    for (i, c) in coords.iter().enumerate() {
        let diff = (c - target).abs();
        if diff < best_diff {
            best_diff = diff;
            best = i;
        }
    }
    best
}

/// Calculate the percentage deviation between two values
///
/// Returns the percentage difference of `actual` from `expected`.
/// Uses the expected value as the reference (base) for the percentage calculation.
pub fn deviation(actual: f64, expected: f64) -> f64 {
    if expected.abs() < f64::EPSILON {
        if actual.abs() < f64::EPSILON {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        ((actual - expected).abs() / expected.abs()) * 100.0
    }
}
