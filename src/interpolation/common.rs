//! Common utilities for interpolation algorithms.

use ndarray::ArrayView2;

use crate::error::{ClimplotError, Result};

/// Map a coordinate value to a fractional index of a monotonic coordinate array
///
/// Works for ascending and descending coordinates. Values outside the
/// coordinate range return None.
pub fn coord_to_index(coord: f64, coord_values: &[f64]) -> Option<f64> {
    match coord_values {
        [] => None,
        [only] => (coord == *only).then_some(0.0),
        _ => coord_values.windows(2).enumerate().find_map(|(i, pair)| {
            let (a, b) = (pair[0], pair[1]);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            if coord < lo || coord > hi {
                return None;
            }
            if a == b {
                Some(i as f64)
            } else {
                Some(i as f64 + (coord - a) / (b - a))
            }
        }),
    }
}

/// Clamp an index to valid bounds
pub fn clamp_index(index: f64, size: usize) -> f64 {
    index.max(0.0).min(size.saturating_sub(1) as f64)
}

/// Get the weight for linear interpolation
pub fn linear_weight(fraction: f64) -> (f64, f64) {
    (1.0 - fraction, fraction)
}

/// Reject empty grids and non-finite indices
pub fn check_query(grid: &ArrayView2<f64>, row: f64, col: f64) -> Result<()> {
    if grid.is_empty() {
        return Err(ClimplotError::Interpolation {
            message: "cannot interpolate an empty grid".to_string(),
        });
    }
    if !row.is_finite() || !col.is_finite() {
        return Err(ClimplotError::Interpolation {
            message: format!("non-finite index ({}, {})", row, col),
        });
    }
    Ok(())
}
