//! Nearest neighbor interpolation.
//!
//! This method selects the value of the nearest grid point. It keeps the
//! blocky look of coarse model grids.

use ndarray::ArrayView2;

use super::common::{check_query, clamp_index};
use super::Interpolator;
use crate::error::Result;

/// Nearest neighbor interpolator
pub struct NearestInterpolator;

impl Interpolator for NearestInterpolator {
    fn interpolate(&self, grid: ArrayView2<f64>, row: f64, col: f64) -> Result<f64> {
        check_query(&grid, row, col)?;
        let (rows, cols) = grid.dim();
        let r = clamp_index(row.round(), rows) as usize;
        let c = clamp_index(col.round(), cols) as usize;
        Ok(grid[[r, c]])
    }

    fn name(&self) -> &str {
        "nearest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_nearest_interpolation() {
        let grid = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let interp = NearestInterpolator;

        assert_eq!(interp.interpolate(grid.view(), 0.0, 0.0).unwrap(), 1.0);
        assert_eq!(interp.interpolate(grid.view(), 0.4, 1.6).unwrap(), 3.0);
        assert_eq!(interp.interpolate(grid.view(), 0.6, 0.2).unwrap(), 4.0);
    }

    #[test]
    fn test_nearest_clamps_out_of_range() {
        let grid = array![[1.0, 2.0], [3.0, 4.0]];
        let interp = NearestInterpolator;
        assert_eq!(interp.interpolate(grid.view(), -3.0, 9.0).unwrap(), 2.0);
    }
}
