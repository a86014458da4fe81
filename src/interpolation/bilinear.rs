//! Bilinear interpolation.
//!
//! This method performs linear interpolation in two dimensions using
//! the four nearest grid points. A NaN neighbor with non-zero weight makes
//! the result NaN, so missing cells stay visibly missing.

use ndarray::ArrayView2;

use super::common::{check_query, clamp_index, linear_weight};
use super::Interpolator;
use crate::error::Result;

/// Bilinear interpolator
pub struct BilinearInterpolator;

impl Interpolator for BilinearInterpolator {
    fn interpolate(&self, grid: ArrayView2<f64>, row: f64, col: f64) -> Result<f64> {
        check_query(&grid, row, col)?;
        let (rows, cols) = grid.dim();

        let row = clamp_index(row, rows);
        let col = clamp_index(col, cols);

        let r0 = row.floor() as usize;
        let c0 = col.floor() as usize;
        let r1 = (r0 + 1).min(rows - 1);
        let c1 = (c0 + 1).min(cols - 1);

        let (wr0, wr1) = linear_weight(row - r0 as f64);
        let (wc0, wc1) = linear_weight(col - c0 as f64);

        let mut value = 0.0;
        for (r, wr) in [(r0, wr0), (r1, wr1)] {
            for (c, wc) in [(c0, wc0), (c1, wc1)] {
                let w = wr * wc;
                if w > 0.0 {
                    value += w * grid[[r, c]];
                }
            }
        }
        Ok(value)
    }

    fn name(&self) -> &str {
        "bilinear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_bilinear_interpolation() {
        let grid = array![[0.0, 10.0], [20.0, 30.0]];
        let interp = BilinearInterpolator;

        assert_eq!(interp.interpolate(grid.view(), 0.0, 0.0).unwrap(), 0.0);
        assert_eq!(interp.interpolate(grid.view(), 1.0, 1.0).unwrap(), 30.0);
        assert!((interp.interpolate(grid.view(), 0.5, 0.5).unwrap() - 15.0).abs() < 1e-12);
        assert!((interp.interpolate(grid.view(), 0.0, 0.25).unwrap() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_bilinear_nan_handling() {
        let grid = array![[1.0, f64::NAN], [3.0, 4.0]];
        let interp = BilinearInterpolator;
        assert!(interp.interpolate(grid.view(), 0.5, 0.5).unwrap().is_nan());
        // On the first column the NaN cell carries no weight
        assert_eq!(interp.interpolate(grid.view(), 0.5, 0.0).unwrap(), 2.0);
    }
}
