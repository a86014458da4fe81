//! Interpolation algorithms for spatial data.
//!
//! Map figures sample a (lat, lon) grid at fractional indices for every
//! pixel of a panel; the interpolator decides how those samples blend.

pub mod bilinear;
pub mod common;
pub mod nearest;

use ndarray::ArrayView2;

use crate::error::{ClimplotError, Result};

/// Trait for interpolation methods
pub trait Interpolator {
    /// Interpolate a value at fractional (row, column) indices of the grid
    fn interpolate(&self, grid: ArrayView2<f64>, row: f64, col: f64) -> Result<f64>;

    /// Get the name of this interpolation method
    fn name(&self) -> &str;
}

/// Get an interpolator by name
pub fn get_interpolator(name: &str) -> Result<Box<dyn Interpolator>> {
    match name.to_lowercase().as_str() {
        "nearest" => Ok(Box::new(nearest::NearestInterpolator)),
        "bilinear" => Ok(Box::new(bilinear::BilinearInterpolator)),
        _ => Err(ClimplotError::InvalidParameter {
            param: "resampling".to_string(),
            message: format!("Unknown interpolation method: {}", name),
        }),
    }
}
