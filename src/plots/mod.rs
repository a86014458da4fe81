//! Chart operations.
//!
//! Each operation prepares its data with [`crate::prepare`], draws a fresh
//! [`Figure`], optionally saves it, and returns it to the caller.

pub mod correlation;
pub mod geoplot;
pub mod regression;
pub mod time_series;

use std::path::PathBuf;

use crate::render::Figure;

pub use correlation::{plot_correlation_heatmap, CorrelationOutput, CorrelationParams};
pub use geoplot::{plot_geomap, plot_monthly_maps, plot_seasonal_maps, MapParams};
pub use regression::{visualize_linear_regression, RegressionOutput, RegressionParams};
pub use time_series::{
    plot_dual_time_series, plot_time_series, DualTimeSeriesParams, SeriesStyle, TimeSeriesParams,
};

/// Figure size of single and dual time series, in inches
pub const TIME_SERIES_FIGSIZE: (f64, f64) = (12.0, 6.0);

/// Figure size of a single map
pub const MAP_FIGSIZE: (f64, f64) = (6.4, 4.8);

/// Figure size of the 2×2 season and month grids
pub const MAP_GRID_FIGSIZE: (f64, f64) = (12.0, 10.0);

/// Figure size of the correlation heatmap
pub const HEATMAP_FIGSIZE: (f64, f64) = (8.0, 6.0);

/// Figure size of the regression chart
pub const REGRESSION_FIGSIZE: (f64, f64) = (10.0, 6.0);

/// A rendered figure and where it was written, if anywhere
#[derive(Debug, Clone)]
pub struct PlotOutput {
    pub figure: Figure,
    pub saved_to: Option<PathBuf>,
}

/// Scientific notation with a signed, two-digit exponent (`2.00e+00`)
pub fn format_sci(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let raw = format!("{:.*e}", precision, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sci() {
        assert_eq!(format_sci(2.0, 2), "2.00e+00");
        assert_eq!(format_sci(-0.000123, 2), "-1.23e-04");
        assert_eq!(format_sci(12345.0, 2), "1.23e+04");
        assert_eq!(format_sci(1.5e120, 1), "1.5e+120");
        assert_eq!(format_sci(f64::NAN, 2), "nan");
        assert_eq!(format_sci(f64::NEG_INFINITY, 2), "-inf");
    }
}
