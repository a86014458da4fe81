//! # climplot
//!
//! Plot preparation and rendering for gridded climate data.
//!
//! This library turns in-memory climate variables into charts: time series,
//! filled latitude/longitude maps, seasonal and monthly mean maps, a monthly
//! correlation heatmap and a linear regression chart. Each operation
//! returns the rendered figure and optionally writes it as a PNG.
//!
//! ## Key Features
//!
//! - **Time conversions**: calendar timestamps to date-numbers and Gregorian
//!   ordinals, plus CF `"days since ..."` decoding
//! - **Data preparation**: alignment to time axes, season and month grouping,
//!   monthly resampling, outer joins and pairwise-complete correlation
//! - **Regression**: seeded train/test split and least squares fit
//! - **Rendering**: `plotters` charts on an in-memory bitmap, matplotlib-inspired
//!   colormaps, explicit figure values and no global plotting state
//!
//! ## Architecture
//!
//! - **Data Layer**: [`dataset`] and [`data_loader`] hold and load variables
//! - **Preparation**: [`prepare`] reshapes data ahead of plotting
//! - **Rendering**: [`render`], [`colormaps`] and [`interpolation`] rasterize
//!   figures, and [`plots`] composes them into chart operations

pub mod colormaps;
pub mod config;
pub mod data_loader;
pub mod dataset;
pub mod error;
pub mod interpolation;
pub mod logging;
pub mod plots;
pub mod prepare;
pub mod render;

pub use config::{Config, GlobalArgs, RenderConfig};
pub use data_loader::{inspect_dataset, load_dataset};
pub use dataset::{DataArray, TimeSeries};
pub use error::{ClimplotError, Result};
pub use logging::{
    generate_render_id, init_tracing, log_dataset_stats, log_error, log_operation_end,
    log_operation_start, log_timed_operation,
};
pub use plots::{
    plot_correlation_heatmap, plot_dual_time_series, plot_geomap, plot_monthly_maps,
    plot_seasonal_maps, plot_time_series, visualize_linear_regression, PlotOutput,
};
pub use render::Figure;
