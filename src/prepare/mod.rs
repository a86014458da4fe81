//! Data preparation for plotting.
//!
//! Pure functions that turn labeled arrays into the values the charts draw:
//! time normalization, alignment of values to a time axis, calendar
//! grouping, monthly resampling with correlation, and the regression helper.
//!
//! Dependency order: [`time`] → [`align`] → [`grouping`] / [`resample`] →
//! rendering in [`crate::plots`].

pub mod align;
pub mod grouping;
pub mod regression;
pub mod resample;
pub mod time;

pub use align::align_values_to_time;
pub use grouping::{mean_over_time, select_by_months, Season, MONTH_BATCHES, SEASONS};
pub use regression::{fit_linear_regression, train_test_split, LinearFit, SplitDataset};
pub use resample::{correlation_matrix, outer_join, resample_monthly, JoinedFrame, MonthlySeries};
pub use time::{
    calendar_time_from_datenum, date_from_ordinal, datenum_from_calendar_time, decode_cf_time,
    ordinal_from_calendar_time,
};
