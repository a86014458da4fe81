//! Calendar grouping and reduction over time.
//!
//! The season and month groupings are fixed: they decide the 2×2 panel
//! layout of the periodic map figures.

use chrono::Datelike;
use ndarray::{ArrayD, Axis};

use crate::dataset::{DataArray, TimeSeries};
use crate::error::{ClimplotError, Result};

/// Meteorological three-month seasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    /// December, January, February
    Djf,
    /// March, April, May
    Mam,
    /// June, July, August
    Jja,
    /// September, October, November
    Son,
}

/// Seasons in panel order
pub const SEASONS: [Season; 4] = [Season::Djf, Season::Mam, Season::Jja, Season::Son];

/// Calendar months split into three batches of four, one figure per batch
pub const MONTH_BATCHES: [[u32; 4]; 3] = [[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12]];

impl Season {
    /// Calendar months of the season, in seasonal order
    pub fn months(&self) -> [u32; 3] {
        match self {
            Season::Djf => [12, 1, 2],
            Season::Mam => [3, 4, 5],
            Season::Jja => [6, 7, 8],
            Season::Son => [9, 10, 11],
        }
    }

    /// Conventional abbreviation
    pub fn abbrev(&self) -> &'static str {
        match self {
            Season::Djf => "DJF",
            Season::Mam => "MAM",
            Season::Jja => "JJA",
            Season::Son => "SON",
        }
    }
}

/// Keep the samples whose timestamp month is in `months`
pub fn select_by_months(series: &TimeSeries, months: &[u32]) -> TimeSeries {
    series
        .iter()
        .filter(|(ts, _)| months.contains(&ts.month()))
        .collect()
}

/// Keep the time steps of a gridded variable whose month is in `months`
pub fn select_array_by_months(array: &DataArray, months: &[u32]) -> Result<DataArray> {
    let indices: Vec<usize> = array
        .time_values()
        .iter()
        .enumerate()
        .filter(|(_, ts)| months.contains(&ts.month()))
        .map(|(i, _)| i)
        .collect();

    array.select_time(&indices)
}

/// Arithmetic mean over the time axis, leaving the other axes unreduced
///
/// NaN values are skipped; a cell that is NaN at every time step stays NaN.
pub fn mean_over_time(array: &DataArray) -> Result<ArrayD<f64>> {
    let axis = array.time_axis().ok_or_else(|| ClimplotError::DataNotFound {
        message: format!("Variable {} has no time dimension", array.name),
    })?;

    if array.time_len() == 0 {
        return Err(ClimplotError::DataNotFound {
            message: format!("Variable {} has no time steps to average", array.name),
        });
    }

    Ok(array
        .data
        .map_axis(Axis(axis), |lane| nan_mean(lane.iter().copied())))
}

/// Mean of the non-NaN values; NaN when there are none
pub fn nan_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}
