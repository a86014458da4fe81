//! In-memory data model for climplot.
//!
//! A [`DataArray`] is a labeled multi-dimensional array with named axes
//! (typically `time`, `lat`, `lon`) and a calendar time axis. A
//! [`TimeSeries`] is an ordered sequence of `(timestamp, value)` pairs.
//! Both are transient values owned by the call that builds them.

use chrono::NaiveDateTime;
use ndarray::{Array, Array2, ArrayD, Axis, Ix2, IxDyn};
use std::collections::HashMap;

use crate::error::{ClimplotError, Result};
use crate::prepare::align::align_values_to_time;

/// Name of the time dimension
pub const TIME_DIM: &str = "time";

/// Accepted names for the latitude dimension
const LAT_NAMES: [&str; 2] = ["lat", "latitude"];

/// Accepted names for the longitude dimension
const LON_NAMES: [&str; 2] = ["lon", "longitude"];

/// A labeled multi-dimensional array with a calendar time axis
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    /// Variable name
    pub name: String,
    /// Physical units, if known
    pub units: Option<String>,
    /// Dimension names, in array axis order
    pub dimensions: Vec<String>,
    /// Calendar timestamps of the time dimension
    pub time: Vec<NaiveDateTime>,
    /// Coordinate values for the non-time dimensions
    pub coordinates: HashMap<String, Vec<f64>>,
    /// The values themselves
    pub data: ArrayD<f64>,
}

impl DataArray {
    /// Create a new DataArray, checking that labels agree with the data shape
    pub fn new(
        name: impl Into<String>,
        dimensions: Vec<String>,
        time: Vec<NaiveDateTime>,
        coordinates: HashMap<String, Vec<f64>>,
        data: ArrayD<f64>,
    ) -> Result<Self> {
        let array = Self {
            name: name.into(),
            units: None,
            dimensions,
            time,
            coordinates,
            data,
        };
        array.validate()?;
        Ok(array)
    }

    /// Attach physical units
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Validate that the dimension labels and coordinates match the data
    pub fn validate(&self) -> Result<()> {
        let shape = self.data.shape();
        if shape.len() != self.dimensions.len() {
            return Err(ClimplotError::ShapeMismatch {
                message: format!(
                    "Variable {} has {} dimension names but data has {} axes",
                    self.name,
                    self.dimensions.len(),
                    shape.len()
                ),
            });
        }

        for (i, dim_name) in self.dimensions.iter().enumerate() {
            let expected = if dim_name == TIME_DIM {
                Some(self.time.len())
            } else {
                self.coordinates.get(dim_name).map(Vec::len)
            };

            if let Some(expected) = expected {
                if shape[i] != expected {
                    return Err(ClimplotError::ShapeMismatch {
                        message: format!(
                            "Variable {} dimension {} has size {} but {} coordinate values",
                            self.name, dim_name, shape[i], expected
                        ),
                    });
                }
            }
        }

        Ok(())
    }

    /// Index of the time axis, if the array has one
    pub fn time_axis(&self) -> Option<usize> {
        self.dimensions.iter().position(|d| d == TIME_DIM)
    }

    fn time_axis_checked(&self) -> Result<usize> {
        self.time_axis().ok_or_else(|| ClimplotError::DataNotFound {
            message: format!("Variable {} has no time dimension", self.name),
        })
    }

    /// Calendar timestamps of the time axis
    pub fn time_values(&self) -> &[NaiveDateTime] {
        &self.time
    }

    /// All values in row-major order
    pub fn flatten_values(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    /// Number of time steps
    pub fn time_len(&self) -> usize {
        self.time.len()
    }

    fn coordinate_by_names(&self, names: &[&str]) -> Result<&[f64]> {
        names
            .iter()
            .find_map(|n| self.coordinates.get(*n))
            .map(Vec::as_slice)
            .ok_or_else(|| ClimplotError::DataNotFound {
                message: format!(
                    "Variable {} has no coordinate named {}",
                    self.name,
                    names.join(" or ")
                ),
            })
    }

    /// Latitude coordinate values
    pub fn latitudes(&self) -> Result<&[f64]> {
        self.coordinate_by_names(&LAT_NAMES)
    }

    /// Longitude coordinate values
    pub fn longitudes(&self) -> Result<&[f64]> {
        self.coordinate_by_names(&LON_NAMES)
    }

    /// Keep only the given time steps, in the given order
    pub fn select_time(&self, indices: &[usize]) -> Result<DataArray> {
        let axis = self.time_axis_checked()?;
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.time.len()) {
            return Err(ClimplotError::invalid_parameter(
                "time_index",
                format!("index {} out of range for {} time steps", bad, self.time.len()),
            ));
        }

        Ok(DataArray {
            name: self.name.clone(),
            units: self.units.clone(),
            dimensions: self.dimensions.clone(),
            time: indices.iter().map(|&i| self.time[i]).collect(),
            coordinates: self.coordinates.clone(),
            data: self.data.select(Axis(axis), indices),
        })
    }

    /// A single time slice as a (lat, lon) grid
    pub fn time_slice(&self, index: usize) -> Result<Array2<f64>> {
        let axis = self.time_axis_checked()?;
        if index >= self.time.len() {
            return Err(ClimplotError::invalid_parameter(
                "time_index",
                format!("index {} out of range for {} time steps", index, self.time.len()),
            ));
        }
        let slice = self.data.index_axis(Axis(axis), index).to_owned();
        self.orient_lat_lon(slice, Some(axis))
    }

    /// Convert an array whose time axis has been removed into a (lat, lon) grid
    ///
    /// `removed_axis` is the axis index the reduction dropped, or None when the
    /// array never had one.
    pub(crate) fn orient_lat_lon(
        &self,
        grid: ArrayD<f64>,
        removed_axis: Option<usize>,
    ) -> Result<Array2<f64>> {
        let remaining: Vec<&str> = self
            .dimensions
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != removed_axis)
            .map(|(_, d)| d.as_str())
            .collect();

        let grid = grid
            .into_dimensionality::<Ix2>()
            .map_err(|_| ClimplotError::ShapeMismatch {
                message: format!(
                    "Variable {} must reduce to a 2-D (lat, lon) grid, remaining dims: {:?}",
                    self.name, remaining
                ),
            })?;

        let is_lat = |d: &str| LAT_NAMES.contains(&d);
        let is_lon = |d: &str| LON_NAMES.contains(&d);

        match (remaining[0], remaining[1]) {
            (a, b) if is_lat(a) && is_lon(b) => Ok(grid),
            (a, b) if is_lon(a) && is_lat(b) => Ok(grid.reversed_axes()),
            _ => Err(ClimplotError::ShapeMismatch {
                message: format!(
                    "Variable {} needs lat and lon dimensions, found {:?}",
                    self.name, remaining
                ),
            }),
        }
    }
}

/// An ordered sequence of `(timestamp, value)` pairs of equal length
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a series from equally long timestamps and values
    pub fn new(timestamps: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ClimplotError::ShapeMismatch {
                message: format!(
                    "x and y must have same first dimension, but have shapes ({},) and ({},)",
                    timestamps.len(),
                    values.len()
                ),
            });
        }
        Ok(Self { timestamps, values })
    }

    /// Truncate `values` to the time axis, then build the series
    ///
    /// Surplus values are dropped silently. When there are fewer values than
    /// timestamps the lengths still disagree and this fails with
    /// [`ClimplotError::ShapeMismatch`].
    pub fn from_unaligned(timestamps: &[NaiveDateTime], values: &[f64]) -> Result<Self> {
        let aligned = align_values_to_time(values, timestamps);
        Self::new(timestamps.to_vec(), aligned.to_vec())
    }

    /// Spatially averaged series of a gridded variable
    ///
    /// Every non-time axis is reduced with a NaN-skipping mean.
    pub fn area_mean(array: &DataArray) -> Result<Self> {
        let axis = array.time_axis_checked()?;
        let values = array
            .data
            .axis_iter(Axis(axis))
            .map(|slice| crate::prepare::grouping::nan_mean(slice.iter().copied()))
            .collect();
        Self::new(array.time.clone(), values)
    }

    /// A one-dimensional `time` variable holding this series
    pub fn to_data_array(&self, name: impl Into<String>) -> Result<DataArray> {
        let data = Array::from_shape_vec(IxDyn(&[self.len()]), self.values.clone())?;
        DataArray::new(
            name,
            vec![TIME_DIM.to_string()],
            self.timestamps.clone(),
            HashMap::new(),
            data,
        )
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no samples
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sample timestamps
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Sample values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over `(timestamp, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.timestamps.iter().copied().zip(self.values.iter().copied())
    }
}

impl FromIterator<(NaiveDateTime, f64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDateTime, f64)>>(iter: I) -> Self {
        let (timestamps, values) = iter.into_iter().unzip();
        Self { timestamps, values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ndarray::{Array, IxDyn};

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn grid(dims: &[&str], shape: &[usize]) -> DataArray {
        let n: usize = shape.iter().product();
        let data = Array::from_shape_vec(IxDyn(shape), (0..n).map(|v| v as f64).collect()).unwrap();
        let mut coordinates = HashMap::new();
        let mut time = Vec::new();
        for (dim, &size) in dims.iter().zip(shape) {
            if *dim == TIME_DIM {
                time = (0..size).map(|i| day(2000, 1, 1 + i as u32)).collect();
            } else {
                coordinates.insert(dim.to_string(), (0..size).map(|i| i as f64).collect());
            }
        }
        DataArray::new(
            "t2m",
            dims.iter().map(|d| d.to_string()).collect(),
            time,
            coordinates,
            data,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_rejects_coordinate_mismatch() {
        let data = Array::zeros(IxDyn(&[2, 3]));
        let mut coordinates = HashMap::new();
        coordinates.insert("lat".to_string(), vec![0.0, 1.0]);
        coordinates.insert("lon".to_string(), vec![0.0, 1.0]);
        let result = DataArray::new(
            "bad",
            vec!["lat".to_string(), "lon".to_string()],
            Vec::new(),
            coordinates,
            data,
        );
        assert!(matches!(result, Err(ClimplotError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_time_slice_orients_lon_lat() {
        let array = grid(&["time", "lon", "lat"], &[2, 3, 2]);
        let slice = array.time_slice(1).unwrap();
        assert_eq!(slice.shape(), &[2, 3]);
        // data[1, lon=2, lat=0] = 6 + 2*2 + 0 = 10
        assert_eq!(slice[[0, 2]], 10.0);
    }

    #[test]
    fn test_select_time_keeps_labels() {
        let array = grid(&["time", "lat", "lon"], &[3, 2, 2]);
        let subset = array.select_time(&[2, 0]).unwrap();
        assert_eq!(subset.time, vec![day(2000, 1, 3), day(2000, 1, 1)]);
        assert_eq!(subset.data.shape(), &[2, 2, 2]);
        assert_eq!(subset.data[[0, 0, 0]], 8.0);
        assert!(array.select_time(&[3]).is_err());
    }

    #[test]
    fn test_flatten_is_row_major() {
        let array = grid(&["time", "lat", "lon"], &[2, 1, 2]);
        assert_eq!(array.flatten_values(), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_series_length_checks() {
        let times = vec![day(2000, 1, 1), day(2000, 1, 2)];
        assert!(TimeSeries::from_unaligned(&times, &[1.0, 2.0, 3.0]).is_ok());
        assert!(matches!(
            TimeSeries::from_unaligned(&times, &[1.0]),
            Err(ClimplotError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_area_mean() {
        let array = grid(&["time", "lat", "lon"], &[2, 1, 2]);
        let series = TimeSeries::area_mean(&array).unwrap();
        assert_eq!(series.values(), &[0.5, 2.5]);

        let flat = series.to_data_array("t2m_mean").unwrap();
        assert_eq!(flat.dimensions, vec!["time".to_string()]);
        assert_eq!(flat.flatten_values(), vec![0.5, 2.5]);
    }
}
