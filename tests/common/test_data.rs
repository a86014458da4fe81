//! Test data generation utilities.
//!
//! Builders for synthetic (time, lat, lon) variables over a small West
//! Africa grid, and a writer for the JSON dataset format.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use climplot::data_loader::{DatasetFile, TimeAxis, VariableRecord};
use climplot::DataArray;
use ndarray::{Array, IxDyn};
use std::collections::HashMap;
use std::path::Path;

/// Latitudes of the test grid, south to north
pub const LATS: [f64; 4] = [4.0, 8.0, 12.0, 16.0];

/// Longitudes of the test grid, west to east
pub const LONS: [f64; 5] = [-16.0, -12.0, -8.0, -4.0, 0.0];

/// First day of each month for `years` years starting in 2000
pub fn monthly_times(years: i32) -> Vec<NaiveDateTime> {
    (0..years * 12)
        .map(|i| {
            NaiveDate::from_ymd_opt(2000 + i / 12, (i % 12) as u32 + 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        })
        .collect()
}

/// A (time, lat, lon) variable whose value is `f(time, lat, lon)`
pub fn gridded_variable(
    name: &str,
    units: &str,
    times: Vec<NaiveDateTime>,
    f: impl Fn(&NaiveDateTime, f64, f64) -> f64,
) -> DataArray {
    let mut values = Vec::with_capacity(times.len() * LATS.len() * LONS.len());
    for t in &times {
        for lat in LATS {
            for lon in LONS {
                values.push(f(t, lat, lon));
            }
        }
    }
    let data =
        Array::from_shape_vec(IxDyn(&[times.len(), LATS.len(), LONS.len()]), values).unwrap();

    let mut coordinates = HashMap::new();
    coordinates.insert("lat".to_string(), LATS.to_vec());
    coordinates.insert("lon".to_string(), LONS.to_vec());
    DataArray::new(
        name,
        vec!["time".into(), "lat".into(), "lon".into()],
        times,
        coordinates,
        data,
    )
    .unwrap()
    .with_units(units)
}

/// Near-surface temperature: warmer in the south and in the dry season
pub fn temperature(years: i32) -> DataArray {
    gridded_variable("t2m", "K", monthly_times(years), |t, lat, lon| {
        let season = (t.month() as f64 / 12.0 * std::f64::consts::TAU).cos();
        300.0 - 0.3 * lat + 0.05 * lon + 2.0 * season
    })
}

/// Precipitation that peaks in August and grows with latitude
pub fn precipitation(years: i32) -> DataArray {
    gridded_variable("pr", "mm/day", monthly_times(years), |t, lat, _| {
        let wet = (-((t.month() as f64 - 8.0).powi(2)) / 4.0).exp();
        0.5 + 8.0 * wet * (lat / 16.0)
    })
}

/// Write variables sharing one time axis to a JSON dataset file
pub fn write_json_dataset(path: &Path, variables: &[&DataArray]) {
    let first = variables[0];
    let file = DatasetFile {
        time: Some(TimeAxis::Calendar(first.time.clone())),
        coordinates: first.coordinates.clone(),
        variables: variables
            .iter()
            .map(|v| {
                (
                    v.name.clone(),
                    VariableRecord {
                        dimensions: v.dimensions.clone(),
                        units: v.units.clone(),
                        data: v
                            .data
                            .iter()
                            .map(|x| if x.is_nan() { None } else { Some(*x) })
                            .collect(),
                    },
                )
            })
            .collect(),
    };
    std::fs::write(path, serde_json::to_string(&file).unwrap()).unwrap();
}
