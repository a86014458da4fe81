//! Dataset loading.
//!
//! Reads one variable of a gridded dataset into a [`DataArray`]. Two formats
//! are understood:
//!
//! - JSON dataset files (`.json`), always available
//! - NetCDF files (`.nc`, `.nc4`, `.netcdf`), with the `netcdf` feature
//!
//! In both cases the time axis is decoded to calendar timestamps, either from
//! ISO strings or from a CF `"<unit> since <reference>"` encoding.

use chrono::NaiveDateTime;
use ndarray::{Array, IxDyn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::dataset::{DataArray, TIME_DIM};
use crate::error::{ClimplotError, Result};
use crate::logging::{log_dataset_stats, log_operation_end, log_operation_start};
use crate::prepare::time::decode_cf_time;

/// Time axis of a JSON dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TimeAxis {
    /// ISO 8601 timestamps, e.g. `"2000-01-01T00:00:00"`
    Calendar(Vec<NaiveDateTime>),
    /// Offsets from a reference time, e.g. units `"days since 2000-01-01"`
    Encoded { values: Vec<f64>, units: String },
}

impl TimeAxis {
    fn decode(&self) -> Result<Vec<NaiveDateTime>> {
        match self {
            TimeAxis::Calendar(times) => Ok(times.clone()),
            TimeAxis::Encoded { values, units } => decode_cf_time(values, units),
        }
    }
}

/// One variable of a JSON dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariableRecord {
    /// Dimension names in array order
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub units: Option<String>,
    /// Values in row-major order; `null` marks a missing value
    pub data: Vec<Option<f64>>,
}

/// The JSON dataset file layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetFile {
    #[serde(default)]
    pub time: Option<TimeAxis>,
    /// Coordinate values of the non-time dimensions
    #[serde(default)]
    pub coordinates: HashMap<String, Vec<f64>>,
    pub variables: HashMap<String, VariableRecord>,
}

/// Summary of one variable, as printed by `climplot inspect`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VariableSummary {
    pub name: String,
    pub dimensions: Vec<String>,
    pub shape: Vec<usize>,
    pub units: Option<String>,
}

enum Format {
    Json,
    #[cfg(feature = "netcdf")]
    NetCdf,
}

fn detect_format(path: &Path) -> Result<Format> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "json" => Ok(Format::Json),
        #[cfg(feature = "netcdf")]
        "nc" | "nc4" | "netcdf" => Ok(Format::NetCdf),
        #[cfg(not(feature = "netcdf"))]
        "nc" | "nc4" | "netcdf" => Err(ClimplotError::Config {
            message: format!(
                "{} is a NetCDF file; rebuild climplot with the `netcdf` feature to read it",
                path.display()
            ),
        }),
        _ => Err(ClimplotError::invalid_parameter(
            "path",
            format!("unsupported dataset format: {}", path.display()),
        )),
    }
}

fn check_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ClimplotError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }
    Ok(())
}

/// Load `variable` from a dataset file
pub fn load_dataset(path: &Path, variable: &str) -> Result<DataArray> {
    check_exists(path)?;
    let start = Instant::now();
    let details = format!("{} from {}", variable, path.display());
    log_operation_start("load_dataset", Some(&details));

    let loaded = match detect_format(path)? {
        Format::Json => read_json(path).and_then(|file| load_json_variable(&file, variable)),
        #[cfg(feature = "netcdf")]
        Format::NetCdf => netcdf_loader::load_variable(path, variable),
    };
    log_operation_end("load_dataset", start, loaded.is_ok());
    let array = loaded?;

    log_dataset_stats(
        &path.display().to_string(),
        &array.name,
        &array.dimensions,
        array.data.shape(),
        array.time_len(),
    );
    Ok(array)
}

/// List the variables of a dataset file
pub fn inspect_dataset(path: &Path) -> Result<Vec<VariableSummary>> {
    check_exists(path)?;
    let mut summaries = match detect_format(path)? {
        Format::Json => {
            let file = read_json(path)?;
            file.variables
                .keys()
                .map(|name| {
                    let array = load_json_variable(&file, name)?;
                    Ok(VariableSummary {
                        name: array.name,
                        dimensions: array.dimensions,
                        shape: array.data.shape().to_vec(),
                        units: array.units,
                    })
                })
                .collect::<Result<Vec<_>>>()?
        }
        #[cfg(feature = "netcdf")]
        Format::NetCdf => netcdf_loader::inspect(path)?,
    };
    summaries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(summaries)
}

/// Parse a JSON dataset file
pub fn read_json(path: &Path) -> Result<DatasetFile> {
    let contents = std::fs::read_to_string(path)?;
    let file: DatasetFile = serde_json::from_str(&contents)?;
    info!(
        path = %path.display(),
        variables = file.variables.len(),
        "Read JSON dataset"
    );
    Ok(file)
}

/// Build a [`DataArray`] for one variable of a parsed JSON dataset
pub fn load_json_variable(file: &DatasetFile, variable: &str) -> Result<DataArray> {
    let record = file
        .variables
        .get(variable)
        .ok_or_else(|| ClimplotError::DataNotFound {
            message: format!(
                "Variable {} not found; available: {:?}",
                variable,
                sorted_keys(&file.variables)
            ),
        })?;

    let time = match &file.time {
        Some(axis) => axis.decode()?,
        None => Vec::new(),
    };
    if record.dimensions.iter().any(|d| d == TIME_DIM) && file.time.is_none() {
        return Err(ClimplotError::DataNotFound {
            message: format!(
                "Variable {} has a time dimension but the file has no time axis",
                variable
            ),
        });
    }

    let mut coordinates = HashMap::new();
    let mut shape = Vec::with_capacity(record.dimensions.len());
    for dim in &record.dimensions {
        if dim == TIME_DIM {
            shape.push(time.len());
            continue;
        }
        let values = file.coordinates.get(dim).ok_or_else(|| ClimplotError::DataNotFound {
            message: format!("Coordinate values for dimension {} not found", dim),
        })?;
        shape.push(values.len());
        coordinates.insert(dim.clone(), values.clone());
    }

    let expected: usize = shape.iter().product();
    if record.data.len() != expected {
        return Err(ClimplotError::ShapeMismatch {
            message: format!(
                "Variable {} has {} values but its dimensions {:?} need {}",
                variable,
                record.data.len(),
                shape,
                expected
            ),
        });
    }

    let values: Vec<f64> = record.data.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    let data = Array::from_shape_vec(IxDyn(&shape), values)?;
    debug!(variable = variable, shape = ?shape, "Built array from JSON");

    let array = DataArray::new(variable, record.dimensions.clone(), time, coordinates, data)?;
    Ok(match &record.units {
        Some(units) => array.with_units(units.clone()),
        None => array,
    })
}

fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<&str> {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

#[cfg(feature = "netcdf")]
mod netcdf_loader {
    use ndarray::{Array, IxDyn};
    use netcdf::{AttributeValue, Variable as NetCDFVariable};
    use std::collections::HashMap;
    use std::path::Path;
    use tracing::{info, warn};

    use super::VariableSummary;
    use crate::dataset::{DataArray, TIME_DIM};
    use crate::error::{ClimplotError, Result};
    use crate::prepare::time::decode_cf_time;

    fn open(path: &Path) -> Result<netcdf::File> {
        let file = netcdf::open(path)?;
        info!("Opened NetCDF file: {}", path.display());
        Ok(file)
    }

    fn text_attribute(var: &NetCDFVariable, name: &str) -> Result<Option<String>> {
        match var.attribute(name) {
            Some(attr) => match attr.value()? {
                AttributeValue::Str(s) => Ok(Some(s)),
                _ => Ok(None),
            },
            None => Ok(None),
        }
    }

    fn fill_value(var: &NetCDFVariable) -> Result<Option<f64>> {
        let Some(attr) = var.attribute("_FillValue") else {
            return Ok(None);
        };
        Ok(match attr.value()? {
            AttributeValue::Schar(v) => Some(v as f64),
            AttributeValue::Short(v) => Some(v as f64),
            AttributeValue::Int(v) => Some(v as f64),
            AttributeValue::Float(v) => Some(v as f64),
            AttributeValue::Double(v) => Some(v),
            _ => None,
        })
    }

    /// Read every value of a numeric variable as f64
    fn read_values(var: &NetCDFVariable) -> Result<Vec<f64>> {
        use netcdf::types::{BasicType, VariableType};

        let values = match var.vartype() {
            VariableType::Basic(BasicType::Byte) => var
                .get_values::<i8, _>(&[] as &[netcdf::Extent])?
                .into_iter()
                .map(|v| v as f64)
                .collect(),
            VariableType::Basic(BasicType::Short) => var
                .get_values::<i16, _>(&[] as &[netcdf::Extent])?
                .into_iter()
                .map(|v| v as f64)
                .collect(),
            VariableType::Basic(BasicType::Int) => var
                .get_values::<i32, _>(&[] as &[netcdf::Extent])?
                .into_iter()
                .map(|v| v as f64)
                .collect(),
            VariableType::Basic(BasicType::Float) => var
                .get_values::<f32, _>(&[] as &[netcdf::Extent])?
                .into_iter()
                .map(|v| v as f64)
                .collect(),
            VariableType::Basic(BasicType::Double) => {
                var.get_values::<f64, _>(&[] as &[netcdf::Extent])?
            }
            other => {
                return Err(ClimplotError::DataNotFound {
                    message: format!("Unsupported variable type {:?} for {}", other, var.name()),
                })
            }
        };

        Ok(match fill_value(var)? {
            Some(fill) => values
                .into_iter()
                .map(|v| if v == fill { f64::NAN } else { v })
                .collect(),
            None => values,
        })
    }

    pub(super) fn load_variable(path: &Path, variable: &str) -> Result<DataArray> {
        let file = open(path)?;
        let var = file.variable(variable).ok_or_else(|| ClimplotError::DataNotFound {
            message: format!("Variable {} not found in {}", variable, path.display()),
        })?;

        let dimensions: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

        let mut time = Vec::new();
        let mut coordinates = HashMap::new();
        for (dim, &len) in dimensions.iter().zip(&shape) {
            let coord_var = file.variable(dim);
            if dim == TIME_DIM {
                let time_var = coord_var.ok_or_else(|| ClimplotError::DataNotFound {
                    message: "Time coordinate variable not found".to_string(),
                })?;
                let units = text_attribute(&time_var, "units")?.ok_or_else(|| {
                    ClimplotError::InvalidTime {
                        message: "Time variable has no units attribute".to_string(),
                    }
                })?;
                time = decode_cf_time(&read_values(&time_var)?, &units)?;
                continue;
            }
            let values = match coord_var {
                Some(cv) => read_values(&cv)?,
                None => {
                    warn!("Created default coordinates for dimension: {}", dim);
                    (0..len).map(|i| i as f64).collect()
                }
            };
            coordinates.insert(dim.clone(), values);
        }

        let data = Array::from_shape_vec(IxDyn(&shape), read_values(&var)?)?;
        let array = DataArray::new(variable, dimensions, time, coordinates, data)?;
        Ok(match text_attribute(&var, "units")? {
            Some(units) => array.with_units(units),
            None => array,
        })
    }

    pub(super) fn inspect(path: &Path) -> Result<Vec<VariableSummary>> {
        let file = open(path)?;
        file.variables()
            .map(|var| {
                Ok(VariableSummary {
                    name: var.name(),
                    dimensions: var.dimensions().iter().map(|d| d.name()).collect(),
                    shape: var.dimensions().iter().map(|d| d.len()).collect(),
                    units: text_attribute(&var, "units")?,
                })
            })
            .collect()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    const DATASET: &str = r#"{
        "time": {"values": [0, 31, 60], "units": "days since 2000-01-01"},
        "coordinates": {"lat": [4.0, 8.0], "lon": [-10.0, 0.0]},
        "variables": {
            "t2m": {
                "dimensions": ["time", "lat", "lon"],
                "units": "K",
                "data": [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, null]
            },
            "orography": {
                "dimensions": ["lat", "lon"],
                "data": [100, 200, 300, 400]
            }
        }
    }"#;

    fn write_dataset(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_file_not_found() {
        let result = load_dataset(Path::new("/nonexistent/file.json"), "t2m");
        match result.unwrap_err() {
            ClimplotError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected IO error, got {:?}", other),
        }
    }

    #[test]
    fn test_json_loading_decodes_cf_time() {
        let file = write_dataset(DATASET);
        let array = load_dataset(file.path(), "t2m").unwrap();

        assert_eq!(array.data.shape(), &[3, 2, 2]);
        assert_eq!(array.units.as_deref(), Some("K"));
        let months: Vec<String> = array
            .time
            .iter()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(months, vec!["2000-01-01", "2000-02-01", "2000-03-01"]);
        assert!(array.data[[2, 1, 1]].is_nan());
        assert_eq!(array.longitudes().unwrap(), &[-10.0, 0.0]);
    }

    #[test]
    fn test_json_loading_iso_time() {
        let file = write_dataset(
            r#"{
                "time": ["2001-05-01T00:00:00", "2001-05-02T12:00:00"],
                "variables": {"pr": {"dimensions": ["time"], "data": [0.5, 1.5]}}
            }"#,
        );
        let array = load_dataset(file.path(), "pr").unwrap();
        assert_eq!(array.time[1].format("%d %H").to_string(), "02 12");
        assert_eq!(array.flatten_values(), vec![0.5, 1.5]);
    }

    #[test]
    fn test_json_loading_errors() {
        let file = write_dataset(DATASET);
        assert!(matches!(
            load_dataset(file.path(), "missing"),
            Err(ClimplotError::DataNotFound { .. })
        ));

        let bad = write_dataset(concat!(
            r#"{"coordinates": {"lat": [1.0]}, "#,
            r#""variables": {"x": {"dimensions": ["lat"], "data": [1, 2]}}}"#
        ));
        assert!(matches!(
            load_dataset(bad.path(), "x"),
            Err(ClimplotError::ShapeMismatch { .. })
        ));

        let malformed = write_dataset("{not json");
        assert!(matches!(
            load_dataset(malformed.path(), "x"),
            Err(ClimplotError::Json(_))
        ));
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "a,b").unwrap();
        assert!(matches!(
            load_dataset(&path, "a"),
            Err(ClimplotError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_inspect_lists_sorted_variables() {
        let file = write_dataset(DATASET);
        let summaries = inspect_dataset(file.path()).unwrap();
        assert_eq!(
            summaries,
            vec![
                VariableSummary {
                    name: "orography".to_string(),
                    dimensions: vec!["lat".to_string(), "lon".to_string()],
                    shape: vec![2, 2],
                    units: None,
                },
                VariableSummary {
                    name: "t2m".to_string(),
                    dimensions: vec!["time".to_string(), "lat".to_string(), "lon".to_string()],
                    shape: vec![3, 2, 2],
                    units: Some("K".to_string()),
                },
            ]
        );
    }
}
