//! Time normalization.
//!
//! Two numeric conventions are used by the charts and must not be mixed:
//!
//! - **date-number**: continuous days since 1970-01-01T00:00, including the
//!   fractional time of day. Line charts position samples with it.
//! - **Gregorian ordinal**: whole days where 0001-01-01 is day 1. The
//!   correlation path buckets samples with it.
//!
//! Neither conversion validates order or uniqueness; the output follows the
//! input element by element.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::error::{ClimplotError, Result};

const SECONDS_PER_DAY: f64 = 86_400.0;
const MICROS_PER_DAY: f64 = 86_400_000_000.0;

/// The date-number epoch, 1970-01-01T00:00:00
fn datenum_epoch() -> NaiveDateTime {
    NaiveDateTime::default()
}

/// Continuous day count since 1970-01-01 for each timestamp
pub fn datenum_from_calendar_time(timestamps: &[NaiveDateTime]) -> Vec<f64> {
    let epoch = datenum_epoch();
    timestamps
        .iter()
        .map(|ts| {
            let delta = ts.signed_duration_since(epoch);
            delta.num_seconds() as f64 / SECONDS_PER_DAY
                + delta.subsec_nanos() as f64 / (SECONDS_PER_DAY * 1e9)
        })
        .collect()
}

/// Gregorian ordinal of each timestamp's date; the time of day is ignored
pub fn ordinal_from_calendar_time(timestamps: &[NaiveDateTime]) -> Vec<f64> {
    timestamps
        .iter()
        .map(|ts| ts.date().num_days_from_ce() as f64)
        .collect()
}

/// Inverse of [`datenum_from_calendar_time`], to the nearest microsecond
pub fn calendar_time_from_datenum(datenum: f64) -> Result<NaiveDateTime> {
    if !datenum.is_finite() {
        return Err(ClimplotError::InvalidTime {
            message: format!("date-number {} is not finite", datenum),
        });
    }

    let micros = (datenum * MICROS_PER_DAY).round();
    if micros.abs() >= i64::MAX as f64 {
        return Err(ClimplotError::InvalidTime {
            message: format!("date-number {} is out of range", datenum),
        });
    }

    datenum_epoch()
        .checked_add_signed(Duration::microseconds(micros as i64))
        .ok_or_else(|| ClimplotError::InvalidTime {
            message: format!("date-number {} is out of range", datenum),
        })
}

/// Inverse of [`ordinal_from_calendar_time`]; any fractional part is dropped
pub fn date_from_ordinal(ordinal: f64) -> Result<NaiveDate> {
    let out_of_range = || ClimplotError::InvalidTime {
        message: format!("ordinal {} is not a representable date", ordinal),
    };

    if !ordinal.is_finite() || ordinal.abs() > i32::MAX as f64 {
        return Err(out_of_range());
    }
    NaiveDate::from_num_days_from_ce_opt(ordinal.trunc() as i32).ok_or_else(out_of_range)
}

/// Decode a CF-style encoded time axis such as `"days since 2000-01-01"`
///
/// Supported units are days, hours, minutes and seconds. The reference time
/// may be a date, or a date and time separated by a space or `T`.
pub fn decode_cf_time(values: &[f64], units: &str) -> Result<Vec<NaiveDateTime>> {
    let (unit, reference) = units.split_once(" since ").ok_or_else(|| ClimplotError::InvalidTime {
        message: format!("time units must look like '<unit> since <date>', got '{}'", units),
    })?;

    let seconds_per_unit = match unit.trim().to_lowercase().as_str() {
        "days" | "day" | "d" => SECONDS_PER_DAY,
        "hours" | "hour" | "hrs" | "hr" | "h" => 3_600.0,
        "minutes" | "minute" | "mins" | "min" => 60.0,
        "seconds" | "second" | "secs" | "sec" | "s" => 1.0,
        other => {
            return Err(ClimplotError::InvalidTime {
                message: format!("unsupported time unit '{}'", other),
            })
        }
    };

    let reference = parse_reference_time(reference)?;

    values
        .iter()
        .map(|&v| {
            let micros = (v * seconds_per_unit * 1e6).round();
            if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
                return Err(ClimplotError::InvalidTime {
                    message: format!("time offset {} {} is out of range", v, unit.trim()),
                });
            }
            reference
                .checked_add_signed(Duration::microseconds(micros as i64))
                .ok_or_else(|| ClimplotError::InvalidTime {
                    message: format!("time offset {} {} is out of range", v, unit.trim()),
                })
        })
        .collect()
}

fn parse_reference_time(reference: &str) -> Result<NaiveDateTime> {
    let trimmed = reference.trim();
    let trimmed = trimmed
        .strip_suffix("UTC")
        .or_else(|| trimmed.strip_suffix('Z'))
        .unwrap_or(trimmed)
        .trim();

    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ts);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ClimplotError::InvalidTime {
            message: format!("cannot parse reference time '{}'", reference.trim()),
        })
}
