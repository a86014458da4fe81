//! Monthly resampling, outer join and Pearson correlation.
//!
//! Buckets are calendar months labelled by their last day. The bucket range
//! is contiguous from the first to the last month present; months with no
//! samples hold NaN, the missing-value marker throughout this module.

use chrono::{Datelike, NaiveDate};
use ndarray::Array2;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::dataset::TimeSeries;
use crate::error::{ClimplotError, Result};

/// Month-end labelled means of a series
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    /// Last calendar day of each month bucket, ascending
    pub month_ends: Vec<NaiveDate>,
    /// Mean of each bucket, NaN when the bucket is empty
    pub values: Vec<f64>,
}

impl MonthlySeries {
    /// Number of buckets
    pub fn len(&self) -> usize {
        self.month_ends.len()
    }

    /// Whether there are no buckets
    pub fn is_empty(&self) -> bool {
        self.month_ends.is_empty()
    }
}

/// Several monthly series joined on the union of their buckets
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedFrame {
    /// Union of the month-end labels, ascending
    pub index: Vec<NaiveDate>,
    /// Column names, in input order
    pub columns: Vec<String>,
    /// `index.len()` × `columns.len()` values, NaN where a column lacks a bucket
    pub data: Array2<f64>,
}

/// Last day of the month containing (`year`, `month`)
fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt())
}

/// Average a series into calendar-month buckets
///
/// NaN samples are skipped; input order does not matter.
pub fn resample_monthly(series: &TimeSeries) -> Result<MonthlySeries> {
    let mut buckets: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for (ts, value) in series.iter() {
        let entry = buckets.entry((ts.year(), ts.month())).or_insert((0.0, 0));
        if !value.is_nan() {
            entry.0 += value;
            entry.1 += 1;
        }
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Ok(MonthlySeries {
            month_ends: Vec::new(),
            values: Vec::new(),
        });
    };

    let mut month_ends = Vec::new();
    let mut values = Vec::new();
    let (mut year, mut month) = first;
    loop {
        let end = month_end(year, month).ok_or_else(|| ClimplotError::InvalidTime {
            message: format!("month {}-{:02} has no representable month end", year, month),
        })?;
        month_ends.push(end);
        values.push(match buckets.get(&(year, month)) {
            Some(&(sum, count)) if count > 0 => sum / count as f64,
            _ => f64::NAN,
        });

        if (year, month) == last {
            break;
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    Ok(MonthlySeries { month_ends, values })
}

/// Join monthly series on the union of their month-end labels
pub fn outer_join(columns: &[(&str, &MonthlySeries)]) -> JoinedFrame {
    let index: Vec<NaiveDate> = columns
        .iter()
        .flat_map(|(_, s)| s.month_ends.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let row_of: HashMap<NaiveDate, usize> =
        index.iter().enumerate().map(|(i, d)| (*d, i)).collect();

    let mut data = Array2::from_elem((index.len(), columns.len()), f64::NAN);
    for (col, (_, series)) in columns.iter().enumerate() {
        for (date, value) in series.month_ends.iter().zip(&series.values) {
            data[[row_of[date], col]] = *value;
        }
    }

    JoinedFrame {
        index,
        columns: columns.iter().map(|(name, _)| name.to_string()).collect(),
        data,
    }
}

/// Pearson correlation over the rows where both values are present
///
/// NaN when fewer than two complete pairs exist or either side is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(a, b)| (*a, *b))
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (sxy, sxx, syy) = pairs.iter().fold((0.0, 0.0, 0.0), |(sxy, sxx, syy), (a, b)| {
        let dx = a - mean_x;
        let dy = b - mean_y;
        (sxy + dx * dy, sxx + dx * dx, syy + dy * dy)
    });

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Pairwise-complete Pearson correlation matrix of the joined columns
pub fn correlation_matrix(frame: &JoinedFrame) -> Array2<f64> {
    let k = frame.columns.len();
    let columns: Vec<Vec<f64>> = frame.data.columns().into_iter().map(|c| c.to_vec()).collect();

    let mut matrix = Array2::from_elem((k, k), f64::NAN);
    for i in 0..k {
        for j in i..k {
            let r = pearson(&columns[i], &columns[j]);
            matrix[[i, j]] = r;
            matrix[[j, i]] = r;
        }
    }
    matrix
}
