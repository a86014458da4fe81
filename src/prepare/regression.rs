//! Train/test partitioning and single-variable least squares.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{ClimplotError, Result};

/// Default share of samples held out for testing
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Default permutation seed
pub const DEFAULT_SEED: u64 = 42;

/// The four partitions produced by [`train_test_split`]
#[derive(Debug, Clone, PartialEq)]
pub struct SplitDataset {
    pub x_train: Vec<f64>,
    pub x_test: Vec<f64>,
    pub y_train: Vec<f64>,
    pub y_test: Vec<f64>,
}

/// Slope and intercept of an ordinary least squares line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// `slope * x + intercept`
    pub fn predict_one(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Predictions for every x
    pub fn predict(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict_one(x)).collect()
    }
}

/// Split paired samples into train and test partitions
///
/// The test partition holds `round(n * test_fraction)` samples. Assignment
/// follows a uniform random permutation seeded by `seed`, so identical
/// arguments always give identical partitions.
pub fn train_test_split(
    x: &[f64],
    y: &[f64],
    test_fraction: f64,
    seed: u64,
) -> Result<SplitDataset> {
    if x.len() != y.len() {
        return Err(ClimplotError::ShapeMismatch {
            message: format!(
                "Found input variables with inconsistent numbers of samples: [{}, {}]",
                x.len(),
                y.len()
            ),
        });
    }
    if !(0.0..=1.0).contains(&test_fraction) {
        return Err(ClimplotError::invalid_parameter(
            "test_fraction",
            format!("must be within [0, 1], got {}", test_fraction),
        ));
    }

    let n = x.len();
    let n_test = (n as f64 * test_fraction).round() as usize;

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));
    let (test_idx, train_idx) = order.split_at(n_test);

    let pick = |source: &[f64], idx: &[usize]| idx.iter().map(|&i| source[i]).collect::<Vec<_>>();

    Ok(SplitDataset {
        x_train: pick(x, train_idx),
        x_test: pick(x, test_idx),
        y_train: pick(y, train_idx),
        y_test: pick(y, test_idx),
    })
}

/// Ordinary least squares fit of `y = slope * x + intercept`
///
/// When every x is identical the slope is 0 and the intercept is the mean of y.
pub fn fit_linear_regression(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(ClimplotError::ShapeMismatch {
            message: format!("x has {} samples but y has {}", x.len(), y.len()),
        });
    }
    if x.is_empty() {
        return Err(ClimplotError::DataNotFound {
            message: "cannot fit a regression to zero samples".to_string(),
        });
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (sxy, sxx) = x.iter().zip(y).fold((0.0, 0.0), |(sxy, sxx), (xi, yi)| {
        let dx = xi - mean_x;
        (sxy + dx * (yi - mean_y), sxx + dx * dx)
    });

    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    Ok(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}
