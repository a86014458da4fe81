//! Assertion utilities for testing.
//!
//! Floating-point comparisons that treat NaN as a value: two NaNs compare
//! equal, a NaN and a number do not.

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert that two values are approximately equal
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    if actual.is_nan() || expected.is_nan() {
        assert!(
            actual.is_nan() && expected.is_nan(),
            "Values not approximately equal: actual = {}, expected = {}",
            actual,
            expected
        );
        return;
    }

    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();
    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that two slices are approximately element-wise equal
pub fn assert_array_approx_eq(actual: &[f64], expected: &[f64], epsilon: Option<f64>) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Arrays have different lengths: actual = {}, expected = {}",
        actual.len(),
        expected.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        if a.is_nan() && e.is_nan() {
            continue;
        }
        let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
        assert!(
            (a - e).abs() <= eps,
            "Arrays differ at index {}: actual = {}, expected = {}",
            i,
            a,
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0, None);
        assert_approx_eq(1.0, 1.001, Some(0.01));
        assert_approx_eq(f64::NAN, f64::NAN, None);
    }

    #[test]
    fn test_assert_array_approx_eq() {
        assert_array_approx_eq(&[1.0, f64::NAN], &[1.0, f64::NAN], None);
    }
}
