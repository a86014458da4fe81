//! Alignment of value arrays to a time axis.

use tracing::warn;

/// Truncate `values` to the length of `timestamps`
///
/// Never pads. When `values` is longer the trailing values are dropped
/// silently; when it is shorter it comes back unchanged and the length
/// mismatch surfaces later, when the series is built or drawn.
pub fn align_values_to_time<'a, T, U>(values: &'a [T], timestamps: &[U]) -> &'a [T] {
    if values.len() > timestamps.len() {
        warn!(
            values = values.len(),
            timestamps = timestamps.len(),
            dropped = values.len() - timestamps.len(),
            "Truncating values to the time axis"
        );
        &values[..timestamps.len()]
    } else {
        if values.len() < timestamps.len() {
            warn!(
                values = values.len(),
                timestamps = timestamps.len(),
                "Fewer values than timestamps; series cannot be aligned"
            );
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longer_values_are_truncated_to_time_axis() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let times = [10.0, 11.0, 12.0];
        assert_eq!(align_values_to_time(&values, &times), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_shorter_values_are_returned_unchanged() {
        let values = [1.0, 2.0];
        let times = [10.0, 11.0, 12.0];
        let aligned = align_values_to_time(&values, &times);
        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned, &[1.0, 2.0]);
    }

    #[test]
    fn test_equal_lengths_and_empty_axis() {
        let values = [1.0, 2.0];
        assert_eq!(align_values_to_time(&values, &[0u8, 1u8]), &values);
        assert!(align_values_to_time(&values, &[] as &[u8]).is_empty());
    }
}
