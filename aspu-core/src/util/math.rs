//! Small numeric helpers shared by the statistic and calibration code.

/// Compute the sign of a number: -1, 0, or 1.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Largest absolute value; 0 for an empty iterator. Any NaN input makes
/// the result NaN (`f64::max` would silently skip it).
pub fn max_abs<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().fold(0.0, |acc, v| {
        if acc.is_nan() || v.is_nan() {
            f64::NAN
        } else {
            acc.max(v.abs())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign() {
        assert_eq!(sign(3.2), 1.0);
        assert_eq!(sign(-0.1), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[1.0, 2.0, 6.0]) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_max_abs() {
        assert_eq!(max_abs(vec![1.0, -4.0, 3.0]), 4.0);
        assert_eq!(max_abs(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn test_max_abs_propagates_nan() {
        assert!(max_abs(vec![f64::NAN, 2.0]).is_nan());
        assert!(max_abs(vec![2.0, f64::NAN, -5.0]).is_nan());
    }
}
