//! Descriptive statistics shared by the imputation and aggregation layers.

use crate::error::SeriesError;

/// Arithmetic mean.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SeriesError::EmptyInput`] | `values` is empty |
pub fn mean(values: &[f64]) -> Result<f64, SeriesError> {
    if values.is_empty() {
        return Err(SeriesError::EmptyInput);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n − 1 denominator).
///
/// A single observation has no dispersion and reports `0.0`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SeriesError::EmptyInput`] | `values` is empty |
pub fn sample_std(values: &[f64]) -> Result<f64, SeriesError> {
    let m = mean(values)?;
    let n = values.len();
    if n < 2 {
        return Ok(0.0);
    }
    let ss: f64 = values.iter().map(|&v| (v - m).powi(2)).sum();
    Ok((ss / (n - 1) as f64).sqrt())
}

/// Linear-interpolation quantile at level `q` in `[0, 1]`.
///
/// Sorts a copy of the input and interpolates between the two order
/// statistics flanking rank `(n - 1) * q`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SeriesError::EmptyInput`] | `values` is empty |
/// | [`SeriesError::InvalidQuantile`] | `q` outside `[0, 1]` or non-finite |
pub fn quantile(values: &[f64], q: f64) -> Result<f64, SeriesError> {
    if values.is_empty() {
        return Err(SeriesError::EmptyInput);
    }
    if !q.is_finite() || !(0.0..=1.0).contains(&q) {
        return Err(SeriesError::InvalidQuantile { q });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (sorted.len() - 1) as f64 * q;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Ok(sorted[lo]);
    }
    let frac = rank - lo as f64;
    Ok(sorted[lo] * (1.0 - frac) + sorted[hi] * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_an_error() {
        assert!(matches!(mean(&[]), Err(SeriesError::EmptyInput)));
    }

    #[test]
    fn mean_simple() {
        assert!((mean(&[1.0, 2.0, 3.0]).unwrap() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn sample_std_single_value_is_zero() {
        assert!((sample_std(&[7.0]).unwrap() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sample_std_hand_computed() {
        // [2, 4, 4, 4, 5, 5, 7, 9]: sum of squares 32, n-1 = 7.
        let s = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((s - (32.0_f64 / 7.0).sqrt()).abs() < 1e-10);
    }

    #[test]
    fn quantile_endpoints_are_min_and_max() {
        let values = [3.0, 1.0, 4.0, 1.5, 9.0];
        assert!((quantile(&values, 0.0).unwrap() - 1.0).abs() < 1e-10);
        assert!((quantile(&values, 1.0).unwrap() - 9.0).abs() < 1e-10);
    }

    #[test]
    fn quantile_median_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&values, 0.5).unwrap() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn quantile_q20_interpolates() {
        // rank = 4 * 0.2 = 0.8 between sorted[0]=10 and sorted[1]=20.
        let values = [50.0, 40.0, 30.0, 20.0, 10.0];
        assert!((quantile(&values, 0.2).unwrap() - 18.0).abs() < 1e-10);
    }

    #[test]
    fn quantile_rejects_out_of_range() {
        let result = quantile(&[1.0], 1.5);
        assert!(matches!(result, Err(SeriesError::InvalidQuantile { .. })));
        let result = quantile(&[1.0], f64::NAN);
        assert!(matches!(result, Err(SeriesError::InvalidQuantile { .. })));
    }
}
