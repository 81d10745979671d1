//! Prominence-filtered detection of local maxima and minima.

/// Indices of local maxima whose prominence meets `min_prominence`.
///
/// A candidate is a strict local maximum (`v[i-1] < v[i] > v[i+1]`); its
/// prominence is its height above the higher of the two valley minima
/// flanking it, where each valley extends until the signal reaches the
/// candidate's height again or the series ends.
#[must_use]
pub fn find_peaks(values: &[f64], min_prominence: f64) -> Vec<usize> {
    let n = values.len();
    if n < 3 {
        return Vec::new();
    }
    (1..n - 1)
        .filter(|&i| values[i - 1] < values[i] && values[i] > values[i + 1])
        .filter(|&i| prominence(values, i) >= min_prominence)
        .collect()
}

/// Indices of local minima whose prominence meets `min_prominence`.
///
/// A minimum of the signal is a maximum of its negation.
#[must_use]
pub fn find_troughs(values: &[f64], min_prominence: f64) -> Vec<usize> {
    let negated: Vec<f64> = values.iter().map(|v| -v).collect();
    find_peaks(&negated, min_prominence)
}

/// Height of a peak above its surrounding valleys.
fn prominence(values: &[f64], peak: usize) -> f64 {
    let peak_val = values[peak];

    let mut left_min = peak_val;
    for i in (0..peak).rev() {
        if values[i] >= peak_val {
            break;
        }
        left_min = left_min.min(values[i]);
    }

    let mut right_min = peak_val;
    for &v in &values[peak + 1..] {
        if v >= peak_val {
            break;
        }
        right_min = right_min.min(v);
    }

    peak_val - left_min.max(right_min)
}
