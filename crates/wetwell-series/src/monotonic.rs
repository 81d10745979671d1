//! Windowed monotonicity classification with a noise-tolerance budget.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::instrument;

use crate::error::SeriesError;
use crate::series::MeasurementSeries;

/// Local trend of one sample within its centered window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Monotonicity {
    /// The window is rising (up to `epsilon` tolerated down-steps).
    Increasing,
    /// The window is falling (up to `epsilon` tolerated up-steps).
    Decreasing,
    /// Neither direction dominates; the sample sits around a turning point.
    Extremum,
}

/// Classify each sample's local trend from a centered window of
/// `2 * horizon + 1` points.
///
/// For an interior sample, the window's `2 * horizon` first differences are
/// split into non-negative (`pos`) and negative (`neg`) counts. With
/// `budget = 2 * horizon - epsilon`: `neg >= budget` wins first
/// (Decreasing), then `pos >= budget` (Increasing), else Extremum. `epsilon`
/// is the number of opposite-direction steps tolerated inside an otherwise
/// monotone window.
///
/// Boundary policy: the first and last `horizon` samples cannot form a full
/// window and are always labeled [`Monotonicity::Extremum`]. Windows are
/// never truncated, so `epsilon` keeps the same meaning at every position.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SeriesError::EmptyInput`] | `values` is empty |
/// | [`SeriesError::InvalidWindow`] | `horizon` is zero, or `2 * horizon >= values.len()` |
pub fn classify_monotonicity(
    values: &[f64],
    horizon: usize,
    epsilon: usize,
) -> Result<Vec<Monotonicity>, SeriesError> {
    if values.is_empty() {
        return Err(SeriesError::EmptyInput);
    }
    let needed = 2 * horizon + 1;
    if horizon == 0 || 2 * horizon >= values.len() {
        return Err(SeriesError::InvalidWindow {
            horizon,
            needed,
            len: values.len(),
        });
    }

    let n_diffs = 2 * horizon;
    let budget = n_diffs.saturating_sub(epsilon);

    let mut labels = vec![Monotonicity::Extremum; values.len()];
    for k in horizon..values.len() - horizon {
        let window = &values[k - horizon..=k + horizon];
        let pos = window
            .windows(2)
            .filter(|pair| pair[1] - pair[0] >= 0.0)
            .count();
        let neg = n_diffs - pos;

        labels[k] = if neg >= budget {
            Monotonicity::Decreasing
        } else if pos >= budget {
            Monotonicity::Increasing
        } else {
            Monotonicity::Extremum
        };
    }
    Ok(labels)
}

/// A measurement series annotated with per-sample monotonicity labels.
///
/// Columns are parallel: `timestamps()[i]` carries `values()[i]` with
/// `labels()[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledSeries {
    timestamps: Vec<NaiveDateTime>,
    values: Vec<f64>,
    labels: Vec<Monotonicity>,
}

impl LabeledSeries {
    /// Return the timestamp column.
    #[must_use]
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Return the value column.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Return the label column.
    #[must_use]
    pub fn labels(&self) -> &[Monotonicity] {
        &self.labels
    }

    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Return true if the series has no samples. Always `false` for
    /// instances produced by [`label_series`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Annotate a cleaned series with monotonicity labels.
///
/// # Errors
///
/// Same conditions as [`classify_monotonicity`].
#[instrument(skip(series), fields(n = series.len()))]
pub fn label_series(
    series: &MeasurementSeries,
    horizon: usize,
    epsilon: usize,
) -> Result<LabeledSeries, SeriesError> {
    let labels = classify_monotonicity(series.values(), horizon, epsilon)?;
    Ok(LabeledSeries {
        timestamps: series.timestamps().to_vec(),
        values: series.values().to_vec(),
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_an_error() {
        let result = classify_monotonicity(&[], 1, 0);
        assert!(matches!(result, Err(SeriesError::EmptyInput)));
    }

    #[test]
    fn horizon_too_large_is_invalid_window() {
        let result = classify_monotonicity(&[1.0, 2.0, 3.0, 4.0], 2, 0);
        assert!(matches!(
            result,
            Err(SeriesError::InvalidWindow {
                horizon: 2,
                needed: 5,
                len: 4
            })
        ));
    }

    #[test]
    fn zero_horizon_is_invalid_window() {
        let result = classify_monotonicity(&[1.0, 2.0, 3.0], 0, 0);
        assert!(matches!(result, Err(SeriesError::InvalidWindow { .. })));
    }

    #[test]
    fn strictly_increasing_window_is_increasing() {
        let labels = classify_monotonicity(&[1.0, 2.0, 3.0, 4.0, 5.0], 1, 0).unwrap();
        assert_eq!(labels[1], Monotonicity::Increasing);
        assert_eq!(labels[2], Monotonicity::Increasing);
        assert_eq!(labels[3], Monotonicity::Increasing);
    }

    #[test]
    fn strictly_decreasing_window_is_decreasing() {
        let labels = classify_monotonicity(&[5.0, 4.0, 3.0, 2.0, 1.0], 1, 0).unwrap();
        assert_eq!(labels[2], Monotonicity::Decreasing);
    }

    #[test]
    fn one_violation_flips_strict_classification() {
        // Window around index 2 (horizon 2): [1, 2, 3, 2.5, 4] has one
        // negative difference; with epsilon = 0 it is no longer Increasing.
        let values = [1.0, 2.0, 3.0, 2.5, 4.0];
        let strict = classify_monotonicity(&values, 2, 0).unwrap();
        assert_ne!(strict[2], Monotonicity::Increasing);

        // With epsilon = 1 the single violation is tolerated.
        let tolerant = classify_monotonicity(&values, 2, 1).unwrap();
        assert_eq!(tolerant[2], Monotonicity::Increasing);
    }

    #[test]
    fn turning_point_is_extremum() {
        let labels = classify_monotonicity(&[1.0, 3.0, 5.0, 3.0, 1.0], 2, 0).unwrap();
        assert_eq!(labels[2], Monotonicity::Extremum);
    }

    #[test]
    fn boundary_samples_are_extremum() {
        let labels = classify_monotonicity(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 0).unwrap();
        assert_eq!(labels[0], Monotonicity::Extremum);
        assert_eq!(labels[1], Monotonicity::Extremum);
        assert_eq!(labels[4], Monotonicity::Extremum);
        assert_eq!(labels[5], Monotonicity::Extremum);
        // Interior samples keep their true classification.
        assert_eq!(labels[2], Monotonicity::Increasing);
        assert_eq!(labels[3], Monotonicity::Increasing);
    }

    #[test]
    fn flat_window_counts_as_increasing() {
        // Zero differences are non-negative, matching the source convention.
        let labels = classify_monotonicity(&[2.0, 2.0, 2.0, 2.0, 2.0], 1, 0).unwrap();
        assert_eq!(labels[2], Monotonicity::Increasing);
    }

    #[test]
    fn oversized_epsilon_defaults_to_decreasing() {
        // With epsilon >= 2 * horizon both counts meet the budget; the
        // negative check wins, as in the source ordering.
        let labels = classify_monotonicity(&[1.0, 2.0, 3.0, 4.0, 5.0], 1, 5).unwrap();
        assert_eq!(labels[2], Monotonicity::Decreasing);
    }

    #[test]
    fn label_series_carries_columns() {
        use chrono::NaiveDate;
        let timestamps: Vec<_> = (0..5)
            .map(|h| {
                NaiveDate::from_ymd_opt(2017, 1, 1)
                    .unwrap()
                    .and_hms_opt(h, 0, 0)
                    .unwrap()
            })
            .collect();
        let series =
            MeasurementSeries::new(timestamps, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let labeled = label_series(&series, 1, 0).unwrap();
        assert_eq!(labeled.len(), 5);
        assert_eq!(labeled.values(), series.values());
        assert_eq!(labeled.labels()[2], Monotonicity::Increasing);
    }
}
