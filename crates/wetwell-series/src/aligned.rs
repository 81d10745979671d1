//! Alignment of two series onto the union of their timestamp axes.

use chrono::NaiveDateTime;
use tracing::{debug, instrument};

use crate::error::SeriesError;
use crate::series::MeasurementSeries;

/// A series reindexed onto a shared timestamp axis.
///
/// Positions present in the axis but absent from the original series are
/// explicit gaps (`None`). No value is ever fabricated by alignment itself;
/// gaps are closed only by the imputation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    timestamps: Vec<NaiveDateTime>,
    values: Vec<Option<f64>>,
}

impl AlignedSeries {
    /// Create an aligned series from axis and value columns, validating the
    /// axis ordering and the finiteness of every known value.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::LengthMismatch`] | Columns differ in length |
    /// | [`SeriesError::EmptyInput`] | Columns are empty |
    /// | [`SeriesError::UnorderedTimestamps`] | Axis is not strictly increasing |
    /// | [`SeriesError::NonFiniteValue`] | A known value is NaN or infinite |
    pub fn new(
        timestamps: Vec<NaiveDateTime>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, SeriesError> {
        if timestamps.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                n_timestamps: timestamps.len(),
                n_values: values.len(),
            });
        }
        if timestamps.is_empty() {
            return Err(SeriesError::EmptyInput);
        }
        if let Some(index) = (1..timestamps.len()).find(|&i| timestamps[i] <= timestamps[i - 1]) {
            return Err(SeriesError::UnorderedTimestamps { index });
        }
        if let Some(index) = values
            .iter()
            .position(|v| v.is_some_and(|v| !v.is_finite()))
        {
            return Err(SeriesError::NonFiniteValue { index });
        }
        Ok(Self { timestamps, values })
    }

    /// Return the shared timestamp axis.
    #[must_use]
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Return the value column; `None` marks a gap.
    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Return the axis length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Return true if the axis has no positions.
    ///
    /// An [`AlignedSeries`] constructed via [`AlignedSeries::new`] or
    /// [`align`] is always non-empty; provided to satisfy the
    /// `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Positions of the gaps, in ascending order.
    #[must_use]
    pub fn gap_indices(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.is_none().then_some(i))
            .collect()
    }

    /// Positions carrying a value, in ascending order.
    #[must_use]
    pub fn known_indices(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.is_some().then_some(i))
            .collect()
    }

    /// Rebuild this series with a new value column over the same axis.
    ///
    /// # Errors
    ///
    /// Same conditions as [`AlignedSeries::new`].
    pub fn with_values(&self, values: Vec<Option<f64>>) -> Result<Self, SeriesError> {
        Self::new(self.timestamps.clone(), values)
    }

    /// Drop the gaps and return the known samples as a validated series.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::EmptyInput`] | Every position is a gap |
    pub fn to_measurement_series(&self) -> Result<MeasurementSeries, SeriesError> {
        let mut timestamps = Vec::new();
        let mut values = Vec::new();
        for (t, v) in self.timestamps.iter().zip(&self.values) {
            if let Some(v) = v {
                timestamps.push(*t);
                values.push(*v);
            }
        }
        MeasurementSeries::new(timestamps, values)
    }
}

/// Reindex two series onto the sorted union of their timestamp sets.
///
/// Both outputs share one identical, strictly increasing axis of length
/// |union|. Original values are preserved at matching positions; positions
/// present in only one series appear as gaps in the other.
#[must_use = "returns new aligned series; the originals are unchanged"]
#[instrument(skip_all, fields(n_a = a.len(), n_b = b.len()))]
pub fn align(a: &MeasurementSeries, b: &MeasurementSeries) -> (AlignedSeries, AlignedSeries) {
    let ta = a.timestamps();
    let tb = b.timestamps();

    // Sorted union of both axes, single merge pass.
    let mut axis = Vec::with_capacity(ta.len() + tb.len());
    let (mut i, mut j) = (0, 0);
    while i < ta.len() && j < tb.len() {
        if ta[i] < tb[j] {
            axis.push(ta[i]);
            i += 1;
        } else if tb[j] < ta[i] {
            axis.push(tb[j]);
            j += 1;
        } else {
            axis.push(ta[i]);
            i += 1;
            j += 1;
        }
    }
    axis.extend_from_slice(&ta[i..]);
    axis.extend_from_slice(&tb[j..]);

    debug!(n_union = axis.len(), "merged timestamp axes");

    let reindex = |series: &MeasurementSeries| {
        let ts = series.timestamps();
        let vs = series.values();
        let mut k = 0;
        let values: Vec<Option<f64>> = axis
            .iter()
            .map(|t| {
                if k < ts.len() && ts[k] == *t {
                    let v = vs[k];
                    k += 1;
                    Some(v)
                } else {
                    None
                }
            })
            .collect();
        AlignedSeries {
            timestamps: axis.clone(),
            values,
        }
    };

    (reindex(a), reindex(b))
}
