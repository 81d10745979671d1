//! Validated measurement series with cleaning guarantees.

use chrono::NaiveDateTime;
use tracing::{debug, instrument};

use crate::error::SeriesError;
use crate::reading::Reading;

/// Owned, validated measurement series for one physical quantity at one site.
///
/// Invariants: non-empty, timestamps strictly increasing, all values finite.
/// Timestamps and values are stored as parallel columns — `timestamps()[i]`
/// carries `values()[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSeries {
    timestamps: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl MeasurementSeries {
    /// Create a series from pre-cleaned columns, validating every invariant.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::LengthMismatch`] | Columns differ in length |
    /// | [`SeriesError::EmptyInput`] | Columns are empty |
    /// | [`SeriesError::UnorderedTimestamps`] | Timestamps are not strictly increasing |
    /// | [`SeriesError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(
        timestamps: Vec<NaiveDateTime>,
        values: Vec<f64>,
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
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(SeriesError::NonFiniteValue { index });
        }
        Ok(Self { timestamps, values })
    }

    /// Clean a batch of raw readings into a validated series.
    ///
    /// Drops quality-rejected readings, sorts by timestamp, and keeps the
    /// first occurrence of each duplicate timestamp (first after the sort,
    /// which for equal keys preserves arrival order). Deterministic and
    /// idempotent: cleaning an already-clean batch changes nothing.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::EmptyInput`] | No reading survives the quality filter |
    /// | [`SeriesError::NonFiniteValue`] | A surviving value is NaN or infinite |
    #[instrument(skip_all, fields(n_raw = readings.len()))]
    pub fn clean(readings: Vec<Reading>) -> Result<Self, SeriesError> {
        let mut kept: Vec<Reading> = readings
            .into_iter()
            .filter(|r| r.quality.is_good())
            .collect();
        kept.sort_by_key(|r| r.timestamp);
        kept.dedup_by_key(|r| r.timestamp);

        if kept.is_empty() {
            return Err(SeriesError::EmptyInput);
        }
        debug!(n_kept = kept.len(), "cleaned raw readings");

        let timestamps: Vec<NaiveDateTime> = kept.iter().map(|r| r.timestamp).collect();
        let values: Vec<f64> = kept.iter().map(|r| r.value).collect();
        Self::new(timestamps, values)
    }

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

    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Return true if the series has no samples.
    ///
    /// A [`MeasurementSeries`] constructed via [`MeasurementSeries::new`] or
    /// [`MeasurementSeries::clean`] is always non-empty, so this always
    /// returns `false` for valid instances. Provided to satisfy the
    /// `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Per-sample elapsed seconds since the preceding sample.
    ///
    /// The first sample has no preceding interval and reports `0.0`.
    #[must_use]
    pub fn elapsed_seconds(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.len());
        out.push(0.0);
        for i in 1..self.len() {
            out.push((self.timestamps[i] - self.timestamps[i - 1]).num_seconds() as f64);
        }
        out
    }

    /// Per-interval volume: `value[i] * elapsed_seconds[i] / 3600`.
    ///
    /// This is the rate/quantity conversion used everywhere a volume
    /// aggregate is computed; the first sample contributes `0.0`.
    #[must_use]
    pub fn interval_volumes(&self) -> Vec<f64> {
        self.elapsed_seconds()
            .iter()
            .zip(&self.values)
            .map(|(dt, v)| v * dt / 3600.0)
            .collect()
    }

    /// Consume and return the underlying columns.
    #[must_use]
    pub fn into_columns(self) -> (Vec<NaiveDateTime>, Vec<f64>) {
        (self.timestamps, self.values)
    }
}
