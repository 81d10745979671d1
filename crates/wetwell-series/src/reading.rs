//! Raw measurement records as delivered by the loading layer.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Data-quality flag attached to a raw reading by the telemetry system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quality {
    /// Reading passed the telemetry system's plausibility checks.
    Good,
    /// Reading was delivered but flagged as questionable.
    Suspect,
    /// Reading is known to be wrong (sensor fault, maintenance, backfill).
    Invalid,
}

impl Quality {
    /// Return true if readings with this flag survive cleaning.
    #[must_use]
    pub fn is_good(self) -> bool {
        matches!(self, Quality::Good)
    }
}

/// One raw `(timestamp, value, quality)` record for a single sensor.
///
/// Readings arrive from the loading layer in whatever order and state the
/// source files had: possibly unsorted, with duplicate timestamps and
/// quality-rejected rows. [`MeasurementSeries::clean`] turns a batch of them
/// into a validated series.
///
/// [`MeasurementSeries::clean`]: crate::MeasurementSeries::clean
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    /// Sample timestamp (plant-local, naive).
    pub timestamp: NaiveDateTime,
    /// Measured value (flow rate or level, unit chosen by the caller).
    pub value: f64,
    /// Telemetry quality flag.
    pub quality: Quality,
}

impl Reading {
    /// Construct a reading with the [`Quality::Good`] flag.
    #[must_use]
    pub fn good(timestamp: NaiveDateTime, value: f64) -> Self {
        Self {
            timestamp,
            value,
            quality: Quality::Good,
        }
    }
}
