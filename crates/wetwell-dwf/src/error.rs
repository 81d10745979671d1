//! Error types for dry-weather-flow analysis.

use wetwell_series::SeriesError;

/// Errors from rainfall summarization and DWF table construction.
#[derive(Debug, thiserror::Error)]
pub enum DwfError {
    /// Returned when no rainfall observation carries a reading for any
    /// selected zone.
    #[error("no rainfall observation matched the selected zones")]
    NoMatchingZones,

    /// Returned when no calendar day satisfies the consecutive-dry-days
    /// requirement, leaving the baseline undefined.
    #[error("no day meets the minimum dry-series requirement of {min_dry_series} days")]
    NoDryDays {
        /// The requirement that no day met.
        min_dry_series: u32,
    },

    /// Wraps a series-level error (empty input, invalid quantile level).
    #[error("series error during dry-weather analysis: {0}")]
    Series(#[from] SeriesError),
}
