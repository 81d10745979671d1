//! Error types for the imputation layer.

use wetwell_series::SeriesError;

/// Structural errors from imputation.
///
/// Per-point fill failures are not errors — they surface as
/// [`FillOutcome`](crate::FillOutcome) values so one bad gap never aborts
/// the batch.
#[derive(Debug, thiserror::Error)]
pub enum ImputeError {
    /// Returned when the flow and level series are not reindexed onto one
    /// shared timestamp axis.
    #[error("flow and level series do not share one timestamp axis (diverging at position {index})")]
    AxisMismatch {
        /// First axis position where the two series diverge.
        index: usize,
    },

    /// Wraps a series-level error (empty input, window too large for the
    /// level history, invalid quantile level).
    #[error("series error during imputation: {0}")]
    Series(#[from] SeriesError),
}
