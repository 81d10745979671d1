//! Error types for series validation and the scan primitives.

/// Errors from measurement series construction and the series-level scans.
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    /// Returned when an operation requires at least one sample and got none.
    #[error("series must be non-empty")]
    EmptyInput,

    /// Returned when a series contains NaN, infinity, or negative infinity.
    #[error("series contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value found.
        index: usize,
    },

    /// Returned when timestamp and value columns have different lengths.
    #[error("timestamp and value columns differ in length: {n_timestamps} vs {n_values}")]
    LengthMismatch {
        /// Number of timestamps supplied.
        n_timestamps: usize,
        /// Number of values supplied.
        n_values: usize,
    },

    /// Returned when a timestamp axis is not strictly increasing.
    #[error("timestamps must be strictly increasing: violation at index {index}")]
    UnorderedTimestamps {
        /// Index of the first sample whose timestamp does not exceed its predecessor's.
        index: usize,
    },

    /// Returned when a position sequence handed to the gap locator is not
    /// strictly ascending.
    #[error("positions must be strictly ascending: violation at index {index}")]
    UnsortedInput {
        /// Index of the first out-of-order position.
        index: usize,
    },

    /// Returned when a classification window does not fit inside the series.
    #[error("classification window does not fit: horizon {horizon} requires more than {needed} points, series has {len}")]
    InvalidWindow {
        /// The requested half-window size.
        horizon: usize,
        /// Points required for at least one full centered window (`2 * horizon + 1`).
        needed: usize,
        /// Actual series length.
        len: usize,
    },

    /// Returned when a quantile level is outside `[0, 1]`.
    #[error("quantile level must lie in [0, 1], got {q}")]
    InvalidQuantile {
        /// The offending level.
        q: f64,
    },
}
