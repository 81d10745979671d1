//! Measurement series primitives for pump-station telemetry.
//!
//! Pure in-memory library — zero I/O. Provides validated `(timestamp, value)`
//! series with cleaning guarantees, outer-join alignment onto a shared
//! timestamp axis, the cumulative reset counter, the two-pointer gap locator,
//! windowed monotonicity classification, and the descriptive statistics the
//! imputation and dry-weather layers share.

mod aligned;
mod bracket;
mod counter;
mod error;
mod monotonic;
mod reading;
mod series;
mod stats;

pub use aligned::{align, AlignedSeries};
pub use bracket::{locate_brackets, Bracket};
pub use counter::{reset_cumsum, ResetMode};
pub use error::SeriesError;
pub use monotonic::{classify_monotonicity, label_series, LabeledSeries, Monotonicity};
pub use reading::{Quality, Reading};
pub use series::MeasurementSeries;
pub use stats::{mean, quantile, sample_std};
