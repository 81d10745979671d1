//! Cumulative scan with reset at qualifying events.

use crate::error::SeriesError;

/// Accumulation mode for [`reset_cumsum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    /// Count steps since the last qualifying event (1, 2, 3, ...).
    Count,
    /// Sum the input values since the last qualifying event.
    Sum,
}

/// Running "since last qualifying event" scan.
///
/// Position 0 is always 0. At each later position, a value at or above
/// `threshold` resets the running value to 0; otherwise the running value
/// advances by one step ([`ResetMode::Count`]) or by the input value
/// ([`ResetMode::Sum`]).
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SeriesError::EmptyInput`] | `series` is empty |
pub fn reset_cumsum(
    series: &[f64],
    threshold: f64,
    mode: ResetMode,
) -> Result<Vec<f64>, SeriesError> {
    if series.is_empty() {
        return Err(SeriesError::EmptyInput);
    }

    let mut out = Vec::with_capacity(series.len());
    out.push(0.0);
    let mut running = 0.0;
    for &v in &series[1..] {
        if v >= threshold {
            running = 0.0;
        } else {
            running = match mode {
                ResetMode::Count => running + 1.0,
                ResetMode::Sum => running + v,
            };
        }
        out.push(running);
    }
    Ok(out)
}
