//! Segmentation of a level series into drain cycles.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, instrument};
use wetwell_series::MeasurementSeries;

use crate::peaks::{find_peaks, find_troughs};

/// One drain cycle: the span from a detected level maximum to the first
/// detected minimum after it, both inclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelEpisode {
    /// Episode id, assigned 1, 2, ... in time order.
    pub id: usize,
    /// Timestamp of the detected maximum. This is the cycle's representative
    /// timestamp for cross-linking.
    pub start: NaiveDateTime,
    /// Timestamp of the paired minimum.
    pub end: NaiveDateTime,
    /// `end - start`, in seconds.
    pub duration_seconds: f64,
    /// Highest level inside the span.
    pub peak_level: f64,
    /// Lowest level inside the span.
    pub trough_level: f64,
    /// `trough_level - peak_level`; negative while the well drains.
    pub delta: f64,
    /// `delta / duration_seconds`.
    pub drop_rate: f64,
    /// Rise since the previous cycle's trough: `peak_level -
    /// trough_level(previous)`. `None` for the first cycle.
    pub prior_increase: Option<f64>,
    /// Elapsed seconds of that rise: from the previous cycle's end to this
    /// cycle's start. `None` for the first cycle.
    pub prior_increase_seconds: Option<f64>,
}

/// Partition a level series into drain cycles via prominence-filtered peak
/// detection.
///
/// Each detected maximum pairs with the first detected minimum after it. A
/// maximum with no following minimum is dropped; when consecutive maxima
/// share one minimum (a sub-prominence saddle between them), the later
/// maximum wins and the earlier candidate cycle is discarded.
#[must_use]
#[instrument(skip(series), fields(n = series.len(), min_prominence = min_prominence))]
pub fn segment_level(series: &MeasurementSeries, min_prominence: f64) -> Vec<LevelEpisode> {
    let values = series.values();
    let timestamps = series.timestamps();

    let maxima = find_peaks(values, min_prominence);
    let minima = find_troughs(values, min_prominence);

    // Pair each maximum with the first minimum after it; later maxima
    // overwrite earlier ones that claim the same minimum.
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    let mut mi = 0;
    for &mx in &maxima {
        while mi < minima.len() && minima[mi] <= mx {
            mi += 1;
        }
        if mi == minima.len() {
            break;
        }
        let mn = minima[mi];
        match pairs.last_mut() {
            Some(last) if last.1 == mn => *last = (mx, mn),
            _ => pairs.push((mx, mn)),
        }
    }

    let mut episodes: Vec<LevelEpisode> = Vec::with_capacity(pairs.len());
    for (id, &(mx, mn)) in pairs.iter().enumerate() {
        let span = &values[mx..=mn];
        let peak_level = span.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let trough_level = span.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let duration_seconds = (timestamps[mn] - timestamps[mx]).num_seconds() as f64;
        let delta = trough_level - peak_level;

        let (prior_increase, prior_increase_seconds) = match episodes.last() {
            Some(prev) => (
                Some(peak_level - prev.trough_level),
                Some((timestamps[mx] - prev.end).num_seconds() as f64),
            ),
            None => (None, None),
        };

        episodes.push(LevelEpisode {
            id: id + 1,
            start: timestamps[mx],
            end: timestamps[mn],
            duration_seconds,
            peak_level,
            trough_level,
            delta,
            drop_rate: delta / duration_seconds,
            prior_increase,
            prior_increase_seconds,
        });
    }

    debug!(
        n_maxima = maxima.len(),
        n_minima = minima.len(),
        n_episodes = episodes.len(),
        "level segmentation complete"
    );
    episodes
}
