//! Segmentation of a flow series into pump-on runs.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, instrument};
use wetwell_series::MeasurementSeries;

/// One pump-on run: a maximal contiguous nonzero stretch of the flow series
/// preceded by an exactly-zero sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowEpisode {
    /// Episode id, assigned 1, 2, ... in time order. Zero-flow samples carry
    /// no episode.
    pub id: usize,
    /// Timestamp of the run's first nonzero sample.
    pub start: NaiveDateTime,
    /// Timestamp of the run's last nonzero sample.
    pub end: NaiveDateTime,
    /// `end - start`, in seconds.
    pub duration_seconds: f64,
    /// Highest flow rate inside the run.
    pub peak_rate: f64,
    /// Timestamp of the peak rate (first occurrence on ties). This is the
    /// run's representative timestamp for cross-linking.
    pub peak_timestamp: NaiveDateTime,
    /// Total pumped volume: `rate * Δt_seconds / 3600` summed over the run's
    /// samples, including the entry interval from the preceding zero sample.
    pub volume: f64,
    /// Number of nonzero samples in the run.
    pub n_samples: usize,
}

/// Partition a flow series into pump-on runs.
///
/// A run opens at every transition from an exactly-zero sample to a nonzero
/// one and closes before the next zero. A series that starts mid-run has no
/// opening transition, so its leading nonzero stretch carries no episode.
#[must_use]
#[instrument(skip(series), fields(n = series.len()))]
pub fn segment_flow(series: &MeasurementSeries) -> Vec<FlowEpisode> {
    let values = series.values();
    let timestamps = series.timestamps();
    let volumes = series.interval_volumes();

    let mut episodes = Vec::new();
    let mut i = 1;
    while i < values.len() {
        if values[i] == 0.0 || values[i - 1] != 0.0 {
            i += 1;
            continue;
        }
        let start = i;
        let mut end = i;
        while end + 1 < values.len() && values[end + 1] != 0.0 {
            end += 1;
        }

        let mut peak = start;
        let mut volume = 0.0;
        for k in start..=end {
            volume += volumes[k];
            if values[k] > values[peak] {
                peak = k;
            }
        }

        episodes.push(FlowEpisode {
            id: episodes.len() + 1,
            start: timestamps[start],
            end: timestamps[end],
            duration_seconds: (timestamps[end] - timestamps[start]).num_seconds() as f64,
            peak_rate: values[peak],
            peak_timestamp: timestamps[peak],
            volume,
            n_samples: end - start + 1,
        });
        i = end + 1;
    }

    debug!(n_episodes = episodes.len(), "flow segmentation complete");
    episodes
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2017, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn hourly(values: &[f64]) -> MeasurementSeries {
        MeasurementSeries::new(
            (0..values.len() as u32).map(ts).collect(),
            values.to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn two_runs_with_expected_totals() {
        let series = hourly(&[0.0, 0.0, 5.0, 5.0, 5.0, 0.0, 0.0, 3.0, 3.0, 0.0]);
        let episodes = segment_flow(&series);
        assert_eq!(episodes.len(), 2);

        assert_eq!(episodes[0].id, 1);
        assert_eq!(episodes[0].n_samples, 3);
        assert!((episodes[0].volume - 15.0).abs() < 1e-10);
        assert_eq!(episodes[0].start, ts(2));
        assert_eq!(episodes[0].end, ts(4));

        assert_eq!(episodes[1].id, 2);
        assert_eq!(episodes[1].n_samples, 2);
        assert!((episodes[1].volume - 6.0).abs() < 1e-10);
    }

    #[test]
    fn all_zero_series_has_no_episodes() {
        let series = hourly(&[0.0, 0.0, 0.0]);
        assert!(segment_flow(&series).is_empty());
    }

    #[test]
    fn leading_run_carries_no_episode() {
        // No zero precedes the first run, so only the second one counts.
        let series = hourly(&[4.0, 4.0, 0.0, 2.0, 0.0]);
        let episodes = segment_flow(&series);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].start, ts(3));
    }

    #[test]
    fn run_reaching_series_end_is_closed() {
        let series = hourly(&[0.0, 7.0, 7.0]);
        let episodes = segment_flow(&series);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].end, ts(2));
        assert!((episodes[0].volume - 14.0).abs() < 1e-10);
    }

    #[test]
    fn peak_is_first_maximum() {
        let series = hourly(&[0.0, 2.0, 6.0, 6.0, 1.0, 0.0]);
        let episodes = segment_flow(&series);
        assert_eq!(episodes.len(), 1);
        assert!((episodes[0].peak_rate - 6.0).abs() < f64::EPSILON);
        assert_eq!(episodes[0].peak_timestamp, ts(2));
    }

    #[test]
    fn duration_spans_first_to_last_sample() {
        let series = hourly(&[0.0, 1.0, 1.0, 1.0, 0.0]);
        let episodes = segment_flow(&series);
        assert!((episodes[0].duration_seconds - 7200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn uneven_sampling_weights_volume_by_elapsed_time() {
        // 30-minute entry interval, then 1-hour and 2-hour intervals inside
        // the run.
        let half_past = NaiveDate::from_ymd_opt(2016, 12, 31)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        let series = MeasurementSeries::new(
            vec![half_past, ts(0), ts(1), ts(3)],
            vec![0.0, 6.0, 6.0, 6.0],
        )
        .unwrap();
        let episodes = segment_flow(&series);
        // 6 * (1800 + 3600 + 7200) / 3600 = 21
        assert!((episodes[0].volume - 21.0).abs() < 1e-10);
    }
}
