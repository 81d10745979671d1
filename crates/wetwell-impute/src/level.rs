//! Time-weighted linear interpolation of missing level readings.

use tracing::{debug, instrument};
use wetwell_series::{locate_brackets, AlignedSeries};

/// Fill interior gaps in an aligned level series by linear time
/// interpolation between the bracketing known samples.
///
/// For a gap at time `t` bracketed by known samples at `t_prior < t <
/// t_post`, the filled value is
/// `(v_prior * (t_post - t) + v_post * (t - t_prior)) / (t_post - t_prior)`,
/// with all times in elapsed seconds. A gap missing either bracket (the
/// series starts or ends with missing data) stays missing; no fill value is
/// guessed there.
///
/// The input is never mutated; a new series over the same axis is returned.
#[must_use = "returns a new filled series; the original is unchanged"]
#[instrument(skip(series), fields(n = series.len()))]
pub fn fill_level(series: &AlignedSeries) -> AlignedSeries {
    let gaps = series.gap_indices();
    let known = series.known_indices();
    let brackets = locate_brackets(&gaps, &known)
        .expect("gap and known indices are ascending by construction");

    let start = series.timestamps()[0];
    let secs: Vec<f64> = series
        .timestamps()
        .iter()
        .map(|&t| (t - start).num_seconds() as f64)
        .collect();

    let mut values = series.values().to_vec();
    let mut n_filled = 0usize;
    for (&gap, bracket) in gaps.iter().zip(&brackets) {
        let (Some(prior), Some(posterior)) = (bracket.prior, bracket.posterior) else {
            continue; // boundary gap, stays missing
        };
        if let (Some(v_prior), Some(v_post)) = (values[prior], values[posterior]) {
            let (t_prior, t_post, t_gap) = (secs[prior], secs[posterior], secs[gap]);
            let filled =
                (v_prior * (t_post - t_gap) + v_post * (t_gap - t_prior)) / (t_post - t_prior);
            values[gap] = Some(filled);
            n_filled += 1;
        }
    }
    debug!(n_gaps = gaps.len(), n_filled, "level interpolation complete");

    series
        .with_values(values)
        .expect("interpolated values are finite and lie on the validated axis")
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use wetwell_series::{align, AlignedSeries, MeasurementSeries};

    use super::*;

    fn ts(min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2017, 1, 1)
            .unwrap()
            .and_hms_opt(min / 60, min % 60, 0)
            .unwrap()
    }

    fn aligned(minutes: &[u32], values: &[Option<f64>]) -> AlignedSeries {
        AlignedSeries::new(minutes.iter().map(|&m| ts(m)).collect(), values.to_vec()).unwrap()
    }

    #[test]
    fn no_gaps_is_a_no_op() {
        let series = aligned(&[0, 5, 10], &[Some(1.0), Some(2.0), Some(3.0)]);
        let filled = fill_level(&series);
        assert_eq!(filled, series);
    }

    #[test]
    fn linear_ramp_is_recovered_exactly() {
        // Known ramp 0, 10, 20, 30 at even spacing; drop the sample at 20.
        let series = aligned(&[0, 10, 20, 30], &[Some(0.0), Some(10.0), None, Some(30.0)]);
        let filled = fill_level(&series);
        let v = filled.values()[2].unwrap();
        assert!((v - 20.0).abs() < 1e-10, "expected exact recovery, got {v}");
    }

    #[test]
    fn interpolation_is_time_weighted() {
        // Gap sits a quarter of the way through an uneven interval.
        let series = aligned(&[0, 10, 40], &[Some(0.0), None, Some(12.0)]);
        let filled = fill_level(&series);
        let v = filled.values()[1].unwrap();
        assert!((v - 3.0).abs() < 1e-10, "expected 3.0, got {v}");
    }

    #[test]
    fn boundary_gaps_stay_missing() {
        let series = aligned(
            &[0, 5, 10, 15],
            &[None, Some(1.0), Some(2.0), None],
        );
        let filled = fill_level(&series);
        assert_eq!(filled.values()[0], None);
        assert_eq!(filled.values()[3], None);
        assert_eq!(filled.values()[1], Some(1.0));
    }

    #[test]
    fn input_series_is_unchanged() {
        let series = aligned(&[0, 5, 10], &[Some(0.0), None, Some(10.0)]);
        let before = series.clone();
        let _ = fill_level(&series);
        assert_eq!(series, before);
    }

    #[test]
    fn gaps_from_alignment_are_filled() {
        let a = MeasurementSeries::new(vec![ts(0), ts(20)], vec![0.0, 20.0]).unwrap();
        let b = MeasurementSeries::new(vec![ts(10)], vec![99.0]).unwrap();
        let (la, _) = align(&a, &b);
        let filled = fill_level(&la);
        assert!((filled.values()[1].unwrap() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn consecutive_gaps_share_brackets() {
        let series = aligned(
            &[0, 10, 20, 30],
            &[Some(0.0), None, None, Some(30.0)],
        );
        let filled = fill_level(&series);
        assert!((filled.values()[1].unwrap() - 10.0).abs() < 1e-10);
        assert!((filled.values()[2].unwrap() - 20.0).abs() < 1e-10);
    }
}
