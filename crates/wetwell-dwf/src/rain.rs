//! Rainfall summarization per calendar day and dry-day classification.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, instrument};
use wetwell_series::{reset_cumsum, ResetMode};

use crate::error::DwfError;

/// One rainfall observation interval with per-zone totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainfallObservation {
    /// Start of the observation interval.
    pub start: NaiveDateTime,
    /// End of the observation interval.
    pub end: NaiveDateTime,
    /// Rainfall per reporting zone, keyed by zone name.
    pub readings: BTreeMap<String, f64>,
}

/// Static catchment area metadata, used only to restrict rainfall zones to
/// one subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatchmentArea {
    /// Zone name as it appears in rainfall observations.
    pub area_id: String,
    /// Code of the sewer subsystem the area drains into.
    pub subsystem: String,
}

/// One calendar day's rainfall summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DryDayRecord {
    /// The calendar day.
    pub date: NaiveDate,
    /// Rainfall total for the day (zone-averaged observations, summed).
    pub rainfall: f64,
    /// Days since the last wet day; 0 on wet days.
    pub days_since_wet: u32,
}

/// Zone names of the catchment areas belonging to one subsystem.
#[must_use]
pub fn subsystem_zones(areas: &[CatchmentArea], subsystem: &str) -> Vec<String> {
    areas
        .iter()
        .filter(|a| a.subsystem == subsystem)
        .map(|a| a.area_id.clone())
        .collect()
}

/// Summarize rainfall observations into one record per calendar day.
///
/// Observations are sorted by start time; each contributes the unweighted
/// mean of its zone readings (restricted to `zones` when given, skipping
/// observations with no selected reading). Per-date means are summed, then
/// the "days since wet" counter runs over the dates in order: a day whose
/// total reaches `dry_threshold` resets the counter.
///
/// Calendar days with no observation at all do not appear in the output.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DwfError::Series`] | `observations` is empty |
/// | [`DwfError::NoMatchingZones`] | No observation carries a selected zone reading |
#[instrument(skip_all, fields(n_observations = observations.len()))]
pub fn summarize_rainfall(
    observations: &[RainfallObservation],
    zones: Option<&[String]>,
    dry_threshold: f64,
) -> Result<Vec<DryDayRecord>, DwfError> {
    if observations.is_empty() {
        return Err(wetwell_series::SeriesError::EmptyInput.into());
    }

    let mut ordered: Vec<&RainfallObservation> = observations.iter().collect();
    ordered.sort_by_key(|o| o.start);

    // Per-date sum of zone-averaged observation totals; BTreeMap keeps the
    // dates in calendar order.
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for obs in ordered {
        let selected: Vec<f64> = match zones {
            Some(zones) => zones
                .iter()
                .filter_map(|z| obs.readings.get(z).copied())
                .collect(),
            None => obs.readings.values().copied().collect(),
        };
        if selected.is_empty() {
            continue;
        }
        let zone_mean = selected.iter().sum::<f64>() / selected.len() as f64;
        *totals.entry(obs.start.date()).or_insert(0.0) += zone_mean;
    }
    if totals.is_empty() {
        return Err(DwfError::NoMatchingZones);
    }

    let daily: Vec<f64> = totals.values().copied().collect();
    let counts = reset_cumsum(&daily, dry_threshold, ResetMode::Count)?;

    let records: Vec<DryDayRecord> = totals
        .keys()
        .zip(&daily)
        .zip(&counts)
        .map(|((&date, &rainfall), &count)| DryDayRecord {
            date,
            rainfall,
            days_since_wet: count as u32,
        })
        .collect();

    debug!(n_days = records.len(), "rainfall summarized");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn obs(day: u32, hour: u32, readings: &[(&str, f64)]) -> RainfallObservation {
        let start = NaiveDate::from_ymd_opt(2017, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        RainfallObservation {
            start,
            end: start + chrono::Duration::hours(1),
            readings: readings
                .iter()
                .map(|(z, v)| ((*z).to_string(), *v))
                .collect(),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 3, day).unwrap()
    }

    #[test]
    fn empty_observations_are_an_error() {
        let result = summarize_rainfall(&[], None, 2.5);
        assert!(matches!(result, Err(DwfError::Series(_))));
    }

    #[test]
    fn dry_run_counter_resets_on_the_wet_day() {
        // One observation per day: rain only on day 4.
        let observations: Vec<RainfallObservation> = [0.0, 0.0, 0.0, 5.0, 0.0, 0.0]
            .iter()
            .enumerate()
            .map(|(i, &v)| obs(i as u32 + 1, 8, &[("Z1", v)]))
            .collect();

        let records = summarize_rainfall(&observations, None, 2.5).unwrap();
        let counts: Vec<u32> = records.iter().map(|r| r.days_since_wet).collect();
        assert_eq!(counts, vec![0, 1, 2, 0, 1, 2]);

        // Boundary is inclusive: with a 2-day requirement, exactly the days
        // whose counter reached 2 qualify.
        let dry: Vec<NaiveDate> = records
            .iter()
            .filter(|r| r.days_since_wet >= 2)
            .map(|r| r.date)
            .collect();
        assert_eq!(dry, vec![date(3), date(6)]);
    }

    #[test]
    fn observations_are_sorted_before_counting() {
        let observations = vec![
            obs(2, 8, &[("Z1", 0.0)]),
            obs(1, 8, &[("Z1", 5.0)]),
            obs(3, 8, &[("Z1", 0.0)]),
        ];
        let records = summarize_rainfall(&observations, None, 2.5).unwrap();
        assert_eq!(records[0].date, date(1));
        let counts: Vec<u32> = records.iter().map(|r| r.days_since_wet).collect();
        assert_eq!(counts, vec![0, 1, 2]);
    }

    #[test]
    fn same_day_observations_sum_after_zone_averaging() {
        let observations = vec![
            obs(1, 8, &[("Z1", 1.0), ("Z2", 3.0)]), // zone mean 2.0
            obs(1, 14, &[("Z1", 4.0), ("Z2", 0.0)]), // zone mean 2.0
        ];
        let records = summarize_rainfall(&observations, None, 10.0).unwrap();
        assert_eq!(records.len(), 1);
        assert!((records[0].rainfall - 4.0).abs() < 1e-10);
    }

    #[test]
    fn zone_filter_restricts_the_average() {
        let observations = vec![obs(1, 8, &[("Z1", 2.0), ("Z2", 8.0)])];
        let zones = vec!["Z1".to_string()];
        let records = summarize_rainfall(&observations, Some(&zones), 10.0).unwrap();
        assert!((records[0].rainfall - 2.0).abs() < 1e-10);
    }

    #[test]
    fn observations_without_selected_zones_are_skipped() {
        let observations = vec![
            obs(1, 8, &[("Z9", 7.0)]),
            obs(2, 8, &[("Z1", 1.0)]),
        ];
        let zones = vec!["Z1".to_string()];
        let records = summarize_rainfall(&observations, Some(&zones), 10.0).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, date(2));
    }

    #[test]
    fn no_matching_zone_anywhere_is_an_error() {
        let observations = vec![obs(1, 8, &[("Z9", 7.0)])];
        let zones = vec!["Z1".to_string()];
        let result = summarize_rainfall(&observations, Some(&zones), 10.0);
        assert!(matches!(result, Err(DwfError::NoMatchingZones)));
    }

    #[test]
    fn subsystem_zones_filters_by_code() {
        let areas = vec![
            CatchmentArea {
                area_id: "north".into(),
                subsystem: "DRU".into(),
            },
            CatchmentArea {
                area_id: "south".into(),
                subsystem: "DRU".into(),
            },
            CatchmentArea {
                area_id: "elsewhere".into(),
                subsystem: "HSB".into(),
            },
        ];
        assert_eq!(subsystem_zones(&areas, "DRU"), vec!["north", "south"]);
        assert!(subsystem_zones(&areas, "XXX").is_empty());
    }
}
