//! The dry-weather-flow comparison table.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{info, instrument};
use wetwell_series::{mean, quantile, MeasurementSeries};

use crate::config::DwfConfig;
use crate::error::DwfError;
use crate::rain::DryDayRecord;

/// The six measures reported by the DWF comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DwfMeasure {
    /// Low quantile of dry daily volumes; the reference all other rows are
    /// expressed against.
    TheoreticalBaseline,
    /// Mean dry daily volume over the summer months.
    Summer,
    /// Mean dry daily volume over the winter months.
    Winter,
    /// Mean dry daily volume on Monday through Friday.
    Workday,
    /// Mean dry daily volume on Saturday and Sunday.
    Weekend,
    /// Mean dry daily volume over all dry days.
    Average,
}

/// One row of the DWF comparison table.
///
/// `volume` is `None` when no dry day falls into the row's subset;
/// `relative` is the ratio to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DwfRow {
    /// Which measure this row reports.
    pub measure: DwfMeasure,
    /// Absolute daily volume.
    pub volume: Option<f64>,
    /// Daily volume relative to the baseline (baseline row: 1.0).
    pub relative: Option<f64>,
}

/// Dry-weather-flow comparison table: six rows, absolute and relative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DwfTable {
    rows: Vec<DwfRow>,
}

impl DwfTable {
    /// Return all six rows, baseline first.
    #[must_use]
    pub fn rows(&self) -> &[DwfRow] {
        &self.rows
    }

    /// Return the row for one measure.
    #[must_use]
    pub fn row(&self, measure: DwfMeasure) -> &DwfRow {
        self.rows
            .iter()
            .find(|r| r.measure == measure)
            .expect("the table always carries all six measures")
    }
}

/// Build the DWF comparison table from a flow series and the dry-day
/// classification.
///
/// Flow volume is summed per calendar day (`rate * Δt_seconds / 3600` per
/// sample) and restricted to days whose `days_since_wet` counter meets the
/// consecutive-dry-days requirement (inclusive comparison). The baseline is
/// the configured quantile of those daily volumes; the remaining rows are
/// subset means, each also expressed relative to the baseline.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DwfError::NoDryDays`] | No sampled day qualifies as dry |
/// | [`DwfError::Series`] | The baseline quantile is outside `[0, 1]` |
#[instrument(skip_all, fields(n_flow = flow.len(), n_days = dry_days.len()))]
pub fn dwf_table(
    flow: &MeasurementSeries,
    dry_days: &[DryDayRecord],
    config: &DwfConfig,
) -> Result<DwfTable, DwfError> {
    // Daily pumped volume, in calendar order.
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (t, v) in flow.timestamps().iter().zip(flow.interval_volumes()) {
        *daily.entry(t.date()).or_insert(0.0) += v;
    }

    let dry_dates: HashSet<NaiveDate> = dry_days
        .iter()
        .filter(|r| r.days_since_wet >= config.min_dry_series())
        .map(|r| r.date)
        .collect();

    let dry_daily: Vec<(NaiveDate, f64)> = daily
        .into_iter()
        .filter(|(date, _)| dry_dates.contains(date))
        .collect();
    if dry_daily.is_empty() {
        return Err(DwfError::NoDryDays {
            min_dry_series: config.min_dry_series(),
        });
    }

    let volumes: Vec<f64> = dry_daily.iter().map(|(_, v)| *v).collect();
    let baseline = quantile(&volumes, config.baseline_quantile())?;

    let subset_mean = |keep: &dyn Fn(NaiveDate) -> bool| -> Option<f64> {
        let subset: Vec<f64> = dry_daily
            .iter()
            .filter(|(date, _)| keep(*date))
            .map(|(_, v)| *v)
            .collect();
        mean(&subset).ok()
    };

    let summer = subset_mean(&|d| config.summer_months().contains(&d.month()));
    let winter = subset_mean(&|d| config.winter_months().contains(&d.month()));
    let workday = subset_mean(&|d| d.weekday().num_days_from_monday() < 5);
    let weekend = subset_mean(&|d| d.weekday().num_days_from_monday() >= 5);
    let average = mean(&volumes).expect("dry daily volumes are non-empty");

    let relative = |v: Option<f64>| v.map(|v| v / baseline);
    let rows = vec![
        DwfRow {
            measure: DwfMeasure::TheoreticalBaseline,
            volume: Some(baseline),
            relative: Some(1.0),
        },
        DwfRow {
            measure: DwfMeasure::Summer,
            volume: summer,
            relative: relative(summer),
        },
        DwfRow {
            measure: DwfMeasure::Winter,
            volume: winter,
            relative: relative(winter),
        },
        DwfRow {
            measure: DwfMeasure::Workday,
            volume: workday,
            relative: relative(workday),
        },
        DwfRow {
            measure: DwfMeasure::Weekend,
            volume: weekend,
            relative: relative(weekend),
        },
        DwfRow {
            measure: DwfMeasure::Average,
            volume: Some(average),
            relative: Some(average / baseline),
        },
    ];

    info!(
        n_dry_days = volumes.len(),
        baseline, "dry-weather-flow table computed"
    );
    Ok(DwfTable { rows })
}
