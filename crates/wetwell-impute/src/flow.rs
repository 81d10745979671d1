//! Analog-lookup imputation of missing flow readings.
//!
//! A missing flow value is estimated from historical moments when the wet
//! well sat at a near-identical level and was not filling: those moments are
//! hydraulic analogs of the gap, and their known flows are averaged. An
//! analog set whose flows disagree too much is rejected rather than trusted.

use chrono::NaiveDateTime;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument};
use wetwell_series::{
    classify_monotonicity, mean, quantile, sample_std, AlignedSeries, Monotonicity,
};

use crate::error::ImputeError;

/// Why an analog estimate was refused for one gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum RejectReason {
    /// No historical moment matched the gap's level context.
    NoAnalog,
    /// Analogs were found but their flows are too dispersed to trust.
    HighVariance {
        /// Sample standard deviation of the analog flows.
        std: f64,
        /// Mean of the analog flows.
        mean: f64,
    },
}

/// Outcome of one gap's fill attempt.
///
/// Replaces the source's silent lookup-failure control flow with an explicit
/// value; none of these variants aborts the batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FillOutcome {
    /// The gap was filled with this value.
    Value(f64),
    /// No level reading exists at the gap's timestamp; nothing to reason from.
    Missing,
    /// Analog search ran and refused to produce an estimate.
    Rejected(RejectReason),
}

impl FillOutcome {
    /// Return the filled value, if any.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            FillOutcome::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Fill report for one gap position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GapFill {
    /// Position of the gap on the shared axis.
    pub index: usize,
    /// Timestamp of the gap.
    pub timestamp: NaiveDateTime,
    /// What the imputer decided for this gap.
    pub outcome: FillOutcome,
}

/// Result of a flow fill pass: the filled series plus the per-gap report.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowFill {
    filled: AlignedSeries,
    gaps: Vec<GapFill>,
}

impl FlowFill {
    /// Return the flow series with every successful fill applied.
    #[must_use]
    pub fn filled(&self) -> &AlignedSeries {
        &self.filled
    }

    /// Return the per-gap fill reports, in axis order.
    #[must_use]
    pub fn gap_reports(&self) -> &[GapFill] {
        &self.gaps
    }

    /// Number of gaps that received a value.
    #[must_use]
    pub fn n_filled(&self) -> usize {
        self.gaps
            .iter()
            .filter(|g| matches!(g.outcome, FillOutcome::Value(_)))
            .count()
    }
}

/// Configuration for analog-lookup flow imputation.
///
/// Construct via [`FlowFillConfig::new`], then chain `with_*` methods to
/// override defaults. The pump-trigger quantile and the dispersion cutoff
/// are tuning parameters, not constants.
///
/// # Defaults
///
/// | Parameter           | Default |
/// |---------------------|---------|
/// | `proximity_epsilon` | 0.01    |
/// | `classify_epsilon`  | 4       |
/// | `horizon`           | 5       |
/// | `trigger_quantile`  | 0.95    |
/// | `max_cv`            | 0.5     |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowFillConfig {
    proximity_epsilon: f64,
    classify_epsilon: usize,
    horizon: usize,
    trigger_quantile: f64,
    max_cv: f64,
}

impl Default for FlowFillConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowFillConfig {
    /// Create a configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            proximity_epsilon: 0.01,
            classify_epsilon: 4,
            horizon: 5,
            trigger_quantile: 0.95,
            max_cv: 0.5,
        }
    }

    /// Set the level-distance window for analog candidacy: a historical
    /// moment qualifies when its level differs from the gap's level by less
    /// than this amount.
    #[must_use]
    pub fn with_proximity_epsilon(mut self, proximity_epsilon: f64) -> Self {
        self.proximity_epsilon = proximity_epsilon;
        self
    }

    /// Set the noise budget of the monotonicity classification applied to
    /// the level history.
    #[must_use]
    pub fn with_classify_epsilon(mut self, classify_epsilon: usize) -> Self {
        self.classify_epsilon = classify_epsilon;
        self
    }

    /// Set the classification half-window size.
    #[must_use]
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the quantile of the level history taken as the pump trigger
    /// level: below it, a rising well means the pump is off.
    #[must_use]
    pub fn with_trigger_quantile(mut self, trigger_quantile: f64) -> Self {
        self.trigger_quantile = trigger_quantile;
        self
    }

    /// Set the maximum tolerated coefficient of variation (sample std /
    /// mean) of an analog flow set.
    #[must_use]
    pub fn with_max_cv(mut self, max_cv: f64) -> Self {
        self.max_cv = max_cv;
        self
    }

    /// Return the level-distance window for analog candidacy.
    #[must_use]
    pub fn proximity_epsilon(&self) -> f64 {
        self.proximity_epsilon
    }

    /// Return the classification noise budget.
    #[must_use]
    pub fn classify_epsilon(&self) -> usize {
        self.classify_epsilon
    }

    /// Return the classification half-window size.
    #[must_use]
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Return the pump-trigger quantile.
    #[must_use]
    pub fn trigger_quantile(&self) -> f64 {
        self.trigger_quantile
    }

    /// Return the dispersion cutoff.
    #[must_use]
    pub fn max_cv(&self) -> f64 {
        self.max_cv
    }

    /// Fill the gaps of an aligned flow series from its companion level
    /// series.
    ///
    /// Both series must already be reindexed onto one shared axis (see
    /// [`wetwell_series::align`]) and the level series should have been
    /// through [`fill_level`](crate::fill_level) first so interior level
    /// gaps do not shadow usable flow gaps.
    ///
    /// Per gap: no level reading at the gap's timestamp →
    /// [`FillOutcome::Missing`]; level rising below the trigger level →
    /// exactly `0.0` (the well is filling, the pump is off); otherwise the
    /// mean of the known flows at analog moments, unless the analog set is
    /// empty or too dispersed ([`FillOutcome::Rejected`]).
    ///
    /// Analog candidates are found through a value-sorted index with binary
    /// search, keeping the search near-linear instead of quadratic on large
    /// series.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ImputeError::AxisMismatch`] | The two series are not on one shared axis |
    /// | [`ImputeError::Series`] | Classification window exceeds the level history, or the trigger quantile is outside `[0, 1]` |
    #[instrument(skip_all, fields(n = flow.len(), n_gaps))]
    pub fn fill(
        &self,
        flow: &AlignedSeries,
        level: &AlignedSeries,
    ) -> Result<FlowFill, ImputeError> {
        check_shared_axis(flow, level)?;

        let gaps = flow.gap_indices();
        tracing::Span::current().record("n_gaps", gaps.len());
        if gaps.is_empty() {
            return Ok(FlowFill {
                filled: flow.clone(),
                gaps: Vec::new(),
            });
        }

        let known_pos = level.known_indices();
        let known_vals: Vec<f64> = known_pos
            .iter()
            .map(|&p| level.values()[p].expect("known index refers to a known sample"))
            .collect();

        let reports: Vec<GapFill> = if known_vals.is_empty() {
            // No level history at all: every gap is unanswerable.
            gaps.iter()
                .map(|&g| GapFill {
                    index: g,
                    timestamp: flow.timestamps()[g],
                    outcome: FillOutcome::Missing,
                })
                .collect()
        } else {
            let labels =
                classify_monotonicity(&known_vals, self.horizon, self.classify_epsilon)?;
            let trigger = quantile(&known_vals, self.trigger_quantile)?;

            // Per-axis-position label lookup.
            let mut label_at: Vec<Option<Monotonicity>> = vec![None; level.len()];
            for (&p, &label) in known_pos.iter().zip(&labels) {
                label_at[p] = Some(label);
            }

            // Value-sorted analog index over non-rising level moments.
            let mut analog_index: Vec<(f64, usize)> = known_pos
                .iter()
                .zip(&labels)
                .filter(|(_, &label)| label != Monotonicity::Increasing)
                .map(|(&p, _)| {
                    (
                        level.values()[p].expect("known index refers to a known sample"),
                        p,
                    )
                })
                .collect();
            analog_index.sort_by(|a, b| a.0.total_cmp(&b.0));

            gaps.par_iter()
                .map(|&g| GapFill {
                    index: g,
                    timestamp: flow.timestamps()[g],
                    outcome: self.fill_one(g, flow, level, &label_at, &analog_index, trigger),
                })
                .collect()
        };

        let mut values = flow.values().to_vec();
        for report in &reports {
            if let FillOutcome::Value(v) = report.outcome {
                values[report.index] = Some(v);
            }
        }
        let filled = flow
            .with_values(values)
            .expect("filled values are finite and lie on the validated axis");

        let result = FlowFill {
            filled,
            gaps: reports,
        };
        info!(
            n_gaps = result.gaps.len(),
            n_filled = result.n_filled(),
            "flow imputation complete"
        );
        Ok(result)
    }

    /// Decide one gap. `label_at` maps axis positions to level labels;
    /// `analog_index` is sorted by level value.
    fn fill_one(
        &self,
        gap: usize,
        flow: &AlignedSeries,
        level: &AlignedSeries,
        label_at: &[Option<Monotonicity>],
        analog_index: &[(f64, usize)],
        trigger: f64,
    ) -> FillOutcome {
        let Some(gap_level) = level.values()[gap] else {
            return FillOutcome::Missing;
        };
        let label = label_at[gap].expect("level position with a value carries a label");

        // Well filling below its trigger point: the pump has not started.
        if label == Monotonicity::Increasing && gap_level < trigger {
            return FillOutcome::Value(0.0);
        }

        let lo = analog_index.partition_point(|(v, _)| *v <= gap_level - self.proximity_epsilon);
        let hi = analog_index.partition_point(|(v, _)| *v < gap_level + self.proximity_epsilon);
        let analog_flows: Vec<f64> = analog_index[lo..hi]
            .iter()
            .filter_map(|&(_, p)| flow.values()[p])
            .collect();

        if analog_flows.is_empty() {
            return FillOutcome::Rejected(RejectReason::NoAnalog);
        }

        let m = mean(&analog_flows).expect("analog set is non-empty");
        let s = sample_std(&analog_flows).expect("analog set is non-empty");
        if s > self.max_cv * m {
            FillOutcome::Rejected(RejectReason::HighVariance { std: s, mean: m })
        } else {
            FillOutcome::Value(m)
        }
    }
}

/// Verify that two aligned series share one timestamp axis.
fn check_shared_axis(flow: &AlignedSeries, level: &AlignedSeries) -> Result<(), ImputeError> {
    let n = flow.len().min(level.len());
    let divergence = (0..n).find(|&i| flow.timestamps()[i] != level.timestamps()[i]);
    if flow.len() != level.len() || divergence.is_some() {
        return Err(ImputeError::AxisMismatch {
            index: divergence.unwrap_or(n),
        });
    }
    Ok(())
}
