//! Cross-linking of pump-on runs to the drain cycles they caused.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::EpisodeError;
use crate::flow::FlowEpisode;
use crate::level::LevelEpisode;

/// A pump-on run paired with the drain cycle nearest to it in time.
///
/// The link is a read-only cross-reference: the level episode's attributes
/// are copied in, not owned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedFlowEpisode {
    /// The pump-on run.
    pub flow: FlowEpisode,
    /// Id of the linked drain cycle.
    pub level_id: usize,
    /// The linked cycle's level change (negative while draining).
    pub level_delta: f64,
    /// The linked cycle's drop rate.
    pub level_drop_rate: f64,
    /// The linked cycle's rise since the previous trough, if any.
    pub prior_increase: Option<f64>,
    /// Elapsed seconds of that rise, if any.
    pub prior_increase_seconds: Option<f64>,
    /// Level change corrected for the inflow that would have raised the
    /// well anyway: `delta - prior_increase / prior_increase_seconds *
    /// flow_duration`. `None` when the prior rise is unavailable.
    pub adjusted_delta: Option<f64>,
}

/// Link each qualifying pump-on run to the drain cycle whose representative
/// timestamp is nearest to the run's peak timestamp.
///
/// Runs with total volume at or below `min_volume` are discarded as
/// misclassified noise before linking. Ties on temporal distance resolve to
/// the earlier cycle.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`EpisodeError::NoLevelEpisodes`] | Runs qualify but `level` is empty |
#[instrument(skip_all, fields(n_flow = flow.len(), n_level = level.len(), min_volume = min_volume))]
pub fn link_episodes(
    flow: &[FlowEpisode],
    level: &[LevelEpisode],
    min_volume: f64,
) -> Result<Vec<LinkedFlowEpisode>, EpisodeError> {
    let qualifying: Vec<&FlowEpisode> =
        flow.iter().filter(|e| e.volume > min_volume).collect();
    if qualifying.is_empty() {
        return Ok(Vec::new());
    }
    if level.is_empty() {
        return Err(EpisodeError::NoLevelEpisodes {
            n_flow: qualifying.len(),
        });
    }

    let linked = qualifying
        .into_iter()
        .map(|run| {
            let nearest = level
                .iter()
                .min_by_key(|cycle| (cycle.start - run.peak_timestamp).num_seconds().abs())
                .expect("level episodes are non-empty");

            let adjusted_delta = match (nearest.prior_increase, nearest.prior_increase_seconds)
            {
                (Some(rise), Some(secs)) if secs > 0.0 => {
                    Some(nearest.delta - rise / secs * run.duration_seconds)
                }
                _ => None,
            };

            LinkedFlowEpisode {
                flow: run.clone(),
                level_id: nearest.id,
                level_delta: nearest.delta,
                level_drop_rate: nearest.drop_rate,
                prior_increase: nearest.prior_increase,
                prior_increase_seconds: nearest.prior_increase_seconds,
                adjusted_delta,
            }
        })
        .collect::<Vec<_>>();

    debug!(n_linked = linked.len(), "episode linking complete");
    Ok(linked)
}
