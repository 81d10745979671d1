//! Configuration and one-call orchestration of episode segmentation.

use serde::Serialize;
use tracing::instrument;
use wetwell_series::MeasurementSeries;

use crate::error::EpisodeError;
use crate::flow::{segment_flow, FlowEpisode};
use crate::level::{segment_level, LevelEpisode};
use crate::link::{link_episodes, LinkedFlowEpisode};

/// Combined result of one segmentation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segmentation {
    /// Pump-on runs, in time order.
    pub flow_episodes: Vec<FlowEpisode>,
    /// Drain cycles, in time order.
    pub level_episodes: Vec<LevelEpisode>,
    /// Qualifying runs linked to their nearest cycles.
    pub linked: Vec<LinkedFlowEpisode>,
}

/// Configuration for episode segmentation.
///
/// Construct via [`EpisodeConfig::new`], then chain `with_*` methods to
/// override defaults.
///
/// # Defaults
///
/// | Parameter        | Default |
/// |------------------|---------|
/// | `min_prominence` | 0.5     |
/// | `min_volume`     | 1.0     |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeConfig {
    min_prominence: f64,
    min_volume: f64,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EpisodeConfig {
    /// Create a configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_prominence: 0.5,
            min_volume: 1.0,
        }
    }

    /// Set the minimum prominence a level extremum needs to open or close a
    /// drain cycle.
    #[must_use]
    pub fn with_min_prominence(mut self, min_prominence: f64) -> Self {
        self.min_prominence = min_prominence;
        self
    }

    /// Set the volume a pump-on run must exceed to survive the noise filter
    /// and take part in linking.
    #[must_use]
    pub fn with_min_volume(mut self, min_volume: f64) -> Self {
        self.min_volume = min_volume;
        self
    }

    /// Return the minimum extremum prominence.
    #[must_use]
    pub fn min_prominence(&self) -> f64 {
        self.min_prominence
    }

    /// Return the minimum run volume.
    #[must_use]
    pub fn min_volume(&self) -> f64 {
        self.min_volume
    }

    /// Segment both series and link the results.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EpisodeError::NoLevelEpisodes`] | Runs qualify for linking but no drain cycle was detected |
    #[instrument(skip_all, fields(n_flow = flow.len(), n_level = level.len()))]
    pub fn segment(
        &self,
        flow: &MeasurementSeries,
        level: &MeasurementSeries,
    ) -> Result<Segmentation, EpisodeError> {
        let flow_episodes = segment_flow(flow);
        let level_episodes = segment_level(level, self.min_prominence);
        let linked = link_episodes(&flow_episodes, &level_episodes, self.min_volume)?;
        Ok(Segmentation {
            flow_episodes,
            level_episodes,
            linked,
        })
    }
}
