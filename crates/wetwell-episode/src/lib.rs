//! Operational episode segmentation for pump-station series.
//!
//! Partitions a flow series into pump-on runs (zero→nonzero transitions)
//! and a level series into drain cycles (prominence-filtered maximum to the
//! next minimum), then links each substantial run to the temporally nearest
//! cycle and corrects the cycle's level drop for the background inflow.

mod config;
mod error;
mod flow;
mod level;
mod link;
mod peaks;

pub use config::{EpisodeConfig, Segmentation};
pub use error::EpisodeError;
pub use flow::{segment_flow, FlowEpisode};
pub use level::{segment_level, LevelEpisode};
pub use link::{link_episodes, LinkedFlowEpisode};
pub use peaks::{find_peaks, find_troughs};
