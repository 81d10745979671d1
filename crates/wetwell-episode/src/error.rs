//! Error types for episode segmentation and linking.

/// Errors from episode cross-linking.
#[derive(Debug, thiserror::Error)]
pub enum EpisodeError {
    /// Returned when flow episodes qualify for linking but the level series
    /// produced no episodes to link against.
    #[error("{n_flow} flow episodes qualify for linking but no level episodes were detected")]
    NoLevelEpisodes {
        /// Number of flow episodes that passed the volume filter.
        n_flow: usize,
    },
}
