//! Error types for the swarm engine.

use thiserror::Error;

use crate::feeds::FeedError;

/// Failures of a single evaluation cycle.
///
/// Every variant is cycle-local: a failed cycle never mutates the scorer
/// population or the stored last recommendation.
#[derive(Debug, Error)]
pub enum SwarmError {
    /// A scenario snapshot could not be fetched.
    #[error("snapshot unavailable: {0}")]
    SnapshotUnavailable(#[from] FeedError),

    /// The population holds no scorers, so no weighted aggregate exists.
    #[error("cannot aggregate votes of an empty population")]
    EmptyPopulation,
}
