//! Shard runtime errors.

use thiserror::Error;

use crate::grid::GridError;

/// Errors returned by [`super::ShardClient`].
#[derive(Debug, Error)]
pub enum ShardError {
    /// The entity key does not decode to a tile
    #[error("Invalid entity key: {0}")]
    Grid(#[from] GridError),

    /// The coordinator has shut down
    #[error("Shard runtime has stopped")]
    Stopped,

    /// The entity stopped before answering
    #[error("Entity {0} is unavailable")]
    EntityUnavailable(String),
}
