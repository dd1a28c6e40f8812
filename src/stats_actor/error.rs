//! Error types for the statistics actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StatsError {
    #[error("Stats not found: {0}")]
    NotFound(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for StatsError {
    fn from(msg: String) -> Self {
        StatsError::ActorCommunicationError(msg)
    }
}
