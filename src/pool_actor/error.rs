//! Error types for the pool actor.

use thiserror::Error;

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PoolError {
    /// The requested pool was not found.
    #[error("Pool not found: {0}")]
    NotFound(String),

    /// A rare chance outside `[0, 1]`.
    #[error("Invalid rare chance: {0}")]
    InvalidRareChance(f64),

    /// Template ranges or spawn area the pool cannot draw from.
    #[error("Invalid pool config: {0}")]
    InvalidConfig(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for PoolError {
    fn from(msg: String) -> Self {
        PoolError::ActorCommunicationError(msg)
    }
}
