//! Error types for the backpack actor.

use crate::pool_actor::PoolError;
use thiserror::Error;

/// Errors that can occur during backpack operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackpackError {
    #[error("Backpack not found: {0}")]
    NotFound(String),

    /// A ceiling that is not a positive finite weight.
    #[error("Invalid weight ceiling: {0}")]
    InvalidCeiling(f32),

    /// The pool refused or failed a claim; the backpack is unchanged.
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for BackpackError {
    fn from(msg: String) -> Self {
        BackpackError::ActorCommunicationError(msg)
    }
}
