//! Errors surfaced by the tactical engine.

use crate::activation::ActivationError;
use crate::env::GridError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, StateError};
use crate::vision::VisionError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("activation update failed: {0}")]
    Activation(#[from] ActivationError),

    #[error("vision query failed: {0}")]
    Vision(#[from] VisionError),

    #[error("map update rejected: {0}")]
    Grid(#[from] GridError),

    #[error("activation bookkeeping failed: {0}")]
    State(#[from] StateError),

    /// The actor passed as the player is not player-controlled.
    #[error("actor {0} is not player-controlled")]
    NotPlayerControlled(EntityId),
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::Activation(err) => err.severity(),
            EngineError::Vision(err) => err.severity(),
            EngineError::Grid(err) => err.severity(),
            EngineError::State(err) => err.severity(),
            EngineError::NotPlayerControlled(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EngineError::Activation(err) => err.error_code(),
            EngineError::Vision(err) => err.error_code(),
            EngineError::Grid(err) => err.error_code(),
            EngineError::State(err) => err.error_code(),
            EngineError::NotPlayerControlled(_) => "ENGINE_NOT_PLAYER_CONTROLLED",
        }
    }
}
