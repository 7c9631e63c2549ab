//! Activation record errors.
//!
//! Errors raised when registering, removing, or restoring activation records.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{ActivationState, EntityId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// The player is always implicitly active and never carries a record.
    #[error("player-controlled actor {0} cannot carry an activation record")]
    PlayerHasNoActivation(EntityId),

    /// A record already exists for this actor.
    #[error("actor {0} already has an activation record")]
    AlreadyTracked(EntityId),

    /// A record is missing data its state requires.
    #[error("activation record of {entity} in state {state} is invalid: {reason}")]
    InvalidActivation {
        entity: EntityId,
        state: ActivationState,
        reason: &'static str,
    },
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        use StateError::*;
        match self {
            PlayerHasNoActivation(_) | AlreadyTracked(_) => ErrorSeverity::Validation,
            InvalidActivation { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use StateError::*;
        match self {
            PlayerHasNoActivation(_) => "STATE_PLAYER_HAS_NO_ACTIVATION",
            AlreadyTracked(_) => "STATE_ALREADY_TRACKED",
            InvalidActivation { .. } => "STATE_INVALID_ACTIVATION",
        }
    }
}
