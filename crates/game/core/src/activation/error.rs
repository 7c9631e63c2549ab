use crate::error::{ErrorSeverity, GameError};
use crate::state::{ActivationState, EntityId, StateError};
use crate::vision::VisionError;

/// Errors that abort an activation update.
///
/// Nothing is committed when `update_states` returns an error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActivationError {
    /// A record is, or would become, inconsistent with its state.
    #[error("invalid activation of {entity} ({from} -> {to}): {reason}")]
    InvalidStateTransition {
        entity: EntityId,
        from: ActivationState,
        to: ActivationState,
        reason: &'static str,
    },

    /// A non-player monster was passed in without a spawned record.
    #[error("monster {0} has no activation record")]
    MissingActivation(EntityId),

    #[error(transparent)]
    Vision(#[from] VisionError),
}

impl ActivationError {
    /// Lifts a failed record validation into a transition error.
    pub(crate) fn from_validation(from: ActivationState, err: StateError) -> Self {
        match err {
            StateError::InvalidActivation {
                entity,
                state,
                reason,
            } => ActivationError::InvalidStateTransition {
                entity,
                from,
                to: state,
                reason,
            },
            StateError::PlayerHasNoActivation(entity) | StateError::AlreadyTracked(entity) => {
                ActivationError::InvalidStateTransition {
                    entity,
                    from,
                    to: from,
                    reason: "unexpected record bookkeeping error",
                }
            }
        }
    }
}

impl GameError for ActivationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ActivationError::InvalidStateTransition { .. } => ErrorSeverity::Fatal,
            ActivationError::MissingActivation(_) => ErrorSeverity::Internal,
            ActivationError::Vision(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ActivationError::InvalidStateTransition { .. } => "ACTIVATION_INVALID_STATE_TRANSITION",
            ActivationError::MissingActivation(_) => "ACTIVATION_MISSING",
            ActivationError::Vision(err) => err.error_code(),
        }
    }
}
