use crate::error::{ErrorSeverity, GameError};
use crate::fov::FovError;
use crate::state::{EntityId, Position};

/// Errors surfaced by vision queries.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VisionError {
    #[error(transparent)]
    Fov(#[from] FovError),

    /// The actor moved without the index being invalidated.
    #[error(
        "FOV cache of {actor} was computed at {cached} but the actor is at {actual}; \
         invalidate was not called after the move"
    )]
    CacheCoherenceViolation {
        actor: EntityId,
        cached: Position,
        actual: Position,
    },
}

impl GameError for VisionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            VisionError::Fov(err) => err.severity(),
            VisionError::CacheCoherenceViolation { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            VisionError::Fov(err) => err.error_code(),
            VisionError::CacheCoherenceViolation { .. } => "VISION_CACHE_COHERENCE_VIOLATION",
        }
    }
}
