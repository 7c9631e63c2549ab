//! Field of view.
//!
//! [`compute_fov`] is a pure function of the map, an origin, a radius and a
//! [`DistanceMetric`]. Caching and activation gating live in
//! [`crate::vision`].
mod distance;
mod shadowcast;
mod slope;
mod visible;

pub use distance::DistanceMetric;
pub use shadowcast::compute_fov;
pub use visible::VisibleSet;

use crate::env::MapDimensions;
use crate::error::{ErrorSeverity, GameError};
use crate::state::Position;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FovError {
    #[error("FOV origin {origin} is outside the {}x{} map", .dimensions.width, .dimensions.height)]
    InvalidOrigin {
        origin: Position,
        dimensions: MapDimensions,
    },
}

impl GameError for FovError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            FovError::InvalidOrigin { .. } => "FOV_INVALID_ORIGIN",
        }
    }
}
