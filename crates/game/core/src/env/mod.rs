//! Traits describing read-only world data.
//!
//! Oracles expose the static map geometry and the activation status of
//! actors so that the shadowcaster and the vision index can stay generic over
//! concrete storage.
mod error;
mod map;

pub use error::GridError;
pub use map::{Grid, MapDimensions, MapOracle, MapVersion, StaticTile, TerrainKind};

use crate::state::{ActivationState, EntityId};

/// Read access to per-actor activation state.
///
/// Actors without a record (the player, or anything the activation system
/// does not track) report `None` and are treated as awake.
pub trait ActivationOracle {
    fn activation_state(&self, entity: EntityId) -> Option<ActivationState>;

    /// Dormant actors never run the shadowcaster.
    fn is_dormant(&self, entity: EntityId) -> bool {
        matches!(
            self.activation_state(entity),
            Some(ActivationState::Dormant)
        )
    }
}

/// Oracle for hosts that track no activation at all: every actor is awake.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysAwake;

impl ActivationOracle for AlwaysAwake {
    fn activation_state(&self, _entity: EntityId) -> Option<ActivationState> {
        None
    }
}
