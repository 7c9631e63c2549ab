//! Plain-data state read and written by the core.
//!
//! Actors are read-only views supplied by the actor-management collaborator.
//! Activation records are owned here and mutated exclusively by the
//! activation state machine.
mod activation;
mod actor;
mod common;
mod error;
mod faction;
mod fields;

pub use activation::{ActivationState, ActivationTable, MonsterActivation};
pub use actor::Actor;
pub use common::{EntityId, Position};
pub use error::StateError;
pub use faction::Faction;
pub use fields::ActivationFields;
