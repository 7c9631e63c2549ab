//! Monster activation state machine.
//!
//! Only monsters that are not Dormant are scheduled and compute FOV. The
//! machine is the sole writer of [`MonsterActivation`](crate::state::MonsterActivation)
//! records once they are spawned.
mod error;
mod machine;
mod transition;

pub use error::ActivationError;
pub use machine::ActivationStateMachine;
pub use transition::{ActivationUpdate, TransitionCause, changed_fields};
