use crate::state::{ActivationFields, ActivationState, EntityId, MonsterActivation};

/// Why a monster's activation record changed during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TransitionCause {
    /// Took damage this tick; overrides every other rule.
    Damaged,
    /// Dormant monster stood inside the player's FOV.
    SpottedByPlayer,
    /// Monster saw the player with its own FOV.
    SpottedPlayer,
    /// No mutual visibility for longer than the return threshold.
    LostTrack,
    /// Returning monster arrived back at its home position.
    ReachedHome,
    /// Returning monster saw the player again.
    Reacquired,
    /// Same state, updated bookkeeping (last known position or counter).
    Tracking,
}

/// One monster's record change, reported back to the host after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivationUpdate {
    pub entity: EntityId,
    pub from: ActivationState,
    pub to: ActivationState,
    pub cause: TransitionCause,
    pub changed: ActivationFields,
}

impl ActivationUpdate {
    pub(crate) fn between(
        entity: EntityId,
        before: &MonsterActivation,
        after: &MonsterActivation,
        cause: TransitionCause,
    ) -> Self {
        Self {
            entity,
            from: before.state,
            to: after.state,
            cause,
            changed: changed_fields(before, after),
        }
    }

    /// Whether the activation state itself changed.
    pub fn is_transition(&self) -> bool {
        self.from != self.to
    }
}

/// Fields that differ between two records of the same monster.
pub fn changed_fields(before: &MonsterActivation, after: &MonsterActivation) -> ActivationFields {
    let mut changed = ActivationFields::empty();
    changed.set(ActivationFields::STATE, before.state != after.state);
    changed.set(
        ActivationFields::LAST_KNOWN,
        before.last_known_player_position != after.last_known_player_position,
    );
    changed.set(
        ActivationFields::TURNS_UNSEEN,
        before.turns_since_player_seen != after.turns_since_player_seen,
    );
    changed
}
