//! Per-monster activation records.
//!
//! Every non-player actor carries a [`MonsterActivation`]. Records are created
//! Dormant on spawn, mutated only by
//! [`ActivationStateMachine`](crate::activation::ActivationStateMachine), and
//! removed when the actor leaves the simulation.

use std::collections::BTreeMap;

use super::{Actor, EntityId, Position, StateError};
use crate::env::ActivationOracle;

/// Awareness of a monster towards the player.
///
/// | State     | FOV computed | Scheduled |
/// |-----------|--------------|-----------|
/// | Dormant   | no           | no        |
/// | Alert     | yes          | yes       |
/// | Active    | yes          | yes       |
/// | Returning | yes          | yes       |
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActivationState {
    #[default]
    Dormant,
    Alert,
    Active,
    Returning,
}

impl ActivationState {
    /// Whether the external turn scheduler should give this monster turns.
    pub const fn is_scheduled(self) -> bool {
        !matches!(self, Self::Dormant)
    }

    /// Whether vision queries for this monster may run the shadowcaster.
    pub const fn computes_fov(self) -> bool {
        !matches!(self, Self::Dormant)
    }
}

/// Persistent activation data of a single monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterActivation {
    pub state: ActivationState,
    pub home_position: Position,
    pub last_known_player_position: Option<Position>,
    pub turns_since_player_seen: u32,
}

impl MonsterActivation {
    /// A freshly spawned, dormant record anchored at `home_position`.
    pub const fn dormant(home_position: Position) -> Self {
        Self {
            state: ActivationState::Dormant,
            home_position,
            last_known_player_position: None,
            turns_since_player_seen: 0,
        }
    }

    /// Checks that the record carries the data its state requires.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::InvalidActivation`] when a Dormant record still
    /// remembers the player, or an awake record has no last known position.
    pub fn validate(&self, entity: EntityId) -> Result<(), StateError> {
        let reason = match (self.state, self.last_known_player_position) {
            (ActivationState::Dormant, Some(_)) => "dormant monster remembers the player",
            (ActivationState::Alert, None) => "alert monster has no last known player position",
            (ActivationState::Active, None) => "active monster has no last known player position",
            (ActivationState::Returning, None) => {
                "returning monster has no last known player position"
            }
            _ => return Ok(()),
        };

        Err(StateError::InvalidActivation {
            entity,
            state: self.state,
            reason,
        })
    }
}

/// Activation records for every tracked monster, ordered by id.
///
/// Deserialisation goes through [`ActivationTable::restore`], so a persisted
/// table is validated the same way as one rebuilt by hand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "PersistedTable")
)]
pub struct ActivationTable {
    records: BTreeMap<EntityId, MonsterActivation>,
}

/// Wire shape of [`ActivationTable`] before validation.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PersistedTable {
    records: BTreeMap<EntityId, MonsterActivation>,
}

#[cfg(feature = "serde")]
impl TryFrom<PersistedTable> for ActivationTable {
    type Error = StateError;

    fn try_from(persisted: PersistedTable) -> Result<Self, Self::Error> {
        Self::restore(persisted.records)
    }
}

impl ActivationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a table from persisted records, validating each one.
    ///
    /// # Errors
    ///
    /// Returns the first [`StateError`] found: a duplicate id, or a record
    /// whose state lacks required data.
    pub fn restore<I>(records: I) -> Result<Self, StateError>
    where
        I: IntoIterator<Item = (EntityId, MonsterActivation)>,
    {
        let mut table = Self::new();
        for (entity, record) in records {
            if entity.is_player() {
                return Err(StateError::PlayerHasNoActivation(entity));
            }
            record.validate(entity)?;
            if table.records.insert(entity, record).is_some() {
                return Err(StateError::AlreadyTracked(entity));
            }
        }
        Ok(table)
    }

    /// Registers a newly spawned monster as Dormant at its spawn position.
    ///
    /// # Errors
    ///
    /// Rejects player-controlled actors and actors that are already tracked.
    pub fn spawn(&mut self, actor: &Actor) -> Result<&MonsterActivation, StateError> {
        if actor.is_player_controlled || actor.id.is_player() {
            return Err(StateError::PlayerHasNoActivation(actor.id));
        }
        if self.records.contains_key(&actor.id) {
            return Err(StateError::AlreadyTracked(actor.id));
        }

        Ok(self
            .records
            .entry(actor.id)
            .or_insert(MonsterActivation::dormant(actor.position)))
    }

    /// Drops the record of a monster removed from the simulation.
    pub fn despawn(&mut self, entity: EntityId) -> Option<MonsterActivation> {
        self.records.remove(&entity)
    }

    pub fn get(&self, entity: EntityId) -> Option<&MonsterActivation> {
        self.records.get(&entity)
    }

    pub fn state(&self, entity: EntityId) -> Option<ActivationState> {
        self.records.get(&entity).map(|record| record.state)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.records.contains_key(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &MonsterActivation)> + '_ {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    /// Monsters the turn scheduler should currently include.
    pub fn scheduled(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.records
            .iter()
            .filter(|(_, record)| record.state.is_scheduled())
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Overwrites an existing record. Only the state machine commits updates.
    pub(crate) fn commit(&mut self, entity: EntityId, record: MonsterActivation) {
        if let Some(slot) = self.records.get_mut(&entity) {
            *slot = record;
        }
    }
}

impl ActivationOracle for ActivationTable {
    fn activation_state(&self, entity: EntityId) -> Option<ActivationState> {
        self.state(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Faction;

    fn goblin(id: u32, x: i32, y: i32) -> Actor {
        Actor::monster(EntityId(id), Position::new(x, y), 5, Faction::GoblinClan)
    }

    #[test]
    fn spawned_monsters_start_dormant_at_home() {
        let mut table = ActivationTable::new();
        let record = *table.spawn(&goblin(1, 4, 2)).unwrap();

        assert_eq!(record.state, ActivationState::Dormant);
        assert_eq!(record.home_position, Position::new(4, 2));
        assert_eq!(record.last_known_player_position, None);
        assert_eq!(record.turns_since_player_seen, 0);
        assert_eq!(table.scheduled().count(), 0);
    }

    #[test]
    fn rejects_player_and_duplicates() {
        let mut table = ActivationTable::new();
        let player = Actor::player(Position::ORIGIN, 8);
        assert_eq!(
            table.spawn(&player).unwrap_err(),
            StateError::PlayerHasNoActivation(EntityId::PLAYER)
        );

        table.spawn(&goblin(1, 0, 0)).unwrap();
        assert_eq!(
            table.spawn(&goblin(1, 3, 3)).unwrap_err(),
            StateError::AlreadyTracked(EntityId(1))
        );
    }

    #[test]
    fn validate_flags_missing_last_known_position() {
        let mut record = MonsterActivation::dormant(Position::ORIGIN);
        assert!(record.validate(EntityId(3)).is_ok());

        record.state = ActivationState::Alert;
        let err = record.validate(EntityId(3)).unwrap_err();
        assert!(matches!(
            err,
            StateError::InvalidActivation {
                state: ActivationState::Alert,
                ..
            }
        ));

        record.last_known_player_position = Some(Position::new(1, 1));
        assert!(record.validate(EntityId(3)).is_ok());

        record.state = ActivationState::Dormant;
        assert!(record.validate(EntityId(3)).is_err());
    }

    #[test]
    fn restore_validates_records() {
        let good = MonsterActivation::dormant(Position::new(2, 2));
        let table = ActivationTable::restore([(EntityId(7), good)]).unwrap();
        assert_eq!(table.state(EntityId(7)), Some(ActivationState::Dormant));

        let bad = MonsterActivation {
            state: ActivationState::Active,
            ..good
        };
        assert!(ActivationTable::restore([(EntityId(7), bad)]).is_err());
        assert!(ActivationTable::restore([(EntityId(7), good), (EntityId(7), good)]).is_err());
    }

    #[test]
    fn state_names_are_snake_case() {
        assert_eq!(ActivationState::Returning.to_string(), "returning");
        assert!(!ActivationState::Dormant.is_scheduled());
        assert!(ActivationState::Alert.computes_fov());
    }
}
