//! Vision-relevant view of an actor.
//!
//! Actors are owned by the actor-management collaborator; the core only reads
//! these fields. A position change must be followed by
//! [`VisionIndex::invalidate`](crate::vision::VisionIndex::invalidate) before
//! the next vision query.

use super::{EntityId, Faction, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub id: EntityId,
    pub position: Position,
    /// Sight radius in tiles. Always greater than zero for live actors.
    pub vision_range: u32,
    pub faction: Faction,
    pub is_player_controlled: bool,
}

impl Actor {
    pub fn new(
        id: EntityId,
        position: Position,
        vision_range: u32,
        faction: Faction,
        is_player_controlled: bool,
    ) -> Self {
        debug_assert!(vision_range > 0, "actor {id} must have a positive vision range");
        Self {
            id,
            position,
            vision_range,
            faction,
            is_player_controlled,
        }
    }

    /// The player character: [`EntityId::PLAYER`], player faction.
    pub fn player(position: Position, vision_range: u32) -> Self {
        Self::new(EntityId::PLAYER, position, vision_range, Faction::Player, true)
    }

    /// A non-player actor of the given faction.
    pub fn monster(id: EntityId, position: Position, vision_range: u32, faction: Faction) -> Self {
        Self::new(id, position, vision_range, faction, false)
    }

    /// Returns a copy placed at `position` (used by movement collaborators and tests).
    #[must_use]
    pub fn moved_to(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn is_hostile_to(&self, other: &Actor) -> bool {
        self.faction.is_hostile_to(&other.faction)
    }
}
