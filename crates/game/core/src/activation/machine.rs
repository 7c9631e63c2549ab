//! Per-tick activation updates.
//!
//! An update runs in three phases, mirroring how the rest of the core treats
//! state changes:
//!
//! 1. **pre-validate**: every stored record must match its state.
//! 2. **evaluate**: each monster's next record is derived from the records as
//!    they were at the start of the tick.
//! 3. **post-validate and commit**: staged records are checked again, then
//!    written back together.
//!
//! A failure in any phase leaves the table untouched.

use std::collections::BTreeSet;

use tracing::{debug, error};

use super::{ActivationError, ActivationUpdate, TransitionCause};
use crate::config::ActivationConfig;
use crate::env::MapOracle;
use crate::error::GameError;
use crate::state::{
    ActivationState, ActivationTable, Actor, EntityId, MonsterActivation, Position, StateError,
};
use crate::vision::VisionIndex;

/// A record change waiting for commit.
struct Staged {
    update: ActivationUpdate,
    record: MonsterActivation,
}

/// Drives Dormant → Alert → Active → Returning for every monster.
#[derive(Clone, Debug, Default)]
pub struct ActivationStateMachine {
    config: ActivationConfig,
    pending_damage: BTreeSet<EntityId>,
}

impl ActivationStateMachine {
    pub fn new(config: ActivationConfig) -> Self {
        Self {
            config,
            pending_damage: BTreeSet::new(),
        }
    }

    pub fn config(&self) -> &ActivationConfig {
        &self.config
    }

    /// Queues a damage event for `entity`, consumed by the next update that
    /// evaluates it. Returns false if damage was already queued.
    pub fn record_damage(&mut self, entity: EntityId) -> bool {
        self.pending_damage.insert(entity)
    }

    pub fn pending_damage(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.pending_damage.iter().copied()
    }

    /// Drops queued damage for a monster leaving the simulation.
    pub fn forget(&mut self, entity: EntityId) -> bool {
        self.pending_damage.remove(&entity)
    }

    /// Advances every monster in `monsters` by at most one transition.
    ///
    /// Returns one update per monster whose record changed. Player-controlled
    /// actors in `monsters` are ignored.
    ///
    /// # Errors
    ///
    /// - [`ActivationError::InvalidStateTransition`] if a stored or staged
    ///   record violates its state's invariants.
    /// - [`ActivationError::MissingActivation`] if a monster was never spawned.
    /// - [`ActivationError::Vision`] if a vision query fails.
    pub fn update_states<M>(
        &mut self,
        map: &M,
        index: &mut VisionIndex,
        table: &mut ActivationTable,
        player: &Actor,
        monsters: &[Actor],
    ) -> Result<Vec<ActivationUpdate>, ActivationError>
    where
        M: MapOracle + ?Sized,
    {
        for (entity, record) in table.iter() {
            record
                .validate(entity)
                .map_err(|err| invalid(record.state, err))?;
        }

        let mut staged = Vec::new();
        for monster in monsters.iter().filter(|m| !m.is_player_controlled) {
            let before = *table
                .get(monster.id)
                .ok_or(ActivationError::MissingActivation(monster.id))?;

            let Some((after, cause)) = self.evaluate(map, index, table, player, monster, &before)?
            else {
                continue;
            };
            if after == before {
                continue;
            }

            after
                .validate(monster.id)
                .map_err(|err| invalid(before.state, err))?;
            staged.push(Staged {
                update: ActivationUpdate::between(monster.id, &before, &after, cause),
                record: after,
            });
        }

        let mut updates = Vec::with_capacity(staged.len());
        for Staged { update, record } in staged {
            table.commit(update.entity, record);
            if update.cause == TransitionCause::ReachedHome {
                index.invalidate(update.entity);
            }
            if update.is_transition() {
                debug!(
                    entity = %update.entity,
                    from = %update.from,
                    to = %update.to,
                    cause = %update.cause,
                    "activation transition"
                );
            }
            updates.push(update);
        }

        for monster in monsters {
            self.pending_damage.remove(&monster.id);
        }

        Ok(updates)
    }

    /// Next record for one monster, or `None` when nothing applies.
    fn evaluate<M>(
        &self,
        map: &M,
        index: &mut VisionIndex,
        table: &ActivationTable,
        player: &Actor,
        monster: &Actor,
        record: &MonsterActivation,
    ) -> Result<Option<(MonsterActivation, TransitionCause)>, ActivationError>
    where
        M: MapOracle + ?Sized,
    {
        if self.pending_damage.contains(&monster.id) {
            return Ok(Some((engaged(record, player.position), TransitionCause::Damaged)));
        }

        let next = match record.state {
            ActivationState::Dormant => {
                self.evaluate_dormant(map, index, table, player, monster, record)?
            }
            ActivationState::Alert | ActivationState::Active => {
                if index.can_see(map, table, monster, player)? {
                    let cause = if record.state == ActivationState::Alert {
                        TransitionCause::SpottedPlayer
                    } else {
                        TransitionCause::Tracking
                    };
                    Some((engaged(record, player.position), cause))
                } else if index.can_see(map, table, player, monster)? {
                    let watched = MonsterActivation {
                        turns_since_player_seen: 0,
                        ..*record
                    };
                    Some((watched, TransitionCause::Tracking))
                } else {
                    let unseen = record.turns_since_player_seen.saturating_add(1);
                    if unseen > self.config.return_threshold {
                        let returning = MonsterActivation {
                            state: ActivationState::Returning,
                            turns_since_player_seen: unseen,
                            ..*record
                        };
                        Some((returning, TransitionCause::LostTrack))
                    } else {
                        let waiting = MonsterActivation {
                            turns_since_player_seen: unseen,
                            ..*record
                        };
                        Some((waiting, TransitionCause::Tracking))
                    }
                }
            }
            ActivationState::Returning => {
                if index.can_see(map, table, monster, player)? {
                    Some((engaged(record, player.position), TransitionCause::Reacquired))
                } else if monster.position == record.home_position {
                    Some((
                        MonsterActivation::dormant(record.home_position),
                        TransitionCause::ReachedHome,
                    ))
                } else {
                    None
                }
            }
        };

        Ok(next)
    }

    fn evaluate_dormant<M>(
        &self,
        map: &M,
        index: &mut VisionIndex,
        table: &ActivationTable,
        player: &Actor,
        monster: &Actor,
        record: &MonsterActivation,
    ) -> Result<Option<(MonsterActivation, TransitionCause)>, ActivationError>
    where
        M: MapOracle + ?Sized,
    {
        let metric = self.config.distance_metric;
        let reach = monster.vision_range.saturating_add(self.config.safety_margin);
        if metric.exceeds(monster.position, player.position, reach) {
            return Ok(None);
        }

        if index.can_see(map, table, player, monster)? {
            let alert = MonsterActivation {
                state: ActivationState::Alert,
                last_known_player_position: Some(player.position),
                turns_since_player_seen: 0,
                ..*record
            };
            return Ok(Some((alert, TransitionCause::SpottedByPlayer)));
        }

        if metric.within(monster.position, player.position, monster.vision_range)
            && index.wake_fov(map, monster)?.contains(player.position)
        {
            return Ok(Some((
                engaged(record, player.position),
                TransitionCause::SpottedPlayer,
            )));
        }

        Ok(None)
    }
}

/// Active, tracking the player at `player_position`.
fn engaged(record: &MonsterActivation, player_position: Position) -> MonsterActivation {
    MonsterActivation {
        state: ActivationState::Active,
        last_known_player_position: Some(player_position),
        turns_since_player_seen: 0,
        ..*record
    }
}

fn invalid(from: ActivationState, err: StateError) -> ActivationError {
    let err = ActivationError::from_validation(from, err);
    error!(code = err.error_code(), "{err}");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Grid;
    use crate::error::ErrorSeverity;
    use crate::state::{ActivationFields, Faction};

    struct Fixture {
        grid: Grid,
        index: VisionIndex,
        table: ActivationTable,
        machine: ActivationStateMachine,
    }

    impl Fixture {
        fn new(grid: Grid) -> Self {
            Self {
                grid,
                index: VisionIndex::default(),
                table: ActivationTable::new(),
                machine: ActivationStateMachine::default(),
            }
        }

        fn with_threshold(mut self, return_threshold: u32) -> Self {
            self.machine = ActivationStateMachine::new(ActivationConfig {
                return_threshold,
                ..ActivationConfig::default()
            });
            self
        }

        fn spawn(&mut self, monster: &Actor) {
            self.table.spawn(monster).unwrap();
        }

        fn set(&mut self, monster: &Actor, record: MonsterActivation) {
            self.table.commit(monster.id, record);
        }

        fn tick(
            &mut self,
            player: &Actor,
            monsters: &[Actor],
        ) -> Result<Vec<ActivationUpdate>, ActivationError> {
            self.machine.update_states(
                &self.grid,
                &mut self.index,
                &mut self.table,
                player,
                monsters,
            )
        }

        fn record(&self, monster: &Actor) -> MonsterActivation {
            *self.table.get(monster.id).unwrap()
        }
    }

    fn goblin(id: u32, x: i32, y: i32, range: u32) -> Actor {
        Actor::monster(EntityId(id), Position::new(x, y), range, Faction::GoblinClan)
    }

    fn tracking(home: Position, state: ActivationState, last_known: Position) -> MonsterActivation {
        MonsterActivation {
            state,
            home_position: home,
            last_known_player_position: Some(last_known),
            turns_since_player_seen: 0,
        }
    }

    /// A wall at (4,1) hides (2,1) and (6,1) from each other.
    fn blocked_corridor() -> Grid {
        Grid::from_ascii(&["..........", "....#.....", ".........."]).unwrap()
    }

    #[test]
    fn damage_overrides_distance() {
        let mut fx = Fixture::new(Grid::open(60, 5).unwrap());
        let player = Actor::player(Position::new(2, 2), 5);
        let monster = goblin(1, 52, 2, 4);
        fx.spawn(&monster);

        assert!(fx.machine.record_damage(monster.id));
        let updates = fx.tick(&player, &[monster]).unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].cause, TransitionCause::Damaged);
        assert_eq!(updates[0].to, ActivationState::Active);
        let record = fx.record(&monster);
        assert_eq!(record.last_known_player_position, Some(player.position));
        assert_eq!(record.turns_since_player_seen, 0);
        assert_eq!(fx.machine.pending_damage().count(), 0);
        assert_eq!(fx.index.stats().fov_computations, 0);
    }

    #[test]
    fn distant_dormant_monsters_cost_nothing() {
        let mut fx = Fixture::new(Grid::open(60, 5).unwrap());
        let player = Actor::player(Position::new(2, 2), 5);
        let monster = goblin(1, 52, 2, 4);
        fx.spawn(&monster);

        let updates = fx.tick(&player, &[monster]).unwrap();

        assert!(updates.is_empty());
        let stats = fx.index.stats();
        assert_eq!(stats.fov_computations, 0);
        assert_eq!(stats.range_rejections, 0);
    }

    #[test]
    fn player_spotting_a_dormant_monster_alerts_it() {
        let mut fx = Fixture::new(Grid::open(20, 5).unwrap());
        let player = Actor::player(Position::new(2, 2), 8);
        let monster = goblin(1, 8, 2, 3);
        fx.spawn(&monster);

        let updates = fx.tick(&player, &[monster]).unwrap();

        assert_eq!(updates.len(), 1);
        let update = updates[0];
        assert_eq!(
            (update.from, update.to),
            (ActivationState::Dormant, ActivationState::Alert)
        );
        assert_eq!(update.cause, TransitionCause::SpottedByPlayer);
        assert_eq!(
            update.changed,
            ActivationFields::STATE | ActivationFields::LAST_KNOWN
        );
    }

    #[test]
    fn dormant_monster_spotting_the_player_activates() {
        let mut fx = Fixture::new(Grid::open(20, 5).unwrap());
        let player = Actor::player(Position::new(2, 2), 2);
        let monster = goblin(1, 6, 2, 6);
        fx.spawn(&monster);

        let updates = fx.tick(&player, &[monster]).unwrap();

        assert_eq!(updates[0].to, ActivationState::Active);
        assert_eq!(updates[0].cause, TransitionCause::SpottedPlayer);
        assert_eq!(
            fx.record(&monster).last_known_player_position,
            Some(player.position)
        );
    }

    #[test]
    fn only_one_transition_per_tick() {
        // Both see each other: the dormant monster stops at Alert this tick.
        let mut fx = Fixture::new(Grid::open(20, 5).unwrap());
        let player = Actor::player(Position::new(2, 2), 8);
        let monster = goblin(1, 6, 2, 8);
        fx.spawn(&monster);

        fx.tick(&player, &[monster]).unwrap();
        assert_eq!(fx.record(&monster).state, ActivationState::Alert);

        let updates = fx.tick(&player, &[monster]).unwrap();
        assert_eq!(updates[0].cause, TransitionCause::SpottedPlayer);
        assert_eq!(fx.record(&monster).state, ActivationState::Active);
    }

    #[test]
    fn being_watched_resets_the_counter() {
        let mut fx = Fixture::new(Grid::open(20, 5).unwrap());
        let player = Actor::player(Position::new(2, 2), 8);
        let monster = goblin(1, 8, 2, 3);
        fx.spawn(&monster);
        let mut record = tracking(monster.position, ActivationState::Active, Position::ORIGIN);
        record.turns_since_player_seen = 4;
        fx.set(&monster, record);

        let updates = fx.tick(&player, &[monster]).unwrap();

        assert_eq!(updates[0].cause, TransitionCause::Tracking);
        assert_eq!(updates[0].changed, ActivationFields::TURNS_UNSEEN);
        let after = fx.record(&monster);
        assert_eq!(after.state, ActivationState::Active);
        assert_eq!(after.turns_since_player_seen, 0);
        // The monster never saw the player, so its memory is unchanged.
        assert_eq!(after.last_known_player_position, Some(Position::ORIGIN));
    }

    #[test]
    fn losing_track_past_the_threshold_returns_home() {
        let mut fx = Fixture::new(blocked_corridor()).with_threshold(2);
        let player = Actor::player(Position::new(2, 1), 8);
        let monster = goblin(1, 6, 1, 8);
        fx.spawn(&monster);
        fx.set(
            &monster,
            tracking(Position::new(9, 1), ActivationState::Active, Position::new(3, 1)),
        );

        for expected in 1..=2 {
            let updates = fx.tick(&player, &[monster]).unwrap();
            assert_eq!(updates[0].cause, TransitionCause::Tracking);
            assert_eq!(fx.record(&monster).turns_since_player_seen, expected);
        }

        let updates = fx.tick(&player, &[monster]).unwrap();
        assert_eq!(updates[0].cause, TransitionCause::LostTrack);
        assert_eq!(fx.record(&monster).state, ActivationState::Returning);
        assert_eq!(fx.record(&monster).turns_since_player_seen, 3);
    }

    #[test]
    fn watched_alert_monster_stays_alert() {
        let mut fx = Fixture::new(Grid::open(20, 5).unwrap());
        let player = Actor::player(Position::new(2, 2), 8);
        let monster = goblin(1, 8, 2, 3);
        fx.spawn(&monster);
        let mut record = tracking(monster.position, ActivationState::Alert, Position::new(1, 1));
        record.turns_since_player_seen = 3;
        fx.set(&monster, record);

        let updates = fx.tick(&player, &[monster]).unwrap();

        assert_eq!(updates[0].cause, TransitionCause::Tracking);
        assert!(!updates[0].is_transition());
        let after = fx.record(&monster);
        assert_eq!(after.state, ActivationState::Alert);
        assert_eq!(after.turns_since_player_seen, 0);
        assert_eq!(after.last_known_player_position, Some(Position::new(1, 1)));
    }

    #[test]
    fn unseen_alert_monster_gives_up() {
        let mut fx = Fixture::new(blocked_corridor()).with_threshold(2);
        let player = Actor::player(Position::new(2, 1), 8);
        let monster = goblin(1, 6, 1, 8);
        fx.spawn(&monster);
        fx.set(&monster, tracking(monster.position, ActivationState::Alert, Position::new(3, 1)));

        for expected in 1..=2 {
            let updates = fx.tick(&player, &[monster]).unwrap();
            assert_eq!(updates[0].cause, TransitionCause::Tracking);
            let record = fx.record(&monster);
            assert_eq!(record.state, ActivationState::Alert);
            assert_eq!(record.turns_since_player_seen, expected);
        }

        let updates = fx.tick(&player, &[monster]).unwrap();
        assert_eq!(
            (updates[0].from, updates[0].to),
            (ActivationState::Alert, ActivationState::Returning)
        );
        assert_eq!(updates[0].cause, TransitionCause::LostTrack);
        let record = fx.record(&monster);
        assert_eq!(record.turns_since_player_seen, 3);
        assert_eq!(record.last_known_player_position, Some(Position::new(3, 1)));
    }

    #[test]
    fn returning_home_goes_dormant_and_evicts_fov() {
        let mut fx = Fixture::new(blocked_corridor());
        let player = Actor::player(Position::new(2, 1), 8);
        let monster = goblin(1, 6, 1, 8);
        fx.spawn(&monster);
        fx.set(
            &monster,
            tracking(monster.position, ActivationState::Returning, Position::new(3, 1)),
        );
        fx.index.get_fov(&fx.grid, &fx.table, &monster).unwrap();
        assert!(fx.index.cached(monster.id));

        let updates = fx.tick(&player, &[monster]).unwrap();

        assert_eq!(updates[0].cause, TransitionCause::ReachedHome);
        assert_eq!(fx.record(&monster), MonsterActivation::dormant(monster.position));
        assert!(!fx.index.cached(monster.id));
    }

    #[test]
    fn returning_monster_away_from_home_keeps_walking() {
        let mut fx = Fixture::new(blocked_corridor());
        let player = Actor::player(Position::new(2, 1), 8);
        let monster = goblin(1, 6, 1, 8);
        fx.spawn(&monster);
        fx.set(
            &monster,
            tracking(Position::new(9, 1), ActivationState::Returning, Position::new(3, 1)),
        );

        assert!(fx.tick(&player, &[monster]).unwrap().is_empty());
    }

    #[test]
    fn returning_monster_reacquires_the_player() {
        let mut fx = Fixture::new(Grid::open(20, 5).unwrap());
        let player = Actor::player(Position::new(2, 2), 4);
        let monster = goblin(1, 6, 2, 6);
        fx.spawn(&monster);
        fx.set(
            &monster,
            tracking(Position::new(15, 2), ActivationState::Returning, Position::ORIGIN),
        );

        let updates = fx.tick(&player, &[monster]).unwrap();

        assert_eq!(updates[0].cause, TransitionCause::Reacquired);
        assert_eq!(fx.record(&monster).state, ActivationState::Active);
    }

    #[test]
    fn corrupt_record_is_fatal_and_nothing_commits() {
        let mut fx = Fixture::new(Grid::open(20, 5).unwrap());
        let player = Actor::player(Position::new(2, 2), 8);
        let healthy = goblin(1, 8, 2, 3);
        let corrupt = goblin(2, 12, 2, 3);
        fx.spawn(&healthy);
        fx.spawn(&corrupt);
        fx.set(
            &corrupt,
            MonsterActivation {
                state: ActivationState::Alert,
                ..MonsterActivation::dormant(corrupt.position)
            },
        );

        let err = fx.tick(&player, &[healthy, corrupt]).unwrap_err();

        assert!(matches!(
            err,
            ActivationError::InvalidStateTransition { entity, .. } if entity == corrupt.id
        ));
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert_eq!(fx.record(&healthy).state, ActivationState::Dormant);
    }

    #[test]
    fn unspawned_monster_is_reported() {
        let mut fx = Fixture::new(Grid::open(10, 10).unwrap());
        let player = Actor::player(Position::new(2, 2), 8);
        let stray = goblin(9, 4, 4, 3);

        let err = fx.tick(&player, &[stray]).unwrap_err();
        assert_eq!(err, ActivationError::MissingActivation(stray.id));
    }
}
