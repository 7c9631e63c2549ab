//! Per-action orchestration of activation and time flow.
//!
//! [`TacticalEngine`] owns the map snapshot, the FOV cache and the activation
//! records. Hosts call [`TacticalEngine::tick`] once after each player action:
//! activation updates run to completion first, then the tactical gate decides
//! how time advances.

mod errors;
mod gate;

pub use errors::EngineError;
pub use gate::{TacticalModeGate, TimeFlow};

use tracing::debug;

use crate::activation::{ActivationStateMachine, ActivationUpdate};
use crate::config::VisionConfig;
use crate::env::{Grid, MapOracle, MapVersion, TerrainKind};
use crate::fov::VisibleSet;
use crate::state::{ActivationTable, Actor, EntityId, MonsterActivation, Position};
use crate::vision::VisionIndex;

/// Outcome of one engine tick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    /// Records changed this tick, in monster order.
    pub updates: Vec<ActivationUpdate>,
    pub time_flow: TimeFlow,
}

impl TickReport {
    pub fn transitions(&self) -> impl Iterator<Item = &ActivationUpdate> {
        self.updates.iter().filter(|update| update.is_transition())
    }
}

/// Vision-gated activation core for one level.
#[derive(Clone, Debug)]
pub struct TacticalEngine {
    grid: Grid,
    config: VisionConfig,
    index: VisionIndex,
    activations: ActivationTable,
    machine: ActivationStateMachine,
}

impl TacticalEngine {
    pub fn new(grid: Grid, config: VisionConfig) -> Self {
        Self::restore(grid, config, ActivationTable::new())
    }

    /// Resumes from persisted activation records.
    pub fn restore(grid: Grid, config: VisionConfig, activations: ActivationTable) -> Self {
        Self {
            grid,
            index: VisionIndex::new(config.distance_metric),
            activations,
            machine: ActivationStateMachine::new(config.activation()),
            config,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    pub fn activations(&self) -> &ActivationTable {
        &self.activations
    }

    pub fn index(&self) -> &VisionIndex {
        &self.index
    }

    /// Registers a newly spawned monster as Dormant at its position.
    pub fn spawn_monster(&mut self, monster: &Actor) -> Result<&MonsterActivation, EngineError> {
        Ok(self.activations.spawn(monster)?)
    }

    /// Forgets everything held about a removed monster.
    pub fn despawn(&mut self, entity: EntityId) -> Option<MonsterActivation> {
        self.index.invalidate(entity);
        self.machine.forget(entity);
        self.activations.despawn(entity)
    }

    /// Must be called after every position change of `entity`.
    pub fn actor_moved(&mut self, entity: EntityId) -> bool {
        self.index.invalidate(entity)
    }

    /// Swaps in a new map snapshot and drops every cached FOV.
    pub fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.index.invalidate_all();
    }

    /// Applies terrain edits as a new map version.
    pub fn edit_map<I>(&mut self, edits: I) -> Result<MapVersion, EngineError>
    where
        I: IntoIterator<Item = (Position, TerrainKind)>,
    {
        let edited = self.grid.with_edits(edits)?;
        let version = edited.version();
        self.replace_grid(edited);
        Ok(version)
    }

    pub fn record_damage(&mut self, entity: EntityId) -> bool {
        self.machine.record_damage(entity)
    }

    /// Runs activation updates for `monsters`, then decides the time flow.
    pub fn tick(&mut self, player: &Actor, monsters: &[Actor]) -> Result<TickReport, EngineError> {
        ensure_player(player)?;

        let updates = self.machine.update_states(
            &self.grid,
            &mut self.index,
            &mut self.activations,
            player,
            monsters,
        )?;
        let time_flow = TacticalModeGate::decide(
            &self.grid,
            &mut self.index,
            &self.activations,
            player,
            monsters,
        )?;

        let report = TickReport { updates, time_flow };
        debug!(
            monsters = monsters.len(),
            updates = report.updates.len(),
            transitions = report.transitions().count(),
            time_flow = %report.time_flow,
            "tick complete"
        );

        Ok(report)
    }

    pub fn should_use_tactical_mode(
        &mut self,
        player: &Actor,
        monsters: &[Actor],
    ) -> Result<bool, EngineError> {
        ensure_player(player)?;
        Ok(TacticalModeGate::should_use_tactical_mode(
            &self.grid,
            &mut self.index,
            &self.activations,
            player,
            monsters,
        )?)
    }

    pub fn can_see(&mut self, viewer: &Actor, target: &Actor) -> Result<bool, EngineError> {
        Ok(self
            .index
            .can_see(&self.grid, &self.activations, viewer, target)?)
    }

    pub fn visible_actors<'a>(
        &mut self,
        viewer: &Actor,
        candidates: &'a [Actor],
    ) -> Result<Vec<&'a Actor>, EngineError> {
        Ok(self
            .index
            .visible_actors(&self.grid, &self.activations, viewer, candidates)?)
    }

    pub fn fov(&mut self, actor: &Actor) -> Result<&VisibleSet, EngineError> {
        Ok(self.index.get_fov(&self.grid, &self.activations, actor)?)
    }
}

fn ensure_player(player: &Actor) -> Result<(), EngineError> {
    if player.is_player_controlled {
        Ok(())
    } else {
        Err(EngineError::NotPlayerControlled(player.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ActivationState, Faction};

    fn engine() -> TacticalEngine {
        TacticalEngine::new(Grid::open(20, 10).unwrap(), VisionConfig::default())
    }

    #[test]
    fn rejects_a_non_player_viewpoint() {
        let mut engine = engine();
        let impostor = Actor::monster(EntityId(3), Position::new(1, 1), 4, Faction::Hostile);

        let err = engine.tick(&impostor, &[]).unwrap_err();
        assert_eq!(err, EngineError::NotPlayerControlled(EntityId(3)));
    }

    #[test]
    fn despawn_clears_record_cache_and_damage() {
        let mut engine = engine();
        let goblin = Actor::monster(EntityId(1), Position::new(4, 4), 4, Faction::GoblinClan);
        engine.spawn_monster(&goblin).unwrap();
        engine.record_damage(goblin.id);
        let player = Actor::player(Position::new(1, 4), 6);
        engine.tick(&player, &[goblin]).unwrap();
        assert!(engine.index().cached(goblin.id));

        engine.record_damage(goblin.id);
        assert!(engine.despawn(goblin.id).is_some());
        assert!(!engine.index().cached(goblin.id));
        assert!(engine.activations().is_empty());
        assert!(engine.spawn_monster(&goblin).is_ok());
        assert_eq!(
            engine.activations().state(goblin.id),
            Some(ActivationState::Dormant)
        );
    }

    #[test]
    fn map_edits_invalidate_every_fov() {
        let mut engine = engine();
        let player = Actor::player(Position::new(1, 1), 6);
        engine.fov(&player).unwrap();
        assert!(engine.index().cached(EntityId::PLAYER));

        let version = engine
            .edit_map([(Position::new(2, 1), TerrainKind::Wall)])
            .unwrap();
        assert_eq!(version, MapVersion(1));
        assert!(engine.index().is_empty());
        assert!(!engine.fov(&player).unwrap().contains(Position::new(4, 1)));
    }
}
