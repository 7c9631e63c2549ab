//! Vision-gated activation and tactical time for a grid roguelike.
//!
//! `tactical-core` computes actor fields of view with recursive
//! shadowcasting, answers directional visibility queries through a per-actor
//! cache, drives each monster through Dormant → Alert → Active → Returning,
//! and decides whether time runs turn by turn or instantly.
//!
//! The crate is pure and synchronous. It performs no I/O and never installs a
//! tracing subscriber. [`engine::TacticalEngine`] bundles the pieces for hosts
//! that do not need to wire them individually.
pub mod activation;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod fov;
pub mod state;
pub mod vision;

pub use activation::{ActivationError, ActivationStateMachine, ActivationUpdate, TransitionCause};
pub use config::{ActivationConfig, VisionConfig};
pub use engine::{EngineError, TacticalEngine, TacticalModeGate, TickReport, TimeFlow};
pub use env::{
    ActivationOracle, AlwaysAwake, Grid, GridError, MapDimensions, MapOracle, MapVersion,
    StaticTile, TerrainKind,
};
pub use error::{ErrorSeverity, GameError};
pub use fov::{DistanceMetric, FovError, VisibleSet, compute_fov};
pub use state::{
    ActivationFields, ActivationState, ActivationTable, Actor, EntityId, Faction,
    MonsterActivation, Position, StateError,
};
pub use vision::{VisionError, VisionIndex, VisionStats};
