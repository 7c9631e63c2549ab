use crate::env::{ActivationOracle, MapOracle};
use crate::state::{ActivationState, Actor};
use crate::vision::{VisionError, VisionIndex};

/// How time advances after the player's action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TimeFlow {
    /// Turn-ordered: every scheduled actor acts in sequence.
    Tactical,
    /// Instant: the player moves freely while nobody hostile is engaged.
    Abstract,
}

impl TimeFlow {
    pub fn is_tactical(self) -> bool {
        matches!(self, TimeFlow::Tactical)
    }
}

/// Decides between tactical and abstract time.
///
/// Tactical mode holds while some monster hostile to the player is awake and
/// either side can see the other. The gate reads activation state but never
/// changes it; only the FOV cache is filled.
#[derive(Clone, Copy, Debug, Default)]
pub struct TacticalModeGate;

impl TacticalModeGate {
    pub fn should_use_tactical_mode<M, A>(
        map: &M,
        index: &mut VisionIndex,
        activations: &A,
        player: &Actor,
        monsters: &[Actor],
    ) -> Result<bool, VisionError>
    where
        M: MapOracle + ?Sized,
        A: ActivationOracle + ?Sized,
    {
        for monster in monsters {
            if !monster.is_hostile_to(player) {
                continue;
            }
            // Unregistered actors never hold tactical time.
            match activations.activation_state(monster.id) {
                None | Some(ActivationState::Dormant) => continue,
                Some(_) => {}
            }

            if index.can_see(map, activations, monster, player)?
                || index.can_see(map, activations, player, monster)?
            {
                return Ok(true);
            }
        }

        Ok(false)
    }

    pub fn decide<M, A>(
        map: &M,
        index: &mut VisionIndex,
        activations: &A,
        player: &Actor,
        monsters: &[Actor],
    ) -> Result<TimeFlow, VisionError>
    where
        M: MapOracle + ?Sized,
        A: ActivationOracle + ?Sized,
    {
        let tactical = Self::should_use_tactical_mode(map, index, activations, player, monsters)?;
        Ok(if tactical {
            TimeFlow::Tactical
        } else {
            TimeFlow::Abstract
        })
    }
}
