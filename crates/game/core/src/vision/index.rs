use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::warn;

use super::VisionError;
use crate::error::GameError;
use crate::env::{ActivationOracle, MapOracle, MapVersion};
use crate::fov::{DistanceMetric, VisibleSet, compute_fov};
use crate::state::{Actor, EntityId, Position};

/// Handed out for dormant viewers.
static NOTHING_VISIBLE: VisibleSet = VisibleSet::EMPTY;

/// Counters describing how much vision work the index performed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisionStats {
    /// Shadowcaster invocations.
    pub fov_computations: u64,
    pub cache_hits: u64,
    /// Queries answered without work because the viewer is Dormant.
    pub dormant_skips: u64,
    /// `can_see` queries rejected by the range check.
    pub range_rejections: u64,
    /// Coherence violations repaired by recomputing.
    pub self_heals: u64,
}

/// Cached FOV of one actor, valid while all three keys still match.
#[derive(Clone, Debug)]
struct CacheEntry {
    position: Position,
    radius: u32,
    map_version: MapVersion,
    visible: VisibleSet,
}

impl CacheEntry {
    fn is_fresh(&self, actor: &Actor, version: MapVersion) -> bool {
        self.position == actor.position
            && self.radius == actor.vision_range
            && self.map_version == version
    }
}

/// Per-actor FOV cache and the visibility queries built on it.
///
/// Entries are created lazily on first query and evicted only by
/// [`invalidate`](Self::invalidate) or [`invalidate_all`](Self::invalidate_all).
/// Callers must invalidate an actor after every move; a query that finds a
/// cached entry for another position at the same map version is treated as a
/// coherence violation.
#[derive(Clone, Debug, Default)]
pub struct VisionIndex {
    metric: DistanceMetric,
    entries: BTreeMap<EntityId, CacheEntry>,
    stats: VisionStats,
}

impl VisionIndex {
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            metric,
            entries: BTreeMap::new(),
            stats: VisionStats::default(),
        }
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// FOV of `actor`, computed on a miss.
    ///
    /// Dormant actors get [`VisibleSet::EMPTY`] and never run the shadowcaster.
    pub fn get_fov<M, A>(
        &mut self,
        map: &M,
        activations: &A,
        actor: &Actor,
    ) -> Result<&VisibleSet, VisionError>
    where
        M: MapOracle + ?Sized,
        A: ActivationOracle + ?Sized,
    {
        if activations.is_dormant(actor.id) {
            self.stats.dormant_skips += 1;
            return Ok(&NOTHING_VISIBLE);
        }
        self.fov_of(map, actor)
    }

    /// FOV of `actor` regardless of its activation state.
    ///
    /// Used only when a Dormant monster checks whether it notices the player.
    pub(crate) fn wake_fov<M>(&mut self, map: &M, actor: &Actor) -> Result<&VisibleSet, VisionError>
    where
        M: MapOracle + ?Sized,
    {
        self.fov_of(map, actor)
    }

    /// Whether `viewer` sees `target`. Not symmetric.
    pub fn can_see<M, A>(
        &mut self,
        map: &M,
        activations: &A,
        viewer: &Actor,
        target: &Actor,
    ) -> Result<bool, VisionError>
    where
        M: MapOracle + ?Sized,
        A: ActivationOracle + ?Sized,
    {
        if activations.is_dormant(viewer.id) {
            self.stats.dormant_skips += 1;
            return Ok(false);
        }
        if self
            .metric
            .exceeds(viewer.position, target.position, viewer.vision_range)
        {
            self.stats.range_rejections += 1;
            return Ok(false);
        }

        Ok(self.fov_of(map, viewer)?.contains(target.position))
    }

    /// Candidates other than `viewer` that `viewer` can see, in input order.
    pub fn visible_actors<'a, M, A>(
        &mut self,
        map: &M,
        activations: &A,
        viewer: &Actor,
        candidates: &'a [Actor],
    ) -> Result<Vec<&'a Actor>, VisionError>
    where
        M: MapOracle + ?Sized,
        A: ActivationOracle + ?Sized,
    {
        let mut seen = Vec::new();
        for candidate in candidates.iter().filter(|c| c.id != viewer.id) {
            if self.can_see(map, activations, viewer, candidate)? {
                seen.push(candidate);
            }
        }
        Ok(seen)
    }

    /// Evicts the entry of `id`. Returns whether one existed.
    pub fn invalidate(&mut self, id: EntityId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Clears every entry, e.g. after a map change.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn cached(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> VisionStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = VisionStats::default();
    }

    fn fov_of<M>(&mut self, map: &M, actor: &Actor) -> Result<&VisibleSet, VisionError>
    where
        M: MapOracle + ?Sized,
    {
        let version = map.version();

        match self.entries.entry(actor.id) {
            Entry::Occupied(slot) => {
                let cached = slot.get();
                if cached.is_fresh(actor, version) {
                    self.stats.cache_hits += 1;
                    return Ok(&slot.into_mut().visible);
                }

                if cached.map_version == version && cached.position != actor.position {
                    let violation = VisionError::CacheCoherenceViolation {
                        actor: actor.id,
                        cached: cached.position,
                        actual: actor.position,
                    };
                    debug_assert!(false, "{violation}");
                    warn!(
                        code = violation.error_code(),
                        "{violation}; recomputing FOV"
                    );
                    self.stats.self_heals += 1;
                }

                let fresh = compute_entry(self.metric, &mut self.stats, map, actor, version)?;
                let entry = slot.into_mut();
                *entry = fresh;
                Ok(&entry.visible)
            }
            Entry::Vacant(slot) => {
                let fresh = compute_entry(self.metric, &mut self.stats, map, actor, version)?;
                Ok(&slot.insert(fresh).visible)
            }
        }
    }
}

fn compute_entry<M>(
    metric: DistanceMetric,
    stats: &mut VisionStats,
    map: &M,
    actor: &Actor,
    version: MapVersion,
) -> Result<CacheEntry, VisionError>
where
    M: MapOracle + ?Sized,
{
    let visible = compute_fov(map, actor.position, actor.vision_range, metric)?;
    stats.fov_computations += 1;
    Ok(CacheEntry {
        position: actor.position,
        radius: actor.vision_range,
        map_version: version,
        visible,
    })
}
