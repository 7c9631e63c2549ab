use std::collections::BTreeSet;
use std::collections::btree_set;

use crate::state::Position;

/// Ordered set of positions visible from one origin.
///
/// Iteration order is `Position`'s `Ord` (x, then y), which makes
/// [`VisibleSet::digest`] stable across runs and platforms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleSet {
    cells: BTreeSet<Position>,
}

impl VisibleSet {
    /// The empty set handed out for dormant viewers.
    pub const EMPTY: Self = Self {
        cells: BTreeSet::new(),
    };

    pub(crate) fn insert(&mut self, position: Position) -> bool {
        self.cells.insert(position)
    }

    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains(&position)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Position> {
        self.cells.iter()
    }

    /// SHA-256 over the ordered cells, `x` then `y`, little endian.
    pub fn digest(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        for position in &self.cells {
            hasher.update(position.x.to_le_bytes());
            hasher.update(position.y.to_le_bytes());
        }

        hasher.finalize().into()
    }
}

impl<'a> IntoIterator for &'a VisibleSet {
    type Item = &'a Position;
    type IntoIter = btree_set::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Position> for VisibleSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
