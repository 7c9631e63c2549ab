use std::fmt;

use super::GridError;
use crate::state::Position;

/// Static map oracle exposing immutable layout information.
pub trait MapOracle {
    fn dimensions(&self) -> MapDimensions;
    fn tile(&self, position: Position) -> Option<StaticTile>;

    /// Structural version of the layout. Caches compare against it.
    fn version(&self) -> MapVersion;

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    /// Out-of-bounds positions block vision.
    fn blocks_vision(&self, position: Position) -> bool {
        self.tile(position).is_none_or(StaticTile::blocks_vision)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && i64::from(position.x) < i64::from(self.width)
            && i64::from(position.y) < i64::from(self.height)
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major index of an in-bounds position.
    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }
}

/// Monotonic counter bumped on every structural map change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapVersion(pub u64);

impl MapVersion {
    pub const INITIAL: Self = Self(0);

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for MapVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Immutable descriptor for a tile in the static layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticTile {
    terrain: TerrainKind,
}

impl StaticTile {
    pub const fn new(terrain: TerrainKind) -> Self {
        Self { terrain }
    }

    pub fn terrain(self) -> TerrainKind {
        self.terrain
    }

    pub fn blocks_vision(self) -> bool {
        self.terrain.blocks_vision()
    }
}

/// Canonical terrain classes for static map tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    #[default]
    Floor,
    Wall,
    Water,
    /// Chasm or open sky: impassable, but sight crosses it.
    Void,
}

impl TerrainKind {
    pub fn blocks_vision(self) -> bool {
        matches!(self, TerrainKind::Wall)
    }

    /// Terrain for an ASCII layout glyph.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(TerrainKind::Floor),
            '#' => Some(TerrainKind::Wall),
            '~' => Some(TerrainKind::Water),
            ' ' => Some(TerrainKind::Void),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            TerrainKind::Floor => '.',
            TerrainKind::Wall => '#',
            TerrainKind::Water => '~',
            TerrainKind::Void => ' ',
        }
    }
}

/// Immutable snapshot of the blocking layout shared by all FOV computations.
///
/// Edits never mutate a grid in place: [`Grid::with_edits`] returns a new
/// snapshot with the next [`MapVersion`].
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    dimensions: MapDimensions,
    tiles: Vec<TerrainKind>,
    version: MapVersion,
}

impl Grid {
    /// Builds a grid from row-major terrain.
    ///
    /// # Errors
    ///
    /// Fails when a dimension is zero or the tile count does not match.
    pub fn new(dimensions: MapDimensions, tiles: Vec<TerrainKind>) -> Result<Self, GridError> {
        if dimensions.width == 0 || dimensions.height == 0 {
            return Err(GridError::EmptyGrid {
                width: dimensions.width,
                height: dimensions.height,
            });
        }
        if tiles.len() != dimensions.area() {
            return Err(GridError::TileCountMismatch {
                expected: dimensions.area(),
                found: tiles.len(),
            });
        }

        Ok(Self {
            dimensions,
            tiles,
            version: MapVersion::INITIAL,
        })
    }

    /// An all-floor grid.
    ///
    /// # Errors
    ///
    /// Fails when a dimension is zero.
    pub fn open(width: u32, height: u32) -> Result<Self, GridError> {
        let dimensions = MapDimensions::new(width, height);
        Self::new(dimensions, vec![TerrainKind::Floor; dimensions.area()])
    }

    /// Parses an ASCII layout: `#` wall, `.` floor, `~` water, space void.
    /// Row `0` is `y = 0`.
    ///
    /// # Errors
    ///
    /// Fails on ragged rows, unknown glyphs or an empty layout.
    pub fn from_ascii<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());

        let mut tiles = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(GridError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let terrain =
                    TerrainKind::from_glyph(glyph).ok_or(GridError::UnknownGlyph {
                        glyph,
                        position: Position::new(x as i32, y as i32),
                    })?;
                tiles.push(terrain);
            }
        }

        Self::new(MapDimensions::new(width as u32, height as u32), tiles)
    }

    /// Returns the same grid tagged with an explicit version (used when
    /// restoring a map the host already versioned).
    #[must_use]
    pub fn with_version(mut self, version: MapVersion) -> Self {
        self.version = version;
        self
    }

    /// Returns a new snapshot with `edits` applied and the version bumped.
    ///
    /// # Errors
    ///
    /// Fails if any edit targets a position outside the grid; `self` is unchanged.
    pub fn with_edits<I>(&self, edits: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = (Position, TerrainKind)>,
    {
        let mut tiles = self.tiles.clone();
        for (position, terrain) in edits {
            let index =
                self.dimensions
                    .index(position)
                    .ok_or(GridError::PositionOutOfBounds {
                        position,
                        dimensions: self.dimensions,
                    })?;
            tiles[index] = terrain;
        }

        Ok(Self {
            dimensions: self.dimensions,
            tiles,
            version: self.version.next(),
        })
    }

    pub fn terrain(&self, position: Position) -> Option<TerrainKind> {
        self.dimensions
            .index(position)
            .map(|index| self.tiles[index])
    }
}

impl MapOracle for Grid {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn tile(&self, position: Position) -> Option<StaticTile> {
        self.terrain(position).map(StaticTile::new)
    }

    fn version(&self) -> MapVersion {
        self.version
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Grid {}x{} {}",
            self.dimensions.width, self.dimensions.height, self.version
        )?;
        for row in self.tiles.chunks(self.dimensions.width as usize) {
            let line: String = row.iter().map(|terrain| terrain.glyph()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
