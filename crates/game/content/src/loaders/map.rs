//! Map data loader.
//!
//! Loads pure terrain data into an immutable [`Grid`]. Actor placement is the
//! host's concern.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactical_core::{Grid, MapVersion, Position, TerrainKind};

use crate::loaders::{LoadResult, read_file};

/// Map data structure for RON files (terrain only).
///
/// Cells not listed in `tiles` are floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapDataRon {
    dimensions: (u32, u32),
    tiles: Vec<(i32, i32, TerrainKind)>, // (x, y, terrain)
}

/// Loader for map layouts.
pub struct MapLoader;

impl MapLoader {
    /// Load a map from a RON file.
    pub fn load(path: &Path) -> LoadResult<Grid> {
        let content = read_file(path)?;
        let grid = Self::parse(&content)?;
        log_loaded(path, &grid);
        Ok(grid)
    }

    /// Parse a map from RON text.
    pub fn parse(content: &str) -> LoadResult<Grid> {
        let data: MapDataRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        let (width, height) = data.dimensions;
        let edits = data
            .tiles
            .into_iter()
            .map(|(x, y, terrain)| (Position::new(x, y), terrain));

        // Listed tiles are the first edit on an all-floor grid; reset the
        // version so a freshly loaded map always starts at zero.
        let grid = Grid::open(width, height)?
            .with_edits(edits)?
            .with_version(MapVersion::INITIAL);
        Ok(grid)
    }

    /// Load a map from a plain-text layout: `#` wall, `.` floor, `~` water,
    /// space void. The first line is `y = 0`.
    pub fn load_ascii(path: &Path) -> LoadResult<Grid> {
        let content = read_file(path)?;
        let grid = Self::parse_ascii(&content)?;
        log_loaded(path, &grid);
        Ok(grid)
    }

    pub fn parse_ascii(content: &str) -> LoadResult<Grid> {
        let rows: Vec<&str> = content
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        Ok(Grid::from_ascii(&rows)?)
    }
}

fn log_loaded(path: &Path, grid: &Grid) {
    use tactical_core::MapOracle;

    let dimensions = grid.dimensions();
    tracing::debug!(
        path = %path.display(),
        width = dimensions.width,
        height = dimensions.height,
        "loaded map"
    );
}
