//! Map construction and edit errors.

use crate::env::MapDimensions;
use crate::error::{ErrorSeverity, GameError};
use crate::state::Position;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Width or height is zero.
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    EmptyGrid { width: u32, height: u32 },

    /// Tile buffer length does not match `width * height`.
    #[error("expected {expected} tiles for the grid, found {found}")]
    TileCountMismatch { expected: usize, found: usize },

    /// ASCII layout row has a different width than the first row.
    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// ASCII layout contains a glyph with no terrain mapping.
    #[error("unknown map glyph {glyph:?} at {position}")]
    UnknownGlyph { glyph: char, position: Position },

    /// Edit targets a cell outside the grid.
    #[error("position {position} is out of bounds ({}x{})", .dimensions.width, .dimensions.height)]
    PositionOutOfBounds {
        position: Position,
        dimensions: MapDimensions,
    },
}

impl GameError for GridError {
    fn severity(&self) -> ErrorSeverity {
        use GridError::*;
        match self {
            PositionOutOfBounds { .. } => ErrorSeverity::Recoverable,
            EmptyGrid { .. }
            | TileCountMismatch { .. }
            | RaggedRow { .. }
            | UnknownGlyph { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use GridError::*;
        match self {
            EmptyGrid { .. } => "GRID_EMPTY",
            TileCountMismatch { .. } => "GRID_TILE_COUNT_MISMATCH",
            RaggedRow { .. } => "GRID_RAGGED_ROW",
            UnknownGlyph { .. } => "GRID_UNKNOWN_GLYPH",
            PositionOutOfBounds { .. } => "GRID_POSITION_OUT_OF_BOUNDS",
        }
    }
}
