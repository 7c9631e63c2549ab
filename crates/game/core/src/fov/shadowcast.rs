//! Recursive shadowcasting over eight octants.
//!
//! Inside an octant, cells are addressed by `(row, col)` with `row >= 1` the
//! distance along the primary axis and `0 <= col <= row`. A cell covers the
//! slope interval `((2c-1)/(2r+1), (2c+1)/(2r-1))` as seen from the origin's
//! center. Every row is scanned against a window of still-lit slopes;
//! opaque cells carve their interval out of the window handed to the next
//! row.
//!
//! A cell is lit when a bundle of rays of positive width reaches it. Rays
//! that would enter a cell through its side must first cross the neighbour at
//! `col - 1`; when that neighbour is opaque only the near face counts, which
//! keeps light from squeezing between two diagonally touching walls.

use tracing::trace;

use super::slope::Slope;
use super::{DistanceMetric, FovError, VisibleSet};
use crate::env::MapOracle;
use crate::state::Position;

/// Maps octant coordinates `(row, col)` to a map offset `(dx, dy)`.
///
/// ```text
///  \ 7 | 0 /
///  6 \ | / 1
///  ----o----   +-> x
///  5 / | \ 2   |
///   / 4|3 \    v y
/// ```
fn octant_offset(octant: u8, row: i64, col: i64) -> (i64, i64) {
    match octant {
        0 => (col, -row),
        1 => (row, -col),
        2 => (row, col),
        3 => (col, row),
        4 => (-col, row),
        5 => (-row, col),
        6 => (-row, -col),
        _ => (-col, -row),
    }
}

/// Computes every position visible from `origin` within `radius`.
///
/// The result always contains `origin`. Opaque cells that are lit are part of
/// the result; out-of-bounds cells block and are never reported.
///
/// # Errors
///
/// Returns [`FovError::InvalidOrigin`] if `origin` lies outside the map.
pub fn compute_fov<M>(
    map: &M,
    origin: Position,
    radius: u32,
    metric: DistanceMetric,
) -> Result<VisibleSet, FovError>
where
    M: MapOracle + ?Sized,
{
    let dimensions = map.dimensions();
    if !dimensions.contains(origin) {
        return Err(FovError::InvalidOrigin { origin, dimensions });
    }

    // Rows past the far edge of the map can never be lit.
    let max_row = i64::from(radius.min(dimensions.width.max(dimensions.height)));

    let mut visible = VisibleSet::default();
    visible.insert(origin);

    for octant in 0..8 {
        let octant = Octant {
            map,
            origin,
            radius,
            max_row,
            metric,
            octant,
        };
        octant.cast(&mut visible);
    }

    trace!(
        origin = %origin,
        radius,
        visible = visible.len(),
        "computed field of view"
    );

    Ok(visible)
}

struct Octant<'a, M: ?Sized> {
    map: &'a M,
    origin: Position,
    radius: u32,
    max_row: i64,
    metric: DistanceMetric,
    octant: u8,
}

/// A row still to scan together with the lit slope window `(low, high)`.
struct Window {
    row: i64,
    low: Slope,
    high: Slope,
}

impl<M> Octant<'_, M>
where
    M: MapOracle + ?Sized,
{
    fn cast(&self, visible: &mut VisibleSet) {
        let mut pending = vec![Window {
            row: 1,
            low: Slope::ZERO,
            high: Slope::ONE,
        }];

        while let Some(window) = pending.pop() {
            if window.row > self.max_row {
                continue;
            }
            self.scan_row(window, visible, &mut pending);
        }
    }

    fn scan_row(&self, window: Window, visible: &mut VisibleSet, pending: &mut Vec<Window>) {
        let Window { row, low, high } = window;
        let mut open_from = low;

        for col in 0..=row {
            let cell_low = Slope::cell_low(row, col);
            let cell_high = Slope::cell_high(row, col);
            if cell_high <= low {
                continue;
            }
            if cell_low >= high {
                break;
            }

            let position = self.position(row, col);
            let opaque = position.is_none_or(|p| self.map.blocks_vision(p));

            let entry = if col > 0 && self.is_opaque(row, col - 1) {
                cell_low.max(Slope::near_face_low(row, col))
            } else {
                cell_low
            };
            if let Some(position) = position {
                let lit = entry.max(low) < cell_high.min(high);
                if lit
                    && self.map.contains(position)
                    && self.metric.within(self.origin, position, self.radius)
                {
                    visible.insert(position);
                }
            }

            if opaque {
                if cell_low > open_from {
                    pending.push(Window {
                        row: row + 1,
                        low: open_from,
                        high: cell_low,
                    });
                }
                open_from = open_from.max(cell_high);
            }
        }

        if open_from < high {
            pending.push(Window {
                row: row + 1,
                low: open_from,
                high,
            });
        }
    }

    fn is_opaque(&self, row: i64, col: i64) -> bool {
        self.position(row, col).is_none_or(|p| self.map.blocks_vision(p))
    }

    /// Map position of an octant cell, `None` if it leaves the `i32` plane.
    fn position(&self, row: i64, col: i64) -> Option<Position> {
        let (dx, dy) = octant_offset(self.octant, row, col);
        let x = i32::try_from(i64::from(self.origin.x) + dx).ok()?;
        let y = i32::try_from(i64::from(self.origin.y) + dy).ok()?;
        Some(Position::new(x, y))
    }
}
