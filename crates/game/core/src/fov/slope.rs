use std::cmp::Ordering;

/// Exact rational slope `num / den` within an octant, `den > 0`.
///
/// Compared by cross-multiplication so no floating point enters the
/// shadowcaster; equal ratios compare equal regardless of reduction.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Slope {
    num: i64,
    den: i64,
}

impl Slope {
    pub(crate) const ZERO: Self = Self { num: 0, den: 1 };
    pub(crate) const ONE: Self = Self { num: 1, den: 1 };

    pub(crate) const fn new(num: i64, den: i64) -> Self {
        debug_assert!(den > 0);
        Self { num, den }
    }

    /// Lower edge of the cell at `(row, col)`: the ray through its
    /// bottom-left corner as seen from the octant origin.
    pub(crate) const fn cell_low(row: i64, col: i64) -> Self {
        Self::new(2 * col - 1, 2 * row + 1)
    }

    /// Upper edge of the cell at `(row, col)`.
    pub(crate) const fn cell_high(row: i64, col: i64) -> Self {
        Self::new(2 * col + 1, 2 * row - 1)
    }

    /// Lowest ray that can enter `(row, col)` through its near face only,
    /// used when the neighbour at `col - 1` is opaque.
    pub(crate) const fn near_face_low(row: i64, col: i64) -> Self {
        Self::new(2 * col - 1, 2 * row - 1)
    }
}

impl PartialEq for Slope {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Slope {}

impl PartialOrd for Slope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Slope {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.num * other.den).cmp(&(other.num * self.den))
    }
}
