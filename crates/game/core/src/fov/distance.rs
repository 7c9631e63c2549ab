use crate::state::Position;

/// Metric shared by FOV radius clipping, range checks and the wake gate.
///
/// All comparisons are integer-only and boundary inclusive.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DistanceMetric {
    /// `dx² + dy² <= r²`
    #[default]
    Euclidean,
    /// `max(|dx|, |dy|) <= r`
    Chebyshev,
    /// `|dx| + |dy| <= r`
    Manhattan,
}

impl DistanceMetric {
    /// Whether `b` lies within `range` of `a`.
    pub fn within(self, a: Position, b: Position, range: u32) -> bool {
        let (dx, dy) = a.abs_delta(b);
        let range = u64::from(range);
        match self {
            DistanceMetric::Euclidean => {
                let (dx, dy, range) = (u128::from(dx), u128::from(dy), u128::from(range));
                dx * dx + dy * dy <= range * range
            }
            DistanceMetric::Chebyshev => dx.max(dy) <= range,
            DistanceMetric::Manhattan => dx + dy <= range,
        }
    }

    #[inline]
    pub fn exceeds(self, a: Position, b: Position, range: u32) -> bool {
        !self.within(a, b, range)
    }
}
