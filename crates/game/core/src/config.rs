use crate::fov::DistanceMetric;

/// Vision and activation tunables shared by the whole core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VisionConfig {
    /// Consecutive ticks without mutual visibility after which an Alert or
    /// Active monster starts returning home. The transition fires once the
    /// counter exceeds this value.
    pub return_threshold: u32,

    /// Extra tiles added to a dormant monster's vision range before the
    /// distance gate skips it.
    pub safety_margin: u32,

    /// Metric used for FOV radius clipping, range checks and the wake gate.
    pub distance_metric: DistanceMetric,
}

impl VisionConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_RETURN_THRESHOLD: u32 = 10;
    pub const DEFAULT_SAFETY_MARGIN: u32 = 3;

    pub fn new() -> Self {
        Self {
            return_threshold: Self::DEFAULT_RETURN_THRESHOLD,
            safety_margin: Self::DEFAULT_SAFETY_MARGIN,
            distance_metric: DistanceMetric::default(),
        }
    }

    pub fn with_return_threshold(mut self, return_threshold: u32) -> Self {
        self.return_threshold = return_threshold;
        self
    }

    pub fn with_safety_margin(mut self, safety_margin: u32) -> Self {
        self.safety_margin = safety_margin;
        self
    }

    pub fn with_distance_metric(mut self, distance_metric: DistanceMetric) -> Self {
        self.distance_metric = distance_metric;
        self
    }

    /// Projects the subset consumed by the activation state machine.
    pub fn activation(&self) -> ActivationConfig {
        ActivationConfig {
            return_threshold: self.return_threshold,
            safety_margin: self.safety_margin,
            distance_metric: self.distance_metric,
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of the activation state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivationConfig {
    pub return_threshold: u32,
    pub safety_margin: u32,
    pub distance_metric: DistanceMetric,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        VisionConfig::default().activation()
    }
}
