//! Vision configuration loader.

use std::path::Path;

use tactical_core::VisionConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`VisionConfig`] from TOML files.
///
/// Missing keys fall back to their defaults:
///
/// ```toml
/// return_threshold = 12
/// distance_metric = "chebyshev"
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<VisionConfig> {
        let content = read_file(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(
            path = %path.display(),
            return_threshold = config.return_threshold,
            safety_margin = config.safety_margin,
            metric = %config.distance_metric,
            "loaded vision config"
        );
        Ok(config)
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<VisionConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tactical_core::DistanceMetric;

    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let config = ConfigLoader::parse("return_threshold = 4\n").unwrap();
        assert_eq!(config.return_threshold, 4);
        assert_eq!(config.safety_margin, VisionConfig::DEFAULT_SAFETY_MARGIN);
        assert_eq!(config.distance_metric, DistanceMetric::Euclidean);

        assert_eq!(ConfigLoader::parse("").unwrap(), VisionConfig::default());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "safety_margin = 1").unwrap();
        writeln!(file, "distance_metric = \"manhattan\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.safety_margin, 1);
        assert_eq!(config.distance_metric, DistanceMetric::Manhattan);
    }

    #[test]
    fn rejects_unknown_metric_and_missing_file() {
        let err = ConfigLoader::parse("distance_metric = \"hexagonal\"").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config TOML"));

        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::load(&dir.path().join("absent.toml")).is_err());
    }
}
