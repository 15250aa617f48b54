//! Analysis resolution settings

use serde::{Deserialize, Serialize};

use crate::types::{DEFAULT_TARGET_COUNT, MAX_TARGET_COUNT};

/// How finely tracks are analyzed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Requested envelope positions per track
    /// Values above 600 are clamped when used.
    /// Default: 600
    pub target_count: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_count: DEFAULT_TARGET_COUNT,
        }
    }
}

impl AnalysisConfig {
    /// Requested position count after applying the hard ceiling
    pub fn effective_target_count(&self) -> usize {
        self.target_count.min(MAX_TARGET_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = AnalysisConfig::default();
        assert_eq!(config.target_count, 600);
    }

    #[test]
    fn test_target_count_ceiling() {
        let config = AnalysisConfig { target_count: 4096 };
        assert_eq!(config.effective_target_count(), 600);
    }

    #[test]
    fn test_yaml_only_carries_target_count() {
        let config: AnalysisConfig = serde_yaml::from_str("target_count: 300\nworkers: 8\n").unwrap();
        assert_eq!(config, AnalysisConfig { target_count: 300 });
        assert_eq!(serde_yaml::to_string(&config).unwrap().trim(), "target_count: 300");
    }
}
